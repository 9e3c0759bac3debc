//! Configuration of [`TargetSynchronizer`](super::TargetSynchronizer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`TargetSynchronizer`](super::TargetSynchronizer).
///
/// DDPG-style agents blend a little every optimization step
/// ([`TargetSyncConfig::soft`]); DQN-style agents copy the whole network
/// every `interval` steps ([`TargetSyncConfig::hard`]).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TargetSyncConfig {
    /// Blend coefficient in `[0, 1]`.
    pub tau: f64,

    /// Number of calls to
    /// [`TargetSynchronizer::step`](super::TargetSynchronizer::step)
    /// between two updates. Zero is treated as one.
    pub interval: usize,
}

impl Default for TargetSyncConfig {
    /// `tau = 0.005`, `interval = 1`.
    fn default() -> Self {
        Self {
            tau: 0.005,
            interval: 1,
        }
    }
}

impl TargetSyncConfig {
    /// Soft update with `tau` at every step.
    pub fn soft(tau: f64) -> Self {
        Self { tau, interval: 1 }
    }

    /// Hard copy every `interval` steps.
    pub fn hard(interval: usize) -> Self {
        Self { tau: 1.0, interval }
    }

    /// Sets the blend coefficient.
    pub fn tau(mut self, tau: f64) -> Self {
        self.tau = tau;
        self
    }

    /// Sets the update interval.
    pub fn interval(mut self, interval: usize) -> Self {
        self.interval = interval;
        self
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
