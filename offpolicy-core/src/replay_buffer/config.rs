//! Configuration of [`ReplayBuffer`](super::ReplayBuffer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ReplayBuffer`](super::ReplayBuffer).
///
/// ```rust
/// use offpolicy_core::replay_buffer::ReplayBufferConfig;
///
/// let config = ReplayBufferConfig::default()
///     .capacity(100_000)
///     .state_dim(17)
///     .action_dim(6)
///     .seed(0);
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ReplayBufferConfig {
    /// Maximum number of transitions. When the buffer is full, new
    /// transitions replace the oldest ones.
    pub capacity: usize,

    /// Dimension of states.
    pub state_dim: usize,

    /// Dimension of continuous actions, or the number of discrete actions.
    pub action_dim: usize,

    /// Seed of the random number generator used for sampling.
    pub seed: u64,
}

impl Default for ReplayBufferConfig {
    /// `capacity = 1_000_000`, `state_dim = 1`, `action_dim = 1`, `seed = 42`.
    fn default() -> Self {
        Self {
            capacity: 1_000_000,
            state_dim: 1,
            action_dim: 1,
            seed: 42,
        }
    }
}

impl ReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the dimension of states.
    pub fn state_dim(mut self, state_dim: usize) -> Self {
        self.state_dim = state_dim;
        self
    }

    /// Sets the dimension of actions.
    pub fn action_dim(mut self, action_dim: usize) -> Self {
        self.action_dim = action_dim;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
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
