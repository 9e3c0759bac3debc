//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
///
/// All intervals are counted in environment steps.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of environment steps of the training run.
    pub max_timesteps: usize,

    /// Warmup period. Actions are sampled uniformly from the action space
    /// and no optimization step is done before this number of steps.
    pub start_timesteps: usize,

    /// Minimum number of stored transitions before optimization starts.
    pub batch_size: usize,

    /// Interval of optimization steps.
    pub opt_interval: usize,

    /// Interval of evaluation.
    pub eval_freq: usize,

    /// Every `record_interval`-th optimization step, its record is written
    /// to the recorder.
    pub record_interval: usize,

    /// Random seed of the training environment and of random actions.
    pub seed: i64,

    /// Where to save model parameters. Nothing is saved if `None`.
    pub model_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_timesteps: 1_000_000,
            start_timesteps: 25_000,
            batch_size: 256,
            opt_interval: 1,
            eval_freq: 5_000,
            record_interval: usize::MAX,
            seed: 0,
            model_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of environment steps.
    pub fn max_timesteps(mut self, v: usize) -> Self {
        self.max_timesteps = v;
        self
    }

    /// Sets the warmup period.
    pub fn start_timesteps(mut self, v: usize) -> Self {
        self.start_timesteps = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the interval of optimization.
    pub fn opt_interval(mut self, v: usize) -> Self {
        self.opt_interval = v;
        self
    }

    /// Sets the interval of evaluation.
    pub fn eval_freq(mut self, v: usize) -> Self {
        self.eval_freq = v;
        self
    }

    /// Sets the interval of recording agent information in optimization steps.
    pub fn record_interval(mut self, v: usize) -> Self {
        self.record_interval = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the directory where model parameters are saved.
    pub fn model_dir(mut self, model_dir: impl Into<String>) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .max_timesteps(100)
            .start_timesteps(10)
            .eval_freq(20)
            .model_dir("some/directory");

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
