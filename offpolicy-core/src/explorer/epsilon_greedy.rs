//! Epsilon-greedy action selection.
use crate::util::argmax;
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// How epsilon decays with the number of actions taken.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum EpsilonSchedule {
    /// Decreases linearly from `eps_start` to `eps_final` over `final_step`
    /// actions, then stays at `eps_final`.
    Linear {
        /// Initial epsilon.
        eps_start: f64,

        /// Final epsilon.
        eps_final: f64,

        /// Number of actions after which `eps_final` is reached.
        final_step: usize,
    },

    /// Multiplied by `decay` before every action, floored at `eps_min`.
    Exponential {
        /// Initial epsilon.
        eps_start: f64,

        /// Lower bound of epsilon.
        eps_min: f64,

        /// Multiplicative decay per action.
        decay: f64,
    },
}

/// Epsilon-greedy explorer.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Number of actions taken so far.
    pub n_opts: usize,

    /// Decay schedule.
    pub schedule: EpsilonSchedule,
}

impl Default for EpsilonGreedy {
    /// Linear decay from 1.0 to 0.02 over 100,000 actions.
    fn default() -> Self {
        Self::with_final_step(100_000)
    }
}

impl EpsilonGreedy {
    /// Linear decay from 1.0 to 0.02 over `final_step` actions.
    pub fn with_final_step(final_step: usize) -> Self {
        Self {
            n_opts: 0,
            schedule: EpsilonSchedule::Linear {
                eps_start: 1.0,
                eps_final: 0.02,
                final_step,
            },
        }
    }

    /// Multiplicative decay.
    pub fn exponential(eps_start: f64, eps_min: f64, decay: f64) -> Self {
        Self {
            n_opts: 0,
            schedule: EpsilonSchedule::Exponential {
                eps_start,
                eps_min,
                decay,
            },
        }
    }

    /// Returns the epsilon used for the next action.
    pub fn eps(&self) -> f64 {
        match self.schedule {
            EpsilonSchedule::Linear {
                eps_start,
                eps_final,
                final_step,
            } => {
                if self.n_opts >= final_step {
                    eps_final
                } else {
                    let d = (eps_start - eps_final) / final_step as f64;
                    (eps_start - d * self.n_opts as f64).max(eps_final)
                }
            }
            EpsilonSchedule::Exponential {
                eps_start,
                eps_min,
                decay,
            } => {
                let n = (self.n_opts + 1).min(i32::MAX as usize) as i32;
                (eps_start * decay.powi(n)).max(eps_min)
            }
        }
    }

    /// Takes an action based on action values `q_values`.
    ///
    /// # Panics
    ///
    /// Panics if `q_values` is empty.
    pub fn action(&mut self, q_values: &[f32], rng: &mut impl Rng) -> usize {
        assert!(!q_values.is_empty(), "No action values are given");
        let eps = self.eps();
        self.n_opts += 1;

        if rng.gen::<f64>() < eps {
            rng.gen_range(0..q_values.len())
        } else {
            argmax(q_values)
        }
    }

    /// Constructs [`EpsilonGreedy`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`EpsilonGreedy`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use tempdir::TempDir;

    #[test]
    fn test_linear_schedule() {
        let mut explorer = EpsilonGreedy::with_final_step(10);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(explorer.eps(), 1.0);
        for _ in 0..5 {
            explorer.action(&[0.0, 1.0], &mut rng);
        }
        assert!((explorer.eps() - 0.51).abs() < 1e-9);
        for _ in 0..20 {
            explorer.action(&[0.0, 1.0], &mut rng);
        }
        assert_eq!(explorer.eps(), 0.02);
    }

    #[test]
    fn test_exponential_schedule() {
        let mut explorer = EpsilonGreedy::exponential(1.0, 0.01, 0.995);
        assert!((explorer.eps() - 0.995).abs() < 1e-12);
        explorer.n_opts = 10_000;
        assert_eq!(explorer.eps(), 0.01);
    }

    #[test]
    fn test_greedy_when_eps_is_zero() {
        let mut explorer = EpsilonGreedy::exponential(0.0, 0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(explorer.action(&[0.1, -0.2, 0.7, 0.3], &mut rng), 2);
        }
    }

    #[test]
    fn test_random_when_eps_is_one() {
        let mut explorer = EpsilonGreedy::exponential(1.0, 1.0, 1.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut counts = [0usize; 3];
        for _ in 0..300 {
            counts[explorer.action(&[0.0, 0.0, 1.0], &mut rng)] += 1;
        }
        assert!(counts.iter().all(|&c| c > 0));
    }

    #[test]
    fn test_serde_epsilon_greedy() -> Result<()> {
        let explorer = EpsilonGreedy::exponential(1.0, 0.01, 0.995);
        let dir = TempDir::new("epsilon_greedy")?;
        let path = dir.path().join("epsilon_greedy.yaml");
        explorer.save(&path)?;
        assert_eq!(EpsilonGreedy::load(&path)?, explorer);
        Ok(())
    }
}
