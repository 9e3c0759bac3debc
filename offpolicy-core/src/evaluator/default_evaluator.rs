//! Evaluator computing the average return over a fixed number of episodes.
use super::Evaluator;
use crate::{record::Record, Env, Policy};
use anyhow::Result;
use log::info;

/// Offset added to the training seed for the evaluation environment.
pub const EVAL_SEED_OFFSET: i64 = 100;

/// Runs `n_episodes` episodes and returns the average return as
/// `"eval_reward"`.
///
/// The environment is built once with a seed shifted from the training seed,
/// so evaluation never reuses the episodes seen during training.
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    env: E,
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs an evaluator on an environment built with
    /// `seed + EVAL_SEED_OFFSET`.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed + EVAL_SEED_OFFSET)?,
        })
    }

    /// Runs a single episode and returns its return.
    fn run_episode<P: Policy<E>>(&mut self, policy: &mut P) -> Result<f32> {
        let max_steps = self.env.max_episode_steps();
        let mut state = self.env.reset()?;
        let mut ret = 0f32;

        for _ in 0..max_steps {
            let act = policy.sample(&state)?;
            let step = self.env.step(&act)?;
            ret += step.reward;
            if step.is_done() {
                break;
            }
            state = step.next_state;
        }

        Ok(ret)
    }
}

impl<E: Env, P: Policy<E>> Evaluator<E, P> for DefaultEvaluator<E> {
    fn evaluate(&mut self, policy: &mut P) -> Result<Record> {
        let mut r_total = 0f32;
        for _ in 0..self.n_episodes {
            r_total += self.run_episode(policy)?;
        }
        let avg = r_total / self.n_episodes.max(1) as f32;
        info!("Evaluation over {} episodes: {:.3}", self.n_episodes, avg);

        Ok(Record::from_scalar("eval_reward", avg))
    }
}
