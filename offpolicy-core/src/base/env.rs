//! Environment.
use super::Step;
use anyhow::Result;
use rand::RngCore;

/// Represents an environment, typically an MDP with a continuous state.
///
/// States are `f32` vectors of a fixed dimension. Actions are whatever the
/// replay buffer stores: `Vec<f32>` for continuous control, `usize` for a
/// finite action set.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Action of the environment.
    type Act: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns its initial state.
    fn reset(&mut self) -> Result<Vec<f32>>;

    /// Performs an environment step.
    fn step(&mut self, a: &Self::Act) -> Result<Step>;

    /// The step count at which an episode is cut off.
    fn max_episode_steps(&self) -> usize;

    /// Samples an action uniformly from the action space.
    fn random_action(&self, rng: &mut dyn RngCore) -> Self::Act;
}
