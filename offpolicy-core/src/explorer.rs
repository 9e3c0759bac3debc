//! Exploration strategies.
//!
//! [`EpsilonGreedy`] picks discrete actions from action values,
//! [`GaussianNoise`] perturbs continuous actions. Both take the random number
//! generator as an argument; the agent owning them owns its generator.
mod epsilon_greedy;
mod gaussian;
pub use epsilon_greedy::{EpsilonGreedy, EpsilonSchedule};
pub use gaussian::GaussianNoise;
