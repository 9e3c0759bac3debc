//! Experience replay buffer.
//!
//! [`ReplayBuffer`] keeps the most recent `capacity` transitions in
//! preallocated struct-of-arrays storage and draws uniform mini-batches,
//! with replacement, for off-policy updates.
//!
//! ```rust
//! use offpolicy_core::replay_buffer::{ContinuousReplayBuffer, ReplayBufferConfig};
//!
//! let config = ReplayBufferConfig::default()
//!     .capacity(1000)
//!     .state_dim(3)
//!     .action_dim(1)
//!     .seed(42);
//! let mut buffer = ContinuousReplayBuffer::build(&config);
//!
//! buffer.add(&[0.0, 0.1, 0.2], &[0.5], &[0.1, 0.2, 0.3], -1.0, false).unwrap();
//! let batch = buffer.sample(32).unwrap();
//! assert_eq!(batch.len(), 32);
//! ```
//!
//! The buffer does not enforce a warm-up period by itself. Sampling an empty
//! buffer fails with [`EmptyBuffer`](crate::error::OffPolicyError::EmptyBuffer);
//! the training loop is expected to accumulate at least `start_timesteps`
//! transitions (and at least one batch worth) before the first call to
//! [`ReplayBuffer::sample`].
mod base;
mod batch;
mod config;
pub use base::{ContinuousReplayBuffer, DiscreteReplayBuffer, ReplayBuffer, Transition};
pub use batch::{BatchBase, FloatBatch, IndexBatch, TransitionBatch};
pub use config::ReplayBufferConfig;
