#![warn(missing_docs)]
//! Building blocks of off-policy reinforcement learning agents.
//!
//! The core of the crate is the protocol shared by DQN, DDPG and TD3 style
//! agents: a circular [`ReplayBuffer`] sampled uniformly at random, and a
//! [`TargetSynchronizer`] keeping a lagged copy of live parameters with hard
//! or soft updates. Around it are Bellman [`target`] computations,
//! exploration strategies in [`explorer`], and a [`Trainer`] driving an
//! [`Agent`] on an [`Env`].
pub mod error;
pub mod explorer;
pub mod record;
pub mod replay_buffer;
pub mod sync;
pub mod target;
pub mod util;

mod base;
pub use base::{Agent, Env, Policy, Step};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{TrainStats, Trainer, TrainerConfig};

pub use error::OffPolicyError;
pub use replay_buffer::{ReplayBuffer, ReplayBufferConfig, Transition, TransitionBatch};
pub use sync::{ParamSet, TargetSyncConfig, TargetSynchronizer};
