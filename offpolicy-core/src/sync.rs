//! Target-network synchronization.
//!
//! A [`TargetSynchronizer`] owns a lagged copy of the parameters of a
//! function approximator and moves it toward the live parameters with
//!
//! ```text
//! target <- tau * live + (1 - tau) * target
//! ```
//!
//! applied to every scalar of every tensor. `tau = 1` is the hard copy used
//! by DQN-style agents, a small `tau` every step is the soft update of
//! DDPG-style agents.
//!
//! Parameters are seen through [`ParamSet`], an ordered collection of tensors
//! addressable by position, so the same traversal works for any topology.
//! [`ParamList`] implements it with `ndarray`; backend crates implement it for
//! their own parameter stores.
mod base;
mod config;
mod param_list;
mod param_set;
pub use base::TargetSynchronizer;
pub use config::TargetSyncConfig;
pub use param_list::ParamList;
pub use param_set::{check_structure, ParamSet, ParamSpec};
