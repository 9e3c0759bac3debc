//! Agent.
use super::{Env, Policy};
use crate::{
    record::Record,
    replay_buffer::{BatchBase, ReplayBuffer},
};
use anyhow::Result;
use std::{borrow::Borrow, path::Path};

/// Represents a trainable policy on an environment.
///
/// `A` is the action column of the replay buffer the agent learns from.
/// Actions of the environment are stored through a borrow, e.g. a `Vec<f32>`
/// action as a `[f32]` row.
pub trait Agent<E, A>: Policy<E>
where
    E: Env,
    A: BatchBase,
    E::Act: Borrow<A::Item>,
{
    /// Set the policy to training mode.
    ///
    /// In training mode [`Policy::sample`] explores.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step and returns some information.
    ///
    /// Transitions are sampled from `buffer`. Synchronization of target
    /// networks, if any, is part of the step.
    fn opt(&mut self, buffer: &mut ReplayBuffer<A>) -> Result<Record>;

    /// Save the parameters of the agent in the given directory.
    ///
    /// This method commonly creates a number of files in the directory, for
    /// example the live and target networks of the critic.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
