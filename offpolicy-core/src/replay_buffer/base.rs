//! Fixed-capacity circular replay buffer.
use super::{BatchBase, FloatBatch, IndexBatch, ReplayBufferConfig, TransitionBatch};
use crate::error::OffPolicyError;
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::borrow::Borrow;

/// One observed step of interaction `(s_t, a_t, s_t+1, r_t, done_t)`.
///
/// `done` is `true` only if the episode terminated at `s_t+1`. An episode
/// cut off by a step limit stores `done = false`, so that the value of
/// `s_t+1` is still bootstrapped.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<T> {
    /// State `s_t`.
    pub state: Vec<f32>,

    /// Action `a_t`.
    pub action: T,

    /// Next state `s_t+1`.
    pub next_state: Vec<f32>,

    /// Reward `r_t`.
    pub reward: f32,

    /// Termination flag.
    pub done: bool,
}

/// A replay buffer holding the most recent `capacity` transitions.
///
/// Storage is struct-of-arrays and allocated once in [`ReplayBuffer::build`].
/// Entries `[0, len())` are valid. Once the buffer is full, every insertion
/// overwrites the oldest entry, which is the one at the write cursor.
///
/// The type parameter `A` is the action column, [`FloatBatch`] for
/// continuous actions or [`IndexBatch`] for discrete ones.
pub struct ReplayBuffer<A: BatchBase> {
    /// Maximum number of transitions.
    capacity: usize,

    /// Write cursor, the next insertion index.
    i: usize,

    /// Number of valid transitions.
    size: usize,

    state: FloatBatch,

    action: A,

    next_state: FloatBatch,

    reward: Vec<f32>,

    is_done: Vec<i8>,

    /// Random number generator for sampling.
    rng: StdRng,
}

/// Replay buffer for continuous actions.
pub type ContinuousReplayBuffer = ReplayBuffer<FloatBatch>;

/// Replay buffer for discrete actions.
pub type DiscreteReplayBuffer = ReplayBuffer<IndexBatch>;

impl<A: BatchBase> ReplayBuffer<A> {
    /// Builds a replay buffer, allocating storage for `config.capacity` transitions.
    ///
    /// # Panics
    ///
    /// Panics if `config.capacity` is zero.
    pub fn build(config: &ReplayBufferConfig) -> Self {
        let capacity = config.capacity;
        assert!(capacity > 0, "Capacity of a replay buffer must be positive");

        Self {
            capacity,
            i: 0,
            size: 0,
            state: FloatBatch::new(capacity, config.state_dim),
            action: A::new(capacity, config.action_dim),
            next_state: FloatBatch::new(capacity, config.state_dim),
            reward: vec![0.; capacity],
            is_done: vec![0; capacity],
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Adds a transition, overwriting the slot at the write cursor.
    ///
    /// All arguments are checked against the configured dimensions before
    /// anything is written. On error the buffer is left untouched.
    pub fn add(
        &mut self,
        state: &[f32],
        action: &A::Item,
        next_state: &[f32],
        reward: f32,
        done: bool,
    ) -> Result<(), OffPolicyError> {
        self.state.check_slice("state", state)?;
        self.action.check("action", action)?;
        self.next_state.check_slice("next_state", next_state)?;

        let i = self.i;
        self.state.push_slice(i, state);
        self.action.push(i, action);
        self.next_state.push_slice(i, next_state);
        self.reward[i] = reward;
        self.is_done[i] = done as i8;

        self.i = (i + 1) % self.capacity;
        if self.size < self.capacity {
            self.size += 1;
        }

        Ok(())
    }

    /// Adds a [`Transition`] holding an owned action.
    pub fn push(
        &mut self,
        tr: Transition<<A::Item as ToOwned>::Owned>,
    ) -> Result<(), OffPolicyError> {
        let action: &A::Item = tr.action.borrow();
        self.add(&tr.state, action, &tr.next_state, tr.reward, tr.done)
    }

    /// Samples `batch_size` transitions uniformly at random, with replacement.
    ///
    /// Indices are drawn independently from `[0, len())`, so a batch may
    /// contain the same transition more than once. `batch_size` larger than
    /// `len()` is allowed.
    pub fn sample(&mut self, batch_size: usize) -> Result<TransitionBatch<A>, OffPolicyError> {
        if self.size == 0 {
            return Err(OffPolicyError::EmptyBuffer);
        }

        let size = self.size;
        let ixs = (0..batch_size)
            .map(|_| self.rng.gen_range(0..size))
            .collect::<Vec<_>>();
        trace!("Sampled {} transitions out of {}", batch_size, size);

        Ok(self.gather(ixs))
    }

    /// Returns every valid transition in storage order.
    ///
    /// Copies the whole buffer, so use it with care on large buffers.
    pub fn whole(&self) -> TransitionBatch<A> {
        self.gather((0..self.size).collect())
    }

    fn gather(&self, ixs: Vec<usize>) -> TransitionBatch<A> {
        TransitionBatch {
            state: self.state.sample(&ixs),
            action: self.action.sample(&ixs),
            next_state: self.next_state.sample(&ixs),
            reward: ixs.iter().map(|&ix| self.reward[ix]).collect(),
            is_done: ixs.iter().map(|&ix| self.is_done[ix]).collect(),
            ix_sample: ixs,
        }
    }

    /// Returns the number of valid transitions.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no transition has been added yet.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the index the next transition will be written to.
    pub fn write_cursor(&self) -> usize {
        self.i
    }

    /// Returns the dimension of states.
    pub fn state_dim(&self) -> usize {
        self.state.dim()
    }

    /// Returns the dimension of actions, or the number of discrete actions.
    pub fn action_dim(&self) -> usize {
        self.action.dim()
    }

    /// Returns the sum of rewards of the valid transitions.
    pub fn sum_rewards(&self) -> f32 {
        self.reward[..self.size].iter().sum()
    }

    /// Returns the number of valid transitions with the termination flag set.
    pub fn num_done_flags(&self) -> usize {
        self.is_done[..self.size]
            .iter()
            .map(|&d| d as usize)
            .sum()
    }
}
