//! Environment step.

/// Outcome of an environment step, `(s_t+1, r_t)` and end-of-episode flags.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// State after the step.
    pub next_state: Vec<f32>,

    /// Reward.
    pub reward: f32,

    /// The episode reached a terminal state of the MDP.
    pub is_terminated: bool,

    /// The environment cut the episode for a reason unrelated to the MDP,
    /// e.g. a time limit of its own.
    pub is_truncated: bool,
}

impl Step {
    /// Constructs a [`Step`] object.
    pub fn new(next_state: Vec<f32>, reward: f32, is_terminated: bool, is_truncated: bool) -> Self {
        Self {
            next_state,
            reward,
            is_terminated,
            is_truncated,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
