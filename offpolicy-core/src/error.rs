//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// All of them are programming errors on the caller side. They are surfaced
/// immediately and never corrected silently.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OffPolicyError {
    /// A batch was requested from a replay buffer holding no transitions.
    #[error("Cannot sample from an empty replay buffer")]
    EmptyBuffer,

    /// Dimensionality of some data disagrees with the configured one.
    #[error("Shape mismatch of {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Name of the offending field.
        what: &'static str,

        /// Configured dimension.
        expected: usize,

        /// Given dimension.
        actual: usize,
    },

    /// Discrete action index outside the action set.
    #[error("Invalid action {index}, the number of actions is {n_actions}")]
    InvalidAction {
        /// Given action index.
        index: usize,

        /// Size of the action set.
        n_actions: usize,
    },

    /// Live and target parameter sets do not share the same structure.
    #[error("Structural mismatch between live and target parameters: {0}")]
    StructuralMismatch(String),

    /// Blend coefficient outside `[0, 1]`.
    #[error("Invalid tau: {0}, must be in [0, 1]")]
    InvalidTau(f64),

    /// Error raised by the tensor backend holding parameters.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
