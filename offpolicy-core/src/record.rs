//! Records of training and evaluation.
//!
//! A [`Record`] maps names to [`RecordValue`]s. Agents return one from every
//! optimization step, evaluators return one per evaluation, and the
//! [`Trainer`](crate::Trainer) hands them to a [`Recorder`] together with the
//! environment step at which they were produced.
//!
//! ```rust
//! use offpolicy_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("loss_critic", 0.5);
//! record.insert("buffer_len", RecordValue::Scalar(1000.));
//! assert_eq!(record.get_scalar("loss_critic").unwrap(), 0.5);
//! ```
//!
//! Recorded scalars can be turned into a [`LearningCurve`] and compared
//! across runs with a [`CurveSet`].
mod base;
mod buffered_recorder;
mod curve;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use curve::{CurveSet, LearningCurve};
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
