use super::Record;

/// Writes records to an output destination.
pub trait Recorder {
    /// Writes `record`, produced at environment step `step`.
    fn write(&mut self, step: usize, record: Record);
}
