use super::{Record, Recorder};

/// Keeps records in memory, in the order they were written.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<(usize, Record)>,
}

impl BufferedRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self { buf: Vec::default() }
    }

    /// Returns an iterator over `(step, record)` pairs.
    pub fn iter(&self) -> std::slice::Iter<'_, (usize, Record)> {
        self.buf.iter()
    }

    /// Returns `(step, value)` for every record holding scalar `key`.
    pub fn scalars(&self, key: &str) -> Vec<(usize, f32)> {
        self.buf
            .iter()
            .filter_map(|(step, record)| record.get_scalar(key).ok().map(|v| (*step, v)))
            .collect()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, step: usize, record: Record) {
        self.buf.push((step, record));
    }
}
