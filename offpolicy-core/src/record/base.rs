//! Record and its values.
use crate::error::OffPolicyError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{IntoIter, Iter, Keys},
    HashMap,
};

/// Possible values in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single value, typically a metric like a loss or a return.
    Scalar(f32),

    /// A timestamp.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array.
    Array1(Vec<f32>),

    /// A text value.
    String(String),
}

/// Named values produced during training.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair, replacing any value with the same key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator that consumes the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets the value of the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records. Values of `record` win on duplicated keys.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges `record` into this one in place. Values of `record` win on
    /// duplicated keys.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value.
    ///
    /// Fails if the key does not exist or the value is not a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f32, OffPolicyError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(OffPolicyError::RecordValueTypeError("Scalar".to_string())),
            None => Err(OffPolicyError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, OffPolicyError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(OffPolicyError::RecordValueTypeError("Array1".to_string())),
            None => Err(OffPolicyError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value.
    pub fn get_string(&self, k: &str) -> Result<String, OffPolicyError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(OffPolicyError::RecordValueTypeError("String".to_string())),
            None => Err(OffPolicyError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns `true` if the record contains no key-value pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of key-value pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_getters() {
        let record = Record::from_slice(&[
            ("loss", RecordValue::Scalar(0.5)),
            ("obs", RecordValue::Array1(vec![1., 2.])),
            ("env", RecordValue::String("Pendulum".to_string())),
        ]);

        assert_eq!(record.get_scalar("loss"), Ok(0.5));
        assert_eq!(record.get_array1("obs"), Ok(vec![1., 2.]));
        assert_eq!(record.get_string("env"), Ok("Pendulum".to_string()));
        assert_eq!(
            record.get_scalar("obs"),
            Err(OffPolicyError::RecordValueTypeError("Scalar".to_string()))
        );
        assert_eq!(
            record.get_scalar("reward"),
            Err(OffPolicyError::RecordKeyError("reward".to_string()))
        );
    }

    #[test]
    fn test_merge_overwrites() {
        let mut r1 = Record::from_scalar("a", 1.);
        r1.insert("b", RecordValue::Scalar(2.));
        let r2 = Record::from_scalar("b", 3.);

        let merged = r1.clone().merge(r2.clone());
        assert_eq!(merged.get_scalar("b"), Ok(3.));
        assert_eq!(merged.len(), 2);

        r1.merge_inplace(r2);
        assert_eq!(r1.get_scalar("a"), Ok(1.));
        assert_eq!(r1.get_scalar("b"), Ok(3.));
    }
}
