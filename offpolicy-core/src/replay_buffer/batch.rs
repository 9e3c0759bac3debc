//! Column storage of the replay buffer and sampled batches.
use crate::error::OffPolicyError;
use ndarray::ArrayView2;

/// A column of fixed-size rows, used both as replay buffer storage and as
/// the corresponding column of a sampled batch.
///
/// The storage is allocated once in [`BatchBase::new`]; [`BatchBase::push`]
/// writes a row in place and never reallocates.
pub trait BatchBase: Sized {
    /// A single row given to the buffer, borrowed on insertion.
    ///
    /// Unsized rows like `[f32]` let callers pass slices without allocating.
    /// The owned form is used by [`Transition`](super::Transition).
    type Item: ?Sized + ToOwned;

    /// Allocates `capacity` zero-initialized rows with dimension `dim`.
    fn new(capacity: usize, dim: usize) -> Self;

    /// Returns the dimension of the rows.
    fn dim(&self) -> usize;

    /// Returns the number of rows.
    fn len(&self) -> usize;

    /// Checks that `item` fits the configured dimension.
    fn check(&self, what: &'static str, item: &Self::Item) -> Result<(), OffPolicyError>;

    /// Overwrites row `ix` with `item`.
    ///
    /// `item` must have passed [`BatchBase::check`].
    fn push(&mut self, ix: usize, item: &Self::Item);

    /// Gathers the rows at `ixs`, in order. Repeated indices yield repeated rows.
    fn sample(&self, ixs: &[usize]) -> Self;
}

/// Rows of `f32` values, stored contiguously.
///
/// Used for states and for continuous actions.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatBatch {
    dim: usize,
    rows: usize,
    data: Vec<f32>,
}

impl FloatBatch {
    /// Checks the length of a row given as a slice.
    pub fn check_slice(&self, what: &'static str, row: &[f32]) -> Result<(), OffPolicyError> {
        if row.len() == self.dim {
            Ok(())
        } else {
            Err(OffPolicyError::ShapeMismatch {
                what,
                expected: self.dim,
                actual: row.len(),
            })
        }
    }

    /// Overwrites row `ix` with `row`.
    #[inline]
    pub fn push_slice(&mut self, ix: usize, row: &[f32]) {
        let start = ix * self.dim;
        self.data[start..start + self.dim].copy_from_slice(row);
    }

    /// Returns row `ix`.
    pub fn row(&self, ix: usize) -> &[f32] {
        let start = ix * self.dim;
        &self.data[start..start + self.dim]
    }

    /// Returns all rows as a flat slice in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the rows as a `(len, dim)` matrix view.
    pub fn view(&self) -> ArrayView2<'_, f32> {
        ArrayView2::from_shape((self.rows, self.dim), &self.data)
            .expect("FloatBatch holds rows * dim values")
    }

    /// Consumes the batch, returning the flat row-major data.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl BatchBase for FloatBatch {
    type Item = [f32];

    fn new(capacity: usize, dim: usize) -> Self {
        Self {
            dim,
            rows: capacity,
            data: vec![0.; capacity * dim],
        }
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        self.rows
    }

    fn check(&self, what: &'static str, item: &Self::Item) -> Result<(), OffPolicyError> {
        self.check_slice(what, item)
    }

    fn push(&mut self, ix: usize, item: &Self::Item) {
        self.push_slice(ix, item);
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        let data = ixs
            .iter()
            .flat_map(|&ix| self.row(ix).iter().copied())
            .collect();
        Self {
            dim: self.dim,
            rows: ixs.len(),
            data,
        }
    }
}

/// Discrete actions, stored as indices into an action set.
///
/// The dimension of this column is the size of the action set.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexBatch {
    n_actions: usize,
    data: Vec<i64>,
}

impl IndexBatch {
    /// Returns the action indices.
    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }

    /// Returns the action indices as `usize`.
    pub fn indices(&self) -> Vec<usize> {
        self.data.iter().map(|&a| a as usize).collect()
    }

    /// Consumes the batch, returning the action indices.
    pub fn into_vec(self) -> Vec<i64> {
        self.data
    }
}

impl BatchBase for IndexBatch {
    type Item = usize;

    fn new(capacity: usize, dim: usize) -> Self {
        Self {
            n_actions: dim,
            data: vec![0; capacity],
        }
    }

    fn dim(&self) -> usize {
        self.n_actions
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn check(&self, _what: &'static str, item: &Self::Item) -> Result<(), OffPolicyError> {
        if *item < self.n_actions {
            Ok(())
        } else {
            Err(OffPolicyError::InvalidAction {
                index: *item,
                n_actions: self.n_actions,
            })
        }
    }

    fn push(&mut self, ix: usize, item: &Self::Item) {
        self.data[ix] = *item as i64;
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        Self {
            n_actions: self.n_actions,
            data: ixs.iter().map(|&ix| self.data[ix]).collect(),
        }
    }
}

/// A mini-batch sampled from a [`ReplayBuffer`](super::ReplayBuffer).
///
/// Row `i` of every column comes from the same stored transition, namely
/// the one at `ix_sample[i]`.
#[derive(Clone, Debug)]
pub struct TransitionBatch<A: BatchBase> {
    /// States `s_t`.
    pub state: FloatBatch,

    /// Actions `a_t`.
    pub action: A,

    /// Next states `s_t+1`.
    pub next_state: FloatBatch,

    /// Rewards `r_t`.
    pub reward: Vec<f32>,

    /// Termination flags, `1` if `s_t+1` is terminal.
    pub is_done: Vec<i8>,

    /// Storage indices of the sampled transitions.
    pub ix_sample: Vec<usize>,
}

impl<A: BatchBase> TransitionBatch<A> {
    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch has no transitions.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    /// Unpacks the data `(s_t, a_t, s_t+1, r_t, is_done_t)`.
    pub fn unpack(self) -> (FloatBatch, A, FloatBatch, Vec<f32>, Vec<i8>) {
        (
            self.state,
            self.action,
            self.next_state,
            self.reward,
            self.is_done,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_float_batch_sample_repeats_rows() {
        let mut b = FloatBatch::new(3, 2);
        b.push_slice(0, &[1., 2.]);
        b.push_slice(1, &[3., 4.]);
        b.push_slice(2, &[5., 6.]);

        let s = b.sample(&[2, 0, 2]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.as_slice(), &[5., 6., 1., 2., 5., 6.]);
        assert_eq!(s.view().shape(), &[3, 2]);
    }

    #[test]
    fn test_float_batch_check() {
        let b = FloatBatch::new(3, 2);
        assert!(b.check_slice("state", &[0., 0.]).is_ok());
        assert_eq!(
            b.check_slice("state", &[0., 0., 0.]),
            Err(OffPolicyError::ShapeMismatch {
                what: "state",
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_index_batch_rejects_out_of_range() {
        let mut b = IndexBatch::new(2, 3);
        assert!(b.check("action", &2).is_ok());
        assert_eq!(
            b.check("action", &3),
            Err(OffPolicyError::InvalidAction {
                index: 3,
                n_actions: 3
            })
        );
        b.push(1, &2);
        assert_eq!(b.sample(&[1, 0]).indices(), vec![2, 0]);
    }
}
