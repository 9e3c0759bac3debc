//! [`ParamSet`] backed by `ndarray`.
use super::{ParamSet, ParamSpec};
use crate::error::OffPolicyError;
use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, IxDyn, Zip};

/// Parameters held as a list of `ndarray` tensors.
///
/// The shape of each tensor is fixed at construction. Values can be changed
/// in place through [`ParamList::values_mut`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParamList {
    params: Vec<ArrayD<f32>>,
}

impl ParamList {
    /// Creates a parameter list from tensors.
    pub fn new(params: Vec<ArrayD<f32>>) -> Self {
        Self { params }
    }

    /// Creates a parameter list of 1-dimensional tensors.
    pub fn from_vecs(params: Vec<Vec<f32>>) -> Self {
        Self {
            params: params
                .into_iter()
                .map(|v| {
                    let n = v.len();
                    ArrayD::from_shape_vec(IxDyn(&[n]), v).expect("1-d shape of a vec")
                })
                .collect(),
        }
    }

    /// Creates a parameter list of zero tensors with the given shapes.
    pub fn zeros(shapes: &[&[usize]]) -> Self {
        Self {
            params: shapes.iter().map(|s| ArrayD::zeros(IxDyn(s))).collect(),
        }
    }

    /// Returns tensor `ix`.
    pub fn get(&self, ix: usize) -> Option<ArrayViewD<'_, f32>> {
        self.params.get(ix).map(|p| p.view())
    }

    /// Returns a mutable view of the values of tensor `ix`.
    pub fn values_mut(&mut self, ix: usize) -> Option<ArrayViewMutD<'_, f32>> {
        self.params.get_mut(ix).map(|p| p.view_mut())
    }

    /// Returns an iterator over the tensors.
    pub fn iter(&self) -> impl Iterator<Item = &ArrayD<f32>> {
        self.params.iter()
    }

    /// Returns the number of tensors.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if there is no tensor.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns all scalars, tensor after tensor.
    pub fn flatten(&self) -> Vec<f32> {
        self.params.iter().flat_map(|p| p.iter().copied()).collect()
    }

    fn pair<'a>(
        &'a mut self,
        ix: usize,
        live: &'a Self,
    ) -> Result<(&'a mut ArrayD<f32>, &'a ArrayD<f32>), OffPolicyError> {
        let n = self.params.len();
        match (self.params.get_mut(ix), live.params.get(ix)) {
            (Some(t), Some(l)) if t.shape() == l.shape() => Ok((t, l)),
            (Some(t), Some(l)) => Err(OffPolicyError::StructuralMismatch(format!(
                "tensor {}: target {:?} vs live {:?}",
                ix,
                t.shape(),
                l.shape()
            ))),
            _ => Err(OffPolicyError::StructuralMismatch(format!(
                "tensor {} out of range, target has {} tensors, live has {}",
                ix,
                n,
                live.params.len()
            ))),
        }
    }
}

impl ParamSet for ParamList {
    fn deep_copy(&self) -> Result<Self, OffPolicyError> {
        Ok(self.clone())
    }

    fn specs(&self) -> Vec<ParamSpec> {
        self.params
            .iter()
            .map(|p| ParamSpec::unnamed(p.shape()))
            .collect()
    }

    fn copy_param(&mut self, ix: usize, live: &Self) -> Result<(), OffPolicyError> {
        let (t, l) = self.pair(ix, live)?;
        t.assign(l);
        Ok(())
    }

    fn blend_param(&mut self, ix: usize, live: &Self, tau: f64) -> Result<(), OffPolicyError> {
        let (t, l) = self.pair(ix, live)?;
        let tau = tau as f32;
        Zip::from(t)
            .and(l)
            .for_each(|t, &l| *t = tau * l + (1.0 - tau) * *t);
        Ok(())
    }

    fn num_params(&self) -> usize {
        self.params.len()
    }
}
