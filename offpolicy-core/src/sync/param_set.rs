//! Interface to parameter stores of function approximators.
use crate::error::OffPolicyError;
use std::fmt;

/// Structural description of a single parameter tensor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    /// Name of the tensor, if the backend names its parameters.
    pub name: Option<String>,

    /// Shape of the tensor.
    pub shape: Vec<usize>,
}

impl ParamSpec {
    /// Creates an unnamed spec.
    pub fn unnamed(shape: &[usize]) -> Self {
        Self {
            name: None,
            shape: shape.to_vec(),
        }
    }

    /// Creates a named spec.
    pub fn named(name: impl Into<String>, shape: &[usize]) -> Self {
        Self {
            name: Some(name.into()),
            shape: shape.to_vec(),
        }
    }
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}{:?}", name, self.shape),
            None => write!(f, "{:?}", self.shape),
        }
    }
}

/// An ordered, structurally stable collection of `f32` tensors.
///
/// The order of tensors never changes during the lifetime of the object, so
/// position `ix` of a target set corresponds to position `ix` of the live
/// set it was copied from.
pub trait ParamSet: Sized {
    /// Returns a deep copy sharing no storage with `self`.
    fn deep_copy(&self) -> Result<Self, OffPolicyError>;

    /// Returns the structure, one spec per tensor, in traversal order.
    fn specs(&self) -> Vec<ParamSpec>;

    /// Overwrites tensor `ix` with tensor `ix` of `live`.
    fn copy_param(&mut self, ix: usize, live: &Self) -> Result<(), OffPolicyError>;

    /// Blends tensor `ix` toward tensor `ix` of `live`:
    /// `self[ix] = tau * live[ix] + (1 - tau) * self[ix]`.
    fn blend_param(&mut self, ix: usize, live: &Self, tau: f64) -> Result<(), OffPolicyError>;

    /// Returns the number of tensors.
    fn num_params(&self) -> usize {
        self.specs().len()
    }
}

/// Checks that two parameter structures are identical.
pub fn check_structure(target: &[ParamSpec], live: &[ParamSpec]) -> Result<(), OffPolicyError> {
    if target.len() != live.len() {
        return Err(OffPolicyError::StructuralMismatch(format!(
            "target has {} tensors, live has {}",
            target.len(),
            live.len()
        )));
    }

    match target.iter().zip(live).position(|(t, l)| t != l) {
        None => Ok(()),
        Some(ix) => Err(OffPolicyError::StructuralMismatch(format!(
            "tensor {}: target {} vs live {}",
            ix, target[ix], live[ix]
        ))),
    }
}
