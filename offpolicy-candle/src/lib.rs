//! [candle](https://crates.io/crates/candle-core) backend of `offpolicy-core`.
//!
//! * [`VarMapParams`] exposes a [`candle_nn::VarMap`] as a
//!   [`ParamSet`](offpolicy_core::ParamSet), so a
//!   [`TargetSynchronizer`](offpolicy_core::TargetSynchronizer) can keep a
//!   target network tracking a live one.
//! * [`TensorBatch`] converts a sampled
//!   [`TransitionBatch`](offpolicy_core::TransitionBatch) into tensors.
//! * [`target`] computes Bellman targets on tensors.
mod batch;
mod params;
pub mod target;
use serde::{Deserialize, Serialize};
pub use batch::{gamma_not_done, reward, ActionTensor, TensorBatch};
pub use params::VarMapParams;

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// A CUDA device with the given ordinal.
    Cuda(usize),
}

impl Device {
    /// Creates the corresponding candle device.
    pub fn to_candle(self) -> candle_core::Result<candle_core::Device> {
        match self {
            Self::Cpu => Ok(candle_core::Device::Cpu),
            Self::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }

    /// Returns the serializable description of `device`, `None` for devices
    /// other than CPU and CUDA.
    pub fn from_candle(device: &candle_core::Device) -> Option<Self> {
        match device.location() {
            candle_core::DeviceLocation::Cpu => Some(Self::Cpu),
            candle_core::DeviceLocation::Cuda { gpu_id } => Some(Self::Cuda(gpu_id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_device() -> anyhow::Result<()> {
        let device = Device::Cpu.to_candle()?;
        assert_eq!(Device::from_candle(&device), Some(Device::Cpu));
        Ok(())
    }
}
