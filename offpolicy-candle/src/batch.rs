//! Conversion of sampled batches into tensors.
use anyhow::Result;
use candle_core::{Device, Tensor};
use offpolicy_core::replay_buffer::{BatchBase, FloatBatch, IndexBatch, TransitionBatch};

/// An action column that can be turned into a tensor.
pub trait ActionTensor: BatchBase {
    /// Converts the actions into a tensor on `device`.
    fn to_tensor(self, device: &Device) -> Result<Tensor>;
}

impl ActionTensor for FloatBatch {
    /// `(batch_size, action_dim)` tensor of `f32`.
    fn to_tensor(self, device: &Device) -> Result<Tensor> {
        float_tensor(self, device)
    }
}

impl ActionTensor for IndexBatch {
    /// `(batch_size, 1)` tensor of `i64`, ready for `gather` along the last
    /// dimension of Q-values.
    fn to_tensor(self, device: &Device) -> Result<Tensor> {
        let n = self.len();
        Ok(Tensor::from_vec(self.into_vec(), (n, 1), device)?)
    }
}

fn float_tensor(batch: FloatBatch, device: &Device) -> Result<Tensor> {
    let shape = (batch.len(), batch.dim());
    Ok(Tensor::from_vec(batch.into_vec(), shape, device)?)
}

/// Returns `gamma * (1 - is_done)` as a `(batch_size,)` tensor.
pub fn gamma_not_done(gamma: f32, is_done: &[i8], device: &Device) -> Result<Tensor> {
    let v = is_done
        .iter()
        .map(|&d| gamma * (1 - d) as f32)
        .collect::<Vec<_>>();
    Ok(Tensor::from_slice(&v[..], (v.len(),), device)?)
}

/// Returns rewards as a `(batch_size,)` tensor.
pub fn reward(reward: &[f32], device: &Device) -> Result<Tensor> {
    Ok(Tensor::from_slice(reward, (reward.len(),), device)?)
}

/// A sampled batch of transitions as tensors.
pub struct TensorBatch {
    /// `(batch_size, state_dim)` states.
    pub state: Tensor,

    /// Actions, see [`ActionTensor`].
    pub action: Tensor,

    /// `(batch_size, state_dim)` next states.
    pub next_state: Tensor,

    /// `(batch_size,)` rewards.
    pub reward: Tensor,

    /// `(batch_size,)` discount factors, `gamma` or `0` for terminal
    /// transitions.
    pub gamma_not_done: Tensor,
}

impl TensorBatch {
    /// Converts a sampled batch.
    pub fn from_batch<A: ActionTensor>(
        batch: TransitionBatch<A>,
        gamma: f32,
        device: &Device,
    ) -> Result<Self> {
        let (state, action, next_state, r, is_done) = batch.unpack();
        Ok(Self {
            state: float_tensor(state, device)?,
            action: action.to_tensor(device)?,
            next_state: float_tensor(next_state, device)?,
            reward: reward(&r, device)?,
            gamma_not_done: gamma_not_done(gamma, &is_done, device)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use offpolicy_core::replay_buffer::{DiscreteReplayBuffer, ReplayBufferConfig};

    #[test]
    fn test_from_discrete_batch() -> Result<()> {
        let config = ReplayBufferConfig::default()
            .capacity(4)
            .state_dim(2)
            .action_dim(3);
        let mut buffer = DiscreteReplayBuffer::build(&config);
        buffer.add(&[0., 1.], &2, &[1., 2.], 1.0, false)?;
        buffer.add(&[1., 2.], &0, &[2., 3.], -1.0, true)?;

        let batch = TensorBatch::from_batch(buffer.whole(), 0.99, &Device::Cpu)?;
        assert_eq!(batch.state.dims(), &[2, 2]);
        assert_eq!(batch.action.dims(), &[2, 1]);
        assert_eq!(batch.action.flatten_all()?.to_vec1::<i64>()?, vec![2, 0]);
        assert_eq!(batch.reward.to_vec1::<f32>()?, vec![1.0, -1.0]);
        assert_eq!(batch.gamma_not_done.to_vec1::<f32>()?, vec![0.99, 0.0]);
        Ok(())
    }
}
