//! Bellman targets on tensors.
//!
//! `reward` and `gamma_not_done` are `(batch_size,)` tensors as in
//! [`TensorBatch`](crate::TensorBatch). Returned targets are detached from the
//! computation graph.
use candle_core::{Result, Tensor, D};

/// `r + gamma * (1 - done) * v'` for next-state values `next_value`.
pub fn td_target(reward: &Tensor, gamma_not_done: &Tensor, next_value: &Tensor) -> Result<Tensor> {
    Ok((reward + (gamma_not_done * next_value)?)?.detach())
}

/// DQN target with `max_a Q'(s', a)` of the `(batch_size, n_actions)`
/// target-network output `next_q`.
pub fn dqn_target(reward: &Tensor, gamma_not_done: &Tensor, next_q: &Tensor) -> Result<Tensor> {
    let q = next_q.max(D::Minus1)?;
    td_target(reward, gamma_not_done, &q)
}

/// Double DQN target: the action is selected with the online network and
/// evaluated with the target network.
pub fn double_dqn_target(
    reward: &Tensor,
    gamma_not_done: &Tensor,
    next_q_online: &Tensor,
    next_q_target: &Tensor,
) -> Result<Tensor> {
    let a = next_q_online.argmax_keepdim(D::Minus1)?;
    let q = next_q_target.gather(&a, D::Minus1)?.squeeze(D::Minus1)?;
    td_target(reward, gamma_not_done, &q)
}

/// Clipped double-Q target of TD3 with `min(q1, q2)`.
pub fn clipped_double_q_target(
    reward: &Tensor,
    gamma_not_done: &Tensor,
    next_q1: &Tensor,
    next_q2: &Tensor,
) -> Result<Tensor> {
    td_target(reward, gamma_not_done, &next_q1.minimum(next_q2)?)
}

/// Q-values of the taken actions, `(batch_size,)`.
///
/// `action` is the `(batch_size, 1)` index tensor of
/// [`ActionTensor`](crate::ActionTensor) for discrete actions.
pub fn q_taken(q: &Tensor, action: &Tensor) -> Result<Tensor> {
    q.gather(action, D::Minus1)?.squeeze(D::Minus1)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{gamma_not_done, reward};
    use candle_core::Device;
    use ndarray::Array2;
    use offpolicy_core::target as nd;

    #[test]
    fn test_targets_agree_with_ndarray() -> anyhow::Result<()> {
        let device = Device::Cpu;
        let r = [1.0f32, -1.0, 0.5];
        let is_done = [0i8, 1, 0];
        let online = vec![0.1f32, 0.9, -0.3, 5.0, 6.0, 7.0, -1.0, -2.0, -0.5];
        let target = vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let gamma = 0.9;

        let r_t = reward(&r, &device)?;
        let g_t = gamma_not_done(gamma, &is_done, &device)?;
        let online_t = Tensor::from_slice(&online, (3, 3), &device)?;
        let target_t = Tensor::from_slice(&target, (3, 3), &device)?;
        let online_a = Array2::from_shape_vec((3, 3), online)?;
        let target_a = Array2::from_shape_vec((3, 3), target)?;

        let close = |a: Tensor, b: ndarray::Array1<f32>| -> anyhow::Result<()> {
            for (x, y) in a.to_vec1::<f32>()?.iter().zip(b.iter()) {
                assert!((x - y).abs() < 1e-5, "{} vs {}", x, y);
            }
            Ok(())
        };

        close(
            dqn_target(&r_t, &g_t, &target_t)?,
            nd::dqn_targets(&r, &is_done, target_a.view(), gamma)?,
        )?;
        close(
            double_dqn_target(&r_t, &g_t, &online_t, &target_t)?,
            nd::double_dqn_targets(&r, &is_done, online_a.view(), target_a.view(), gamma)?,
        )?;
        let q1 = target_t.get_on_dim(1, 0)?;
        let q2 = online_t.get_on_dim(1, 1)?;
        close(
            clipped_double_q_target(&r_t, &g_t, &q1, &q2)?,
            nd::clipped_double_q_targets(
                &r,
                &is_done,
                target_a.column(0),
                online_a.column(1),
                gamma,
            )?,
        )?;
        Ok(())
    }

    #[test]
    fn test_q_taken() -> anyhow::Result<()> {
        let device = Device::Cpu;
        let q = Tensor::from_slice(&[0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0], (2, 3), &device)?;
        let a = Tensor::from_slice(&[2i64, 0], (2, 1), &device)?;
        assert_eq!(q_taken(&q, &a)?.to_vec1::<f32>()?, vec![2.0, 3.0]);
        Ok(())
    }
}
