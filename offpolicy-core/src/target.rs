//! Bellman targets for value-based and actor-critic updates.
//!
//! Every function works on a whole mini-batch at once. Rewards and
//! termination flags come straight from a
//! [`TransitionBatch`](crate::replay_buffer::TransitionBatch); values of next
//! states are computed by the caller with the target networks.
//!
//! For a terminal transition (`is_done == 1`) the target is the reward alone.
use crate::{error::OffPolicyError, util::argmax};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), OffPolicyError> {
    if expected == actual {
        Ok(())
    } else {
        Err(OffPolicyError::ShapeMismatch {
            what,
            expected,
            actual,
        })
    }
}

fn check_q(what: &'static str, q: &ArrayView2<f32>, batch_size: usize) -> Result<(), OffPolicyError> {
    check_len(what, batch_size, q.nrows())?;
    if q.ncols() == 0 {
        return Err(OffPolicyError::ShapeMismatch {
            what,
            expected: 1,
            actual: 0,
        });
    }
    Ok(())
}

/// One-step TD targets `r + gamma * (1 - done) * v'`.
///
/// `next_value` holds the value of each next state, e.g. `Q'(s', mu'(s'))`
/// for DDPG.
pub fn td_targets(
    reward: &[f32],
    is_done: &[i8],
    next_value: ArrayView1<f32>,
    gamma: f32,
) -> Result<Array1<f32>, OffPolicyError> {
    let n = reward.len();
    check_len("is_done", n, is_done.len())?;
    check_len("next_value", n, next_value.len())?;

    let not_done = is_done
        .iter()
        .map(|&d| 1.0 - d as f32)
        .collect::<Array1<f32>>();
    let mut y = next_value.to_owned();
    y *= &not_done;
    y *= gamma;
    y += &ArrayView1::from(reward);
    Ok(y)
}

/// DQN targets `r + gamma * (1 - done) * max_a Q'(s', a)`.
///
/// `next_q` is the `(batch_size, n_actions)` output of the target network on
/// next states.
pub fn dqn_targets(
    reward: &[f32],
    is_done: &[i8],
    next_q: ArrayView2<f32>,
    gamma: f32,
) -> Result<Array1<f32>, OffPolicyError> {
    check_q("next_q", &next_q, reward.len())?;
    let max_q = next_q.fold_axis(Axis(1), f32::NEG_INFINITY, |&m, &x| m.max(x));
    td_targets(reward, is_done, max_q.view(), gamma)
}

/// Double DQN targets.
///
/// The greedy action is chosen with the online network and evaluated with
/// the target network: `r + gamma * (1 - done) * Q'(s', argmax_a Q(s', a))`.
pub fn double_dqn_targets(
    reward: &[f32],
    is_done: &[i8],
    next_q_online: ArrayView2<f32>,
    next_q_target: ArrayView2<f32>,
    gamma: f32,
) -> Result<Array1<f32>, OffPolicyError> {
    check_q("next_q_online", &next_q_online, reward.len())?;
    check_q("next_q_target", &next_q_target, reward.len())?;
    check_len("next_q_target", next_q_online.ncols(), next_q_target.ncols())?;

    let q = next_q_online
        .outer_iter()
        .zip(next_q_target.outer_iter())
        .map(|(online, target)| target[argmax(online.iter())])
        .collect::<Array1<f32>>();
    td_targets(reward, is_done, q.view(), gamma)
}

/// Clipped double-Q targets of TD3, `r + gamma * (1 - done) * min(q1, q2)`.
pub fn clipped_double_q_targets(
    reward: &[f32],
    is_done: &[i8],
    next_q1: ArrayView1<f32>,
    next_q2: ArrayView1<f32>,
    gamma: f32,
) -> Result<Array1<f32>, OffPolicyError> {
    check_len("next_q2", next_q1.len(), next_q2.len())?;
    let q = Zip::from(&next_q1)
        .and(&next_q2)
        .map_collect(|&q1, &q2| q1.min(q2));
    td_targets(reward, is_done, q.view(), gamma)
}

/// Regression targets over all actions.
///
/// Returns a copy of `q`, the `(batch_size, n_actions)` prediction, with the
/// entry of the taken action in each row replaced by the corresponding
/// target. Regressing the full Q-vector on this matrix only moves the value
/// of taken actions.
pub fn q_regression_targets(
    q: ArrayView2<f32>,
    actions: &[usize],
    targets: ArrayView1<f32>,
) -> Result<Array2<f32>, OffPolicyError> {
    let n_actions = q.ncols();
    check_len("actions", q.nrows(), actions.len())?;
    check_len("targets", q.nrows(), targets.len())?;
    if let Some(&index) = actions.iter().find(|&&a| a >= n_actions) {
        return Err(OffPolicyError::InvalidAction { index, n_actions });
    }

    let mut out = q.to_owned();
    for ((mut row, &a), &y) in out.outer_iter_mut().zip(actions).zip(targets.iter()) {
        row[a] = y;
    }
    Ok(out)
}
