//! Target synchronizer.
use super::{check_structure, ParamSet, TargetSyncConfig};
use crate::error::OffPolicyError;
use log::debug;

/// Owns the target copy of a [`ParamSet`] and keeps it tracking the live one.
///
/// The target can only be obtained through [`TargetSynchronizer::initialize`],
/// which deep-copies the live parameters, so there is no way to update a
/// target that was never initialized.
pub struct TargetSynchronizer<P: ParamSet> {
    target: P,
    config: TargetSyncConfig,
    counter: usize,
    n_updates: usize,
}

impl<P: ParamSet> TargetSynchronizer<P> {
    /// Creates the target as a deep copy of `live`.
    pub fn initialize(live: &P, config: TargetSyncConfig) -> Result<Self, OffPolicyError> {
        validate_tau(config.tau)?;
        let target = live.deep_copy()?;
        debug!(
            "Initialized target parameters with {} tensors, tau = {}, interval = {}",
            target.num_params(),
            config.tau,
            config.interval
        );

        Ok(Self {
            target,
            config,
            counter: 0,
            n_updates: 0,
        })
    }

    /// Applies `target = tau * live + (1 - tau) * target` to every parameter.
    ///
    /// `tau = 1` copies `live` exactly and `tau = 0` leaves the target as it
    /// is. Both count as an update. The structure of `live` is checked before
    /// anything is modified.
    pub fn update(&mut self, live: &P, tau: f64) -> Result<(), OffPolicyError> {
        validate_tau(tau)?;
        check_structure(&self.target.specs(), &live.specs())?;

        if tau > 0.0 {
            for ix in 0..self.target.num_params() {
                if tau == 1.0 {
                    self.target.copy_param(ix, live)?;
                } else {
                    self.target.blend_param(ix, live, tau)?;
                }
            }
        }
        self.n_updates += 1;

        Ok(())
    }

    /// Copies `live` into the target.
    pub fn hard_update(&mut self, live: &P) -> Result<(), OffPolicyError> {
        self.update(live, 1.0)
    }

    /// Counts a step and updates the target with the configured `tau` every
    /// `interval` steps.
    ///
    /// Returns `true` if the target was updated.
    pub fn step(&mut self, live: &P) -> Result<bool, OffPolicyError> {
        self.counter += 1;
        if self.counter < self.config.interval.max(1) {
            return Ok(false);
        }

        self.counter = 0;
        self.update(live, self.config.tau)?;
        debug!("Synchronized target parameters ({} updates)", self.n_updates);
        Ok(true)
    }

    /// Returns the target parameters.
    pub fn target(&self) -> &P {
        &self.target
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TargetSyncConfig {
        &self.config
    }

    /// Returns the number of updates applied so far.
    pub fn n_updates(&self) -> usize {
        self.n_updates
    }
}

fn validate_tau(tau: f64) -> Result<(), OffPolicyError> {
    if (0.0..=1.0).contains(&tau) {
        Ok(())
    } else {
        Err(OffPolicyError::InvalidTau(tau))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sync::ParamList;
    use ndarray::{ArrayD, IxDyn};

    /// Four layers of different widths, weights and biases.
    fn mlp_params(offset: f32) -> ParamList {
        let shapes: [&[usize]; 8] = [
            &[30, 2],
            &[30],
            &[60, 30],
            &[60],
            &[30, 60],
            &[30],
            &[3, 30],
            &[3],
        ];
        ParamList::new(
            shapes
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let n = s.iter().product::<usize>();
                    let v = (0..n)
                        .map(|j| offset + (i * 1000 + j) as f32 * 0.001)
                        .collect();
                    ArrayD::from_shape_vec(IxDyn(s), v).unwrap()
                })
                .collect(),
        )
    }

    #[test]
    fn test_initialize_copies_live() {
        let live = mlp_params(0.5);
        let sync = TargetSynchronizer::initialize(&live, TargetSyncConfig::default()).unwrap();
        assert_eq!(sync.target(), &live);
    }

    #[test]
    fn test_tau_one_is_exact_copy() {
        let live = mlp_params(1.0);
        let mut sync =
            TargetSynchronizer::initialize(&mlp_params(-3.0), TargetSyncConfig::default()).unwrap();
        sync.update(&live, 1.0).unwrap();
        assert_eq!(sync.target(), &live);
    }

    #[test]
    fn test_tau_zero_keeps_target() {
        let before = mlp_params(-3.0);
        let mut sync =
            TargetSynchronizer::initialize(&before, TargetSyncConfig::default()).unwrap();
        sync.update(&mlp_params(1.0), 0.0).unwrap();
        assert_eq!(sync.target(), &before);
        assert_eq!(sync.n_updates(), 1);
    }

    #[test]
    fn test_step_with_tau_zero_counts_update() {
        let before = ParamList::from_vecs(vec![vec![0.0, 0.0]]);
        let mut sync =
            TargetSynchronizer::initialize(&before, TargetSyncConfig::soft(0.0)).unwrap();
        let live = ParamList::from_vecs(vec![vec![1.0, 2.0]]);

        assert!(sync.step(&live).unwrap());
        assert!(sync.step(&live).unwrap());
        assert_eq!(sync.target(), &before);
        assert_eq!(sync.n_updates(), 2);
    }

    #[test]
    fn test_soft_update_blends_every_parameter() {
        let tau = 0.125;
        let before = mlp_params(-3.0);
        let live = mlp_params(1.0);
        let mut sync =
            TargetSynchronizer::initialize(&before, TargetSyncConfig::default()).unwrap();
        sync.update(&live, tau).unwrap();

        let tau = tau as f32;
        let expected = before
            .flatten()
            .iter()
            .zip(live.flatten().iter())
            .map(|(t, l)| tau * l + (1.0 - tau) * t)
            .collect::<Vec<_>>();
        let actual = sync.target().flatten();
        assert_eq!(actual.len(), 30 * 2 + 30 + 60 * 30 + 60 + 30 * 60 + 30 + 3 * 30 + 3);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_half_blend() {
        let mut sync = TargetSynchronizer::initialize(
            &ParamList::from_vecs(vec![vec![0.0, 0.0]]),
            TargetSyncConfig::soft(0.5),
        )
        .unwrap();
        sync.update(&ParamList::from_vecs(vec![vec![1.0, 2.0]]), 0.5)
            .unwrap();
        assert_eq!(sync.target().flatten(), vec![0.5, 1.0]);
    }

    #[test]
    fn test_structural_mismatch() {
        let before = mlp_params(0.0);
        let mut sync =
            TargetSynchronizer::initialize(&before, TargetSyncConfig::default()).unwrap();

        let fewer = ParamList::new(mlp_params(1.0).iter().take(6).cloned().collect());
        assert!(matches!(
            sync.update(&fewer, 0.5),
            Err(OffPolicyError::StructuralMismatch(_))
        ));

        let wider = ParamList::zeros(&[
            &[30, 2],
            &[30],
            &[60, 30],
            &[60],
            &[30, 60],
            &[30],
            &[4, 30],
            &[4],
        ]);
        assert!(matches!(
            sync.hard_update(&wider),
            Err(OffPolicyError::StructuralMismatch(_))
        ));
        assert_eq!(sync.target(), &before);
        assert_eq!(sync.n_updates(), 0);
    }

    #[test]
    fn test_invalid_tau() {
        let p = ParamList::from_vecs(vec![vec![0.0]]);
        let mut sync = TargetSynchronizer::initialize(&p, TargetSyncConfig::default()).unwrap();
        assert_eq!(sync.update(&p, 1.5), Err(OffPolicyError::InvalidTau(1.5)));
        assert!(sync.update(&p, f64::NAN).is_err());
        assert!(TargetSynchronizer::initialize(&p, TargetSyncConfig::soft(-0.1)).is_err());
    }

    #[test]
    fn test_step_follows_interval() {
        let mut sync = TargetSynchronizer::initialize(
            &ParamList::from_vecs(vec![vec![0.0]]),
            TargetSyncConfig::hard(3),
        )
        .unwrap();
        let live = ParamList::from_vecs(vec![vec![1.0]]);

        assert!(!sync.step(&live).unwrap());
        assert!(!sync.step(&live).unwrap());
        assert_eq!(sync.target().flatten(), vec![0.0]);
        assert!(sync.step(&live).unwrap());
        assert_eq!(sync.target().flatten(), vec![1.0]);
        assert_eq!(sync.n_updates(), 1);
        assert!(!sync.step(&live).unwrap());
    }
}
