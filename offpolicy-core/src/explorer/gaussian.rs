//! Gaussian action noise for deterministic policies.
use anyhow::{bail, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Adds `N(0, std)` to every action dimension and clips to `[low, high]`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct GaussianNoise {
    /// Standard deviation of the noise.
    pub std: f64,

    /// Lower bound of actions.
    pub low: f32,

    /// Upper bound of actions.
    pub high: f32,
}

impl GaussianNoise {
    /// Constructs the noise.
    pub fn new(std: f64, low: f32, high: f32) -> Self {
        Self { std, low, high }
    }

    /// Noise with `std = max_action * expl_noise` on actions in
    /// `[-max_action, max_action]`.
    pub fn from_expl_noise(expl_noise: f64, max_action: f32) -> Self {
        Self {
            std: max_action as f64 * expl_noise,
            low: -max_action,
            high: max_action,
        }
    }

    /// Perturbs `action` in place.
    ///
    /// Fails if `std` is negative or not finite, or if `low > high`.
    pub fn apply(&self, action: &mut [f32], rng: &mut impl Rng) -> Result<()> {
        self.validate()?;
        let normal = Normal::new(0.0, self.std)?;
        for a in action.iter_mut() {
            *a = (*a + normal.sample(rng) as f32).clamp(self.low, self.high);
        }
        Ok(())
    }

    /// Samples an action uniformly from `[low, high]` in every dimension.
    pub fn uniform(&self, dim: usize, rng: &mut impl Rng) -> Result<Vec<f32>> {
        self.validate()?;
        Ok((0..dim).map(|_| rng.gen_range(self.low..=self.high)).collect())
    }

    fn validate(&self) -> Result<()> {
        if !self.std.is_finite() || self.std < 0.0 {
            bail!("Noise std must be finite and non-negative, got {}", self.std);
        }
        if !self.low.is_finite() || !self.high.is_finite() || self.low > self.high {
            bail!("Invalid action bounds [{}, {}]", self.low, self.high);
        }
        Ok(())
    }

    /// Constructs [`GaussianNoise`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`GaussianNoise`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_noise_is_clipped() -> Result<()> {
        let noise = GaussianNoise::from_expl_noise(10.0, 2.0);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let mut a = vec![1.9, -1.9, 0.0];
            noise.apply(&mut a, &mut rng)?;
            assert!(a.iter().all(|&x| (-2.0..=2.0).contains(&x)));
        }
        Ok(())
    }

    #[test]
    fn test_zero_noise_keeps_action() -> Result<()> {
        let noise = GaussianNoise::new(0.0, -1.0, 1.0);
        let mut rng = StdRng::seed_from_u64(42);
        let mut a = vec![0.25, -0.5];
        noise.apply(&mut a, &mut rng)?;
        assert_eq!(a, vec![0.25, -0.5]);
        Ok(())
    }

    #[test]
    fn test_negative_std_fails() {
        let noise = GaussianNoise::new(-1.0, -1.0, 1.0);
        let mut rng = StdRng::seed_from_u64(42);
        assert!(noise.apply(&mut [0.0], &mut rng).is_err());
    }

    #[test]
    fn test_uniform_within_bounds() -> Result<()> {
        let noise = GaussianNoise::from_expl_noise(0.1, 0.5);
        let mut rng = StdRng::seed_from_u64(42);
        let a = noise.uniform(4, &mut rng)?;
        assert_eq!(a.len(), 4);
        assert!(a.iter().all(|&x| (-0.5..=0.5).contains(&x)));
        Ok(())
    }

    #[test]
    fn test_swapped_bounds_fail() {
        let mut rng = StdRng::seed_from_u64(42);
        let noise = GaussianNoise::new(0.1, 1.0, -1.0);
        assert!(noise.apply(&mut [0.0], &mut rng).is_err());
        assert!(noise.uniform(2, &mut rng).is_err());

        // Negative max action flips both the bounds and the sign of std.
        let noise = GaussianNoise::from_expl_noise(0.1, -1.0);
        assert!(noise.apply(&mut [0.0], &mut rng).is_err());
        assert!(noise.uniform(2, &mut rng).is_err());
    }

    #[test]
    fn test_non_finite_std_fails() {
        let mut rng = StdRng::seed_from_u64(42);
        let noise = GaussianNoise::new(f64::NAN, -1.0, 1.0);
        assert!(noise.apply(&mut [0.0], &mut rng).is_err());
    }
}
