//! [`ParamSet`] over a [`VarMap`].
use candle_core::{Tensor, Var};
use candle_nn::VarMap;
use log::trace;
use offpolicy_core::{
    error::OffPolicyError,
    sync::{ParamSet, ParamSpec},
};

fn backend(e: candle_core::Error) -> OffPolicyError {
    OffPolicyError::Backend(e.to_string())
}

/// The variables of a [`VarMap`], seen as a [`ParamSet`].
///
/// Variables are ordered by name. The handles are taken when the object is
/// created, so it must be created after the model has registered all of its
/// variables. [`Var`] handles share storage with the `VarMap`, so updates are
/// visible to the model using it.
pub struct VarMapParams {
    varmap: VarMap,
    vars: Vec<(String, Var)>,
}

impl VarMapParams {
    /// Collects the variables of `varmap`.
    pub fn new(varmap: VarMap) -> Result<Self, OffPolicyError> {
        let mut vars = varmap
            .data()
            .lock()
            .map_err(|e| OffPolicyError::Backend(e.to_string()))?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Vec<_>>();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        trace!("Collected {} variables from a varmap", vars.len());

        Ok(Self { varmap, vars })
    }

    /// Returns the underlying [`VarMap`].
    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// Returns the variable of the given name.
    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.vars
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_tensor())
    }

    /// Names of the variables in traversal order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|(k, _)| k.as_str())
    }

    fn pair<'a>(&'a self, ix: usize, live: &'a Self) -> Result<(&'a Var, &'a Var), OffPolicyError> {
        match (self.vars.get(ix), live.vars.get(ix)) {
            (Some((kt, vt)), Some((kl, vl))) if kt == kl && vt.dims() == vl.dims() => Ok((vt, vl)),
            (Some((kt, vt)), Some((kl, vl))) => Err(OffPolicyError::StructuralMismatch(format!(
                "variable {}: target {}{:?} vs live {}{:?}",
                ix,
                kt,
                vt.dims(),
                kl,
                vl.dims()
            ))),
            _ => Err(OffPolicyError::StructuralMismatch(format!(
                "variable {} out of range, target has {} variables, live has {}",
                ix,
                self.vars.len(),
                live.vars.len()
            ))),
        }
    }
}

impl ParamSet for VarMapParams {
    fn deep_copy(&self) -> Result<Self, OffPolicyError> {
        let varmap = VarMap::new();
        {
            let mut data = varmap
                .data()
                .lock()
                .map_err(|e| OffPolicyError::Backend(e.to_string()))?;
            for (name, var) in self.vars.iter() {
                let t = var.as_tensor().copy().map_err(backend)?;
                data.insert(name.clone(), Var::from_tensor(&t).map_err(backend)?);
            }
        }
        Self::new(varmap)
    }

    fn specs(&self) -> Vec<ParamSpec> {
        self.vars
            .iter()
            .map(|(k, v)| ParamSpec::named(k.as_str(), v.dims()))
            .collect()
    }

    fn copy_param(&mut self, ix: usize, live: &Self) -> Result<(), OffPolicyError> {
        let (t, l) = self.pair(ix, live)?;
        t.set(l.as_tensor()).map_err(backend)
    }

    fn blend_param(&mut self, ix: usize, live: &Self, tau: f64) -> Result<(), OffPolicyError> {
        let (t, l) = self.pair(ix, live)?;
        let blended = l
            .affine(tau, 0.)
            .and_then(|l| l.add(&t.affine(1. - tau, 0.)?))
            .map_err(backend)?;
        t.set(&blended).map_err(backend)
    }

    fn num_params(&self) -> usize {
        self.vars.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use candle_core::{DType, Device, Module};
    use candle_nn::{linear, VarBuilder};
    use offpolicy_core::{TargetSyncConfig, TargetSynchronizer};

    fn mlp(varmap: &VarMap, hidden: usize) -> anyhow::Result<(candle_nn::Linear, candle_nn::Linear)> {
        let vb = VarBuilder::from_varmap(varmap, DType::F32, &Device::Cpu);
        let fc1 = linear(3, hidden, vb.pp("fc1"))?;
        let fc2 = linear(hidden, 2, vb.pp("fc2"))?;
        Ok((fc1, fc2))
    }

    fn values(params: &VarMapParams) -> anyhow::Result<Vec<Vec<f32>>> {
        params
            .vars
            .iter()
            .map(|(_, v)| -> anyhow::Result<Vec<f32>> {
                Ok(v.as_tensor().flatten_all()?.to_vec1::<f32>()?)
            })
            .collect()
    }

    #[test]
    fn test_specs_are_sorted() -> anyhow::Result<()> {
        let varmap = VarMap::new();
        mlp(&varmap, 4)?;
        let params = VarMapParams::new(varmap)?;
        assert_eq!(
            params.names().collect::<Vec<_>>(),
            vec!["fc1.bias", "fc1.weight", "fc2.bias", "fc2.weight"]
        );
        assert_eq!(params.specs()[1], ParamSpec::named("fc1.weight", &[4, 3]));
        Ok(())
    }

    #[test]
    fn test_deep_copy_does_not_share_storage() -> anyhow::Result<()> {
        let varmap = VarMap::new();
        mlp(&varmap, 4)?;
        let live = VarMapParams::new(varmap)?;
        let copy = live.deep_copy()?;
        assert_eq!(values(&live)?, values(&copy)?);

        let zeros = Tensor::zeros((4,), DType::F32, &Device::Cpu)?;
        copy.vars[0].1.set(&zeros)?;
        assert_ne!(values(&live)?[0], vec![0f32; 4]);
        Ok(())
    }

    #[test]
    fn test_synchronizer_drives_model() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let live_map = VarMap::new();
        let (fc1, _) = mlp(&live_map, 4)?;
        let mut live = VarMapParams::new(live_map)?;

        let mut sync = TargetSynchronizer::initialize(&live, TargetSyncConfig::soft(0.5))?;
        let before = values(sync.target())?;

        // Move the live parameters, as an optimizer step would.
        for ix in 0..live.num_params() {
            let t = live.vars[ix].1.as_tensor().affine(1., 1.)?;
            live.vars[ix].1.set(&t)?;
        }
        sync.step(&live)?;

        let after = values(sync.target())?;
        for (a, b) in after.iter().flatten().zip(before.iter().flatten()) {
            assert!((a - (b + 0.5)).abs() < 1e-6);
        }

        // The model built on the live varmap sees the updated weights.
        let x = Tensor::zeros((1, 3), DType::F32, &Device::Cpu)?;
        let y = fc1.forward(&x)?.flatten_all()?.to_vec1::<f32>()?;
        assert_eq!(y, values(&live)?[0]);

        sync.hard_update(&live)?;
        assert_eq!(values(sync.target())?, values(&live)?);
        Ok(())
    }

    #[test]
    fn test_structural_mismatch() -> anyhow::Result<()> {
        let map1 = VarMap::new();
        mlp(&map1, 4)?;
        let map2 = VarMap::new();
        mlp(&map2, 5)?;
        let live = VarMapParams::new(map1)?;
        let other = VarMapParams::new(map2)?;

        let mut sync = TargetSynchronizer::initialize(&other, TargetSyncConfig::hard(1))?;
        let before = values(sync.target())?;
        assert!(matches!(
            sync.update(&live, 0.5),
            Err(OffPolicyError::StructuralMismatch(_))
        ));
        assert_eq!(values(sync.target())?, before);
        Ok(())
    }
}
