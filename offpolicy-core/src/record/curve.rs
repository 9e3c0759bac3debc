//! Learning curves for comparing runs.
use super::BufferedRecorder;
use anyhow::Result;
use serde::Serialize;
use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

/// A `(step, value)` series, typically the evaluation return over training.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LearningCurve {
    /// Environment steps.
    pub steps: Vec<usize>,

    /// Value at each step.
    pub values: Vec<f32>,
}

#[derive(Serialize)]
struct CurveRow<'a> {
    env: &'a str,
    model: &'a str,
    step: usize,
    value: f32,
}

impl LearningCurve {
    /// Parses rows of `[wall_time, step, value]`, the JSON format of exported
    /// scalar logs. Wall times are dropped.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let rows: Vec<(f64, f64, f64)> = serde_json::from_str(s)?;
        Ok(Self {
            steps: rows.iter().map(|r| r.1 as usize).collect(),
            values: rows.iter().map(|r| r.2 as f32).collect(),
        })
    }

    /// Loads a curve from a JSON file, see [`LearningCurve::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let rdr = BufReader::new(File::open(path)?);
        let rows: Vec<(f64, f64, f64)> = serde_json::from_reader(rdr)?;
        Ok(Self {
            steps: rows.iter().map(|r| r.1 as usize).collect(),
            values: rows.iter().map(|r| r.2 as f32).collect(),
        })
    }

    /// Builds a curve from the scalar `key` kept by a recorder.
    pub fn from_recorder(recorder: &BufferedRecorder, key: &str) -> Self {
        let (steps, values) = recorder.scalars(key).into_iter().unzip();
        Self { steps, values }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the curve has no point.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Trailing moving average.
    ///
    /// For `i > window`, value `i` is replaced by the mean of the raw values
    /// `[i - window, i)`. The first `window + 1` values are kept as they are.
    pub fn smoothed(&self, window: usize) -> Self {
        let mut values = self.values.clone();
        if window > 0 {
            for i in (window + 1)..self.values.len() {
                let sum: f32 = self.values[i - window..i].iter().sum();
                values[i] = sum / window as f32;
            }
        }
        Self {
            steps: self.steps.clone(),
            values,
        }
    }
}

/// Learning curves grouped by environment and model name.
#[derive(Debug, Clone, Default)]
pub struct CurveSet {
    curves: BTreeMap<String, BTreeMap<String, LearningCurve>>,
}

impl CurveSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a curve, replacing the one with the same environment and model.
    pub fn insert(&mut self, env: impl Into<String>, model: impl Into<String>, curve: LearningCurve) {
        self.curves
            .entry(env.into())
            .or_default()
            .insert(model.into(), curve);
    }

    /// Gets the curve of `model` on `env`.
    pub fn get(&self, env: &str, model: &str) -> Option<&LearningCurve> {
        self.curves.get(env).and_then(|m| m.get(model))
    }

    /// Names of environments, sorted.
    pub fn envs(&self) -> Vec<&str> {
        self.curves.keys().map(|k| k.as_str()).collect()
    }

    /// Returns a copy with every curve smoothed, see [`LearningCurve::smoothed`].
    pub fn smoothed(&self, window: usize) -> Self {
        let curves = self
            .curves
            .iter()
            .map(|(env, models)| {
                let models = models
                    .iter()
                    .map(|(model, c)| (model.clone(), c.smoothed(window)))
                    .collect();
                (env.clone(), models)
            })
            .collect();
        Self { curves }
    }

    /// Writes all curves as a long-format CSV with columns
    /// `env,model,step,value`.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        for (env, models) in self.curves.iter() {
            for (model, curve) in models.iter() {
                for (&step, &value) in curve.steps.iter().zip(curve.values.iter()) {
                    wtr.serialize(CurveRow {
                        env,
                        model,
                        step,
                        value,
                    })?;
                }
            }
        }
        wtr.flush()?;
        Ok(())
    }
}
