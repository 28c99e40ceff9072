//! Standardised logistic-regression model loaded from a JSON artifact
//!
//! Artifact layout:
//!
//! ```json
//! { "dimension": 40, "mean": [...], "scale": [...], "weights": [...], "bias": -0.3 }
//! ```
//!
//! Each feature is standardised as `(x - mean) / scale` before the linear
//! term; a zero scale is treated as 1.0.

use super::traits::Classifier;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Input size the model was trained on
    pub dimension: usize,

    /// Per-feature training mean
    pub mean: Vec<f32>,

    /// Per-feature training standard deviation
    pub scale: Vec<f32>,

    /// Linear weights, positive values push towards machine-generated
    pub weights: Vec<f32>,

    pub bias: f32,
}

impl LogisticModel {
    /// Load and validate a model artifact. Called once at startup.
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading model from {:?}", path);

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file: {:?}", path))?;
        let model = Self::from_json(&text)
            .with_context(|| format!("Invalid model file: {:?}", path))?;

        log::info!("Model loaded: {} input features", model.dimension);
        Ok(model)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(text).context("Failed to parse model JSON")?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            anyhow::bail!("Model dimension must be positive");
        }
        for (name, values) in [
            ("mean", &self.mean),
            ("scale", &self.scale),
            ("weights", &self.weights),
        ] {
            if values.len() != self.dimension {
                anyhow::bail!(
                    "Model field '{}' has {} values, expected {}",
                    name,
                    values.len(),
                    self.dimension
                );
            }
            if values.iter().any(|v| !v.is_finite()) {
                anyhow::bail!("Model field '{}' contains non-finite values", name);
            }
        }
        if !self.bias.is_finite() {
            anyhow::bail!("Model bias is not finite");
        }
        Ok(())
    }

    /// Probability of the machine-generated class
    fn machine_probability(&self, features: &[f32]) -> f64 {
        let z = features
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .zip(&self.weights)
            .fold(self.bias as f64, |acc, (((&x, &m), &s), &w)| {
                let s = if s == 0.0 { 1.0 } else { s };
                acc + w as f64 * ((x - m) / s) as f64
            });
        1.0 / (1.0 + (-z).exp())
    }
}

impl Classifier for LogisticModel {
    fn input_dim(&self) -> usize {
        self.dimension
    }

    fn predict_proba(&self, features: &[f32]) -> Result<[f32; 2]> {
        if features.len() != self.dimension {
            anyhow::bail!(
                "Expected {} features, got {}",
                self.dimension,
                features.len()
            );
        }
        let p = self.machine_probability(features);
        if !p.is_finite() {
            anyhow::bail!("Model produced a non-finite probability");
        }
        Ok([(1.0 - p) as f32, p as f32])
    }
}
