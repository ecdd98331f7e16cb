use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::models::errors::PhyphoxError;

/// Gaussian noise generator.
#[derive(Clone)]
pub(super) struct GaussianNoise {
    normal: Normal<f64>,
}

impl GaussianNoise {
    /// Creates new distribution from mean and stdev. Fails if stdev is not finite or negative.
    pub(super) fn new(mean: f64, stdev: f64) -> Result<Self, PhyphoxError> {
        let normal = Normal::new(mean, stdev).map_err(|e| PhyphoxError::Other(e.to_string()))?;
        Ok(Self { normal })
    }

    pub(super) fn draw_sample(&self, rng: &mut StdRng) -> f64 {
        self.normal.sample(rng)
    }

    /// Adds the magnitude of a draw, so `data` can only grow. Used to jitter timestamps.
    pub(super) fn add_jitter(&self, rng: &mut StdRng, data: f64) -> f64 {
        data + self.draw_sample(rng).abs()
    }

    // Adds noise to every component
    pub(super) fn add_noise_vec(&self, rng: &mut StdRng, data: Vec<f64>) -> Vec<f64> {
        data.into_iter()
            .map(|d| d + self.draw_sample(rng))
            .collect()
    }
}
