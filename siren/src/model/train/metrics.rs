use serde::{Deserialize, Serialize};

/// held-out validation metrics recorded in the model artifact.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ValidationMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl ValidationMetrics {
    pub fn compute(observed: &[f64], predicted: &[f64]) -> ValidationMetrics {
        let n = observed.len() as f64;
        let mae = observed
            .iter()
            .zip(predicted.iter())
            .map(|(y, p)| (y - p).abs())
            .sum::<f64>()
            / n;
        let mse = observed
            .iter()
            .zip(predicted.iter())
            .map(|(y, p)| (y - p) * (y - p))
            .sum::<f64>()
            / n;
        let mean = observed.iter().sum::<f64>() / n;
        let total_variance = observed.iter().map(|y| (y - mean) * (y - mean)).sum::<f64>();
        let residual_variance = observed
            .iter()
            .zip(predicted.iter())
            .map(|(y, p)| (y - p) * (y - p))
            .sum::<f64>();
        let r2 = if total_variance == 0.0 {
            // a constant target is either matched exactly or not at all
            if residual_variance == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - residual_variance / total_variance
        };
        ValidationMetrics {
            mae,
            rmse: mse.sqrt(),
            r2,
        }
    }
}
