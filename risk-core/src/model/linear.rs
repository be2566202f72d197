//! Logistic regression

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ScoringResult};
use super::{check_width, normalize, sigmoid, RiskModel};

/// `p(risk) = sigmoid(w·x + b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f32,
    pub coefficients: Vec<f32>,
}

impl LogisticModel {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coefficients.is_empty() {
            return Err(ConfigError::Invalid("logistic model has no coefficients".to_string()));
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err(ConfigError::Invalid("logistic model has non-finite weights".to_string()));
        }
        Ok(())
    }
}

impl RiskModel for LogisticModel {
    fn kind(&self) -> &'static str {
        "logistic"
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict_proba(&self, features: &[f32]) -> ScoringResult<[f32; 2]> {
        check_width(self.input_width(), features)?;

        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f32>();

        let p = sigmoid(z);
        Ok([1.0 - p, p])
    }

    /// |coefficient|, normalized
    fn feature_importances(&self) -> Option<Vec<f32>> {
        Some(normalize(self.coefficients.iter().map(|c| c.abs()).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_probability() {
        let model = LogisticModel {
            intercept: 0.0,
            coefficients: vec![1.0, -1.0],
        };

        let p = model.predict_proba(&[0.0, 0.0]).unwrap();
        assert!((p[1] - 0.5).abs() < 1e-6);
        assert!((p[0] + p[1] - 1.0).abs() < 1e-6);

        let high = model.predict_proba(&[3.0, 0.0]).unwrap();
        assert!(high[1] > 0.9);
        assert_eq!(model.predict(&[3.0, 0.0]).unwrap(), 1.0);
        assert_eq!(model.predict(&[0.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_wrong_width_fails() {
        let model = LogisticModel {
            intercept: 0.0,
            coefficients: vec![1.0, 1.0],
        };
        assert!(model.predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn test_importances_from_coefficients() {
        let model = LogisticModel {
            intercept: 1.0,
            coefficients: vec![-3.0, 1.0],
        };
        assert_eq!(model.feature_importances(), Some(vec![0.75, 0.25]));
    }

    #[test]
    fn test_validate_empty() {
        let model = LogisticModel {
            intercept: 0.0,
            coefficients: vec![],
        };
        assert!(model.validate().is_err());
    }
}
