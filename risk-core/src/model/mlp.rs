//! Dense feed-forward network (ReLU hidden layers, sigmoid output)

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ScoringResult};
use super::{check_width, sigmoid, RiskModel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// `weights[out][in]`
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<f32>,
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.weights.first().map(Vec::len).unwrap_or(0)
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, b)| b + row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpModel {
    pub layers: Vec<DenseLayer>,
}

impl MlpModel {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(first) = self.layers.first() else {
            return Err(ConfigError::Invalid("network has no layers".to_string()));
        };

        let mut width = first.inputs();
        if width == 0 {
            return Err(ConfigError::Invalid("network has zero inputs".to_string()));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if layer.weights.is_empty() || layer.weights.len() != layer.biases.len() {
                return Err(ConfigError::Invalid(format!(
                    "layer {} has {} weight rows and {} biases",
                    i,
                    layer.weights.len(),
                    layer.biases.len()
                )));
            }
            if layer.weights.iter().any(|row| row.len() != width) {
                return Err(ConfigError::Invalid(format!(
                    "layer {} expects {} inputs",
                    i, width
                )));
            }
            width = layer.weights.len();
        }

        if width != 1 {
            return Err(ConfigError::Invalid(format!(
                "network must end in one output unit, found {}",
                width
            )));
        }
        Ok(())
    }
}

impl RiskModel for MlpModel {
    fn kind(&self) -> &'static str {
        "mlp"
    }

    fn input_width(&self) -> Option<usize> {
        self.layers.first().map(DenseLayer::inputs)
    }

    fn predict_proba(&self, features: &[f32]) -> ScoringResult<[f32; 2]> {
        check_width(self.input_width(), features)?;

        let last = self.layers.len().saturating_sub(1);
        let mut activations = features.to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            activations = layer.forward(&activations);
            if i < last {
                for a in activations.iter_mut() {
                    *a = a.max(0.0);
                }
            }
        }

        let p = sigmoid(activations.first().copied().unwrap_or(0.0));
        Ok([1.0 - p, p])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> MlpModel {
        MlpModel {
            layers: vec![
                DenseLayer {
                    weights: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                    biases: vec![0.0, 0.0],
                },
                DenseLayer {
                    weights: vec![vec![1.0, -1.0]],
                    biases: vec![0.0],
                },
            ],
        }
    }

    #[test]
    fn test_forward_pass() {
        let model = network();
        model.validate().unwrap();
        assert_eq!(model.input_width(), Some(2));

        let p = model.predict_proba(&[2.0, 0.0]).unwrap()[1];
        assert!((p - sigmoid(2.0)).abs() < 1e-6);

        // ReLU clips the negative hidden unit
        let p = model.predict_proba(&[-3.0, 0.0]).unwrap()[1];
        assert!((p - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_multi_output_rejected() {
        let mut model = network();
        model.layers[1].weights.push(vec![1.0, 1.0]);
        model.layers[1].biases.push(0.0);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_ragged_layer_rejected() {
        let mut model = network();
        model.layers[0].weights[1] = vec![1.0];
        assert!(model.validate().is_err());
    }
}
