//! ONNX Runtime backend (feature `onnx`)
//!
//! Expects a classifier exported with a `[1, n]` f32 input and a
//! `probabilities` output (sklearn-onnx with zipmap disabled). When no output
//! has that name the last output is read instead.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use crate::error::{ScoringError, ScoringResult};
use super::{check_width, RiskModel};

pub struct OnnxModel {
    session: Mutex<Session>,
    output_name: String,
    width: usize,
}

impl OnnxModel {
    pub fn from_bytes(model_bytes: &[u8], width: usize) -> Result<Self, ScoringError> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| ScoringError::ModelInvocation(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ScoringError::ModelInvocation(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| ScoringError::ModelInvocation(format!("Load from memory error: {}", e)))?;

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == "probabilities")
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| ScoringError::ModelInvocation("No output defined".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            width,
        })
    }
}

impl RiskModel for OnnxModel {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.width)
    }

    fn predict_proba(&self, features: &[f32]) -> ScoringResult<[f32; 2]> {
        check_width(self.input_width(), features)?;

        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| ScoringError::ModelInvocation(format!("Array error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| ScoringError::ModelInvocation(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ScoringError::ModelInvocation(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| ScoringError::ModelInvocation("No output".to_string()))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ScoringError::ModelInvocation(format!("Extract error: {}", e)))?;

        match data {
            [p0, p1, ..] => Ok([*p0, *p1]),
            [p] => Ok([1.0 - *p, *p]),
            [] => Err(ScoringError::ModelInvocation("Empty output".to_string())),
        }
    }
}
