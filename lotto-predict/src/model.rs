use std::path::Path;

use lotto_db::models::PICK_COUNT;
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};

/// A trained sequence model consumed as a black box.
pub trait SequenceModel: Send + Sync {
    fn name(&self) -> &str;
    /// `window` is `n × 6`, oldest row first, every value normalized.
    /// Returns one normalized draw of 6 values.
    fn predict(&self, window: ArrayView2<f64>) -> Result<Array1<f64>>;
}

/// On-disk form of [`LinearWindowModel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub window: usize,
    /// 6 rows of `window * 6` coefficients over the flattened window.
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

/// Linear readout over the flattened window: `y = W · vec(window) + b`.
#[derive(Debug, Clone)]
pub struct LinearWindowModel {
    window: usize,
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl LinearWindowModel {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let input_dim = artifact.window * PICK_COUNT;
        if artifact.window == 0 {
            return Err(PredictError::ModelLoad("window must be positive".to_string()));
        }
        if artifact.weights.len() != PICK_COUNT {
            return Err(PredictError::ModelLoad(format!(
                "expected {} weight rows, got {}",
                PICK_COUNT,
                artifact.weights.len()
            )));
        }
        if let Some((i, row)) = artifact.weights.iter().enumerate().find(|(_, r)| r.len() != input_dim) {
            return Err(PredictError::ModelLoad(format!(
                "weight row {} has {} coefficients, expected {}",
                i,
                row.len(),
                input_dim
            )));
        }
        if artifact.bias.len() != PICK_COUNT {
            return Err(PredictError::ModelLoad(format!(
                "expected {} bias terms, got {}",
                PICK_COUNT,
                artifact.bias.len()
            )));
        }

        let flat: Vec<f64> = artifact.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((PICK_COUNT, input_dim), flat)
            .map_err(|e| PredictError::ModelLoad(e.to_string()))?;
        Ok(LinearWindowModel {
            window: artifact.window,
            weights,
            bias: Array1::from(artifact.bias),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl SequenceModel for LinearWindowModel {
    fn name(&self) -> &str {
        "linear-window"
    }

    fn predict(&self, window: ArrayView2<f64>) -> Result<Array1<f64>> {
        if window.shape() != [self.window, PICK_COUNT] {
            return Err(PredictError::Prediction(format!(
                "window shape {:?}, model expects [{}, {}]",
                window.shape(),
                self.window,
                PICK_COUNT
            )));
        }
        let x: Array1<f64> = window.iter().copied().collect();
        Ok(self.weights.dot(&x) + &self.bias)
    }
}

/// Load a JSON model artifact from disk.
pub fn load_model(path: &Path) -> Result<LinearWindowModel> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| PredictError::ModelLoad(format!("cannot read {:?}: {}", path, e)))?;
    let artifact: ModelArtifact = serde_json::from_str(&json)
        .map_err(|e| PredictError::ModelLoad(format!("invalid JSON in {:?}: {}", path, e)))?;
    let model = LinearWindowModel::from_artifact(artifact)?;
    log::info!("Loaded model {:?} (window={})", path, model.window);
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Each output copies the matching column of the newest window row.
    fn last_row_artifact(window: usize) -> ModelArtifact {
        let input_dim = window * PICK_COUNT;
        let weights = (0..PICK_COUNT)
            .map(|j| {
                let mut row = vec![0.0; input_dim];
                row[(window - 1) * PICK_COUNT + j] = 1.0;
                row
            })
            .collect();
        ModelArtifact {
            window,
            weights,
            bias: vec![0.0; PICK_COUNT],
        }
    }

    #[test]
    fn test_predict_copies_last_row() {
        let model = LinearWindowModel::from_artifact(last_row_artifact(3)).unwrap();
        let window = Array2::from_shape_fn((3, 6), |(i, j)| (i * 6 + j) as f64 * 0.01);
        let out = model.predict(window.view()).unwrap();
        assert_eq!(out.len(), 6);
        for j in 0..6 {
            assert!((out[j] - window[[2, j]]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bias_added() {
        let mut artifact = last_row_artifact(2);
        artifact.bias = vec![0.5; 6];
        let model = LinearWindowModel::from_artifact(artifact).unwrap();
        let out = model.predict(Array2::zeros((2, 6)).view()).unwrap();
        assert!(out.iter().all(|&v| (v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_wrong_window_shape() {
        let model = LinearWindowModel::from_artifact(last_row_artifact(3)).unwrap();
        let err = model.predict(Array2::zeros((2, 6)).view()).unwrap_err();
        assert!(matches!(err, PredictError::Prediction(_)));
    }

    #[test]
    fn test_malformed_artifact() {
        let mut artifact = last_row_artifact(3);
        artifact.weights.pop();
        assert!(matches!(
            LinearWindowModel::from_artifact(artifact),
            Err(PredictError::ModelLoad(_))
        ));

        let mut artifact = last_row_artifact(3);
        artifact.weights[2].push(1.0);
        assert!(LinearWindowModel::from_artifact(artifact).is_err());

        let mut artifact = last_row_artifact(3);
        artifact.bias = vec![0.0; 5];
        assert!(LinearWindowModel::from_artifact(artifact).is_err());
    }

    #[test]
    fn test_load_model_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lotto_model.json");
        std::fs::write(&path, serde_json::to_string(&last_row_artifact(4)).unwrap()).unwrap();
        let model = load_model(&path).unwrap();
        assert_eq!(model.window(), 4);
        assert_eq!(model.name(), "linear-window");
    }

    #[test]
    fn test_load_model_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PredictError::ModelLoad(_)));
    }
}
