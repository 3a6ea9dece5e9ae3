use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    /// The model artifact is missing, unreadable or malformed.
    #[error("model load failed: {0}")]
    ModelLoad(String),

    /// Fewer historical draws than the model window.
    #[error("insufficient history: need {needed} draws, got {available}")]
    InsufficientHistory { needed: usize, available: usize },

    /// The model failed or returned an unusable output.
    #[error("prediction failed: {0}")]
    Prediction(String),
}

pub type Result<T> = std::result::Result<T, PredictError>;
