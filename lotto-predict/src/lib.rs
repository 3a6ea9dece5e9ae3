pub mod config;
pub mod encoding;
pub mod error;
pub mod generator;
pub mod model;
pub mod round;
pub mod scaler;

pub use error::{PredictError, Result};
