use std::collections::BTreeSet;

use lotto_db::models::{Draw, MAX_NUMBER, MIN_NUMBER, PICK_COUNT};
use ndarray::{s, Array1, Array2, ArrayView1};
use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::encoding::draws_to_matrix;
use crate::error::{PredictError, Result};
use crate::model::SequenceModel;
use crate::scaler::MinMaxScaler;

/// Six distinct numbers in [1, 45], ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedGame {
    pub numbers: [u8; PICK_COUNT],
}

/// Generate `config.count` games by rolling the model forward over its own
/// predictions.
///
/// The scaler is fitted over the whole history; the initial window is the
/// last `config.window` normalized draws. After each step the oldest window
/// row is dropped and the raw normalized prediction is appended, before any
/// rounding or deduplication.
pub fn generate_games<R: Rng + ?Sized>(
    history: &[Draw],
    model: &dyn SequenceModel,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<GeneratedGame>> {
    if config.window == 0 || history.len() < config.window {
        return Err(PredictError::InsufficientHistory {
            needed: config.window.max(1),
            available: history.len(),
        });
    }

    let data = draws_to_matrix(history);
    let (scaler, scaled) = MinMaxScaler::fit_transform(&data).ok_or(PredictError::InsufficientHistory {
        needed: config.window,
        available: 0,
    })?;

    let start = scaled.nrows() - config.window;
    let mut window: Array2<f64> = scaled.slice(s![start.., ..]).to_owned();

    let mut games = Vec::with_capacity(config.count);
    for step in 0..config.count {
        let raw = model.predict(window.view())?;
        if raw.len() != PICK_COUNT {
            return Err(PredictError::Prediction(format!(
                "model {} returned {} values, expected {}",
                model.name(),
                raw.len(),
                PICK_COUNT
            )));
        }

        let restored = scaler.inverse_transform_row(raw.view());
        let candidates = round_and_clamp(restored.view())?;
        let numbers = remove_duplicates_and_fill(&candidates, rng);
        log::debug!("step {}: raw={:?} -> {:?}", step, candidates, numbers);
        games.push(GeneratedGame { numbers });

        window = slide_window(&window, &raw);
    }

    log::info!("Generated games: {:?}", games.iter().map(|g| g.numbers).collect::<Vec<_>>());
    Ok(games)
}

/// Round each value to the nearest integer and clamp it into [1, 45].
pub fn round_and_clamp(values: ArrayView1<f64>) -> Result<Vec<u8>> {
    values
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                return Err(PredictError::Prediction(format!("non-finite model output {}", v)));
            }
            Ok(v.round().clamp(MIN_NUMBER as f64, MAX_NUMBER as f64) as u8)
        })
        .collect()
}

/// Keep the distinct in-range numbers, then fill with uniform random numbers
/// not already present until six are held. Sorted ascending.
pub fn remove_duplicates_and_fill<R: Rng + ?Sized>(numbers: &[u8], rng: &mut R) -> [u8; PICK_COUNT] {
    let mut unique: BTreeSet<u8> = numbers
        .iter()
        .copied()
        .filter(|n| (MIN_NUMBER..=MAX_NUMBER).contains(n))
        .collect();
    while unique.len() > PICK_COUNT {
        unique.pop_last();
    }
    while unique.len() < PICK_COUNT {
        unique.insert(rng.random_range(MIN_NUMBER..=MAX_NUMBER));
    }

    let mut out = [0u8; PICK_COUNT];
    for (slot, n) in out.iter_mut().zip(unique) {
        *slot = n;
    }
    out
}

fn slide_window(window: &Array2<f64>, next: &Array1<f64>) -> Array2<f64> {
    let n = window.nrows();
    let mut slid = Array2::zeros(window.raw_dim());
    slid.slice_mut(s![..n - 1, ..]).assign(&window.slice(s![1.., ..]));
    slid.row_mut(n - 1).assign(next);
    slid
}
