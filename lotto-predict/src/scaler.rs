use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Per-column min-max scaling to [0, 1].
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    pub min: Array1<f64>,
    /// max - min, with constant columns mapped to 1.0
    pub range: Array1<f64>,
}

impl MinMaxScaler {
    /// Fit over the rows of `data`. Returns `None` when `data` has no rows.
    pub fn fit(data: &Array2<f64>) -> Option<Self> {
        if data.nrows() == 0 {
            return None;
        }
        let min = data.fold_axis(Axis(0), f64::INFINITY, |&acc, &x| acc.min(x));
        let max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &x| acc.max(x));
        let range = (&max - &min).mapv(|r| if r.abs() < f64::EPSILON { 1.0 } else { r });
        Some(MinMaxScaler { min, range })
    }

    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        (data - &self.min) / &self.range
    }

    pub fn fit_transform(data: &Array2<f64>) -> Option<(Self, Array2<f64>)> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data);
        Some((scaler, scaled))
    }

    pub fn inverse_transform(&self, scaled: &Array2<f64>) -> Array2<f64> {
        scaled * &self.range + &self.min
    }

    pub fn inverse_transform_row(&self, scaled: ArrayView1<f64>) -> Array1<f64> {
        &scaled * &self.range + &self.min
    }
}
