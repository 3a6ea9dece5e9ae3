use lotto_db::models::{Draw, PICK_COUNT};
use ndarray::Array2;

/// Stack draws into an `n × 6` matrix, one row per draw, in the given order.
/// Numbers keep their drawn position; each column is a position.
pub fn draws_to_matrix(draws: &[Draw]) -> Array2<f64> {
    Array2::from_shape_fn((draws.len(), PICK_COUNT), |(i, j)| draws[i].numbers[j] as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(numbers: [u8; 6]) -> Draw {
        Draw::new(None, numbers).unwrap()
    }

    #[test]
    fn test_matrix_shape() {
        let m = draws_to_matrix(&[draw([1, 2, 3, 4, 5, 6]), draw([7, 8, 9, 10, 11, 12])]);
        assert_eq!(m.shape(), &[2, 6]);
    }

    #[test]
    fn test_matrix_keeps_positions() {
        let m = draws_to_matrix(&[draw([44, 3, 27, 15, 38, 9])]);
        assert_eq!(m[[0, 0]], 44.0);
        assert_eq!(m[[0, 1]], 3.0);
        assert_eq!(m[[0, 5]], 9.0);
    }

    #[test]
    fn test_empty_history() {
        let m = draws_to_matrix(&[]);
        assert_eq!(m.shape(), &[0, 6]);
    }
}
