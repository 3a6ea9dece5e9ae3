use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Numbers drawn per game.
pub const PICK_COUNT: usize = 6;
pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 45;

/// One historical draw. `round` is only known when the history line carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub round: Option<u32>,
    pub numbers: [u8; PICK_COUNT],
}

impl Draw {
    pub fn new(round: Option<u32>, numbers: [u8; PICK_COUNT]) -> Result<Self> {
        validate_numbers(&numbers)?;
        Ok(Draw { round, numbers })
    }

    pub fn sorted_numbers(&self) -> [u8; PICK_COUNT] {
        let mut numbers = self.numbers;
        numbers.sort_unstable();
        numbers
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
}

/// A user row before insertion; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
}

pub fn validate_numbers(numbers: &[u8; PICK_COUNT]) -> Result<()> {
    for &n in numbers {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
            bail!("Number {} out of range ({}-{})", n, MIN_NUMBER, MAX_NUMBER);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Duplicate number: {}", numbers[i]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_numbers_ok() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 6]).is_ok());
        assert!(validate_numbers(&[45, 44, 43, 42, 41, 40]).is_ok());
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        assert!(validate_numbers(&[0, 2, 3, 4, 5, 6]).is_err());
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 46]).is_err());
    }

    #[test]
    fn test_validate_numbers_duplicate() {
        assert!(validate_numbers(&[7, 7, 3, 4, 5, 6]).is_err());
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 1]).is_err());
    }

    #[test]
    fn test_draw_new_rejects_invalid() {
        assert!(Draw::new(Some(1), [1, 2, 3, 4, 5, 50]).is_err());
        let draw = Draw::new(Some(1137), [3, 15, 27, 38, 44, 9]).unwrap();
        assert_eq!(draw.round, Some(1137));
    }

    #[test]
    fn test_sorted_numbers() {
        let draw = Draw::new(None, [44, 3, 27, 15, 38, 9]).unwrap();
        assert_eq!(draw.sorted_numbers(), [3, 9, 15, 27, 38, 44]);
        assert_eq!(draw.numbers, [44, 3, 27, 15, 38, 9]);
    }
}
