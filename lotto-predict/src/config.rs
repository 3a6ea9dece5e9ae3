use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW: usize = 60;
pub const DEFAULT_GAME_COUNT: usize = 5;
pub const DEFAULT_BASE_ROUND: u32 = 1137;
pub const DEFAULT_DRAW_HOUR: u32 = 21;

pub fn default_base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 21).unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of recent draws fed to the model.
    pub window: usize,
    /// Number of games produced per request.
    pub count: usize,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            count: DEFAULT_GAME_COUNT,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RoundMode {
    /// base_round + whole weeks elapsed since base_date
    Fixed,
    /// last recorded round, advanced once the weekly cutoff has passed
    #[default]
    Data,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    pub mode: RoundMode,
    pub base_round: u32,
    pub base_date: NaiveDate,
    pub draw_weekday: Weekday,
    pub draw_hour: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            mode: RoundMode::Data,
            base_round: DEFAULT_BASE_ROUND,
            base_date: default_base_date(),
            draw_weekday: Weekday::Sat,
            draw_hour: DEFAULT_DRAW_HOUR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_generator_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.window, 60);
        assert_eq!(config.count, 5);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_default_round_config() {
        let config = RoundConfig::default();
        assert_eq!(config.mode, RoundMode::Data);
        assert_eq!(config.base_round, 1137);
        assert_eq!(config.base_date, NaiveDate::from_ymd_opt(2024, 9, 21).unwrap());
        assert_eq!(config.draw_weekday, Weekday::Sat);
        assert_eq!(config.draw_hour, 21);
    }

    #[test]
    fn test_round_config_serde_roundtrip() {
        let config = RoundConfig {
            mode: RoundMode::Fixed,
            ..RoundConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"fixed\""));
        let restored: RoundConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.mode, RoundMode::Fixed);
        assert_eq!(restored.base_date, config.base_date);
    }
}
