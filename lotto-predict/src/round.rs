use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::{RoundConfig, RoundMode};

/// Works out which weekly draw round is current.
#[derive(Debug, Clone, Default)]
pub struct RoundCalculator {
    config: RoundConfig,
}

impl RoundCalculator {
    pub fn new(config: RoundConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Current round at `now`. `last_recorded` is the round of the newest
    /// history record, when the store carries round identifiers.
    pub fn current_round(&self, now: NaiveDateTime, last_recorded: Option<u32>) -> u32 {
        match (self.config.mode, last_recorded) {
            (RoundMode::Data, Some(last)) => self.data_round(last, now),
            (RoundMode::Data, None) => {
                log::warn!("History has no round identifiers, using the fixed anchor");
                self.fixed_round(now.date())
            }
            (RoundMode::Fixed, _) => self.fixed_round(now.date()),
        }
    }

    pub fn current_round_now(&self, last_recorded: Option<u32>) -> u32 {
        self.current_round(chrono::Local::now().naive_local(), last_recorded)
    }

    /// base_round + whole weeks since base_date, never below 1.
    pub fn fixed_round(&self, today: NaiveDate) -> u32 {
        let days = (today - self.config.base_date).num_days();
        let round = self.config.base_round as i64 + days.div_euclid(7);
        round.clamp(1, u32::MAX as i64) as u32
    }

    /// `last` until the upcoming draw cutoff, `last + 1` from the cutoff on.
    pub fn data_round(&self, last: u32, now: NaiveDateTime) -> u32 {
        if now >= self.upcoming_cutoff(now) {
            last.saturating_add(1)
        } else {
            last
        }
    }

    /// Draw instant on the next draw weekday on or after `now`'s date.
    pub fn upcoming_cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date();
        let target = self.config.draw_weekday.num_days_from_monday() as u64;
        let current = today.weekday().num_days_from_monday() as u64;
        let ahead = (7 + target - current) % 7;
        let draw_day = today + Days::new(ahead);
        let draw_time = NaiveTime::from_hms_opt(self.config.draw_hour.min(23), 0, 0).unwrap_or_default();
        draw_day.and_time(draw_time)
    }
}
