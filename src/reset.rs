use crate::models::date_key;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const RESET_PROTOCOL_DAYS: u32 = 3;

/// Progress through the 3-day recovery protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResetProtocol {
    pub is_active: bool,
    pub start_date: Option<String>,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "day")]
pub enum ResetOutcome {
    NotActive,
    Advanced(u32),
    /// The final day was finished; the caller owes the completion bonus.
    Completed,
}

impl ResetProtocol {
    pub fn start(&mut self, today: NaiveDate) {
        *self = Self {
            is_active: true,
            start_date: Some(date_key(today)),
            day: 1,
        };
    }

    pub fn complete_day(&mut self) -> ResetOutcome {
        if !self.is_active {
            return ResetOutcome::NotActive;
        }

        if self.day < RESET_PROTOCOL_DAYS {
            self.day += 1;
            return ResetOutcome::Advanced(self.day);
        }

        *self = Self::default();
        ResetOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_completions_finish_the_protocol() {
        let mut protocol = ResetProtocol::default();
        protocol.start(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        assert_eq!(protocol.start_date.as_deref(), Some("2026-02-10"));
        assert_eq!(protocol.day, 1);

        assert_eq!(protocol.complete_day(), ResetOutcome::Advanced(2));
        assert_eq!(protocol.complete_day(), ResetOutcome::Advanced(3));
        assert_eq!(protocol.complete_day(), ResetOutcome::Completed);
        assert_eq!(protocol, ResetProtocol::default());
    }

    #[test]
    fn inactive_protocol_ignores_completion() {
        let mut protocol = ResetProtocol::default();
        assert_eq!(protocol.complete_day(), ResetOutcome::NotActive);
        assert_eq!(protocol, ResetProtocol::default());
    }

    #[test]
    fn restart_begins_at_day_one() {
        let mut protocol = ResetProtocol::default();
        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        protocol.start(today);
        protocol.complete_day();
        protocol.start(today);
        assert_eq!(protocol.day, 1);
    }
}
