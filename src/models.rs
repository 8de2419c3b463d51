use crate::errors::LogError;
use crate::reset::ResetProtocol;
use crate::scoring::{DAILY_COMPLETION_BONUS, ScoringRules};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub key: String,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Walk,
    Exercise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MovementDetails {
    #[serde(rename = "type")]
    pub kind: Option<MovementKind>,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub steps: u32,
}

/// Everything recorded for one calendar day. `date` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: String,
    pub habits: Vec<HabitRecord>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub water_cups: u32,
    #[serde(default)]
    pub movement: Option<MovementDetails>,
}

impl DailyLog {
    /// A fresh log with every habit in `rules` undone.
    pub fn blank(date: NaiveDate, rules: &ScoringRules) -> Self {
        Self {
            date: date_key(date),
            habits: rules
                .habit_keys()
                .map(|key| HabitRecord {
                    key: key.to_string(),
                    done: false,
                })
                .collect(),
            notes: String::new(),
            water_cups: 0,
            movement: None,
        }
    }

    pub fn calendar_date(&self) -> Result<NaiveDate, LogError> {
        parse_date(&self.date)
    }

    pub fn all_done(&self) -> bool {
        self.habits.iter().all(|habit| habit.done)
    }

    pub fn habits_done(&self) -> usize {
        self.habits.iter().filter(|habit| habit.done).count()
    }

    /// Habit points for the day plus the completion bonus when nothing is left undone.
    pub fn points(&self, rules: &ScoringRules) -> i64 {
        let earned: i64 = self
            .habits
            .iter()
            .filter(|habit| habit.done)
            .map(|habit| rules.points_for(&habit.key))
            .sum();

        if self.all_done() {
            earned + DAILY_COMPLETION_BONUS
        } else {
            earned
        }
    }
}

/// The host's collection of day logs. Unordered; entries are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LogBook {
    logs: Vec<DailyLog>,
}

impl LogBook {
    pub fn new(logs: Vec<DailyLog>) -> Self {
        Self { logs }
    }

    pub fn as_slice(&self) -> &[DailyLog] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Matches on the parsed date, so `2026-3-1` and `2026-03-01` are the same day.
    pub fn get(&self, date: NaiveDate) -> Option<&DailyLog> {
        self.logs
            .iter()
            .find(|log| log.calendar_date().ok() == Some(date))
    }

    pub fn log_for_date(&self, date: NaiveDate, rules: &ScoringRules) -> DailyLog {
        self.get(date)
            .cloned()
            .unwrap_or_else(|| DailyLog::blank(date, rules))
    }

    /// Replaces the log for the same calendar day, else appends. A parsable
    /// date is stored under its canonical `YYYY-MM-DD` key.
    pub fn upsert(&mut self, mut log: DailyLog) {
        let existing = match log.calendar_date() {
            Ok(date) => {
                log.date = date_key(date);
                self.logs
                    .iter_mut()
                    .find(|existing| existing.calendar_date().ok() == Some(date))
            }
            Err(_) => self.logs.iter_mut().find(|existing| existing.date == log.date),
        };

        match existing {
            Some(existing) => *existing = log,
            None => self.logs.push(log),
        }
    }
}

/// Derived totals. Overwritten on every recompute, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PointsSnapshot {
    pub lifetime_points: i64,
    pub spendable_points: i64,
    pub streak_days: u32,
}

impl PointsSnapshot {
    /// Everything redeemed so far, implied by the gap between the two balances.
    pub fn total_redeemed(&self) -> i64 {
        self.lifetime_points - self.spendable_points
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub logs: LogBook,
    #[serde(default)]
    pub points: PointsSnapshot,
    #[serde(default)]
    pub reset_protocol: ResetProtocol,
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub cost: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RedeemResponse {
    pub success: bool,
    pub points: PointsSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub outcome: crate::reset::ResetOutcome,
    pub protocol: ResetProtocol,
    pub points: PointsSnapshot,
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, LogError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| LogError::InvalidDate {
        date: value.to_string(),
    })
}
