use serde::{Deserialize, Serialize};

/// Awarded once for a day on which every habit in the log is done.
pub const DAILY_COMPLETION_BONUS: i64 = 10;
pub const WEEKLY_BONUS: i64 = 100;
pub const MONTHLY_BONUS: i64 = 500;
pub const WEEKLY_INTERVAL_DAYS: u32 = 7;
pub const MONTHLY_INTERVAL_DAYS: u32 = 30;
/// One-shot bonus for finishing the 3-day recovery protocol.
pub const RESET_PROTOCOL_BONUS: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub habit_key: String,
    pub points: i64,
}

/// Static habit-to-points table. Lookups for unknown keys score zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    rules: Vec<ScoringRule>,
}

impl ScoringRules {
    pub fn new(rules: Vec<ScoringRule>) -> Self {
        Self { rules }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(key, points)| ScoringRule {
                    habit_key: key.to_string(),
                    points,
                })
                .collect(),
        )
    }

    pub fn points_for(&self, habit_key: &str) -> i64 {
        self.rules
            .iter()
            .find(|rule| rule.habit_key == habit_key)
            .map(|rule| rule.points)
            .unwrap_or(0)
    }

    /// Habit keys in table order, used to seed a fresh day's log.
    pub fn habit_keys(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.habit_key.as_str())
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::from_pairs([
            ("water_target", 10),
            ("movement_done", 15),
            ("no_sugar_bread", 15),
            ("healthy_lunch", 10),
            ("last_meal_before_6", 10),
            ("supplements_taken", 5),
            ("ate_breakfast", 5),
        ])
    }
}
