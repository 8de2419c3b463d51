use crate::models::{LogBook, date_key};
use crate::scoring::ScoringRules;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

const WEEK_COUNT: usize = 8;

#[derive(Debug, Serialize, Deserialize)]
pub struct DailyPoints {
    pub date: String,
    pub habits_done: usize,
    pub points: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyPoints {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub days_logged: u8,
    pub points: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub last_7_days: Vec<DailyPoints>,
    pub weekly_points: Vec<WeeklyPoints>,
    pub committed_days_this_month: usize,
}

pub fn build_progress(logs: &LogBook, rules: &ScoringRules) -> ProgressResponse {
    build_progress_at(Local::now().date_naive(), logs, rules)
}

/// Per-day scores exclude streak bonuses; those belong to the ledger pass.
pub fn build_progress_at(
    today: NaiveDate,
    logs: &LogBook,
    rules: &ScoringRules,
) -> ProgressResponse {
    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let (habits_done, points) = logs
            .get(date)
            .map(|log| (log.habits_done(), log.points(rules)))
            .unwrap_or_default();
        last_7_days.push(DailyPoints {
            date: date_key(date),
            habits_done,
            points,
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_points = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut points = 0i64;
        let mut days_logged = 0u8;
        for day_offset in 0..7 {
            if let Some(log) = logs.get(start + Duration::days(day_offset)) {
                points += log.points(rules);
                days_logged += 1;
            }
        }

        weekly_points.push(WeeklyPoints {
            week: week_label(start),
            start_date: date_key(start),
            end_date: date_key(end),
            days_logged,
            points,
        });
    }

    let committed_days_this_month = logs
        .as_slice()
        .iter()
        .filter_map(|log| log.calendar_date().ok())
        .filter(|date| date.year() == today.year() && date.month() == today.month())
        .count();

    ProgressResponse {
        last_7_days,
        weekly_points,
        committed_days_this_month,
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
