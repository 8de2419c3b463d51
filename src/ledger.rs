//! Points ledger: derives lifetime points, the spendable balance and the live
//! streak from the full collection of day logs.
//!
//! Every call is a pure pass over its inputs. The host owns the previous
//! snapshot and persists whatever comes back.

use crate::models::{DailyLog, PointsSnapshot};
use crate::scoring::{
    MONTHLY_BONUS, MONTHLY_INTERVAL_DAYS, RESET_PROTOCOL_BONUS, ScoringRules, WEEKLY_BONUS,
    WEEKLY_INTERVAL_DAYS,
};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    pub success: bool,
    pub snapshot: PointsSnapshot,
}

pub fn recompute_now(
    logs: &[DailyLog],
    rules: &ScoringRules,
    previous: &PointsSnapshot,
) -> PointsSnapshot {
    recompute(logs, rules, previous, Local::now().date_naive())
}

/// Rebuilds the snapshot from scratch. Amounts already spent (the gap between
/// the previous lifetime and spendable balances) carry over unchanged.
///
/// Logs with an unparsable date are skipped with a warning.
pub fn recompute(
    logs: &[DailyLog],
    rules: &ScoringRules,
    previous: &PointsSnapshot,
    today: NaiveDate,
) -> PointsSnapshot {
    let mut dated: Vec<(NaiveDate, &DailyLog)> = logs
        .iter()
        .filter_map(|log| match log.calendar_date() {
            Ok(date) => Some((date, log)),
            Err(err) => {
                warn!("skipping log during recompute: {err}");
                None
            }
        })
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let mut lifetime_points = 0i64;
    let mut streak = 0u32;
    let mut last_date: Option<NaiveDate> = None;
    // Keyed by (year, milestone index); local to this pass only.
    let mut weekly_granted: HashSet<(i32, u32)> = HashSet::new();
    let mut monthly_granted: HashSet<(i32, u32)> = HashSet::new();

    for (date, log) in dated {
        lifetime_points += log.points(rules);

        streak = advance_streak(streak, last_date, date);
        last_date = Some(date);
        debug_assert!(streak >= 1, "a processed log always counts toward the streak");

        if streak % WEEKLY_INTERVAL_DAYS == 0
            && weekly_granted.insert((date.year(), streak / WEEKLY_INTERVAL_DAYS))
        {
            debug!(%date, streak, "weekly streak bonus");
            lifetime_points += WEEKLY_BONUS;
        }

        if streak % MONTHLY_INTERVAL_DAYS == 0
            && monthly_granted.insert((date.year(), streak / MONTHLY_INTERVAL_DAYS))
        {
            debug!(%date, streak, "monthly streak bonus");
            lifetime_points += MONTHLY_BONUS;
        }
    }

    let streak_days = match last_date {
        Some(last) if (today - last).num_days() <= 1 => streak,
        _ => 0,
    };

    let spent = previous.total_redeemed();
    debug_assert!(spent >= 0, "spendable balance exceeds lifetime points");

    PointsSnapshot {
        lifetime_points,
        spendable_points: lifetime_points - spent,
        streak_days,
    }
}

fn advance_streak(streak: u32, last_date: Option<NaiveDate>, date: NaiveDate) -> u32 {
    let Some(previous) = last_date else {
        return 1;
    };

    match (date - previous).num_days() {
        1 => streak + 1,
        gap if gap > 1 => 1,
        // same day again
        _ => streak,
    }
}

/// Deducts `cost` from the spendable balance when it is covered. Lifetime
/// points and streak are left alone; an uncovered cost leaves the snapshot
/// untouched.
///
/// A negative cost is also refused. The plain sufficiency check would accept
/// it and credit the balance, so this guard is stricter than that check.
pub fn redeem(snapshot: &PointsSnapshot, cost: i64) -> Redemption {
    if cost < 0 || cost > snapshot.spendable_points {
        return Redemption {
            success: false,
            snapshot: *snapshot,
        };
    }

    Redemption {
        success: true,
        snapshot: PointsSnapshot {
            spendable_points: snapshot.spendable_points - cost,
            ..*snapshot
        },
    }
}

pub fn apply_reset_bonus(snapshot: &PointsSnapshot) -> PointsSnapshot {
    PointsSnapshot {
        lifetime_points: snapshot.lifetime_points + RESET_PROTOCOL_BONUS,
        spendable_points: snapshot.spendable_points + RESET_PROTOCOL_BONUS,
        ..*snapshot
    }
}
