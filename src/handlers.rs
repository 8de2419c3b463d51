use crate::errors::AppError;
use crate::ledger::{apply_reset_bonus, recompute_now, redeem as redeem_points};
use crate::models::{
    DailyLog, PointsSnapshot, RedeemRequest, RedeemResponse, ResetResponse, date_key,
    parse_date,
};
use crate::progress::{ProgressResponse, build_progress};
use crate::reset::{ResetOutcome, ResetProtocol};
use crate::rewards::{Reward, find_reward};
use crate::state::AppState;
use crate::storage::persist_data;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;
use tracing::info;

pub async fn get_points(State(state): State<AppState>) -> Json<PointsSnapshot> {
    let data = state.data.lock().await;
    Json(data.points)
}

pub async fn get_log(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DailyLog>, AppError> {
    let date = parse_date(&date)?;
    let data = state.data.lock().await;
    Ok(Json(data.logs.log_for_date(date, &state.rules)))
}

pub async fn put_log(
    State(state): State<AppState>,
    Json(mut log): Json<DailyLog>,
) -> Result<Json<PointsSnapshot>, AppError> {
    let date = log.calendar_date()?;
    log.date = date_key(date);

    let mut data = state.data.lock().await;
    data.logs.upsert(log);
    let points = recompute_now(data.logs.as_slice(), &state.rules, &data.points);
    data.points = points;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(data.points))
}

pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressResponse> {
    let data = state.data.lock().await;
    Json(build_progress(&data.logs, &state.rules))
}

pub async fn list_rewards(State(state): State<AppState>) -> Json<Vec<Reward>> {
    Json(state.rewards.as_ref().clone())
}

pub async fn redeem(
    State(state): State<AppState>,
    Json(payload): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>, AppError> {
    if payload.cost < 0 {
        return Err(AppError::bad_request("cost must not be negative"));
    }

    let response = apply_redemption(&state, payload.cost).await?;
    Ok(Json(response))
}

pub async fn redeem_reward(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<RedeemResponse>, AppError> {
    let cost = find_reward(&state.rewards, id)
        .map(|reward| reward.cost)
        .ok_or_else(|| AppError::not_found(format!("no reward with id {id}")))?;

    let response = apply_redemption(&state, cost).await?;
    Ok(Json(response))
}

pub async fn get_reset(State(state): State<AppState>) -> Json<ResetProtocol> {
    let data = state.data.lock().await;
    Json(data.reset_protocol.clone())
}

pub async fn start_reset(State(state): State<AppState>) -> Result<Json<ResetProtocol>, AppError> {
    let mut data = state.data.lock().await;
    data.reset_protocol.start(Local::now().date_naive());
    persist_data(&state.data_path, &data).await?;

    info!("recovery protocol started");
    Ok(Json(data.reset_protocol.clone()))
}

pub async fn complete_reset(
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>, AppError> {
    let mut data = state.data.lock().await;
    let outcome = data.reset_protocol.complete_day();
    match outcome {
        ResetOutcome::NotActive => {
            return Err(AppError::bad_request("recovery protocol is not active"));
        }
        ResetOutcome::Advanced(day) => info!(day, "recovery protocol advanced"),
        ResetOutcome::Completed => {
            let points = apply_reset_bonus(&data.points);
            data.points = points;
            info!(lifetime = data.points.lifetime_points, "recovery protocol completed");
        }
    }
    persist_data(&state.data_path, &data).await?;

    Ok(Json(ResetResponse {
        outcome,
        protocol: data.reset_protocol.clone(),
        points: data.points,
    }))
}

// Check and deduction share one lock acquisition.
async fn apply_redemption(state: &AppState, cost: i64) -> Result<RedeemResponse, AppError> {
    let mut data = state.data.lock().await;
    let outcome = redeem_points(&data.points, cost);
    if outcome.success {
        data.points = outcome.snapshot;
        persist_data(&state.data_path, &data).await?;
        info!(cost, spendable = data.points.spendable_points, "points redeemed");
    }

    Ok(RedeemResponse {
        success: outcome.success,
        points: data.points,
    })
}
