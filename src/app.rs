use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/points", get(handlers::get_points))
        .route("/api/logs", put(handlers::put_log))
        .route("/api/logs/:date", get(handlers::get_log))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/rewards", get(handlers::list_rewards))
        .route("/api/rewards/:id/redeem", post(handlers::redeem_reward))
        .route("/api/redeem", post(handlers::redeem))
        .route("/api/reset", get(handlers::get_reset))
        .route("/api/reset/start", post(handlers::start_reset))
        .route("/api/reset/complete", post(handlers::complete_reset))
        .with_state(state)
}
