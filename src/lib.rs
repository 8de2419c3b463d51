pub mod app;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod progress;
pub mod reset;
pub mod rewards;
pub mod scoring;
pub mod state;
pub mod storage;

pub use app::router;
pub use ledger::{recompute, redeem, Redemption};
pub use models::{DailyLog, HabitRecord, PointsSnapshot};
pub use scoring::ScoringRules;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path, resolve_port};
