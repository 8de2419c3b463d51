use crate::models::AppData;
use crate::rewards::{Reward, default_catalog};
use crate::scoring::ScoringRules;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub rules: Arc<ScoringRules>,
    pub rewards: Arc<Vec<Reward>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            rules: Arc::new(ScoringRules::default()),
            rewards: Arc::new(default_catalog()),
        }
    }
}
