use crate::errors::AppError;
use crate::models::AppData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> PathBuf {
    match env::var("APP_DATA_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("data/state.json"),
    }
}

pub fn resolve_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080)
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyLog;
    use crate::scoring::ScoringRules;
    use chrono::NaiveDate;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = env::temp_dir();
        path.push(format!("habit_ledger_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let data = load_data(&temp_path("missing")).await;
        assert!(data.logs.is_empty());
        assert_eq!(data.points.lifetime_points, 0);
    }

    #[tokio::test]
    async fn persisted_data_loads_back() {
        let path = temp_path("roundtrip");
        let mut data = AppData::default();
        let date = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        data.logs.upsert(DailyLog::blank(date, &ScoringRules::default()));
        data.points.lifetime_points = 55;
        data.points.spendable_points = 30;

        persist_data(&path, &data).await.expect("persist");
        let loaded = load_data(&path).await;
        let _ = fs::remove_file(&path).await;

        assert_eq!(loaded.logs, data.logs);
        assert_eq!(loaded.points, data.points);
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{not json").await.expect("write");
        let data = load_data(&path).await;
        let _ = fs::remove_file(&path).await;
        assert!(data.logs.is_empty());
    }
}
