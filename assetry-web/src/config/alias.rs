//! runtime pram

use std::sync::Arc;
use std::time::Duration;

use super::AppConfig;
use crate::error::AppError;
use lazy_static::lazy_static;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::RwLock;

lazy_static! {
    pub static ref SHARED_APP_STATE: RwLock<AppState> = RwLock::new(AppState::default());
    pub static ref SHARED_APP_CONFIG: RwLock<AppConfig> = RwLock::new(AppConfig::default());
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub conn: DatabaseConnection,
    pub config: Arc<AppConfig>,
}

pub async fn connect(config: &AppConfig) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(config.db_config.connect_url());
    opt.connect_timeout(Duration::from_secs(8)).sqlx_logging(true);
    Database::connect(opt).await.map_err(|e| {
        tracing::error!("create db conn error: {:?}", e);
        AppError::Db(e)
    })
}

pub async fn init_shared_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    let conn = connect(config).await?;
    tracing::debug!("db conn initialized");
    let state = AppState {
        conn,
        config: Arc::new(config.clone()),
    };
    let mut sas = SHARED_APP_STATE.write().await;
    *sas = state.clone();
    tracing::debug!("app state initialized");
    Ok(state)
}
