//! config

mod alias;

pub use alias::*;

use std::collections::HashMap;
use std::path::Path;

use crate::common::{AssetStatus, AssetType};
use crate::config::Db::Sqlite;
use crate::error::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(rename = "db")]
    pub db_config: Db,
    #[serde(rename = "tracing")]
    pub tracing: Option<TracingConfig>,
    #[serde(default)]
    pub inventory: InventoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub enum Db {
    #[serde(rename = "mysql")]
    Mysql(MysqlConfig),
    #[serde(rename = "sqlite")]
    Sqlite(SqliteConfig),
}

impl Default for Db {
    fn default() -> Self {
        Sqlite(SqliteConfig {
            path: "assetry.sqlite".to_string(),
        })
    }
}

impl Db {
    pub fn connect_url(&self) -> String {
        match self {
            Db::Mysql(c) => c.connect_url(),
            Db::Sqlite(c) => c.connect_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub addr: String,
    pub port: String,
    #[serde(default = "_default_attachment_path")]
    pub attachment_path: String,
}

fn _default_attachment_path() -> String {
    "attachments".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TracingConfig {
    pub filter: String,
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct MysqlConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl MysqlConfig {
    pub fn connect_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}/{}",
            self.username, self.password, self.host, self.database
        )
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SqliteConfig {
    pub path: String,
}

impl SqliteConfig {
    pub fn connect_url(&self) -> String {
        if self.path == ":memory:" {
            return "sqlite::memory:".to_string();
        }
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

/// `[inventory]` section: knobs of the asset bookkeeping rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryConfig {
    pub hostname_template: HostnameTemplate,
    pub auto_assign_hostname: bool,
    pub default_deprecation_rate: Decimal,
    /// asset type (`data_center`, `back_office`) -> allowed status keys
    pub statuses: HashMap<String, Vec<String>>,
    pub mac_prefix_blacklist: Option<Vec<String>>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            hostname_template: HostnameTemplate::default(),
            auto_assign_hostname: false,
            default_deprecation_rate: Decimal::from(25),
            statuses: HashMap::new(),
            mac_prefix_blacklist: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostnameTemplate {
    pub prefix: String,
    pub postfix: String,
    pub counter_length: usize,
}

impl Default for HostnameTemplate {
    fn default() -> Self {
        Self {
            prefix: "{{ country_code }}{{ code }}".to_string(),
            postfix: String::new(),
            counter_length: 5,
        }
    }
}

impl InventoryConfig {
    /// Statuses selectable for the asset type; every status when the type
    /// is not customized.
    pub fn allowed_statuses(&self, asset_type: AssetType) -> Vec<AssetStatus> {
        match self.statuses.get(asset_type.mode_key()) {
            None => AssetStatus::all(),
            Some(keys) => keys.iter().filter_map(|k| AssetStatus::from_key(k)).collect(),
        }
    }

    pub fn check(&self) -> Result<(), AppError> {
        for (asset_type, keys) in &self.statuses {
            for key in keys {
                if AssetStatus::from_key(key).is_none() {
                    return Err(AppError::Message(format!(
                        "No such choice {key:?} in AssetStatus for {asset_type} - check config"
                    )));
                }
            }
        }
        if self.default_deprecation_rate.is_sign_negative() {
            return Err(AppError::message("defaultDeprecationRate must not be negative"));
        }
        Ok(())
    }
}

// parse config
pub async fn parse_config(path: &Path) -> Result<AppConfig, AppError> {
    tracing::debug!("parse config from path: {:}", path.display());
    let data = tokio::fs::read_to_string(path).await?;
    let config: AppConfig = toml::from_str(&data)?;
    config.inventory.check()?;
    info!("config:{:?}", config);
    // build global config
    let mut init_config = SHARED_APP_CONFIG.write().await;
    *init_config = config.clone();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[server]
addr = "127.0.0.1"
port = "8080"
attachmentPath = "/var/lib/assetry"

[db.sqlite]
path = ":memory:"

[tracing]
filter = "assetry_web=debug"

[inventory]
autoAssignHostname = true
defaultDeprecationRate = 50

[inventory.hostnameTemplate]
prefix = "{{ country_code }}{{ code }}"
postfix = "-x"
counterLength = 4

[inventory.statuses]
data_center = ["new", "in_progress", "used"]
"#;

    #[test]
    fn parse_full_config() {
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.server.url(), "127.0.0.1:8080");
        assert_eq!(config.server.attachment_path, "/var/lib/assetry");
        assert_eq!(config.db_config.connect_url(), "sqlite::memory:");
        assert!(config.inventory.auto_assign_hostname);
        assert_eq!(config.inventory.default_deprecation_rate, Decimal::from(50));
        assert_eq!(config.inventory.hostname_template.counter_length, 4);
        assert!(config.inventory.check().is_ok());
        assert_eq!(
            config.inventory.allowed_statuses(AssetType::DataCenter),
            vec![AssetStatus::New, AssetStatus::InProgress, AssetStatus::Used]
        );
        assert_eq!(
            config.inventory.allowed_statuses(AssetType::BackOffice).len(),
            AssetStatus::all().len()
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut inventory = InventoryConfig::default();
        inventory
            .statuses
            .insert("back_office".to_string(), vec!["lost".to_string()]);
        assert!(inventory.check().is_err());
    }
}
