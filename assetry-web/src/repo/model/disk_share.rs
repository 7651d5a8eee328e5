use chrono::Local;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "disk_share")]
#[serde(default)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub asset_id: Option<String>,
    pub model_id: Option<String>,
    pub share_id: Option<i32>,
    pub label: String,
    pub size: Option<i64>,
    pub snapshot_size: Option<i64>,
    #[sea_orm(unique)]
    pub wwn: String,
    pub full: bool,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: chrono::DateTime<Local>,
    pub updated_at: chrono::DateTime<Local>,
    pub deleted: i8,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn total_size(&self) -> i64 {
        self.size.unwrap_or(0) + self.snapshot_size.unwrap_or(0)
    }
}
