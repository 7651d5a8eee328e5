use chrono::Local;
use crate::common::{ComponentKind, EthernetSpeed};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "component")]
#[serde(default)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: ComponentKind,
    pub asset_id: String,
    pub model_id: Option<String>,
    pub label: String,
    pub sn: Option<String>,
    pub speed: i32,
    pub cores: i32,
    pub size: i64,
    pub index: Option<i32>,
    pub mount_point: Option<String>,
    pub physical_id: Option<String>,
    #[sea_orm(unique)]
    pub mac: Option<String>,
    pub ethernet_speed: EthernetSpeed,
    pub path: Option<String>,
    pub version: String,
    pub memory: i64,
    pub storage: i64,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: chrono::DateTime<Local>,
    pub updated_at: chrono::DateTime<Local>,
    pub deleted: i8,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
