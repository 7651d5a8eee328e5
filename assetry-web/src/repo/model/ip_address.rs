use chrono::Local;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ip_address")]
#[serde(default)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub address: String,
    pub number: i64,
    pub hostname: Option<String>,
    pub snmp_name: String,
    pub snmp_community: Option<String>,
    pub snmp_version: Option<String>,
    pub asset_id: Option<String>,
    pub http_family: Option<String>,
    pub is_management: bool,
    pub dns_info: String,
    pub last_puppet: Option<chrono::DateTime<Local>>,
    pub network_id: Option<String>,
    pub dead_ping_count: i32,
    pub is_buried: bool,
    pub is_public: bool,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: chrono::DateTime<Local>,
    pub updated_at: chrono::DateTime<Local>,
    pub deleted: i8,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
