use chrono::Local;
use crate::common::AssetType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "licence")]
#[serde(default)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub manufacturer_id: Option<String>,
    pub licence_type_id: String,
    pub software_category_id: String,
    pub number_bought: i32,
    #[sea_orm(unique)]
    pub niw: String,
    pub sn: Option<String>,
    pub asset_type: AssetType,
    pub provider: Option<String>,
    pub price: Decimal,
    pub invoice_no: Option<String>,
    pub invoice_date: Option<Date>,
    pub order_no: Option<String>,
    pub valid_thru: Option<Date>,
    pub budget_info_id: Option<String>,
    pub property_of_id: Option<String>,
    pub parent_id: Option<String>,
    pub remarks: String,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: chrono::DateTime<Local>,
    pub updated_at: chrono::DateTime<Local>,
    pub deleted: i8,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
