use chrono::Local;
use crate::common::{AssetType, ModelLayout};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_model")]
#[serde(default)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub manufacturer_id: Option<String>,
    pub category_id: Option<String>,
    pub power_consumption: i32,
    pub height_of_device: Decimal,
    pub cores_count: i32,
    pub visualization_layout_front: ModelLayout,
    pub visualization_layout_back: ModelLayout,
    pub asset_type: Option<AssetType>,
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
    pub fn front_layout_class(&self) -> &'static str {
        self.visualization_layout_front.css_class()
    }

    pub fn back_layout_class(&self) -> &'static str {
        self.visualization_layout_back.css_class()
    }
}
