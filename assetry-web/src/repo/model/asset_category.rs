use chrono::Local;
use crate::common::AssetCategoryType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_category")]
#[serde(default)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub name: String,
    pub category_type: AssetCategoryType,
    pub code: String,
    pub is_blade: bool,
    pub parent_id: Option<String>,
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
    /// `(<type>) <name>`, indented with `|-- ` for child categories.
    pub fn label(&self) -> String {
        let label = format!("({}) {}", self.category_type.desc(), self.name);
        match self.parent_id {
            Some(_) => format!("|-- {label}"),
            None => label,
        }
    }
}
