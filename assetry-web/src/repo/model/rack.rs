use chrono::Local;
use crate::common::RackOrientation;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rack")]
#[serde(default)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub data_center_id: String,
    pub server_room_id: Option<String>,
    pub description: String,
    pub orientation: RackOrientation,
    pub max_u_height: i32,
    pub visualization_col: i32,
    pub visualization_row: i32,
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
    pub fn new() -> Model {
        Model {
            max_u_height: 48,
            ..Default::default()
        }
    }

    /// `<name> - <server room>` or `<name> - <data center>`
    pub fn label(&self, server_room: Option<&str>, data_center: Option<&str>) -> String {
        match server_room.or(data_center) {
            Some(place) => format!("{} - {}", self.name, place),
            None => self.name.clone(),
        }
    }
}
