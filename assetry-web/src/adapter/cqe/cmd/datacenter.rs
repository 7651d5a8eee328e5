use crate::common::RackOrientation;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DataCenterSaveCmd {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub visualization_cols_num: Option<i32>,
    pub visualization_rows_num: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RackSaveCmd {
    pub id: Option<String>,
    #[validate(length(min = 1, max = 75, message = "name length must in [1~75]"))]
    pub name: String,
    #[validate(length(min = 1, message = "data center is required"))]
    pub data_center_id: String,
    pub server_room_id: Option<String>,
    pub description: Option<String>,
    pub orientation: Option<RackOrientation>,
    #[validate(range(min = 1, message = "Please specify value greater than zero."))]
    pub max_u_height: Option<i32>,
    pub visualization_col: Option<i32>,
    pub visualization_row: Option<i32>,
}
