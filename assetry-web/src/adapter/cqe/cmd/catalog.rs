use crate::common::{AssetCategoryType, AssetType, ModelLayout};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Save command of the dictionaries that only carry a unique name.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NamedSaveCmd {
    pub id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "name length must in [1~100]"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategorySaveCmd {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub slug: Option<String>,
    pub category_type: AssetCategoryType,
    #[validate(length(max = 4, message = "Ensure this value has at most 4 characters."))]
    pub code: Option<String>,
    #[serde(default)]
    pub is_blade: bool,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssetModelSaveCmd {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub manufacturer_id: Option<String>,
    pub category_id: Option<String>,
    #[validate(range(min = 0, message = "power consumption must not be negative"))]
    pub power_consumption: Option<i32>,
    pub height_of_device: Option<Decimal>,
    pub cores_count: Option<i32>,
    pub visualization_layout_front: Option<ModelLayout>,
    pub visualization_layout_back: Option<ModelLayout>,
    pub asset_type: Option<AssetType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSaveCmd {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(equal = 2, message = "country must be an ISO 3166-1 alpha-2 code"))]
    pub country: Option<String>,
}
