use crate::common::{AssetPurpose, AssetSource, AssetStatus, OfficeLicenceType, Orientation};
use crate::service::device::SplitRow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Asset fields accepted from the edit form; absent fields keep the stored
/// value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssetSaveCmd {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "model is required"))]
    pub model_id: Option<String>,
    pub status: Option<AssetStatus>,
    pub source: Option<AssetSource>,
    pub invoice_no: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub order_no: Option<String>,
    pub purchase_order: Option<String>,
    pub sn: Option<String>,
    pub barcode: Option<String>,
    pub price: Option<Decimal>,
    pub support_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Please specify value greater than zero."))]
    pub support_period: Option<i32>,
    pub support_type: Option<String>,
    pub support_void_reporting: Option<bool>,
    pub provider: Option<String>,
    pub remarks: Option<String>,
    pub niw: Option<String>,
    pub warehouse_id: Option<String>,
    pub location: Option<String>,
    pub request_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub production_use_date: Option<NaiveDate>,
    pub provider_order_date: Option<NaiveDate>,
    pub deprecation_rate: Option<Decimal>,
    pub force_deprecation: Option<bool>,
    pub deprecation_end_date: Option<NaiveDate>,
    pub production_year: Option<i32>,
    pub slots: Option<Decimal>,
    pub task_url: Option<String>,
    pub property_of_id: Option<String>,
    pub owner_id: Option<String>,
    pub user_id: Option<String>,
    pub loan_end_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub budget_info_id: Option<String>,
    #[validate(length(max = 16, message = "Ensure this value has at most 16 characters."))]
    pub hostname: Option<String>,
    pub required_support: Option<bool>,
    pub service_id: Option<String>,
    pub device_environment_id: Option<String>,
    pub data_center_id: Option<String>,
    pub server_room_id: Option<String>,
    pub rack_id: Option<String>,
    pub u_level: Option<String>,
    pub u_height: Option<String>,
    pub slot_no: Option<String>,
    pub position: Option<i32>,
    pub orientation: Option<Orientation>,
    pub parent_id: Option<String>,
    pub licence_key: Option<String>,
    pub coa_number: Option<String>,
    pub coa_oem_os_id: Option<String>,
    pub imei: Option<String>,
    pub purpose: Option<AssetPurpose>,
    pub version: Option<String>,
    pub unit_price: Option<Decimal>,
    pub office_licence_type: Option<OfficeLicenceType>,
    pub date_of_last_inventory: Option<NaiveDate>,
    pub last_logged_user: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddDeviceCmd {
    #[serde(flatten)]
    #[validate(nested)]
    pub asset: AssetSaveCmd,
    /// serial numbers separated by commas or new lines
    pub sn_list: String,
    #[serde(default)]
    pub barcode_list: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditDeviceCmd {
    #[serde(flatten)]
    #[validate(nested)]
    pub asset: AssetSaveCmd,
    #[serde(default)]
    pub licences: Vec<String>,
    #[serde(default)]
    pub supports: Vec<String>,
    pub transition_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MovePartsCmd {
    #[validate(length(min = 1, message = "new asset is required"))]
    pub new_asset: String,
    #[serde(default)]
    pub part_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SplitDeviceCmd {
    pub rows: Vec<SplitRow>,
}
