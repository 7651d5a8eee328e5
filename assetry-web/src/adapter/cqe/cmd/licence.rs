use crate::common::AssetType;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LicenceSaveCmd {
    pub id: Option<String>,
    pub manufacturer_id: Option<String>,
    #[validate(length(min = 1, message = "licence type is required"))]
    pub licence_type_id: String,
    #[validate(length(min = 1, message = "software category is required"))]
    pub software_category_id: String,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub number_bought: i32,
    #[validate(length(min = 1, message = "niw is required"))]
    pub niw: String,
    pub sn: Option<String>,
    pub asset_type: Option<AssetType>,
    pub provider: Option<String>,
    pub price: Option<Decimal>,
    pub invoice_no: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub order_no: Option<String>,
    pub valid_thru: Option<NaiveDate>,
    pub budget_info_id: Option<String>,
    pub property_of_id: Option<String>,
    pub parent_id: Option<String>,
    pub remarks: Option<String>,
}
