use crate::common::{AssetStatus, AssetType};
use crate::repo::model::asset;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stored asset plus the figures derived from it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetVO {
    #[serde(flatten)]
    pub asset: asset::Model,
    pub deprecation_date: Option<NaiveDate>,
    pub deprecated: bool,
    pub liquidated: bool,
    pub visualization_url: Option<String>,
    pub licences: Vec<String>,
    pub supports: Vec<String>,
}

impl AssetVO {
    pub fn new(asset: asset::Model, liquidated_at: Option<NaiveDate>, licences: Vec<String>, supports: Vec<String>) -> Self {
        let today = Local::now().date_naive();
        Self {
            deprecation_date: asset.deprecation_date(),
            deprecated: asset.is_deprecated(today),
            liquidated: asset.is_liquidated(liquidated_at, today),
            visualization_url: asset.visualization_url(),
            asset,
            licences,
            supports,
        }
    }
}

#[derive(Clone, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetListItemVO {
    pub id: String,
    pub model_id: String,
    pub asset_type: AssetType,
    pub status: AssetStatus,
    pub sn: Option<String>,
    pub barcode: Option<String>,
    pub hostname: Option<String>,
    pub niw: Option<String>,
    pub price: Decimal,
    pub invoice_date: Option<NaiveDate>,
    pub warehouse_id: String,
    pub rack_id: Option<String>,
    pub position: Option<i32>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: chrono::DateTime<Local>,
    pub updated_at: chrono::DateTime<Local>,
}
