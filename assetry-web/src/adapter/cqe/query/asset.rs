use crate::common::{AssetStatus, AssetType, PageQuery};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetListQuery {
    #[serde(default)]
    pub page_query: PageQuery,
    pub sn: Option<String>,
    pub barcode: Option<String>,
    pub hostname: Option<String>,
    pub niw: Option<String>,
    pub status: Option<AssetStatus>,
    pub asset_type: Option<AssetType>,
    pub model_id: Option<String>,
    pub rack_id: Option<String>,
    pub warehouse_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenceListQuery {
    #[serde(default)]
    pub page_query: PageQuery,
    pub niw: Option<String>,
    pub sn: Option<String>,
    pub asset_type: Option<AssetType>,
}
