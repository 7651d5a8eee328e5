use crate::common::PageQuery;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkListQuery {
    #[serde(default)]
    pub page_query: PageQuery,
    pub name: Option<String>,
    pub address: Option<String>,
    pub data_center_id: Option<String>,
    pub environment_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAddressListQuery {
    #[serde(default)]
    pub page_query: PageQuery,
    pub address: Option<String>,
    pub hostname: Option<String>,
    pub asset_id: Option<String>,
    pub network_id: Option<String>,
}
