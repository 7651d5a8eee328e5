use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSaveCmd {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    pub gateway: Option<String>,
    #[validate(range(min = 0, message = "reserved must not be negative"))]
    pub reserved: Option<i32>,
    #[validate(range(min = 0, message = "reserved top margin must not be negative"))]
    pub reserved_top_margin: Option<i32>,
    pub remarks: Option<String>,
    pub vlan: Option<i32>,
    pub data_center_id: Option<String>,
    pub environment_id: Option<String>,
    pub kind_id: Option<String>,
    pub ignore_addresses: Option<bool>,
    pub dhcp_broadcast: Option<bool>,
    pub dhcp_config: Option<String>,
    pub terminators: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSaveCmd {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub data_center_id: Option<String>,
    pub queue_id: Option<String>,
    pub hosts_naming_template: String,
    pub next_server: Option<String>,
    pub domain: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IpAddressSaveCmd {
    pub id: Option<String>,
    #[validate(length(min = 7, max = 15, message = "Enter a valid IPv4 address."))]
    pub address: String,
    pub hostname: Option<String>,
    pub snmp_name: Option<String>,
    pub snmp_community: Option<String>,
    pub snmp_version: Option<String>,
    pub asset_id: Option<String>,
    pub http_family: Option<String>,
    #[serde(default)]
    pub is_management: bool,
    pub dns_info: Option<String>,
    #[serde(default)]
    pub is_buried: bool,
    /// reassigning the address to another asset is allowed
    #[serde(default)]
    pub allow_device_change: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NetworkCopyCmd {
    #[validate(length(min = 1, message = "select one or more networks"))]
    pub ids: Vec<String>,
}
