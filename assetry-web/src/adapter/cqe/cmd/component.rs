use crate::common::ComponentType;
use crate::service::component::ComponentModelSpec;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComponentModelCreateCmd {
    pub component_type: ComponentType,
    #[serde(flatten)]
    pub spec: ComponentModelSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareCreateCmd {
    #[validate(length(min = 1, message = "asset is required"))]
    pub asset_id: String,
    #[validate(length(min = 1, message = "path is required"))]
    pub path: String,
    #[validate(length(min = 1, message = "model name is required"))]
    pub model_name: String,
    pub label: Option<String>,
    pub sn: Option<String>,
    pub family: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OperatingSystemCreateCmd {
    #[validate(length(min = 1, message = "asset is required"))]
    pub asset_id: String,
    #[validate(length(min = 1, message = "os name is required"))]
    pub os_name: String,
    #[serde(default)]
    pub version: String,
    pub memory: Option<i64>,
    pub storage: Option<i64>,
    pub cores_count: Option<i32>,
    pub family: Option<String>,
}
