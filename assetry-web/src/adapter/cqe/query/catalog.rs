use crate::common::PageQuery;
use serde::{Deserialize, Serialize};

/// Paged search by name, shared by the dictionaries.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedListQuery {
    #[serde(default)]
    pub page_query: PageQuery,
    pub name: Option<String>,
}
