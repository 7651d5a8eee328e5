use serde::{Deserialize, Serialize};

pub mod asset;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BaseKV {
    pub key: String,
    pub value: String,
}
