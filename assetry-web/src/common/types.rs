use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, AsRefStr, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetType {
    #[default]
    #[sea_orm(string_value = "data_center")]
    DataCenter,
    #[sea_orm(string_value = "back_office")]
    BackOffice,
    #[sea_orm(string_value = "administration")]
    Administration,
    #[sea_orm(string_value = "other")]
    Other,
}

impl AssetType {
    /// url mode (`dc`, `back_office`) of the device views
    pub fn from_mode(mode: &str) -> Option<AssetType> {
        match mode {
            "dc" => Some(AssetType::DataCenter),
            "back_office" => Some(AssetType::BackOffice),
            _ => None,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            AssetType::DataCenter => "dc",
            _ => "back_office",
        }
    }

    pub fn mode_key(&self) -> &str {
        self.as_ref()
    }

    pub fn is_dc(&self) -> bool {
        *self == AssetType::DataCenter
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, AsRefStr, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetStatus {
    #[default]
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "waiting_for_release")]
    WaitingForRelease,
    #[sea_orm(string_value = "used")]
    Used,
    #[sea_orm(string_value = "loan")]
    Loan,
    #[sea_orm(string_value = "damaged")]
    Damaged,
    #[sea_orm(string_value = "liquidated")]
    Liquidated,
    #[sea_orm(string_value = "in_service")]
    InService,
    #[sea_orm(string_value = "in_repair")]
    InRepair,
    #[sea_orm(string_value = "ok")]
    Ok,
    #[sea_orm(string_value = "to_deploy")]
    ToDeploy,
    #[sea_orm(string_value = "installed")]
    Installed,
    #[sea_orm(string_value = "free")]
    Free,
    #[sea_orm(string_value = "reserved")]
    Reserved,
}

impl AssetStatus {
    pub fn all() -> Vec<AssetStatus> {
        AssetStatus::iter().collect()
    }

    pub fn from_key(key: &str) -> Option<AssetStatus> {
        AssetStatus::iter().find(|s| s.as_ref() == key)
    }

    pub fn desc(&self) -> &'static str {
        match self {
            AssetStatus::New => "new",
            AssetStatus::InProgress => "in progress",
            AssetStatus::WaitingForRelease => "waiting for release",
            AssetStatus::Used => "in use",
            AssetStatus::Loan => "loan",
            AssetStatus::Damaged => "damaged",
            AssetStatus::Liquidated => "liquidated",
            AssetStatus::InService => "in service",
            AssetStatus::InRepair => "in repair",
            AssetStatus::Ok => "ok",
            AssetStatus::ToDeploy => "to deploy",
            AssetStatus::Installed => "installed",
            AssetStatus::Free => "free",
            AssetStatus::Reserved => "reserved",
        }
    }

    pub fn is_software(&self) -> bool {
        matches!(
            self,
            AssetStatus::Installed | AssetStatus::Free | AssetStatus::Reserved
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, AsRefStr, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetSource {
    #[sea_orm(string_value = "shipment")]
    Shipment,
    #[sea_orm(string_value = "salvaged")]
    Salvaged,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, AsRefStr, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetPurpose {
    #[sea_orm(string_value = "for_contractor")]
    ForContractor,
    #[sea_orm(string_value = "sectional")]
    Sectional,
    #[sea_orm(string_value = "for_dashboards")]
    ForDashboards,
    #[sea_orm(string_value = "for_events")]
    ForEvents,
    #[sea_orm(string_value = "for_tests")]
    ForTests,
    #[sea_orm(string_value = "others")]
    Others,
}

/// licence type of the office form
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, AsRefStr, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OfficeLicenceType {
    #[default]
    #[sea_orm(string_value = "not_applicable")]
    NotApplicable,
    #[sea_orm(string_value = "oem")]
    Oem,
    #[sea_orm(string_value = "box")]
    Box,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, AsRefStr, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetCategoryType {
    #[sea_orm(string_value = "back_office")]
    BackOffice,
    #[default]
    #[sea_orm(string_value = "data_center")]
    DataCenter,
}

impl AssetCategoryType {
    pub fn desc(&self) -> &'static str {
        match self {
            AssetCategoryType::BackOffice => "back office",
            AssetCategoryType::DataCenter => "data center",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum ModelLayout {
    #[default]
    #[serde(rename = "na")]
    #[sea_orm(string_value = "na")]
    Na,
    #[serde(rename = "1x2")]
    #[sea_orm(string_value = "1x2")]
    Layout1x2,
    #[serde(rename = "2x8")]
    #[sea_orm(string_value = "2x8")]
    Layout2x8,
    #[serde(rename = "2x16")]
    #[sea_orm(string_value = "2x16")]
    Layout2x8AB,
    #[serde(rename = "4x2")]
    #[sea_orm(string_value = "4x2")]
    Layout4x2,
}

impl ModelLayout {
    pub fn css_class(&self) -> &'static str {
        match self {
            ModelLayout::Na => "",
            ModelLayout::Layout1x2 => "rows-1 cols-2",
            ModelLayout::Layout2x8 => "rows-2 cols-8",
            ModelLayout::Layout2x8AB => "rows-2 cols-8 half-slots",
            ModelLayout::Layout4x2 => "rows-4 cols-2",
        }
    }
}

/// Placement of a device inside a rack. `left`/`right` are the width side
/// (pdus at position 0), the rest describe depth.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, AsRefStr, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    #[default]
    #[sea_orm(string_value = "front")]
    Front,
    #[sea_orm(string_value = "back")]
    Back,
    #[sea_orm(string_value = "middle")]
    Middle,
    #[sea_orm(string_value = "left")]
    Left,
    #[sea_orm(string_value = "right")]
    Right,
}

impl Orientation {
    pub fn is_width(&self) -> bool {
        matches!(self, Orientation::Left | Orientation::Right)
    }

    pub fn is_depth(&self) -> bool {
        !self.is_width()
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, AsRefStr, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RackOrientation {
    #[default]
    #[sea_orm(string_value = "top")]
    Top,
    #[sea_orm(string_value = "bottom")]
    Bottom,
    #[sea_orm(string_value = "left")]
    Left,
    #[sea_orm(string_value = "right")]
    Right,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, AsRefStr, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComponentType {
    #[sea_orm(string_value = "processor")]
    Processor,
    #[sea_orm(string_value = "memory")]
    Memory,
    #[sea_orm(string_value = "disk")]
    Disk,
    #[sea_orm(string_value = "ethernet")]
    Ethernet,
    #[sea_orm(string_value = "expansion")]
    Expansion,
    #[sea_orm(string_value = "fibre")]
    Fibre,
    #[sea_orm(string_value = "share")]
    Share,
    #[default]
    #[sea_orm(string_value = "unknown")]
    Unknown,
    #[sea_orm(string_value = "management")]
    Management,
    #[sea_orm(string_value = "power")]
    Power,
    #[sea_orm(string_value = "cooling")]
    Cooling,
    #[sea_orm(string_value = "media")]
    Media,
    #[sea_orm(string_value = "chassis")]
    Chassis,
    #[sea_orm(string_value = "backup")]
    Backup,
    #[sea_orm(string_value = "software")]
    Software,
    #[sea_orm(string_value = "os")]
    Os,
}

/// Which component table row a `component` record represents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, AsRefStr, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComponentKind {
    #[sea_orm(string_value = "processor")]
    Processor,
    #[sea_orm(string_value = "memory")]
    Memory,
    #[sea_orm(string_value = "storage")]
    Storage,
    #[sea_orm(string_value = "fibre_channel")]
    FibreChannel,
    #[sea_orm(string_value = "ethernet")]
    Ethernet,
    #[sea_orm(string_value = "software")]
    Software,
    #[sea_orm(string_value = "operating_system")]
    OperatingSystem,
    #[default]
    #[sea_orm(string_value = "generic")]
    Generic,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EthernetSpeed {
    #[serde(rename = "10 Mbps")]
    #[sea_orm(string_value = "10 Mbps")]
    S10Mbit,
    #[serde(rename = "100 Mbps")]
    #[sea_orm(string_value = "100 Mbps")]
    S100Mbit,
    #[serde(rename = "1 Gbps")]
    #[sea_orm(string_value = "1 Gbps")]
    S1Gbit,
    #[serde(rename = "10 Gbps")]
    #[sea_orm(string_value = "10 Gbps")]
    S10Gbit,
    #[default]
    #[serde(rename = "unknown speed")]
    #[sea_orm(string_value = "unknown speed")]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keys_match_db_values() {
        for status in AssetStatus::iter() {
            assert_eq!(status.as_ref(), status.to_value());
            assert_eq!(AssetStatus::from_key(status.as_ref()), Some(status));
        }
        assert_eq!(AssetStatus::from_key("in use"), None);
        assert_eq!(AssetStatus::Used.desc(), "in use");
        assert!(AssetStatus::Free.is_software());
        assert!(!AssetStatus::Liquidated.is_software());
    }

    #[test]
    fn modes() {
        assert_eq!(AssetType::from_mode("dc"), Some(AssetType::DataCenter));
        assert_eq!(AssetType::from_mode("back_office"), Some(AssetType::BackOffice));
        assert_eq!(AssetType::from_mode("office"), None);
        assert_eq!(AssetType::BackOffice.mode_key(), "back_office");
    }

    #[test]
    fn orientation_groups() {
        assert!(Orientation::Left.is_width());
        assert!(Orientation::Middle.is_depth());
        assert_eq!(ModelLayout::Layout2x8AB.css_class(), "rows-2 cols-8 half-slots");
        assert_eq!(ModelLayout::Na.css_class(), "");
    }
}
