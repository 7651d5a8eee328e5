use chrono::{Local, Months};
use crate::common::{AssetPurpose, AssetSource, AssetStatus, AssetType, OfficeLicenceType, Orientation};
use rust_decimal::prelude::ToPrimitive;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset")]
#[serde(default)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub model_id: String,
    pub asset_type: AssetType,
    pub status: AssetStatus,
    pub source: Option<AssetSource>,
    pub invoice_no: Option<String>,
    pub invoice_date: Option<Date>,
    pub order_no: Option<String>,
    pub purchase_order: Option<String>,
    #[sea_orm(unique)]
    pub sn: Option<String>,
    #[sea_orm(unique)]
    pub barcode: Option<String>,
    pub price: Decimal,
    pub support_price: Decimal,
    pub support_period: i32,
    pub support_type: String,
    pub support_void_reporting: bool,
    pub provider: Option<String>,
    pub remarks: String,
    pub niw: Option<String>,
    pub warehouse_id: String,
    pub location: Option<String>,
    pub request_date: Option<Date>,
    pub delivery_date: Option<Date>,
    pub production_use_date: Option<Date>,
    pub provider_order_date: Option<Date>,
    pub deprecation_rate: Decimal,
    pub force_deprecation: bool,
    pub deprecation_end_date: Option<Date>,
    pub production_year: Option<i32>,
    pub slots: Decimal,
    pub task_url: Option<String>,
    pub property_of_id: Option<String>,
    pub owner_id: Option<String>,
    pub user_id: Option<String>,
    pub loan_end_date: Option<Date>,
    pub note: String,
    pub budget_info_id: Option<String>,
    #[sea_orm(unique)]
    pub hostname: Option<String>,
    pub required_support: bool,
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
    #[sea_orm(unique)]
    pub imei: Option<String>,
    pub purpose: Option<AssetPurpose>,
    pub version: Option<String>,
    pub unit_price: Decimal,
    pub office_licence_type: Option<OfficeLicenceType>,
    pub date_of_last_inventory: Option<Date>,
    pub last_logged_user: Option<String>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: chrono::DateTime<Local>,
    pub updated_at: chrono::DateTime<Local>,
    pub deleted: i8,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn new() -> Model {
        Model::default()
    }

    pub fn deprecation_months(&self) -> u32 {
        deprecation_months(self.deprecation_rate)
    }

    /// `deprecation_end_date` when set, otherwise invoice date moved by the
    /// deprecation months.
    pub fn deprecation_date(&self) -> Option<Date> {
        match self.deprecation_end_date {
            Some(end) => Some(end),
            None => self
                .invoice_date
                .and_then(|d| d.checked_add_months(Months::new(self.deprecation_months()))),
        }
    }

    pub fn is_deprecated(&self, date: Date) -> bool {
        if self.force_deprecation || self.invoice_date.is_none() {
            return true;
        }
        self.deprecation_date().map_or(true, |d| d < date)
    }

    /// `liquidated_at` is the date of the latest history entry that set the
    /// status to liquidated.
    pub fn is_liquidated(&self, liquidated_at: Option<Date>, date: Date) -> bool {
        self.status == AssetStatus::Liquidated && liquidated_at.is_some_and(|d| d <= date)
    }

    pub fn visualization_url(&self) -> Option<String> {
        match (&self.data_center_id, &self.rack_id) {
            (Some(dc), Some(rack)) => Some(format!("/dc/{dc}/rack/{rack}")),
            _ => None,
        }
    }

    pub fn edit_url(&self) -> String {
        format!("/assets/{}/edit/device/{}/", self.asset_type.mode(), self.id)
    }

    pub fn has_parent_slot(&self) -> bool {
        self.slot_no.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// `int(12 / (rate / 100))`, 0 for a zero (or negative) rate.
pub fn deprecation_months(rate: Decimal) -> u32 {
    if rate <= Decimal::ZERO {
        return 0;
    }
    (Decimal::from(1200) / rate).trunc().to_u32().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn months_from_rate() {
        assert_eq!(deprecation_months(Decimal::from(25)), 48);
        assert_eq!(deprecation_months(Decimal::from(100)), 12);
        assert_eq!(deprecation_months(Decimal::from(30)), 40);
        assert_eq!(deprecation_months(Decimal::from(7)), 171);
        assert_eq!(deprecation_months(Decimal::ZERO), 0);
    }

    #[test]
    fn deprecated_after_rate_period() {
        let mut asset = Model::new();
        asset.deprecation_rate = Decimal::from(25);
        assert!(asset.is_deprecated(day(2020, 1, 1)), "no invoice date");

        asset.invoice_date = Some(day(2015, 1, 31));
        assert_eq!(asset.deprecation_date(), Some(day(2019, 1, 31)));
        assert!(!asset.is_deprecated(day(2019, 1, 31)));
        assert!(asset.is_deprecated(day(2019, 2, 1)));

        asset.deprecation_end_date = Some(day(2016, 6, 30));
        assert!(asset.is_deprecated(day(2016, 7, 1)));

        asset.deprecation_end_date = None;
        asset.force_deprecation = true;
        assert!(asset.is_deprecated(day(2015, 2, 1)));
    }

    #[test]
    fn month_end_is_clamped() {
        let mut asset = Model::new();
        asset.deprecation_rate = Decimal::from(1200);
        asset.invoice_date = Some(day(2021, 1, 31));
        assert_eq!(asset.deprecation_date(), Some(day(2021, 2, 28)));
    }

    #[test]
    fn liquidation_date() {
        let mut asset = Model::new();
        asset.status = AssetStatus::Liquidated;
        assert!(asset.is_liquidated(Some(day(2020, 5, 1)), day(2020, 5, 1)));
        assert!(!asset.is_liquidated(Some(day(2020, 5, 2)), day(2020, 5, 1)));
        assert!(!asset.is_liquidated(None, day(2020, 5, 1)));
        asset.status = AssetStatus::Used;
        assert!(!asset.is_liquidated(Some(day(2020, 5, 1)), day(2021, 1, 1)));
    }

    #[test]
    fn urls() {
        let mut asset = Model::new();
        asset.id = "a1".to_string();
        assert_eq!(asset.visualization_url(), None);
        asset.data_center_id = Some("dc1".to_string());
        asset.rack_id = Some("r1".to_string());
        assert_eq!(asset.visualization_url().as_deref(), Some("/dc/dc1/rack/r1"));
        assert_eq!(asset.edit_url(), "/assets/dc/edit/device/a1/");
    }
}
