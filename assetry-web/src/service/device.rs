//! add / edit / move parts / split workflows over devices

use std::collections::BTreeSet;

use crate::common::{AssetType, ComponentKind};
use crate::config::InventoryConfig;
use crate::error::{AppError, FieldErrors};
use crate::repo::model::{asset, part_info};
use crate::repo::sea::{AssetRepo, CatalogRepo, ComponentRepo};
use crate::service::asset::AssetService;
use crate::service::licence::LicenceService;
use assetry_common::{split_multivalue, validate_multivalue};
use rust_decimal::Decimal;
use sea_orm::{DbConn, TransactionTrait};
use serde::{Deserialize, Serialize};

pub const BARCODE_COUNT_MISMATCH: &str =
    "Barcode list could be empty or must have the same number of items as a SN list.";
pub const BARCODE_TAKEN: &str = "Device with barcode already exist";
pub const SN_TAKEN: &str = "Device with sn already exist";
pub const ALREADY_SPLIT: &str = "This asset was splited.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedDevices {
    pub ids: Vec<String>,
    pub redirect: String,
}

/// Edit page for a single device, bulk edit for several.
pub fn added_redirect(mode: AssetType, ids: &[String]) -> String {
    match ids {
        [id] => format!("/assets/{}/edit/device/{}/", mode.mode(), id),
        _ => {
            let select: Vec<String> = ids.iter().map(|id| format!("select={id}")).collect();
            format!("/assets/{}/bulkedit/?{}", mode.mode(), select.join("&"))
        }
    }
}

pub fn transition_url(asset: &asset::Model, transition_type: &str) -> String {
    format!(
        "/assets/{}/transition/?select={}&transition_type={}",
        asset.asset_type.mode(),
        asset.id,
        transition_type
    )
}

/// Pairs every sn with the barcode at the same index.
pub fn pair_sn_barcode(sn_text: &str, barcode_text: &str) -> Result<Vec<(String, Option<String>)>, AppError> {
    let mut errors = FieldErrors::new();
    if let Err(msg) = validate_multivalue(sn_text) {
        errors.add("sn", msg);
    }
    errors.into_result()?;
    let mut errors = FieldErrors::new();
    let sns = split_multivalue(sn_text);
    let barcodes = split_multivalue(barcode_text);
    if !barcodes.is_empty() && barcodes.len() != sns.len() {
        return Err(AppError::field("barcode", BARCODE_COUNT_MISMATCH));
    }
    for (field, dups) in [
        ("sn", duplicated(sns.iter().map(String::as_str))),
        ("barcode", duplicated(barcodes.iter().map(String::as_str))),
    ] {
        if !dups.is_empty() {
            errors.add(field, format!("This {field} is duplicated"));
        }
    }
    errors.into_result()?;
    Ok(sns
        .into_iter()
        .enumerate()
        .map(|(i, sn)| (sn, barcodes.get(i).cloned()))
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SplitRow {
    pub model_name: String,
    pub sn: String,
    pub barcode: String,
    pub price: Decimal,
    pub remarks: String,
}

fn duplicated<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    let mut dups = BTreeSet::new();
    for value in values.filter(|v| !v.is_empty()) {
        if !seen.insert(value) {
            dups.insert(value);
        }
    }
    dups.into_iter().collect()
}

/// Row checks of a split: no repeated sn or barcode and the parts adding up
/// to the asset price.
pub fn validate_split(asset: &asset::Model, rows: &[SplitRow]) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    if rows.is_empty() {
        errors.add("__all__", "Please add one or more parts.");
    }
    for (field, dups) in [
        ("sn", duplicated(rows.iter().map(|r| r.sn.as_str()))),
        ("barcode", duplicated(rows.iter().map(|r| r.barcode.as_str()))),
    ] {
        if dups.is_empty() {
            continue;
        }
        errors.add(field, format!("This {field} is duplicated"));
        errors.add("__all__", format!("This {field} is duplicated: ({}) ", dups.join(", ")));
    }
    for row in rows {
        if row.model_name.trim().is_empty() {
            errors.add("model_name", "This field is required.");
            break;
        }
    }
    let total: Decimal = rows.iter().map(|r| r.price).sum();
    if total != asset.price {
        errors.add(
            "__all__",
            format!(
                "Total parts price must be equal to the asset price. Total parts price ({}) != Asset price ({})",
                total, asset.price
            ),
        );
    }
    errors.into_result()
}

pub struct DeviceService;

impl DeviceService {
    /// Creates one asset per sn from the template in a single transaction.
    pub async fn add_devices(
        db: &DbConn,
        config: &InventoryConfig,
        mode: AssetType,
        template: asset::Model,
        sn_text: &str,
        barcode_text: &str,
        user: &str,
    ) -> Result<AddedDevices, AppError> {
        if template.support_period < 0 {
            return Err(AppError::field("support_period", "Please specify value greater than zero."));
        }
        let pairs = pair_sn_barcode(sn_text, barcode_text)?;
        let barcodes: Vec<String> = pairs.iter().filter_map(|(_, b)| b.clone()).collect();
        if !AssetRepo::find_by_barcodes(db, &barcodes).await?.is_empty() {
            return Err(AppError::field("barcode", BARCODE_TAKEN));
        }
        let sns: Vec<String> = pairs.iter().map(|(sn, _)| sn.clone()).collect();
        if !AssetRepo::find_by_sns(db, &sns).await?.is_empty() {
            return Err(AppError::field("sn", SN_TAKEN));
        }

        let txn = db.begin().await?;
        let mut ids = Vec::with_capacity(pairs.len());
        for (sn, barcode) in pairs {
            let device = asset::Model {
                id: String::new(),
                asset_type: mode,
                sn: Some(sn),
                barcode,
                ..template.clone()
            };
            ids.push(AssetService::save_asset(&txn, config, device, user).await?);
        }
        txn.commit().await?;
        tracing::info!(count = ids.len(), mode = mode.mode(), "devices added");
        Ok(AddedDevices {
            redirect: added_redirect(mode, &ids),
            ids,
        })
    }

    /// Saves the asset with its licences and supports; returns the transition
    /// url when one was requested.
    pub async fn edit_device(
        db: &DbConn,
        config: &InventoryConfig,
        model: asset::Model,
        licence_ids: &[String],
        support_ids: &[String],
        transition_type: Option<&str>,
        user: &str,
    ) -> Result<Option<String>, AppError> {
        let txn = db.begin().await?;
        let id = AssetService::save_asset(&txn, config, model, user).await?;
        LicenceService::assign(&txn, &id, licence_ids, support_ids).await?;
        let saved = AssetRepo::get_asset_by_id(&txn, &id).await?;
        txn.commit().await?;
        Ok(transition_type
            .filter(|t| !t.is_empty())
            .map(|t| transition_url(&saved, t)))
    }

    /// Moves the part infos of `part_ids` from `source_id` to `target_id`.
    pub async fn move_parts(
        db: &DbConn,
        source_id: &str,
        target_id: &str,
        part_ids: &[String],
    ) -> Result<u64, AppError> {
        if AssetRepo::get_asset_by_id(db, target_id).await.is_err() {
            return Err(AppError::field("new_asset", "Source device asset does not exist"));
        }
        if source_id == target_id {
            return Err(AppError::field("new_asset", "You can't move parts to the same device"));
        }
        if part_ids.is_empty() {
            return Err(AppError::field("part_ids", "Please select one or more parts."));
        }
        let moved = AssetRepo::move_parts(db, part_ids, target_id).await?;
        tracing::info!(source_id, target_id, moved, "parts moved");
        Ok(moved)
    }

    /// Proposed split rows: one per component of the asset.
    pub async fn split_initial(db: &DbConn, asset_id: &str) -> Result<Vec<SplitRow>, AppError> {
        AssetRepo::get_asset_by_id(db, asset_id).await?;
        let mut rows = Vec::new();
        for component in ComponentRepo::of_asset(db, asset_id, None).await? {
            if component.kind == ComponentKind::Software || component.kind == ComponentKind::OperatingSystem {
                continue;
            }
            let model_name = match component.model_id.as_deref() {
                Some(id) => ComponentRepo::get_model(db, id).await.map(|m| m.name).unwrap_or_default(),
                None => String::new(),
            };
            rows.push(SplitRow {
                model_name: if model_name.is_empty() { component.label } else { model_name },
                sn: component.sn.unwrap_or_default(),
                ..Default::default()
            });
        }
        Ok(rows)
    }

    /// Turns the rows into data center part assets of the split device.
    pub async fn split_device(
        db: &DbConn,
        config: &InventoryConfig,
        asset_id: &str,
        rows: Vec<SplitRow>,
        user: &str,
    ) -> Result<Vec<String>, AppError> {
        let device = AssetRepo::get_asset_by_id(db, asset_id).await?;
        if AssetRepo::has_parts(db, asset_id).await? {
            return Err(AppError::field("__all__", ALREADY_SPLIT));
        }
        validate_split(&device, &rows)?;
        let barcodes: Vec<String> = rows.iter().map(|r| r.barcode.clone()).filter(|b| !b.is_empty()).collect();
        if !AssetRepo::find_by_barcodes(db, &barcodes).await?.is_empty() {
            return Err(AppError::field("barcode", BARCODE_TAKEN));
        }
        let sns: Vec<String> = rows.iter().map(|r| r.sn.clone()).filter(|s| !s.is_empty()).collect();
        if !AssetRepo::find_by_sns(db, &sns).await?.is_empty() {
            return Err(AppError::field("sn", SN_TAKEN));
        }

        let txn = db.begin().await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let model = CatalogRepo::get_or_create_model(&txn, row.model_name.trim(), AssetType::DataCenter).await?;
            let part = asset::Model {
                model_id: model.id,
                asset_type: AssetType::DataCenter,
                status: device.status,
                sn: Some(row.sn),
                barcode: Some(row.barcode),
                price: row.price,
                remarks: row.remarks,
                warehouse_id: device.warehouse_id.clone(),
                invoice_no: device.invoice_no.clone(),
                invoice_date: device.invoice_date,
                order_no: device.order_no.clone(),
                provider: device.provider.clone(),
                deprecation_rate: device.deprecation_rate,
                ..Default::default()
            };
            let id = AssetService::save_asset(&txn, config, part, user).await?;
            AssetRepo::insert_part_info(
                &txn,
                part_info::Model {
                    asset_id: id.clone(),
                    source_device_id: Some(device.id.clone()),
                    device_id: Some(device.id.clone()),
                    created_by: user.to_string(),
                    ..Default::default()
                },
            )
            .await?;
            ids.push(id);
        }
        txn.commit().await?;
        tracing::info!(asset_id, parts = ids.len(), "device split");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::model::licence;
    use crate::repo::testing::memory_db;
    use crate::service::licence::NO_FREE_SEATS;

    #[test]
    fn redirects() {
        let one = vec!["a1".to_string()];
        assert_eq!(added_redirect(AssetType::DataCenter, &one), "/assets/dc/edit/device/a1/");
        let many = vec!["a1".to_string(), "a2".to_string()];
        assert_eq!(
            added_redirect(AssetType::BackOffice, &many),
            "/assets/back_office/bulkedit/?select=a1&select=a2"
        );
    }

    #[test]
    fn sn_barcode_pairs() {
        let pairs = pair_sn_barcode("sn1,sn2", "bc1,bc2").unwrap();
        assert_eq!(pairs[1], ("sn2".to_string(), Some("bc2".to_string())));
        let without = pair_sn_barcode("sn1\nsn2", "").unwrap();
        assert_eq!(without[0].1, None);

        let Err(AppError::Form(errors)) = pair_sn_barcode("sn1,sn2", "bc1") else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("barcode").unwrap()[0], BARCODE_COUNT_MISMATCH);
        assert!(pair_sn_barcode("  ", "").is_err());

        let Err(AppError::Form(errors)) = pair_sn_barcode("sn1,sn1", "") else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("sn").unwrap()[0], "This sn is duplicated");
        let Err(AppError::Form(errors)) = pair_sn_barcode("sn1,sn2", "bc1,bc1") else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("barcode").unwrap()[0], "This barcode is duplicated");
        assert!(errors.get("sn").is_none());
    }

    #[test]
    fn split_rules() {
        let asset = asset::Model {
            price: Decimal::from(100),
            ..Default::default()
        };
        let row = |sn: &str, price: i64| SplitRow {
            model_name: "cpu".to_string(),
            sn: sn.to_string(),
            price: Decimal::from(price),
            ..Default::default()
        };
        assert!(validate_split(&asset, &[row("s1", 60), row("s2", 40)]).is_ok());

        let Err(AppError::Form(errors)) = validate_split(&asset, &[row("s1", 60), row("s1", 30)]) else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("sn").unwrap()[0], "This sn is duplicated");
        let all = errors.get("__all__").unwrap();
        assert_eq!(all[0], "This sn is duplicated: (s1) ");
        assert_eq!(
            all[1],
            "Total parts price must be equal to the asset price. Total parts price (90) != Asset price (100)"
        );
    }

    #[tokio::test]
    async fn add_one_asset_per_sn() {
        let db = memory_db().await;
        let config = InventoryConfig::default();
        let added = DeviceService::add_devices(
            &db,
            &config,
            AssetType::DataCenter,
            asset::Model::default(),
            "sn1,sn2",
            "bc1,bc2",
            "jan",
        )
        .await
        .unwrap();
        assert_eq!(added.ids.len(), 2);
        assert!(added.redirect.starts_with("/assets/dc/bulkedit/?select="));

        let Err(AppError::Form(errors)) = DeviceService::add_devices(
            &db,
            &config,
            AssetType::DataCenter,
            asset::Model::default(),
            "sn3",
            "bc1",
            "jan",
        )
        .await
        else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("barcode").unwrap()[0], BARCODE_TAKEN);
    }

    #[tokio::test]
    async fn repeated_sn_in_one_submit_adds_nothing() {
        let db = memory_db().await;
        let config = InventoryConfig::default();
        let Err(AppError::Form(errors)) = DeviceService::add_devices(
            &db,
            &config,
            AssetType::DataCenter,
            asset::Model::default(),
            "sn1,sn1",
            "",
            "jan",
        )
        .await
        else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("sn").unwrap()[0], "This sn is duplicated");
        let sns = vec!["sn1".to_string()];
        assert!(AssetRepo::find_by_sns(&db, &sns).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_rolls_back_without_seats() {
        let db = memory_db().await;
        let config = InventoryConfig::default();
        let added = DeviceService::add_devices(&db, &config, AssetType::BackOffice, asset::Model::default(), "sn1", "", "jan")
            .await
            .unwrap();
        let id = added.ids[0].clone();
        let licence_id = LicenceService::save_licence(
            &db,
            licence::Model {
                niw: "L-1".to_string(),
                number_bought: 0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let mut device = AssetRepo::get_asset_by_id(&db, &id).await.unwrap();
        device.remarks = "changed".to_string();
        let Err(AppError::Form(errors)) =
            DeviceService::edit_device(&db, &config, device.clone(), &[licence_id], &[], None, "jan").await
        else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("licences").unwrap()[0], NO_FREE_SEATS);
        assert_eq!(AssetRepo::get_asset_by_id(&db, &id).await.unwrap().remarks, "");

        let url = DeviceService::edit_device(&db, &config, device, &[], &[], Some("release"), "jan")
            .await
            .unwrap();
        assert_eq!(
            url.as_deref(),
            Some(format!("/assets/back_office/transition/?select={id}&transition_type=release").as_str())
        );
    }

    #[tokio::test]
    async fn split_then_move_parts() {
        let db = memory_db().await;
        let config = InventoryConfig::default();
        let added = DeviceService::add_devices(
            &db,
            &config,
            AssetType::DataCenter,
            asset::Model {
                price: Decimal::from(100),
                ..Default::default()
            },
            "srv1,srv2",
            "",
            "jan",
        )
        .await
        .unwrap();
        let (source, target) = (added.ids[0].clone(), added.ids[1].clone());
        let rows = vec![
            SplitRow {
                model_name: "Xeon".to_string(),
                sn: "p1".to_string(),
                barcode: "pb1".to_string(),
                price: Decimal::from(70),
                ..Default::default()
            },
            SplitRow {
                model_name: "DDR4".to_string(),
                sn: "p2".to_string(),
                barcode: "pb2".to_string(),
                price: Decimal::from(30),
                ..Default::default()
            },
        ];
        let parts = DeviceService::split_device(&db, &config, &source, rows.clone(), "jan").await.unwrap();
        assert_eq!(parts.len(), 2);
        let Err(AppError::Form(errors)) = DeviceService::split_device(&db, &config, &source, rows, "jan").await else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("__all__").unwrap()[0], ALREADY_SPLIT);

        assert!(DeviceService::move_parts(&db, &source, &source, &parts).await.is_err());
        assert!(DeviceService::move_parts(&db, &source, "missing", &parts).await.is_err());
        assert!(DeviceService::move_parts(&db, &source, &target, &[]).await.is_err());
        assert_eq!(DeviceService::move_parts(&db, &source, &target, &parts).await.unwrap(), 2);
        assert!(AssetRepo::has_parts(&db, &target).await.unwrap());
        assert!(!AssetRepo::has_parts(&db, &source).await.unwrap());
    }
}
