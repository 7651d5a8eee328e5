//! asset bookkeeping: history, hostnames, placement and blade slots

use std::collections::BTreeMap;

use crate::common::{AssetStatus, AssetType, Orientation};
use crate::config::{HostnameTemplate, InventoryConfig};
use crate::error::{AppError, FieldErrors};
use crate::repo::model::{asset, asset_history, data_center, service};
use crate::repo::sea::{AssetRepo, CatalogRepo, HostnameRepo, RackRepo, SeaRepo};
use crate::service::datacenter::orientations_for;
use chrono::Local;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbConn};
use serde::Serialize;
use serde_json::Value;

lazy_static! {
    static ref SLOT_NO: Regex = Regex::new(r"^([1-9][AB]?|1[0-6][AB]?)$").unwrap();
    static ref SLOT_NUMBER: Regex = Regex::new(r"^(\d*)").unwrap();
}

pub const SLOT_NO_ERROR: &str =
    "Slot number should be a number from range 1-16 with an optional postfix 'A' or 'B' (e.g. '16A')";

const MAX_HOSTNAME: usize = 16;

/// Columns whose changes land in the asset history.
const TRACKED_FIELDS: &[&str] = &[
    "model_id",
    "status",
    "sn",
    "barcode",
    "hostname",
    "price",
    "invoice_no",
    "invoice_date",
    "order_no",
    "warehouse_id",
    "location",
    "owner_id",
    "user_id",
    "deprecation_rate",
    "force_deprecation",
    "deprecation_end_date",
    "support_period",
    "support_type",
    "provider",
    "rack_id",
    "position",
    "orientation",
    "slot_no",
    "service_id",
    "device_environment_id",
    "remarks",
    "note",
];

fn history_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// One history row per tracked field that differs between the two versions.
pub fn tracked_changes(old: &asset::Model, new: &asset::Model, user: &str) -> Vec<asset_history::Model> {
    let (Ok(Value::Object(before)), Ok(Value::Object(after))) = (serde_json::to_value(old), serde_json::to_value(new))
    else {
        return Vec::new();
    };
    let now = Local::now();
    TRACKED_FIELDS
        .iter()
        .filter(|f| before.get(**f) != after.get(**f))
        .map(|f| asset_history::Model {
            asset_id: new.id.clone(),
            field_name: f.to_string(),
            old_value: history_value(before.get(*f)),
            new_value: history_value(after.get(*f)),
            user: user.to_string(),
            date: now,
            ..Default::default()
        })
        .collect()
}

/// Fills `{{ code }}` and `{{ country_code }}` in a hostname template part.
pub fn render_hostname_part(template: &str, code: &str, country_code: &str) -> String {
    template
        .replace("{{ code }}", code)
        .replace("{{code}}", code)
        .replace("{{ country_code }}", country_code)
        .replace("{{country_code}}", country_code)
}

/// A new hostname is due when there is none or it was generated for another
/// country.
pub fn needs_hostname(asset: &asset::Model, country_code: &str) -> bool {
    match asset.hostname.as_deref() {
        None | Some("") => true,
        Some(hostname) => !hostname.contains(country_code),
    }
}

fn empty_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Unique and optional text columns keep NULL instead of an empty string.
pub fn normalize_asset(asset: &mut asset::Model) {
    asset.hostname = empty_to_none(asset.hostname.take());
    asset.sn = empty_to_none(asset.sn.take());
    asset.barcode = empty_to_none(asset.barcode.take());
    asset.imei = empty_to_none(asset.imei.take());
    asset.niw = empty_to_none(asset.niw.take());
    asset.slot_no = empty_to_none(asset.slot_no.take());
    for id in [
        &mut asset.data_center_id,
        &mut asset.server_room_id,
        &mut asset.rack_id,
        &mut asset.parent_id,
        &mut asset.owner_id,
        &mut asset.user_id,
        &mut asset.service_id,
        &mut asset.device_environment_id,
        &mut asset.property_of_id,
        &mut asset.budget_info_id,
    ] {
        *id = empty_to_none(id.take());
    }
}

/// Row of the blade chassis view, either a device or an empty slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotItem {
    pub id: Option<String>,
    pub slot_no: String,
    pub orientation: Option<Orientation>,
    pub barcode: String,
    pub sn: String,
    pub model: String,
    pub service: String,
}

impl SlotItem {
    pub fn gap(slot_no: String, orientation: Option<Orientation>) -> Self {
        Self {
            id: None,
            slot_no,
            orientation,
            barcode: "-".to_string(),
            sn: "-".to_string(),
            model: "-".to_string(),
            service: "-".to_string(),
        }
    }

    pub fn is_gap(&self) -> bool {
        self.id.is_none()
    }
}

fn slot_number(slot_no: &str) -> u32 {
    SLOT_NUMBER
        .captures(slot_no)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn by_slot(a: &SlotItem, b: &SlotItem) -> std::cmp::Ordering {
    (slot_number(&a.slot_no), a.slot_no.as_str()).cmp(&(slot_number(&b.slot_no), b.slot_no.as_str()))
}

/// Adds a gap for every free slot between 1 and the highest slot taken, with
/// A/B halves when the lowest slot uses them, ordered by slot.
pub fn with_gaps(mut items: Vec<SlotItem>) -> Vec<SlotItem> {
    items.sort_by(by_slot);
    let Some(first) = items.first().cloned() else {
        return items;
    };
    let max_slot = items.iter().map(|i| slot_number(&i.slot_no)).max().unwrap_or(0);
    let halves = first.slot_no.ends_with('A') || first.slot_no.ends_with('B');
    let mut wanted = Vec::new();
    for n in 1..=max_slot {
        if halves {
            wanted.push(format!("{n}A"));
            wanted.push(format!("{n}B"));
        } else {
            wanted.push(n.to_string());
        }
    }
    for slot_no in wanted {
        if !items.iter().any(|i| i.slot_no == slot_no) {
            items.push(SlotItem::gap(slot_no, first.orientation));
        }
    }
    items.sort_by(by_slot);
    items
}

/// Placement checks of a data center asset against its rack, server room
/// and data center.
pub fn validate_placement(
    asset: &asset::Model,
    rack: Option<&crate::repo::model::rack::Model>,
    server_room: Option<&crate::repo::model::server_room::Model>,
) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    if let (Some(rack), Some(room_id)) = (rack, asset.server_room_id.as_deref()) {
        if rack.server_room_id.as_deref() != Some(room_id) {
            errors.add("rack", "This rack is not from picked server room");
        }
    }
    if let (Some(room), Some(dc_id)) = (server_room, asset.data_center_id.as_deref()) {
        if room.data_center_id != dc_id {
            errors.add("server_room", "This server room is not from picked data center");
        }
    }
    if let Some(position) = asset.position {
        let valid = orientations_for(position);
        if !asset.orientation.is_some_and(|o| valid.contains(&o)) {
            let names: Vec<&str> = valid.iter().map(|o| o.as_ref()).collect();
            errors.add(
                "orientation",
                format!("Valid orientations for picked position are: {}", names.join(", ")),
            );
        }
        if let Some(rack) = rack {
            if position > rack.max_u_height {
                errors.add(
                    "position",
                    format!("Position is higher than \"max u height\" = {}", rack.max_u_height),
                );
            }
        }
    }
    if let Some(slot_no) = asset.slot_no.as_deref() {
        if !SLOT_NO.is_match(slot_no) {
            errors.add("slot_no", SLOT_NO_ERROR);
        }
    }
    errors.into_result()
}

pub fn validate_status(asset: &asset::Model, config: &InventoryConfig) -> Result<(), AppError> {
    if config.allowed_statuses(asset.asset_type).contains(&asset.status) {
        return Ok(());
    }
    Err(AppError::field(
        "status",
        format!(
            "Select a valid choice. {} is not one of the available choices.",
            asset.status.as_ref()
        ),
    ))
}

pub struct AssetService;

impl AssetService {
    /// Generates the hostname from the template once the owner, the model
    /// category and its code are known. Returns whether a hostname was set.
    pub async fn try_assign_hostname<C: ConnectionTrait>(
        db: &C,
        asset: &mut asset::Model,
        template: &HostnameTemplate,
    ) -> Result<bool, AppError> {
        let Some(owner_id) = asset.owner_id.as_deref() else {
            return Ok(false);
        };
        let owner = CatalogRepo::get_profile(db, owner_id).await?;
        let model = CatalogRepo::get_model(db, &asset.model_id).await?;
        let Some(category_id) = model.category_id.as_deref() else {
            return Ok(false);
        };
        let category = CatalogRepo::get_category(db, category_id).await?;
        if category.code.is_empty() {
            return Ok(false);
        }
        let country_code = assetry_common::iso2_to_iso3(&owner.country);
        if !needs_hostname(asset, country_code) {
            return Ok(false);
        }
        let prefix = render_hostname_part(&template.prefix, &category.code, country_code);
        let postfix = render_hostname_part(&template.postfix, &category.code, country_code);
        let last = HostnameRepo::increment_hostname(db, &prefix, &postfix).await?;
        let hostname = last.formatted_hostname(template.counter_length);
        tracing::info!(asset_id = %asset.id, %hostname, "hostname assigned");
        asset.hostname = Some(hostname);
        Ok(true)
    }

    async fn validate<C: ConnectionTrait>(db: &C, asset: &asset::Model, config: &InventoryConfig) -> Result<(), AppError> {
        validate_status(asset, config)?;
        if let Some(hostname) = asset.hostname.as_deref() {
            if hostname.chars().count() > MAX_HOSTNAME {
                return Err(AppError::field(
                    "hostname",
                    format!("Ensure this value has at most {MAX_HOSTNAME} characters."),
                ));
            }
            if let Some(other) = AssetRepo::find_by_hostname(db, hostname).await? {
                if other.id != asset.id {
                    return Err(AppError::field("hostname", "Asset with this hostname already exists."));
                }
            }
        }
        if asset.asset_type == AssetType::DataCenter {
            if let Some(dc_id) = asset.data_center_id.as_deref() {
                SeaRepo::find_by_id::<data_center::Entity, _>(db, dc_id).await?;
            }
            let rack = match asset.rack_id.as_deref() {
                Some(id) => Some(RackRepo::get_rack(db, id).await?),
                None => None,
            };
            let room = match asset.server_room_id.as_deref() {
                Some(id) => Some(RackRepo::get_server_room(db, id).await?),
                None => None,
            };
            validate_placement(asset, rack.as_ref(), room.as_ref())?;
        }
        Ok(())
    }

    /// Validates and stores the asset. Updates record the history of the
    /// tracked fields and assign a hostname when the asset enters
    /// "in progress".
    pub async fn save_asset<C: ConnectionTrait>(
        db: &C,
        config: &InventoryConfig,
        mut model: asset::Model,
        user: &str,
    ) -> Result<String, AppError> {
        normalize_asset(&mut model);
        model.updated_by = user.to_string();

        if model.id.is_empty() {
            if model.deprecation_rate == Decimal::ZERO {
                model.deprecation_rate = config.default_deprecation_rate;
            }
            model.created_by = user.to_string();
            AssetService::validate(db, &model, config).await?;
            let id = AssetRepo::insert_asset_one(db, model).await?;
            tracing::debug!(asset_id = %id, "asset created");
            return Ok(id);
        }

        let old = AssetRepo::get_asset_by_id(db, &model.id).await?;
        if config.auto_assign_hostname
            && model.status == AssetStatus::InProgress
            && old.status != AssetStatus::InProgress
        {
            AssetService::try_assign_hostname(db, &mut model, &config.hostname_template).await?;
        }
        AssetService::validate(db, &model, config).await?;
        let changes = tracked_changes(&old, &model, user);
        let saved = AssetRepo::update_asset_by_id(db, model).await?;
        AssetRepo::insert_history(db, changes).await?;
        Ok(saved.id)
    }

    /// Soft deletes the asset together with its part info.
    pub async fn delete_asset<C: ConnectionTrait>(db: &C, id: &str) -> Result<(), AppError> {
        SeaRepo::delete_by_id::<asset::Entity, _>(db, id).await?;
        AssetRepo::delete_part_info_of(db, id).await?;
        Ok(())
    }

    async fn slot_item(db: &DbConn, asset: asset::Model) -> SlotItem {
        let model = CatalogRepo::get_model(db, &asset.model_id)
            .await
            .map(|m| m.name)
            .unwrap_or_default();
        let service = match asset.service_id.as_deref() {
            Some(id) => SeaRepo::find_by_id::<service::Entity, _>(db, id)
                .await
                .map(|s| s.name)
                .unwrap_or_default(),
            None => String::new(),
        };
        SlotItem {
            id: Some(asset.id),
            slot_no: asset.slot_no.unwrap_or_default(),
            orientation: asset.orientation,
            barcode: asset.barcode.unwrap_or_default(),
            sn: asset.sn.unwrap_or_default(),
            model,
            service,
        }
    }

    /// Devices sharing the chassis' rack and position, front and back, with
    /// the free slots filled in.
    pub async fn related_assets(db: &DbConn, id: &str) -> Result<BTreeMap<String, Vec<SlotItem>>, AppError> {
        let chassis = AssetRepo::get_asset_by_id(db, id).await?;
        let mut related = BTreeMap::new();
        for orientation in [Orientation::Front, Orientation::Back] {
            let mut items = Vec::new();
            for asset in AssetRepo::find_at_position(db, &chassis, orientation).await? {
                items.push(AssetService::slot_item(db, asset).await);
            }
            related.insert(orientation.as_ref().to_string(), with_gaps(items));
        }
        Ok(related)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::AssetCategoryType;
    use crate::repo::model::{asset_category, asset_model, profile, rack, server_room};
    use crate::repo::testing::memory_db;

    fn item(slot_no: &str) -> SlotItem {
        SlotItem {
            id: Some(slot_no.to_string()),
            slot_no: slot_no.to_string(),
            orientation: Some(Orientation::Front),
            barcode: "bc".to_string(),
            sn: "sn".to_string(),
            model: "m".to_string(),
            service: String::new(),
        }
    }

    #[test]
    fn gaps_fill_missing_slots() {
        let items = with_gaps(vec![item("3"), item("1")]);
        let slots: Vec<&str> = items.iter().map(|i| i.slot_no.as_str()).collect();
        assert_eq!(slots, vec!["1", "2", "3"]);
        assert!(items[1].is_gap());
        assert_eq!(items[1].sn, "-");
        assert_eq!(items[1].orientation, Some(Orientation::Front));

        let halves = with_gaps(vec![item("2A")]);
        let slots: Vec<&str> = halves.iter().map(|i| i.slot_no.as_str()).collect();
        assert_eq!(slots, vec!["1A", "1B", "2A", "2B"]);
        assert!(with_gaps(Vec::new()).is_empty());

        // "10" sorts before "2A" as text
        let mixed = with_gaps(vec![item("10"), item("2A")]);
        let slots: Vec<&str> = mixed.iter().take(4).map(|i| i.slot_no.as_str()).collect();
        assert_eq!(slots, vec!["1A", "1B", "2A", "2B"]);
        assert_eq!(mixed.last().map(|i| i.slot_no.as_str()), Some("10B"));
    }

    #[tokio::test]
    async fn chassis_lists_front_and_back_slots() {
        let db = memory_db().await;
        let placed = |sn: &str, slot_no: Option<&str>, orientation: Orientation| asset::Model {
            sn: Some(sn.to_string()),
            rack_id: Some("r1".to_string()),
            position: Some(5),
            orientation: Some(orientation),
            slot_no: slot_no.map(str::to_string),
            ..Default::default()
        };
        let chassis = SeaRepo::insert_with_default::<asset::Entity, _>(&db, placed("chassis", None, Orientation::Front))
            .await
            .unwrap();
        for (sn, slot_no, orientation) in [
            ("blade-1", "1A", Orientation::Front),
            ("blade-3", "3A", Orientation::Front),
            ("blade-back", "2", Orientation::Back),
        ] {
            SeaRepo::insert_with_default::<asset::Entity, _>(&db, placed(sn, Some(slot_no), orientation))
                .await
                .unwrap();
        }
        // 其他位置的设备不算
        let mut elsewhere = placed("other", Some("1A"), Orientation::Front);
        elsewhere.position = Some(6);
        SeaRepo::insert_with_default::<asset::Entity, _>(&db, elsewhere).await.unwrap();

        let related = AssetService::related_assets(&db, &chassis).await.unwrap();
        let front: Vec<(&str, bool)> = related["front"]
            .iter()
            .map(|i| (i.slot_no.as_str(), i.is_gap()))
            .collect();
        assert_eq!(
            front,
            vec![
                ("1A", false),
                ("1B", true),
                ("2A", true),
                ("2B", true),
                ("3A", false),
                ("3B", true),
            ]
        );
        assert_eq!(related["front"][0].sn, "blade-1");
        assert!(related["front"].iter().all(|i| i.id.as_deref() != Some(chassis.as_str())));

        let back: Vec<(&str, bool)> = related["back"].iter().map(|i| (i.slot_no.as_str(), i.is_gap())).collect();
        assert_eq!(back, vec![("1", true), ("2", false)]);
    }

    #[test]
    fn placement_rules() {
        let rack = rack::Model {
            server_room_id: Some("room1".to_string()),
            ..rack::Model::new()
        };
        let room = server_room::Model {
            data_center_id: "dc1".to_string(),
            ..Default::default()
        };
        let mut asset = asset::Model {
            data_center_id: Some("dc1".to_string()),
            server_room_id: Some("room1".to_string()),
            rack_id: Some("r1".to_string()),
            position: Some(0),
            orientation: Some(Orientation::Left),
            ..Default::default()
        };
        assert!(validate_placement(&asset, Some(&rack), Some(&room)).is_ok());

        asset.orientation = Some(Orientation::Front);
        asset.server_room_id = Some("room2".to_string());
        asset.data_center_id = Some("dc2".to_string());
        asset.slot_no = Some("17".to_string());
        let Err(AppError::Form(errors)) = validate_placement(&asset, Some(&rack), Some(&room)) else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("rack").unwrap()[0], "This rack is not from picked server room");
        assert_eq!(
            errors.get("server_room").unwrap()[0],
            "This server room is not from picked data center"
        );
        assert_eq!(
            errors.get("orientation").unwrap()[0],
            "Valid orientations for picked position are: left, right"
        );
        assert_eq!(errors.get("slot_no").unwrap()[0], SLOT_NO_ERROR);

        let high = asset::Model {
            position: Some(49),
            orientation: Some(Orientation::Front),
            slot_no: Some("16A".to_string()),
            ..Default::default()
        };
        let Err(AppError::Form(errors)) = validate_placement(&high, Some(&rack), None) else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("position").unwrap()[0], "Position is higher than \"max u height\" = 48");
        assert!(errors.get("slot_no").is_none());
    }

    #[test]
    fn history_tracks_changed_fields() {
        let old = asset::Model {
            id: "a1".to_string(),
            sn: Some("sn1".to_string()),
            ..Default::default()
        };
        let mut new = old.clone();
        new.status = AssetStatus::Used;
        new.sn = None;
        new.created_by = "ignored".to_string();
        let changes = tracked_changes(&old, &new, "jan");
        let fields: Vec<&str> = changes.iter().map(|c| c.field_name.as_str()).collect();
        assert_eq!(fields, vec!["status", "sn"]);
        assert_eq!(changes[0].old_value, "new");
        assert_eq!(changes[0].new_value, "used");
        assert_eq!(changes[1].new_value, "");
        assert_eq!(changes[1].user, "jan");
    }

    #[test]
    fn hostname_templates() {
        assert_eq!(render_hostname_part("{{ country_code }}{{ code }}", "SRV", "POL"), "POLSRV");
        let mut asset = asset::Model::default();
        assert!(needs_hostname(&asset, "POL"));
        asset.hostname = Some("POLSRV00001".to_string());
        assert!(!needs_hostname(&asset, "POL"));
        assert!(needs_hostname(&asset, "DEU"));
    }

    async fn seeded_asset(db: &sea_orm::DatabaseConnection) -> asset::Model {
        let category_id = SeaRepo::insert_with_default::<asset_category::Entity, _>(
            db,
            asset_category::Model {
                name: "Servers".to_string(),
                slug: "data_center_servers".to_string(),
                code: "SRV".to_string(),
                category_type: AssetCategoryType::DataCenter,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let model_id = SeaRepo::insert_with_default::<asset_model::Entity, _>(
            db,
            asset_model::Model {
                name: "DL360".to_string(),
                category_id: Some(category_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let owner_id = SeaRepo::insert_with_default::<profile::Entity, _>(
            db,
            profile::Model {
                username: "jan".to_string(),
                country: "PL".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        asset::Model {
            model_id,
            owner_id: Some(owner_id),
            sn: Some("sn-1".to_string()),
            hostname: Some(String::new()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn hostname_assigned_on_in_progress() {
        let db = memory_db().await;
        let mut config = InventoryConfig::default();
        config.auto_assign_hostname = true;

        let asset = seeded_asset(&db).await;
        let id = AssetService::save_asset(&db, &config, asset, "jan").await.unwrap();
        let mut saved = AssetRepo::get_asset_by_id(&db, &id).await.unwrap();
        assert_eq!(saved.hostname, None);
        assert_eq!(saved.deprecation_rate, Decimal::from(25));

        saved.status = AssetStatus::InProgress;
        AssetService::save_asset(&db, &config, saved, "jan").await.unwrap();
        let saved = AssetRepo::get_asset_by_id(&db, &id).await.unwrap();
        assert_eq!(saved.hostname.as_deref(), Some("POLSRV00001"));

        let history = AssetRepo::history_of(&db, &id).await.unwrap();
        let fields: Vec<&str> = history.iter().map(|h| h.field_name.as_str()).collect();
        assert!(fields.contains(&"status"));
        assert!(fields.contains(&"hostname"));
    }

    #[tokio::test]
    async fn disallowed_status_is_rejected() {
        let db = memory_db().await;
        let mut config = InventoryConfig::default();
        config
            .statuses
            .insert("data_center".to_string(), vec!["new".to_string()]);
        let mut asset = seeded_asset(&db).await;
        asset.status = AssetStatus::Used;
        let Err(AppError::Form(errors)) = AssetService::save_asset(&db, &config, asset, "jan").await else {
            panic!("expected form error");
        };
        assert!(errors.get("status").is_some());
    }

    #[tokio::test]
    async fn delete_hides_asset() {
        let db = memory_db().await;
        let asset = seeded_asset(&db).await;
        let id = AssetService::save_asset(&db, &InventoryConfig::default(), asset, "jan")
            .await
            .unwrap();
        AssetService::delete_asset(&db, &id).await.unwrap();
        assert!(AssetRepo::get_asset_by_id(&db, &id).await.is_err());
    }
}
