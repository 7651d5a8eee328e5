//! data center, server room and rack rules

use std::collections::HashSet;

use crate::error::{AppError, FieldErrors};
use crate::repo::model::{asset, asset_category, data_center, rack, rack_accessory, server_room};
use crate::repo::sea::{AssetRepo, CatalogRepo, RackRepo, SeaRepo};
use crate::common::Orientation;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbConn};
use serde::Serialize;

const GREATER_THAN_ZERO: &str = "Please specify value greater than zero.";

pub fn validate_data_center(dc: &data_center::Model) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    if dc.visualization_cols_num <= 0 {
        errors.add("visualization_cols_num", GREATER_THAN_ZERO);
    }
    if dc.visualization_rows_num <= 0 {
        errors.add("visualization_rows_num", GREATER_THAN_ZERO);
    }
    errors.into_result()
}

/// Grid checks of a rack against its data center and the racks already
/// placed there.
pub fn validate_rack_position(
    rack: &rack::Model,
    dc: &data_center::Model,
    collided: &[rack::Model],
) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    if rack.visualization_col <= 0 {
        errors.add("visualization_col", GREATER_THAN_ZERO);
    }
    if rack.visualization_row <= 0 {
        errors.add("visualization_row", GREATER_THAN_ZERO);
    }
    if !errors.is_empty() {
        return errors.into_result();
    }
    if !collided.is_empty() {
        let names: Vec<&str> = collided.iter().map(|r| r.name.as_str()).collect();
        return Err(AppError::field(
            "__all__",
            format!("Selected possition collides with racks: {}.", names.join(" ,")),
        ));
    }
    if dc.visualization_cols_num < rack.visualization_col {
        return Err(AppError::field(
            "__all__",
            format!(
                "Maximum allowed column number for selected data center is {}.",
                dc.visualization_cols_num
            ),
        ));
    }
    if dc.visualization_rows_num < rack.visualization_row {
        return Err(AppError::field(
            "__all__",
            format!(
                "Maximum allowed row number for selected data center is {}.",
                dc.visualization_rows_num
            ),
        ));
    }
    Ok(())
}

/// `max_u - Σ height of root devices - distinct accessory positions`; blade
/// children and slotted devices sit inside a chassis.
pub fn free_u(
    rack: &rack::Model,
    root_devices: &[(&asset::Model, Decimal)],
    accessories: &[rack_accessory::Model],
) -> i64 {
    let used: Decimal = root_devices.iter().map(|(_, height)| *height).sum();
    let positions: HashSet<Option<i32>> = accessories.iter().map(|a| a.position).collect();
    let free = Decimal::from(rack.max_u_height) - used - Decimal::from(positions.len());
    free.trunc().to_i64().unwrap_or_default()
}

pub fn pdus(devices: &[asset::Model]) -> Vec<&asset::Model> {
    devices
        .iter()
        .filter(|d| d.position == Some(0) && d.orientation.is_some_and(|o| o.is_width()))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RackInfo {
    pub rack: rack::Model,
    pub label: String,
    pub free_u: i64,
    pub pdus: Vec<asset::Model>,
}

pub struct DataCenterService;

impl DataCenterService {
    pub async fn save_data_center<C: ConnectionTrait>(db: &C, model: data_center::Model) -> Result<String, AppError> {
        validate_data_center(&model)?;
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<data_center::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<data_center::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn save_server_room<C: ConnectionTrait>(db: &C, model: server_room::Model) -> Result<String, AppError> {
        SeaRepo::find_by_id::<data_center::Entity, _>(db, &model.data_center_id).await?;
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<server_room::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<server_room::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn save_rack<C: ConnectionTrait>(db: &C, model: rack::Model) -> Result<String, AppError> {
        let dc = SeaRepo::find_by_id::<data_center::Entity, _>(db, &model.data_center_id).await?;
        let exclude = (!model.id.is_empty()).then_some(model.id.as_str());
        let collided = RackRepo::racks_at(
            db,
            &dc.id,
            model.visualization_col,
            model.visualization_row,
            exclude,
        )
        .await?;
        validate_rack_position(&model, &dc, &collided)?;
        if let Some(same_name) = RackRepo::find_by_name_in(db, &dc.id, &model.name).await? {
            if same_name.id != model.id {
                return Err(AppError::field("name", "Rack with this name already exists in the data center."));
            }
        }
        if let Some(room_id) = model.server_room_id.as_deref() {
            let room = RackRepo::get_server_room(db, room_id).await?;
            if room.data_center_id != dc.id {
                return Err(AppError::field("server_room", "This server room is not from picked data center"));
            }
        }
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<rack::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<rack::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn save_rack_accessory<C: ConnectionTrait>(
        db: &C,
        mut model: rack_accessory::Model,
    ) -> Result<String, AppError> {
        let rack = RackRepo::get_rack(db, &model.rack_id).await?;
        model.data_center_id = Some(rack.data_center_id.clone());
        model.server_room_id = rack.server_room_id.clone();
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<rack_accessory::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<rack_accessory::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn rack_info(db: &DbConn, rack_id: &str) -> Result<RackInfo, AppError> {
        let rack = RackRepo::get_rack(db, rack_id).await?;
        let devices = AssetRepo::find_in_rack(db, rack_id).await?;
        let accessories = RackRepo::accessories_of(db, rack_id).await?;

        let mut roots = Vec::new();
        for device in devices.iter().filter(|d| !d.has_parent_slot()) {
            let model = CatalogRepo::get_model(db, &device.model_id).await.ok();
            let category: Option<asset_category::Model> = match model.as_ref().and_then(|m| m.category_id.as_deref()) {
                Some(category_id) => CatalogRepo::get_category(db, category_id).await.ok(),
                None => None,
            };
            if category.as_ref().is_some_and(|c| c.is_blade) {
                continue;
            }
            roots.push((device, model.map(|m| m.height_of_device).unwrap_or_default()));
        }

        let server_room = match rack.server_room_id.as_deref() {
            Some(id) => Some(RackRepo::get_server_room(db, id).await?.name),
            None => None,
        };
        let data_center = SeaRepo::find_by_id::<data_center::Entity, _>(db, &rack.data_center_id)
            .await
            .ok()
            .map(|dc| dc.name);
        Ok(RackInfo {
            label: rack.label(server_room.as_deref(), data_center.as_deref()),
            free_u: free_u(&rack, &roots, &accessories),
            pdus: pdus(&devices).into_iter().cloned().collect(),
            rack,
        })
    }
}

/// Orientations accepted for a device position: the width ones for position 0,
/// the depth ones above it.
pub fn orientations_for(position: i32) -> &'static [Orientation] {
    if position == 0 {
        &[Orientation::Left, Orientation::Right]
    } else {
        &[Orientation::Front, Orientation::Middle, Orientation::Back]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::memory_db;

    fn rack_at(name: &str, col: i32, row: i32) -> rack::Model {
        rack::Model {
            name: name.to_string(),
            visualization_col: col,
            visualization_row: row,
            ..rack::Model::new()
        }
    }

    #[test]
    fn grid_rules() {
        let dc = data_center::Model::new();
        assert!(validate_rack_position(&rack_at("r", 3, 4), &dc, &[]).is_ok());

        let Err(AppError::Form(errors)) = validate_rack_position(&rack_at("r", 0, 4), &dc, &[]) else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("visualization_col").unwrap()[0], GREATER_THAN_ZERO);

        let collided = vec![rack_at("a", 3, 4), rack_at("b", 3, 4)];
        let Err(AppError::Form(errors)) = validate_rack_position(&rack_at("r", 3, 4), &dc, &collided) else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("__all__").unwrap()[0], "Selected possition collides with racks: a ,b.");

        let Err(AppError::Form(errors)) = validate_rack_position(&rack_at("r", 21, 4), &dc, &[]) else {
            panic!("expected form error");
        };
        assert_eq!(
            errors.get("__all__").unwrap()[0],
            "Maximum allowed column number for selected data center is 20."
        );

        let mut flat = data_center::Model::new();
        flat.visualization_rows_num = 0;
        assert!(validate_data_center(&flat).is_err());
    }

    #[test]
    fn free_u_and_pdus() {
        let rack = rack::Model::new();
        let server = asset::Model {
            position: Some(10),
            orientation: Some(Orientation::Front),
            ..Default::default()
        };
        let pdu = asset::Model {
            position: Some(0),
            orientation: Some(Orientation::Left),
            ..Default::default()
        };
        let roots = vec![(&server, Decimal::from(2)), (&pdu, Decimal::ZERO)];
        let accessories = vec![
            rack_accessory::Model {
                position: Some(1),
                ..Default::default()
            },
            rack_accessory::Model {
                position: Some(1),
                ..Default::default()
            },
            rack_accessory::Model {
                position: Some(5),
                ..Default::default()
            },
        ];
        assert_eq!(free_u(&rack, &roots, &accessories), 44);

        let devices = vec![server.clone(), pdu.clone()];
        let found = pdus(&devices);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, Some(0));
        assert_eq!(orientations_for(0), &[Orientation::Left, Orientation::Right]);
    }

    #[tokio::test]
    async fn rack_collision_in_db() {
        let db = memory_db().await;
        let dc_id = DataCenterService::save_data_center(
            &db,
            data_center::Model {
                name: "DC1".to_string(),
                ..data_center::Model::new()
            },
        )
        .await
        .unwrap();
        let mut first = rack_at("R1", 1, 1);
        first.data_center_id = dc_id.clone();
        let first_id = DataCenterService::save_rack(&db, first.clone()).await.unwrap();

        let mut second = rack_at("R2", 1, 1);
        second.data_center_id = dc_id.clone();
        assert!(DataCenterService::save_rack(&db, second).await.is_err());

        // moving the rack onto its own cell is fine
        first.id = first_id.clone();
        first.description = "moved".to_string();
        DataCenterService::save_rack(&db, first).await.unwrap();

        let info = DataCenterService::rack_info(&db, &first_id).await.unwrap();
        assert_eq!(info.label, "R1 - DC1");
        assert_eq!(info.free_u, 48);
    }
}
