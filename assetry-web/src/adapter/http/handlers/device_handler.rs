//! device workflows: bulk add, edit with licences, part moves and splits

use std::collections::BTreeMap;

use crate::adapter::cmd::asset::{AddDeviceCmd, EditDeviceCmd, MovePartsCmd, SplitDeviceCmd};
use crate::adapter::http::handlers::crud::current_user;
use crate::adapter::Response;
use crate::common::AssetType;
use crate::config::AppState;
use crate::error::{AppError, AppJson};
use crate::repo::model::asset;
use crate::repo::sea::AssetRepo;
use crate::service::asset::{AssetService, SlotItem};
use crate::service::device::{AddedDevices, DeviceService, SplitRow};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditedDevice {
    pub id: String,
    pub transition_url: Option<String>,
}

fn asset_type_of(mode: &str) -> Result<AssetType, AppError> {
    AssetType::from_mode(mode).ok_or_else(|| AppError::NotFound(format!("mode {mode}")))
}

pub async fn add_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(mode): Path<String>,
    AppJson(param): AppJson<AddDeviceCmd>,
) -> Result<Json<Response<AddedDevices>>, AppError> {
    let asset_type = asset_type_of(&mode)?;
    let template = assetry_common::merge::<_, asset::Model>(&param.asset, &asset::Model::new())?;
    let added = DeviceService::add_devices(
        &state.conn,
        &state.config.inventory,
        asset_type,
        template,
        &param.sn_list,
        &param.barcode_list,
        &current_user(&headers),
    )
    .await?;
    Ok(Json(Response::success(added)))
}

pub async fn edit_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((mode, id)): Path<(String, String)>,
    AppJson(param): AppJson<EditDeviceCmd>,
) -> Result<Json<Response<EditedDevice>>, AppError> {
    let asset_type = asset_type_of(&mode)?;
    let stored = AssetRepo::get_asset_by_id(&state.conn, &id).await?;
    if stored.asset_type.mode() != asset_type.mode() {
        return Err(AppError::NotFound(format!("{} device {id}", asset_type.mode())));
    }
    let mut model = assetry_common::merge::<_, asset::Model>(&param.asset, &stored)?;
    model.id = id;
    let transition_url = DeviceService::edit_device(
        &state.conn,
        &state.config.inventory,
        model.clone(),
        &param.licences,
        &param.supports,
        param.transition_type.as_deref(),
        &current_user(&headers),
    )
    .await?;
    Ok(Json(Response::success(EditedDevice {
        id: model.id,
        transition_url,
    })))
}

pub async fn move_parts(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(param): AppJson<MovePartsCmd>,
) -> Result<Json<Response<u64>>, AppError> {
    let moved = DeviceService::move_parts(&state.conn, &id, &param.new_asset, &param.part_ids).await?;
    Ok(Json(Response::success(moved)))
}

/// Rows proposed for splitting the asset into parts.
pub async fn split_initial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Response<Vec<SplitRow>>>, AppError> {
    Ok(Json(Response::success(DeviceService::split_initial(&state.conn, &id).await?)))
}

pub async fn split_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    AppJson(param): AppJson<SplitDeviceCmd>,
) -> Result<Json<Response<Vec<String>>>, AppError> {
    let ids = DeviceService::split_device(
        &state.conn,
        &state.config.inventory,
        &id,
        param.rows,
        &current_user(&headers),
    )
    .await?;
    Ok(Json(Response::success(ids)))
}

pub async fn related_devices(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Response<BTreeMap<String, Vec<SlotItem>>>>, AppError> {
    Ok(Json(Response::success(AssetService::related_assets(&state.conn, &id).await?)))
}
