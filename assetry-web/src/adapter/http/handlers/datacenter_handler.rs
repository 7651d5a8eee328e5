use crate::adapter::cmd::datacenter::{DataCenterSaveCmd, RackSaveCmd};
use crate::adapter::http::handlers::crud::{base_of, current_user, stamp_user};
use crate::adapter::Response;
use crate::config::AppState;
use crate::error::{AppError, AppJson};
use crate::repo::model::{data_center, rack, rack_accessory, server_room};
use crate::service::datacenter::{DataCenterService, RackInfo};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

pub async fn save_data_center(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<DataCenterSaveCmd>,
) -> Result<Json<Response<String>>, AppError> {
    let base = base_of::<data_center::Entity, _>(&state.conn, param.id.as_deref(), data_center::Model::new()).await?;
    let mut model: data_center::Model = assetry_common::merge(&param, &base)?;
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(DataCenterService::save_data_center(&state.conn, model).await?)))
}

pub async fn save_server_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<server_room::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(DataCenterService::save_server_room(&state.conn, model).await?)))
}

pub async fn save_rack(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<RackSaveCmd>,
) -> Result<Json<Response<String>>, AppError> {
    let base = base_of::<rack::Entity, _>(&state.conn, param.id.as_deref(), rack::Model::new()).await?;
    let mut model: rack::Model = assetry_common::merge(&param, &base)?;
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(DataCenterService::save_rack(&state.conn, model).await?)))
}

pub async fn save_rack_accessory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<rack_accessory::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(DataCenterService::save_rack_accessory(&state.conn, model).await?)))
}

/// Label, free U and the PDUs of the rack.
pub async fn rack_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Response<RackInfo>>, AppError> {
    Ok(Json(Response::success(DataCenterService::rack_info(&state.conn, &id).await?)))
}
