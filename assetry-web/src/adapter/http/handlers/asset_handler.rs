use crate::adapter::cmd::asset::AssetSaveCmd;
use crate::adapter::http::handlers::crud::{base_of, current_user};
use crate::adapter::query::asset::AssetListQuery;
use crate::adapter::vo::asset::{AssetListItemVO, AssetVO};
use crate::adapter::vo::BaseKV;
use crate::adapter::{ResList, Response, ResponseSuccess};
use crate::common::AssetType;
use crate::config::AppState;
use crate::error::{AppError, AppJson};
use crate::repo::model::{asset, asset_history};
use crate::repo::sea::AssetRepo;
use crate::service::asset::AssetService;
use crate::service::component::{ComponentItem, ComponentService};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use sea_orm::sea_query::ConditionExpression;
use sea_orm::{ColumnTrait, Condition};

pub async fn save_asset(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<AssetSaveCmd>,
) -> Result<Json<Response<String>>, AppError> {
    let base = base_of::<asset::Entity, _>(&state.conn, param.id.as_deref(), asset::Model::new()).await?;
    let model = assetry_common::merge::<_, asset::Model>(&param, &base)?;
    let id = AssetService::save_asset(&state.conn, &state.config.inventory, model, &current_user(&headers)).await?;
    Ok(Json(Response::success(id)))
}

pub async fn get_asset_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Response<AssetVO>>, AppError> {
    let asset = AssetRepo::get_asset_by_id(&state.conn, &id).await?;
    let liquidated_at = AssetRepo::liquidated_at(&state.conn, &id).await?.map(|d| d.date_naive());
    let licences = AssetRepo::licence_ids_of(&state.conn, &id).await?;
    let supports = AssetRepo::support_ids_of(&state.conn, &id).await?;
    Ok(Json(Response::success(AssetVO::new(asset, liquidated_at, licences, supports))))
}

pub async fn list_asset(
    State(state): State<AppState>,
    Json(query): Json<AssetListQuery>,
) -> Result<Json<Response<ResList<AssetListItemVO>>>, AppError> {
    let mut search_option = Vec::new();
    for (column, value) in [
        (asset::Column::Sn, query.sn),
        (asset::Column::Barcode, query.barcode),
        (asset::Column::Hostname, query.hostname),
        (asset::Column::Niw, query.niw),
    ] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            search_option.push(ConditionExpression::Condition(
                Condition::all().add(column.contains(value)),
            ))
        }
    }
    for (column, value) in [
        (asset::Column::ModelId, query.model_id),
        (asset::Column::RackId, query.rack_id),
        (asset::Column::WarehouseId, query.warehouse_id),
    ] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            search_option.push(ConditionExpression::Condition(
                Condition::all().add(column.eq(value)),
            ))
        }
    }
    if let Some(status) = query.status {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(asset::Column::Status.eq(status)),
        ))
    }
    if let Some(ty) = query.asset_type {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(asset::Column::AssetType.eq(ty)),
        ))
    }

    let (total, list) = AssetRepo::find_asset_by(&state.conn, query.page_query.init(), Some(search_option)).await?;
    Ok(Json(Response::success(ResList::new(
        total,
        list.into_iter()
            .map(|d| assetry_common::copy(&d).unwrap_or_default())
            .collect(),
    ))))
}

pub async fn delete_asset_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResponseSuccess>, AppError> {
    AssetService::delete_asset(&state.conn, &id).await?;
    Ok(Json(ResponseSuccess::default()))
}

pub async fn asset_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Response<Vec<asset_history::Model>>>, AppError> {
    Ok(Json(Response::success(AssetRepo::history_of(&state.conn, &id).await?)))
}

pub async fn asset_components(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Response<Vec<ComponentItem>>>, AppError> {
    let blacklist = state.config.inventory.mac_prefix_blacklist.as_deref();
    let items = ComponentService::asset_components(&state.conn, &id, blacklist).await?;
    Ok(Json(Response::success(items)))
}

/// Statuses selectable for the url mode (`dc`, `back_office`).
pub async fn asset_statuses(
    State(state): State<AppState>,
    Path(mode): Path<String>,
) -> Result<Json<Response<Vec<BaseKV>>>, AppError> {
    let asset_type = AssetType::from_mode(&mode).ok_or_else(|| AppError::NotFound(format!("mode {mode}")))?;
    let statuses = state
        .config
        .inventory
        .allowed_statuses(asset_type)
        .into_iter()
        .map(|s| BaseKV {
            key: s.as_ref().to_string(),
            value: s.desc().to_string(),
        })
        .collect();
    Ok(Json(Response::success(statuses)))
}
