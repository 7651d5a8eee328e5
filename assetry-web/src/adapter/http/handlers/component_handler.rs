use crate::adapter::cmd::component::{ComponentModelCreateCmd, OperatingSystemCreateCmd, SoftwareCreateCmd};
use crate::adapter::http::handlers::crud::{current_user, stamp_user};
use crate::adapter::Response;
use crate::common::{ComponentKind, ComponentType};
use crate::config::AppState;
use crate::error::{AppError, AppJson};
use crate::repo::model::{component, component_model, disk_share, disk_share_mount};
use crate::service::component::ComponentService;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedModel {
    pub model: component_model::Model,
    pub created: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindModels {
    pub kind: ComponentKind,
    pub models: Vec<component_model::Model>,
}

/// Returns the model with the same key when one is stored already.
pub async fn create_component_model(
    State(state): State<AppState>,
    AppJson(param): AppJson<ComponentModelCreateCmd>,
) -> Result<Json<Response<CreatedModel>>, AppError> {
    let (model, created) = ComponentService::create_model(&state.conn, param.component_type, &param.spec).await?;
    Ok(Json(Response::success(CreatedModel { model, created })))
}

pub async fn component_model_count(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Response<u64>>, AppError> {
    Ok(Json(Response::success(ComponentService::count(&state.conn, &id).await?)))
}

pub async fn component_models_of_type(
    State(state): State<AppState>,
    Path(component_type): Path<ComponentType>,
) -> Result<Json<Response<KindModels>>, AppError> {
    let (kind, models) = ComponentService::models_for_kind(&state.conn, component_type).await?;
    Ok(Json(Response::success(KindModels { kind, models })))
}

pub async fn save_component(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<component::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(ComponentService::save_component(&state.conn, model).await?)))
}

/// Software found by (asset, path) or created.
pub async fn create_software(
    State(state): State<AppState>,
    AppJson(param): AppJson<SoftwareCreateCmd>,
) -> Result<Json<Response<component::Model>>, AppError> {
    let software = ComponentService::create_software(
        &state.conn,
        &param.asset_id,
        &param.path,
        param.model_name.trim(),
        param.label.as_deref(),
        param.sn.as_deref(),
        param.family.as_deref(),
        param.version.as_deref(),
    )
    .await?;
    Ok(Json(Response::success(software)))
}

pub async fn create_operating_system(
    State(state): State<AppState>,
    AppJson(param): AppJson<OperatingSystemCreateCmd>,
) -> Result<Json<Response<component::Model>>, AppError> {
    let os = ComponentService::create_operating_system(
        &state.conn,
        &param.asset_id,
        param.os_name.trim(),
        &param.version,
        param.memory,
        param.storage,
        param.cores_count,
        param.family.as_deref(),
    )
    .await?;
    Ok(Json(Response::success(os)))
}

pub async fn save_disk_share(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<disk_share::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(ComponentService::save_disk_share(&state.conn, model).await?)))
}

pub async fn save_disk_share_mount(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<disk_share_mount::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(ComponentService::save_disk_share_mount(&state.conn, model).await?)))
}
