//! handlers shared by every record type: get, paged list, soft delete and
//! the save of name-only dictionaries

use crate::adapter::cmd::catalog::NamedSaveCmd;
use crate::adapter::query::catalog::NamedListQuery;
use crate::adapter::{ResList, Response, ResponseSuccess};
use crate::config::AppState;
use crate::error::{AppError, AppJson};
use crate::repo::model::Stamped;
use crate::repo::sea::SeaRepo;
use crate::service::catalog::CatalogService;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use sea_orm::sea_query::ConditionExpression;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult, IntoActiveModel};
use serde::de::DeserializeOwned;
use serde::Serialize;

const X_USER: &str = "x-user";

/// Name put on the bookkeeping columns; set by the fronting proxy.
pub fn current_user(headers: &HeaderMap) -> String {
    headers
        .get(X_USER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("system")
        .to_string()
}

/// Stored row to lay a command over, or a fresh one for new records.
pub async fn base_of<E, C>(db: &C, id: Option<&str>, fresh: E::Model) -> Result<E::Model, AppError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    match id.filter(|id| !id.is_empty()) {
        Some(id) => Ok(SeaRepo::find_by_id::<E, _>(db, id).await?),
        None => Ok(fresh),
    }
}

pub async fn get_by_id<E>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Response<E::Model>>, AppError>
where
    E: EntityTrait,
    E::Model: Serialize,
{
    let model = SeaRepo::find_by_id::<E, _>(&state.conn, &id).await?;
    Ok(Json(Response::success(model)))
}

pub async fn list_by_name<E>(
    State(state): State<AppState>,
    Json(query): Json<NamedListQuery>,
) -> Result<Json<Response<ResList<E::Model>>>, AppError>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Serialize + Send + Sync,
{
    let mut search_option = Vec::new();
    if let Some(name) = query.name.filter(|n| !n.is_empty()) {
        // records without a name column list unfiltered
        if let Ok(column) = SeaRepo::column::<E>("name") {
            search_option.push(ConditionExpression::Condition(
                Condition::all().add(column.contains(name)),
            ));
        }
    }
    let (total, list) = SeaRepo::page_with_default::<E>(&state.conn, query.page_query.init(), Some(search_option)).await?;
    Ok(Json(Response::success(ResList::new(total, list))))
}

pub async fn delete_by_id<E>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResponseSuccess>, AppError>
where
    E: EntityTrait,
{
    SeaRepo::delete_by_id::<E, _>(&state.conn, &id).await?;
    tracing::debug!(%id, "record deleted");
    Ok(Json(ResponseSuccess::default()))
}

pub async fn save_named<E>(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<NamedSaveCmd>,
) -> Result<Json<Response<String>>, AppError>
where
    E: EntityTrait,
    E::Model: Stamped + IntoActiveModel<E::ActiveModel> + Serialize + DeserializeOwned + Default,
    E::ActiveModel: Send,
{
    let base = base_of::<E, _>(&state.conn, param.id.as_deref(), E::Model::default()).await?;
    let mut model: E::Model = assetry_common::merge(&param, &base)?;
    stamp_user(&mut model, &current_user(&headers))?;
    let id = CatalogService::save_named::<E, _>(&state.conn, model, param.name.trim()).await?;
    Ok(Json(Response::success(id)))
}

/// Whole-row save of the dictionaries that carry more than a name.
pub async fn save_named_record<E>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<E::Model>,
) -> Result<Json<Response<String>>, AppError>
where
    E: EntityTrait,
    E::Model: Stamped + IntoActiveModel<E::ActiveModel> + Serialize + DeserializeOwned,
    E::ActiveModel: Send,
{
    let name = serde_json::to_value(&model)
        .ok()
        .and_then(|v| v.get("name").and_then(|n| n.as_str()).map(|n| n.trim().to_string()))
        .unwrap_or_default();
    stamp_user(&mut model, &current_user(&headers))?;
    let id = CatalogService::save_named::<E, _>(&state.conn, model, &name).await?;
    Ok(Json(Response::success(id)))
}

/// Fills `created_by` of new rows and `updated_by` of every saved row.
pub fn stamp_user<M>(model: &mut M, user: &str) -> Result<(), AppError>
where
    M: Stamped + Serialize + DeserializeOwned,
{
    let mut stamps = serde_json::Map::new();
    if model.id().is_empty() {
        stamps.insert("created_by".to_string(), user.into());
    }
    stamps.insert("updated_by".to_string(), user.into());
    *model = assetry_common::merge(&serde_json::Value::Object(stamps), &*model)?;
    Ok(())
}
