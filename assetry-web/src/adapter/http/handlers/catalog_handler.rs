use crate::adapter::cmd::catalog::{AssetModelSaveCmd, CategorySaveCmd, ProfileSaveCmd};
use crate::adapter::http::handlers::crud::{base_of, current_user, stamp_user};
use crate::adapter::query::catalog::NamedListQuery;
use crate::adapter::{ResList, Response};
use crate::config::AppState;
use crate::error::{AppError, AppJson};
use crate::repo::model::{asset_category, asset_model, profile};
use crate::repo::sea::SeaRepo;
use crate::service::catalog::{AssetModelItem, CatalogService};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use sea_orm::sea_query::ConditionExpression;
use sea_orm::{ColumnTrait, Condition};

pub async fn save_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<CategorySaveCmd>,
) -> Result<Json<Response<String>>, AppError> {
    let base =
        base_of::<asset_category::Entity, _>(&state.conn, param.id.as_deref(), asset_category::Model::default()).await?;
    let mut model: asset_category::Model = assetry_common::merge(&param, &base)?;
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(CatalogService::save_category(&state.conn, model).await?)))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryItem {
    #[serde(flatten)]
    pub category: asset_category::Model,
    pub label: String,
}

pub async fn list_category(
    State(state): State<AppState>,
    Json(query): Json<NamedListQuery>,
) -> Result<Json<Response<ResList<CategoryItem>>>, AppError> {
    let mut search_option = Vec::new();
    if let Some(name) = query.name.filter(|n| !n.is_empty()) {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(asset_category::Column::Name.contains(name)),
        ));
    }
    let (total, list) =
        SeaRepo::page_with_default::<asset_category::Entity>(&state.conn, query.page_query.init(), Some(search_option))
            .await?;
    let items = list
        .into_iter()
        .map(|category| CategoryItem {
            label: category.label(),
            category,
        })
        .collect();
    Ok(Json(Response::success(ResList::new(total, items))))
}

pub async fn save_asset_model(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<AssetModelSaveCmd>,
) -> Result<Json<Response<String>>, AppError> {
    let base = base_of::<asset_model::Entity, _>(&state.conn, param.id.as_deref(), asset_model::Model::default()).await?;
    let mut model: asset_model::Model = assetry_common::merge(&param, &base)?;
    stamp_user(&mut model, &current_user(&headers))?;
    let name = model.name.trim().to_string();
    let id = CatalogService::save_named::<asset_model::Entity, _>(&state.conn, model, &name).await?;
    Ok(Json(Response::success(id)))
}

/// Models with their asset count and layout classes.
pub async fn list_asset_model(
    State(state): State<AppState>,
    Json(query): Json<NamedListQuery>,
) -> Result<Json<Response<ResList<AssetModelItem>>>, AppError> {
    let mut search_option = Vec::new();
    if let Some(name) = query.name.filter(|n| !n.is_empty()) {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(asset_model::Column::Name.contains(name)),
        ));
    }
    let (total, list) =
        SeaRepo::page_with_default::<asset_model::Entity>(&state.conn, query.page_query.init(), Some(search_option))
            .await?;
    let items = CatalogService::model_items(&state.conn, list).await?;
    Ok(Json(Response::success(ResList::new(total, items))))
}

pub async fn save_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<ProfileSaveCmd>,
) -> Result<Json<Response<String>>, AppError> {
    let base = base_of::<profile::Entity, _>(&state.conn, param.id.as_deref(), profile::Model::default()).await?;
    let mut model: profile::Model = assetry_common::merge(&param, &base)?;
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(CatalogService::save_profile(&state.conn, model).await?)))
}
