use crate::adapter::cmd::licence::LicenceSaveCmd;
use crate::adapter::http::handlers::crud::{base_of, current_user, stamp_user};
use crate::adapter::query::asset::LicenceListQuery;
use crate::adapter::{ResList, Response};
use crate::config::AppState;
use crate::error::{AppError, AppJson};
use crate::repo::model::{licence, support};
use crate::repo::sea::SeaRepo;
use crate::service::licence::LicenceService;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use sea_orm::sea_query::ConditionExpression;
use sea_orm::{ColumnTrait, Condition};

pub async fn save_licence(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<LicenceSaveCmd>,
) -> Result<Json<Response<String>>, AppError> {
    let base = base_of::<licence::Entity, _>(&state.conn, param.id.as_deref(), licence::Model::default()).await?;
    let mut model: licence::Model = assetry_common::merge(&param, &base)?;
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(LicenceService::save_licence(&state.conn, model).await?)))
}

pub async fn list_licence(
    State(state): State<AppState>,
    Json(query): Json<LicenceListQuery>,
) -> Result<Json<Response<ResList<licence::Model>>>, AppError> {
    let mut search_option = Vec::new();
    if let Some(niw) = query.niw.filter(|v| !v.is_empty()) {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(licence::Column::Niw.contains(niw)),
        ))
    }
    if let Some(sn) = query.sn.filter(|v| !v.is_empty()) {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(licence::Column::Sn.contains(sn)),
        ))
    }
    if let Some(ty) = query.asset_type {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(licence::Column::AssetType.eq(ty)),
        ))
    }
    let (total, list) =
        SeaRepo::page_with_default::<licence::Entity>(&state.conn, query.page_query.init(), Some(search_option)).await?;
    Ok(Json(Response::success(ResList::new(total, list))))
}

pub async fn save_support(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<support::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(LicenceService::save_support(&state.conn, model).await?)))
}
