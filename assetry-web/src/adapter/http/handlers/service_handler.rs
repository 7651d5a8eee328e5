//! load balancers, databases and report templates

use crate::adapter::http::handlers::crud::{current_user, stamp_user};
use crate::adapter::Response;
use crate::config::AppState;
use crate::error::AppError;
use crate::repo::model::{
    database, database_type, load_balancer_member, load_balancer_type, load_balancer_virtual_server,
    report_odt_source, report_odt_source_language,
};
use crate::repo::sea::CatalogRepo;
use crate::service::report::ReportService;
use crate::service::services::{CountedType, DatabaseService, LoadBalancerService};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

pub async fn save_virtual_server(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<load_balancer_virtual_server::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(
        LoadBalancerService::save_virtual_server(&state.conn, model).await?,
    )))
}

pub async fn save_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<load_balancer_member::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(LoadBalancerService::save_member(&state.conn, model).await?)))
}

pub async fn load_balancer_types(
    State(state): State<AppState>,
) -> Result<Json<Response<Vec<CountedType<load_balancer_type::Model>>>>, AppError> {
    let types = CatalogRepo::list_all::<load_balancer_type::Entity, _>(&state.conn).await?;
    Ok(Json(Response::success(
        LoadBalancerService::types_with_count(&state.conn, types).await?,
    )))
}

pub async fn save_database(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<database::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(DatabaseService::save_database(&state.conn, model).await?)))
}

pub async fn database_types(
    State(state): State<AppState>,
) -> Result<Json<Response<Vec<CountedType<database_type::Model>>>>, AppError> {
    let types = CatalogRepo::list_all::<database_type::Entity, _>(&state.conn).await?;
    Ok(Json(Response::success(DatabaseService::types_with_count(&state.conn, types).await?)))
}

pub async fn save_report_source(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<report_odt_source::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(ReportService::save_source(&state.conn, model).await?)))
}

pub async fn save_report_language(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<report_odt_source_language::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(ReportService::save_language(&state.conn, model).await?)))
}

/// Template path of the first language of the report.
pub async fn report_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Response<Option<String>>>, AppError> {
    Ok(Json(Response::success(ReportService::template(&state.conn, &id).await?)))
}
