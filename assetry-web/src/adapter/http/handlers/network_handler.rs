use crate::adapter::cmd::network::{EnvironmentSaveCmd, IpAddressSaveCmd, NetworkCopyCmd, NetworkSaveCmd};
use crate::adapter::http::handlers::crud::{base_of, current_user, stamp_user};
use crate::adapter::query::network::{IpAddressListQuery, NetworkListQuery};
use crate::adapter::{ResList, Response};
use crate::config::AppState;
use crate::error::{AppError, AppJson};
use crate::repo::model::{environment, ip_address, ip_alias, network};
use crate::repo::sea::SeaRepo;
use crate::service::ip_address::IpAddressService;
use crate::service::network::{NetworkNode, NetworkService, NetworkUsage};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use sea_orm::sea_query::ConditionExpression;
use sea_orm::{ColumnTrait, Condition};

const DEFAULT_RESERVED: i32 = 10;

pub async fn save_network(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<NetworkSaveCmd>,
) -> Result<Json<Response<String>>, AppError> {
    let fresh = network::Model {
        reserved: DEFAULT_RESERVED,
        ..Default::default()
    };
    let base = base_of::<network::Entity, _>(&state.conn, param.id.as_deref(), fresh).await?;
    let mut model: network::Model = assetry_common::merge(&param, &base)?;
    stamp_user(&mut model, &current_user(&headers))?;
    let id = NetworkService::save_network(&state.conn, model, param.terminators.clone()).await?;
    Ok(Json(Response::success(id)))
}

pub async fn list_network(
    State(state): State<AppState>,
    Json(query): Json<NetworkListQuery>,
) -> Result<Json<Response<ResList<network::Model>>>, AppError> {
    let mut search_option = Vec::new();
    if let Some(name) = query.name.filter(|v| !v.is_empty()) {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(network::Column::Name.contains(name)),
        ))
    }
    if let Some(address) = query.address.filter(|v| !v.is_empty()) {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(network::Column::Address.contains(address)),
        ))
    }
    if let Some(dc) = query.data_center_id.filter(|v| !v.is_empty()) {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(network::Column::DataCenterId.eq(dc)),
        ))
    }
    if let Some(env) = query.environment_id.filter(|v| !v.is_empty()) {
        search_option.push(ConditionExpression::Condition(
            Condition::all().add(network::Column::EnvironmentId.eq(env)),
        ))
    }
    let (total, list) =
        SeaRepo::page_with_default::<network::Entity>(&state.conn, query.page_query.init(), Some(search_option)).await?;
    Ok(Json(Response::success(ResList::new(total, list))))
}

pub async fn network_tree(State(state): State<AppState>) -> Result<Json<Response<Vec<NetworkNode>>>, AppError> {
    Ok(Json(Response::success(NetworkService::tree(&state.conn).await?)))
}

pub async fn network_usage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Response<NetworkUsage>>, AppError> {
    Ok(Json(Response::success(NetworkService::usage(&state.conn, &id).await?)))
}

/// Copies the selected networks; the data carries one message per network
/// that was not copied.
pub async fn copy_networks(
    State(state): State<AppState>,
    AppJson(param): AppJson<NetworkCopyCmd>,
) -> Result<Json<Response<Vec<String>>>, AppError> {
    let errors = NetworkService::copy_networks(&state.conn, &param.ids).await?;
    Ok(Json(Response::success(errors)))
}

pub async fn save_environment(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<EnvironmentSaveCmd>,
) -> Result<Json<Response<String>>, AppError> {
    let base = base_of::<environment::Entity, _>(&state.conn, param.id.as_deref(), environment::Model::default()).await?;
    let mut model: environment::Model = assetry_common::merge(&param, &base)?;
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(NetworkService::save_environment(&state.conn, model).await?)))
}

pub async fn save_ip_address(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(param): AppJson<IpAddressSaveCmd>,
) -> Result<Json<Response<String>>, AppError> {
    let base = base_of::<ip_address::Entity, _>(&state.conn, param.id.as_deref(), ip_address::Model::default()).await?;
    let mut model: ip_address::Model = assetry_common::merge(&param, &base)?;
    stamp_user(&mut model, &current_user(&headers))?;
    let id = IpAddressService::save_address(&state.conn, model, param.allow_device_change).await?;
    Ok(Json(Response::success(id)))
}

pub async fn list_ip_address(
    State(state): State<AppState>,
    Json(query): Json<IpAddressListQuery>,
) -> Result<Json<Response<ResList<ip_address::Model>>>, AppError> {
    let mut search_option = Vec::new();
    for (column, value) in [
        (ip_address::Column::Address, query.address),
        (ip_address::Column::Hostname, query.hostname),
    ] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            search_option.push(ConditionExpression::Condition(
                Condition::all().add(column.contains(value)),
            ))
        }
    }
    for (column, value) in [
        (ip_address::Column::AssetId, query.asset_id),
        (ip_address::Column::NetworkId, query.network_id),
    ] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            search_option.push(ConditionExpression::Condition(
                Condition::all().add(column.eq(value)),
            ))
        }
    }
    let (total, list) =
        SeaRepo::page_with_default::<ip_address::Entity>(&state.conn, query.page_query.init(), Some(search_option))
            .await?;
    Ok(Json(Response::success(ResList::new(total, list))))
}

pub async fn save_ip_alias(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut model): Json<ip_alias::Model>,
) -> Result<Json<Response<String>>, AppError> {
    stamp_user(&mut model, &current_user(&headers))?;
    Ok(Json(Response::success(IpAddressService::save_alias(&state.conn, model).await?)))
}
