use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::adapter::http::handlers::crud::{
    delete_by_id, get_by_id, list_by_name, save_named, save_named_record,
};
use crate::adapter::http::handlers::*;
use crate::adapter::http::middleware::{request_id, ServerTimeLayer};
use crate::config::AppState;
use crate::repo::model::*;

/// `POST /` save, `POST /list`, `GET /:id` and soft `DELETE /:id` of one
/// record type.
macro_rules! record_routes {
    ($entity:ident, $save:expr) => {
        record_routes!($entity, $save, list_by_name::<$entity::Entity>)
    };
    ($entity:ident, $save:expr, $list:expr) => {
        Router::new()
            .route("/", post($save))
            .route("/list", post($list))
            .route(
                "/:id",
                get(get_by_id::<$entity::Entity>).delete(delete_by_id::<$entity::Entity>),
            )
    };
}

/// Dictionaries saved from a bare name.
macro_rules! named_routes {
    ($($path:literal => $entity:ident),* $(,)?) => {
        Router::new()
            $(.nest($path, record_routes!($entity, save_named::<$entity::Entity>)))*
    };
}

fn catalog_routes() -> Router<AppState> {
    named_routes!(
        "/manufacturer" => asset_manufacturer,
        "/owner" => asset_owner,
        "/budget-info" => budget_info,
        "/coa-oem-os" => coa_oem_os,
        "/warehouse" => warehouse,
        "/licence-type" => licence_type,
        "/support-type" => support_type,
        "/accessory" => accessory,
        "/network-kind" => network_kind,
        "/network-terminator" => network_terminator,
        "/discovery-queue" => discovery_queue,
        "/lb-pool" => load_balancer_pool,
    )
    .nest("/service", record_routes!(service, save_named_record::<service::Entity>))
    .nest(
        "/device-environment",
        record_routes!(device_environment, save_named_record::<device_environment::Entity>),
    )
    .nest(
        "/software-category",
        record_routes!(software_category, save_named_record::<software_category::Entity>),
    )
    .nest("/category", record_routes!(asset_category, save_category, list_category))
    .nest("/model", record_routes!(asset_model, save_asset_model, list_asset_model))
    .nest("/profile", record_routes!(profile, save_profile))
}

fn asset_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/asset",
            Router::new()
                .route("/", post(save_asset))
                .route("/list", post(list_asset))
                .route("/:id", get(get_asset_by_id).delete(delete_asset_by_id))
                .route("/:id/history", get(asset_history))
                .route("/:id/components", get(asset_components))
                .route("/statuses/:id", get(asset_statuses)),
        )
        // 同一层级的参数名必须一致
        .nest(
            "/device",
            Router::new()
                .route("/:key", post(add_device))
                .route("/:key/:id", put(edit_device))
                .route("/:key/parts/move", post(move_parts))
                .route("/:key/split", get(split_initial).post(split_device))
                .route("/:key/related", get(related_devices)),
        )
        .nest("/licence", record_routes!(licence, save_licence, list_licence))
        .nest("/support", record_routes!(support, save_support))
        .nest(
            "/attachment",
            Router::new().route("/:id", get(get_by_id::<attachment::Entity>).post(upload_attachment)),
        )
}

fn datacenter_routes() -> Router<AppState> {
    Router::new()
        .nest("/data-center", record_routes!(data_center, save_data_center))
        .nest("/server-room", record_routes!(server_room, save_server_room))
        .nest("/rack", record_routes!(rack, save_rack).route("/:id/info", get(rack_info)))
        .nest("/rack-accessory", record_routes!(rack_accessory, save_rack_accessory))
}

fn network_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/network",
            record_routes!(network, save_network, list_network)
                .route("/tree", get(network_tree))
                .route("/copy", post(copy_networks))
                .route("/:id/usage", get(network_usage)),
        )
        .nest("/environment", record_routes!(environment, save_environment))
        .nest("/ip-address", record_routes!(ip_address, save_ip_address, list_ip_address))
        .nest("/ip-alias", record_routes!(ip_alias, save_ip_alias))
}

fn component_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/component-model",
            Router::new()
                .route("/", post(create_component_model))
                .route("/list", post(list_by_name::<component_model::Entity>))
                .route("/:id", get(get_by_id::<component_model::Entity>))
                .route("/:id/count", get(component_model_count))
                .route("/type/:id", get(component_models_of_type)),
        )
        .nest(
            "/component",
            record_routes!(component, save_component)
                .route("/software", post(create_software))
                .route("/os", post(create_operating_system)),
        )
        .nest("/disk-share", record_routes!(disk_share, save_disk_share))
        .nest("/disk-share-mount", record_routes!(disk_share_mount, save_disk_share_mount))
}

fn service_routes() -> Router<AppState> {
    Router::new()
        .nest("/lb-virtual-server", record_routes!(load_balancer_virtual_server, save_virtual_server))
        .nest("/lb-member", record_routes!(load_balancer_member, save_member))
        .nest(
            "/lb-type",
            record_routes!(load_balancer_type, save_named::<load_balancer_type::Entity>)
                .route("/counted", get(load_balancer_types)),
        )
        .nest("/database", record_routes!(database, save_database))
        .nest(
            "/database-type",
            record_routes!(database_type, save_named::<database_type::Entity>)
                .route("/counted", get(database_types)),
        )
        .nest(
            "/report",
            record_routes!(report_odt_source, save_report_source).route("/:id/template", get(report_template)),
        )
        .nest(
            "/report-language",
            record_routes!(report_odt_source_language, save_report_language),
        )
}

pub async fn routes(state: AppState) -> Router {
    let api = Router::new()
        .merge(catalog_routes())
        .merge(asset_routes())
        .merge(datacenter_routes())
        .merge(network_routes())
        .merge(component_routes())
        .merge(service_routes());
    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(ServerTimeLayer)
                .layer(from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn route_table_has_no_conflicts() {
        // 路由冲突会在构建时 panic
        let _router = routes(AppState::default()).await;
    }
}
