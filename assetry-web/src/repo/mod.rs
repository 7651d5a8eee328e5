//! repo

pub mod model;
pub mod sea;

use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, DbConn, DbErr, Schema};

use model::*;

/// Creates the missing tables and composite unique indexes.
pub async fn sync_schema(db: &DbConn) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    macro_rules! create_tables {
        ($($m:ident),* $(,)?) => {
            $(
                let mut stmt = schema.create_table_from_entity($m::Entity);
                stmt.if_not_exists();
                db.execute(backend.build(&stmt)).await?;
            )*
        };
    }
    create_tables!(
        accessory,
        asset,
        asset_attachment,
        asset_category,
        asset_history,
        asset_last_hostname,
        asset_licence,
        asset_manufacturer,
        asset_model,
        asset_owner,
        asset_support,
        attachment,
        budget_info,
        coa_oem_os,
        component,
        component_model,
        data_center,
        database,
        database_type,
        device_environment,
        discovery_queue,
        disk_share,
        disk_share_mount,
        environment,
        ip_address,
        ip_alias,
        licence,
        licence_type,
        load_balancer_member,
        load_balancer_pool,
        load_balancer_type,
        load_balancer_virtual_server,
        network,
        network_kind,
        network_rack,
        network_terminator,
        network_terminator_link,
        part_info,
        profile,
        rack,
        rack_accessory,
        report_odt_source,
        report_odt_source_language,
        server_room,
        service,
        software_category,
        support,
        support_type,
        warehouse,
    );
    for stmt in unique_indexes() {
        // mysql has no `create index if not exists`
        if let Err(e) = db.execute(backend.build(&stmt)).await {
            tracing::debug!("skip index: {e}");
        }
    }
    tracing::info!("schema synced");
    Ok(())
}

fn unique_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("uk_last_hostname")
            .table(asset_last_hostname::Entity)
            .col(asset_last_hostname::Column::Prefix)
            .col(asset_last_hostname::Column::Postfix)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_component_model")
            .table(component_model::Entity)
            .col(component_model::Column::Speed)
            .col(component_model::Column::Cores)
            .col(component_model::Column::Size)
            .col(component_model::Column::ComponentType)
            .col(component_model::Column::Family)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_component_index")
            .table(component::Entity)
            .col(component::Column::AssetId)
            .col(component::Column::Kind)
            .col(component::Column::Index)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_component_mount_point")
            .table(component::Entity)
            .col(component::Column::AssetId)
            .col(component::Column::Kind)
            .col(component::Column::MountPoint)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_component_physical_id")
            .table(component::Entity)
            .col(component::Column::AssetId)
            .col(component::Column::Kind)
            .col(component::Column::PhysicalId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_component_path")
            .table(component::Entity)
            .col(component::Column::AssetId)
            .col(component::Column::Kind)
            .col(component::Column::Path)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_disk_share_mount")
            .table(disk_share_mount::Entity)
            .col(disk_share_mount::Column::ShareId)
            .col(disk_share_mount::Column::AssetId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_rack_name")
            .table(rack::Entity)
            .col(rack::Column::Name)
            .col(rack::Column::DataCenterId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_lb_virtual_server")
            .table(load_balancer_virtual_server::Entity)
            .col(load_balancer_virtual_server::Column::AddressId)
            .col(load_balancer_virtual_server::Column::Port)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_lb_member")
            .table(load_balancer_member::Entity)
            .col(load_balancer_member::Column::PoolId)
            .col(load_balancer_member::Column::AddressId)
            .col(load_balancer_member::Column::Port)
            .col(load_balancer_member::Column::AssetId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uk_report_language")
            .table(report_odt_source_language::Entity)
            .col(report_odt_source_language::Column::Language)
            .col(report_odt_source_language::Column::ReportOdtSourceId)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::config::{AppConfig, AppState};
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};

    /// In-memory sqlite on a single connection, schema synced.
    pub async fn memory_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        super::sync_schema(&db).await.unwrap();
        db
    }

    pub async fn memory_state(config: AppConfig) -> AppState {
        AppState {
            conn: memory_db().await,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::sea::{HostnameRepo, SeaRepo};
    use super::testing::memory_db;
    use super::model::warehouse;

    #[tokio::test]
    async fn sync_is_idempotent() {
        let db = memory_db().await;
        super::sync_schema(&db).await.unwrap();
    }

    #[tokio::test]
    async fn hostname_counter_increments() {
        let db = memory_db().await;
        let first = HostnameRepo::increment_hostname(&db, "POLSRV", "").await.unwrap();
        assert_eq!(first.counter, 1);
        let second = HostnameRepo::increment_hostname(&db, "POLSRV", "").await.unwrap();
        assert_eq!(second.counter, 2);
        assert_eq!(second.formatted_hostname(5), "POLSRV00002");
        let other = HostnameRepo::increment_hostname(&db, "POLSRV", "-x").await.unwrap();
        assert_eq!(other.counter, 1);
    }

    #[tokio::test]
    async fn soft_delete_hides_row() {
        let db = memory_db().await;
        let id = SeaRepo::insert_with_default::<warehouse::Entity, _>(
            &db,
            warehouse::Model {
                name: "Warsaw".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let found = SeaRepo::find_by_id::<warehouse::Entity, _>(&db, &id).await.unwrap();
        assert_eq!(found.name, "Warsaw");
        assert_eq!(found.deleted, 0);

        SeaRepo::delete_by_id::<warehouse::Entity, _>(&db, &id).await.unwrap();
        assert!(SeaRepo::find_by_id::<warehouse::Entity, _>(&db, &id).await.is_err());
        assert!(SeaRepo::delete_by_id::<warehouse::Entity, _>(&db, "missing").await.is_err());
    }

    #[tokio::test]
    async fn page_counts_live_rows() {
        let db = memory_db().await;
        for name in ["a", "b", "c"] {
            SeaRepo::insert_with_default::<warehouse::Entity, _>(
                &db,
                warehouse::Model {
                    name: name.to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }
        let (total, list) = SeaRepo::page_with_default::<warehouse::Entity>(&db, (0, 2), None)
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(list.len(), 2);
    }
}
