//! load balancers and databases

use crate::error::AppError;
use crate::repo::model::{
    database, database_type, ip_address, load_balancer_member, load_balancer_type, load_balancer_virtual_server,
};
use crate::repo::sea::{SeaRepo, ServiceRepo};
use sea_orm::{ConnectionTrait, DbConn};
use serde::Serialize;

/// A dictionary row with the number of records using it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountedType<T> {
    #[serde(flatten)]
    pub item: T,
    pub count: u64,
}

fn check_port(port: i32) -> Result<(), AppError> {
    if !(0..=65535).contains(&port) {
        return Err(AppError::field("port", "Ensure this value is between 0 and 65535."));
    }
    Ok(())
}

pub struct LoadBalancerService;

impl LoadBalancerService {
    pub async fn save_virtual_server<C: ConnectionTrait>(
        db: &C,
        model: load_balancer_virtual_server::Model,
    ) -> Result<String, AppError> {
        check_port(model.port)?;
        SeaRepo::find_by_id::<ip_address::Entity, _>(db, &model.address_id).await?;
        SeaRepo::find_by_id::<load_balancer_type::Entity, _>(db, &model.load_balancer_type_id).await?;
        if let Some(found) = ServiceRepo::find_virtual_server(db, &model.address_id, model.port).await? {
            if found.id != model.id {
                return Err(AppError::field(
                    "__all__",
                    "Load balancer virtual server with this address and port already exists.",
                ));
            }
        }
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<load_balancer_virtual_server::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<load_balancer_virtual_server::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn save_member<C: ConnectionTrait>(db: &C, model: load_balancer_member::Model) -> Result<String, AppError> {
        check_port(model.port)?;
        if let Some(found) = ServiceRepo::find_member(db, &model).await? {
            if found.id != model.id {
                return Err(AppError::field(
                    "__all__",
                    "Load balancer member with this pool, address, port and asset already exists.",
                ));
            }
        }
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<load_balancer_member::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<load_balancer_member::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn types_with_count(
        db: &DbConn,
        types: Vec<load_balancer_type::Model>,
    ) -> Result<Vec<CountedType<load_balancer_type::Model>>, AppError> {
        let mut items = Vec::with_capacity(types.len());
        for item in types {
            let count = ServiceRepo::count_virtual_servers(db, &item.id).await?;
            items.push(CountedType { item, count });
        }
        Ok(items)
    }
}

pub struct DatabaseService;

impl DatabaseService {
    pub async fn save_database<C: ConnectionTrait>(db: &C, model: database::Model) -> Result<String, AppError> {
        if model.name.trim().is_empty() {
            return Err(AppError::field("name", "This field is required."));
        }
        SeaRepo::find_by_id::<database_type::Entity, _>(db, &model.database_type_id).await?;
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<database::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<database::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn types_with_count(
        db: &DbConn,
        types: Vec<database_type::Model>,
    ) -> Result<Vec<CountedType<database_type::Model>>, AppError> {
        let mut items = Vec::with_capacity(types.len());
        for item in types {
            let count = ServiceRepo::count_databases(db, &item.id).await?;
            items.push(CountedType { item, count });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::memory_db;
    use crate::service::ip_address::IpAddressService;

    #[tokio::test]
    async fn virtual_server_address_port_unique() {
        let db = memory_db().await;
        let address_id = IpAddressService::save_address(
            &db,
            ip_address::Model {
                address: "10.0.0.10".to_string(),
                ..Default::default()
            },
            true,
        )
        .await
        .unwrap();
        let type_id = SeaRepo::insert_with_default::<load_balancer_type::Entity, _>(
            &db,
            load_balancer_type::Model {
                name: "F5".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let server = load_balancer_virtual_server::Model {
            name: "www".to_string(),
            address_id,
            port: 443,
            load_balancer_type_id: type_id.clone(),
            ..Default::default()
        };
        LoadBalancerService::save_virtual_server(&db, server.clone()).await.unwrap();
        assert!(LoadBalancerService::save_virtual_server(&db, server.clone()).await.is_err());

        let bad_port = load_balancer_virtual_server::Model { port: 70000, ..server };
        assert!(LoadBalancerService::save_virtual_server(&db, bad_port).await.is_err());

        let types = vec![SeaRepo::find_by_id::<load_balancer_type::Entity, _>(&db, &type_id).await.unwrap()];
        let counted = LoadBalancerService::types_with_count(&db, types).await.unwrap();
        assert_eq!(counted[0].count, 1);
    }

    #[tokio::test]
    async fn member_unique() {
        let db = memory_db().await;
        let member = load_balancer_member::Model {
            address_id: "ip1".to_string(),
            port: 80,
            pool_id: "p1".to_string(),
            asset_id: "a1".to_string(),
            enabled: true,
            ..Default::default()
        };
        LoadBalancerService::save_member(&db, member.clone()).await.unwrap();
        assert!(LoadBalancerService::save_member(&db, member.clone()).await.is_err());
        let other_port = load_balancer_member::Model { port: 81, ..member };
        LoadBalancerService::save_member(&db, other_port).await.unwrap();
    }

    #[tokio::test]
    async fn database_needs_type() {
        let db = memory_db().await;
        let orphan = database::Model {
            name: "billing".to_string(),
            database_type_id: "missing".to_string(),
            ..Default::default()
        };
        assert!(DatabaseService::save_database(&db, orphan.clone()).await.is_err());

        let type_id = SeaRepo::insert_with_default::<database_type::Entity, _>(
            &db,
            database_type::Model {
                name: "postgres".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        DatabaseService::save_database(&db, database::Model { database_type_id: type_id.clone(), ..orphan })
            .await
            .unwrap();
        let types = vec![SeaRepo::find_by_id::<database_type::Entity, _>(&db, &type_id).await.unwrap()];
        assert_eq!(DatabaseService::types_with_count(&db, types).await.unwrap()[0].count, 1);
    }
}
