//! ip address save rules

use crate::error::AppError;
use crate::repo::model::{ip_address, ip_alias};
use crate::repo::sea::{IpAddressRepo, SeaRepo};
use crate::service::network::NetworkService;
use assetry_common::{ipv4_to_int, is_private_ipv4};
use sea_orm::ConnectionTrait;

pub struct IpAddressService;

impl IpAddressService {
    /// Derives number, network and visibility from the address and stores it.
    ///
    /// With `allow_device_change` off an address inside a known network keeps
    /// the asset it is assigned to.
    pub async fn save_address<C: ConnectionTrait>(
        db: &C,
        mut model: ip_address::Model,
        allow_device_change: bool,
    ) -> Result<String, AppError> {
        model.address = model.address.trim().to_string();
        let number = ipv4_to_int(&model.address).map_err(|_| AppError::field("address", "Enter a valid IPv4 address."))?;
        model.number = i64::from(number);
        model.hostname = model.hostname.filter(|h| !h.trim().is_empty());
        model.is_public = !is_private_ipv4(&model.address);

        let network = NetworkService::from_ip(db, &model.address).await?;
        model.network_id = network.as_ref().map(|n| n.id.clone());
        if network.as_ref().is_some_and(|n| n.ignore_addresses) {
            model.asset_id = None;
        }

        if let Some(existing) = IpAddressRepo::find_by_address(db, &model.address).await? {
            // 已删除的地址直接复用原记录
            let live = existing.deleted == 0;
            if model.id.is_empty() {
                if live && existing.asset_id.is_some() {
                    return Err(AppError::field("address", "There exists a device with this address"));
                }
                model.id = existing.id.clone();
                model.deleted = 0;
            } else if existing.id != model.id {
                return Err(AppError::field("address", "Ip address with this address already exists."));
            }
            if live && !allow_device_change && network.is_some() {
                assert_same_device(&existing, &model)?;
            }
        }

        if model.is_management {
            if let Some(asset_id) = model.asset_id.as_deref() {
                let managements = IpAddressRepo::management_of(db, asset_id).await?;
                if managements.iter().any(|m| m.id != model.id) {
                    return Err(AppError::field("is_management", "This asset already has management IP."));
                }
            }
        }

        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<ip_address::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<ip_address::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn save_alias<C: ConnectionTrait>(db: &C, mut model: ip_alias::Model) -> Result<String, AppError> {
        model.hostname = model.hostname.trim().to_string();
        SeaRepo::find_by_id::<ip_address::Entity, _>(db, &model.address_id).await?;
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<ip_alias::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<ip_alias::Entity, _>(db, model).await?.id)
        }
    }
}

fn assert_same_device(existing: &ip_address::Model, changed: &ip_address::Model) -> Result<(), AppError> {
    match (&existing.asset_id, &changed.asset_id) {
        (Some(old), new) if new.as_ref() != Some(old) => Err(AppError::Integrity(format!(
            "Trying to assign device ID #{} for IP {} but device ID #{} already assigned.",
            new.as_deref().unwrap_or("None"),
            changed.address,
            old
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::model::network;
    use crate::repo::testing::memory_db;

    async fn add_network(db: &sea_orm::DatabaseConnection, address: &str, ignore_addresses: bool) -> String {
        NetworkService::save_network(
            db,
            network::Model {
                name: address.to_string(),
                address: address.to_string(),
                ignore_addresses,
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap()
    }

    fn address(address: &str, asset_id: Option<&str>) -> ip_address::Model {
        ip_address::Model {
            address: address.to_string(),
            asset_id: asset_id.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn derived_fields() {
        let db = memory_db().await;
        let net_id = add_network(&db, "10.0.0.0/24", false).await;
        let id = IpAddressService::save_address(&db, address("10.0.0.7", Some("a1")), true).await.unwrap();
        let saved = SeaRepo::find_by_id::<ip_address::Entity, _>(&db, &id).await.unwrap();
        assert_eq!(saved.number, i64::from(ipv4_to_int("10.0.0.7").unwrap()));
        assert_eq!(saved.network_id.as_deref(), Some(net_id.as_str()));
        assert!(!saved.is_public);

        let public = IpAddressService::save_address(&db, address("8.8.4.4", None), true).await.unwrap();
        let public = SeaRepo::find_by_id::<ip_address::Entity, _>(&db, &public).await.unwrap();
        assert!(public.is_public);
        assert_eq!(public.network_id, None);
    }

    #[tokio::test]
    async fn ignored_network_drops_asset() {
        let db = memory_db().await;
        add_network(&db, "10.9.0.0/24", true).await;
        let id = IpAddressService::save_address(&db, address("10.9.0.1", Some("a1")), true).await.unwrap();
        let saved = SeaRepo::find_by_id::<ip_address::Entity, _>(&db, &id).await.unwrap();
        assert_eq!(saved.asset_id, None);
    }

    #[tokio::test]
    async fn device_change_is_integrity_error() {
        let db = memory_db().await;
        add_network(&db, "10.0.0.0/24", false).await;
        let id = IpAddressService::save_address(&db, address("10.0.0.9", Some("a1")), true).await.unwrap();
        let mut changed = SeaRepo::find_by_id::<ip_address::Entity, _>(&db, &id).await.unwrap();
        changed.asset_id = Some("a2".to_string());
        let err = IpAddressService::save_address(&db, changed.clone(), false).await.unwrap_err();
        assert!(matches!(err, AppError::Integrity(msg) if msg.contains("device ID #a1 already assigned")));

        IpAddressService::save_address(&db, changed, true).await.unwrap();
    }

    #[tokio::test]
    async fn deleted_address_is_reused() {
        let db = memory_db().await;
        let id = IpAddressService::save_address(&db, address("10.2.0.1", Some("a1")), true).await.unwrap();
        SeaRepo::delete_by_id::<ip_address::Entity, _>(&db, &id).await.unwrap();

        let again = IpAddressService::save_address(&db, address("10.2.0.1", Some("a2")), false).await.unwrap();
        assert_eq!(again, id);
        let saved = SeaRepo::find_by_id::<ip_address::Entity, _>(&db, &id).await.unwrap();
        assert_eq!(saved.asset_id.as_deref(), Some("a2"));
        assert_eq!(saved.deleted, 0);
    }

    #[tokio::test]
    async fn one_management_address_per_asset() {
        let db = memory_db().await;
        let mut first = address("10.1.0.1", Some("a1"));
        first.is_management = true;
        IpAddressService::save_address(&db, first, true).await.unwrap();
        let mut second = address("10.1.0.2", Some("a1"));
        second.is_management = true;
        let Err(AppError::Form(errors)) = IpAddressService::save_address(&db, second, true).await else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("is_management").unwrap()[0], "This asset already has management IP.");
    }
}
