//! network / ip address repo

use crate::repo::model::{ip_address, network, network_terminator_link};
use crate::repo::sea::SeaRepo;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Order, QueryFilter, QueryOrder};
use uuid::Uuid;

pub struct NetworkRepo;

impl NetworkRepo {
    pub async fn get_network<C: ConnectionTrait>(db: &C, id: &str) -> Result<network::Model, DbErr> {
        SeaRepo::find_by_id::<network::Entity, _>(db, id).await
    }

    pub async fn all_networks<C: ConnectionTrait>(db: &C) -> Result<Vec<network::Model>, DbErr> {
        network::Entity::find()
            .filter(network::Column::Deleted.eq(0))
            .order_by(network::Column::MinIp, Order::Asc)
            .order_by(network::Column::MaxIp, Order::Desc)
            .all(db)
            .await
    }

    /// Networks containing the number, smallest first.
    pub async fn all_from_number<C: ConnectionTrait>(db: &C, number: i64) -> Result<Vec<network::Model>, DbErr> {
        network::Entity::find()
            .filter(network::Column::MinIp.lte(number))
            .filter(network::Column::MaxIp.gte(number))
            .filter(network::Column::Deleted.eq(0))
            .order_by(network::Column::MinIp, Order::Desc)
            .order_by(network::Column::MaxIp, Order::Asc)
            .all(db)
            .await
    }

    /// Networks of the same data center inside the given network.
    pub async fn contained_in<C: ConnectionTrait>(
        db: &C,
        parent: &network::Model,
    ) -> Result<Vec<network::Model>, DbErr> {
        let mut select = network::Entity::find()
            .filter(network::Column::MinIp.gte(parent.min_ip))
            .filter(network::Column::MaxIp.lte(parent.max_ip))
            .filter(network::Column::Id.ne(parent.id.as_str()))
            .filter(network::Column::Deleted.eq(0));
        select = match &parent.data_center_id {
            Some(dc) => select.filter(network::Column::DataCenterId.eq(dc.as_str())),
            None => select.filter(network::Column::DataCenterId.is_null()),
        };
        select
            .order_by(network::Column::MinIp, Order::Desc)
            .order_by(network::Column::MaxIp, Order::Asc)
            .all(db)
            .await
    }

    pub async fn find_by_address<C: ConnectionTrait>(db: &C, address: &str) -> Result<Option<network::Model>, DbErr> {
        network::Entity::find()
            .filter(network::Column::Address.eq(address))
            .one(db)
            .await
    }

    pub async fn terminator_ids<C: ConnectionTrait>(db: &C, network_id: &str) -> Result<Vec<String>, DbErr> {
        Ok(network_terminator_link::Entity::find()
            .filter(network_terminator_link::Column::NetworkId.eq(network_id))
            .all(db)
            .await?
            .into_iter()
            .map(|l| l.terminator_id)
            .collect())
    }

    pub async fn set_terminators<C: ConnectionTrait>(
        db: &C,
        network_id: &str,
        terminator_ids: &[String],
    ) -> Result<(), DbErr> {
        network_terminator_link::Entity::delete_many()
            .filter(network_terminator_link::Column::NetworkId.eq(network_id))
            .exec(db)
            .await?;
        for terminator_id in terminator_ids {
            network_terminator_link::Entity::insert(network_terminator_link::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                network_id: Set(network_id.to_string()),
                terminator_id: Set(terminator_id.clone()),
            })
            .exec_without_returning(db)
            .await?;
        }
        Ok(())
    }
}

pub struct IpAddressRepo;

impl IpAddressRepo {
    pub async fn find_by_address<C: ConnectionTrait>(
        db: &C,
        address: &str,
    ) -> Result<Option<ip_address::Model>, DbErr> {
        ip_address::Entity::find()
            .filter(ip_address::Column::Address.eq(address))
            .one(db)
            .await
    }

    pub async fn in_range<C: ConnectionTrait>(db: &C, min: i64, max: i64) -> Result<Vec<ip_address::Model>, DbErr> {
        ip_address::Entity::find()
            .filter(ip_address::Column::Number.gte(min))
            .filter(ip_address::Column::Number.lte(max))
            .filter(ip_address::Column::Deleted.eq(0))
            .order_by(ip_address::Column::Number, Order::Asc)
            .all(db)
            .await
    }

    pub async fn management_of<C: ConnectionTrait>(
        db: &C,
        asset_id: &str,
    ) -> Result<Vec<ip_address::Model>, DbErr> {
        ip_address::Entity::find()
            .filter(ip_address::Column::AssetId.eq(asset_id))
            .filter(ip_address::Column::IsManagement.eq(true))
            .filter(ip_address::Column::Deleted.eq(0))
            .all(db)
            .await
    }
}
