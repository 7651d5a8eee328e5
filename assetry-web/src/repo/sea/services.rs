//! load balancer, database and report template repo

use crate::repo::model::{
    database, load_balancer_member, load_balancer_virtual_server, report_odt_source, report_odt_source_language,
};
use sea_orm::{ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

pub struct ServiceRepo;

impl ServiceRepo {
    pub async fn find_virtual_server<C: ConnectionTrait>(
        db: &C,
        address_id: &str,
        port: i32,
    ) -> Result<Option<load_balancer_virtual_server::Model>, DbErr> {
        load_balancer_virtual_server::Entity::find()
            .filter(load_balancer_virtual_server::Column::AddressId.eq(address_id))
            .filter(load_balancer_virtual_server::Column::Port.eq(port))
            .one(db)
            .await
    }

    pub async fn find_member<C: ConnectionTrait>(
        db: &C,
        member: &load_balancer_member::Model,
    ) -> Result<Option<load_balancer_member::Model>, DbErr> {
        load_balancer_member::Entity::find()
            .filter(load_balancer_member::Column::PoolId.eq(member.pool_id.as_str()))
            .filter(load_balancer_member::Column::AddressId.eq(member.address_id.as_str()))
            .filter(load_balancer_member::Column::Port.eq(member.port))
            .filter(load_balancer_member::Column::AssetId.eq(member.asset_id.as_str()))
            .one(db)
            .await
    }

    pub async fn report_languages<C: ConnectionTrait>(
        db: &C,
        source_id: &str,
    ) -> Result<Vec<report_odt_source_language::Model>, DbErr> {
        report_odt_source_language::Entity::find()
            .filter(report_odt_source_language::Column::ReportOdtSourceId.eq(source_id))
            .filter(report_odt_source_language::Column::Deleted.eq(0))
            .order_by_asc(report_odt_source_language::Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn count_virtual_servers(db: &DbConn, type_id: &str) -> Result<u64, DbErr> {
        load_balancer_virtual_server::Entity::find()
            .filter(load_balancer_virtual_server::Column::LoadBalancerTypeId.eq(type_id))
            .filter(load_balancer_virtual_server::Column::Deleted.eq(0))
            .count(db)
            .await
    }

    pub async fn count_databases(db: &DbConn, type_id: &str) -> Result<u64, DbErr> {
        database::Entity::find()
            .filter(database::Column::DatabaseTypeId.eq(type_id))
            .filter(database::Column::Deleted.eq(0))
            .count(db)
            .await
    }

    pub async fn find_report_source<C: ConnectionTrait>(
        db: &C,
        slug: &str,
    ) -> Result<Option<report_odt_source::Model>, DbErr> {
        report_odt_source::Entity::find()
            .filter(report_odt_source::Column::Slug.eq(slug))
            .one(db)
            .await
    }
}
