//! licence repo

use crate::repo::model::{asset_licence, licence};
use crate::repo::sea::SeaRepo;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

pub struct LicenceRepo;

impl LicenceRepo {
    pub async fn get_licence<C: ConnectionTrait>(db: &C, id: &str) -> Result<licence::Model, DbErr> {
        SeaRepo::find_by_id::<licence::Entity, _>(db, id).await
    }

    /// assets the licence is assigned to
    pub async fn used_seats<C: ConnectionTrait>(db: &C, licence_id: &str) -> Result<u64, DbErr> {
        asset_licence::Entity::find()
            .filter(asset_licence::Column::LicenceId.eq(licence_id))
            .count(db)
            .await
    }

    pub async fn find_by_niw<C: ConnectionTrait>(db: &C, niw: &str) -> Result<Option<licence::Model>, DbErr> {
        licence::Entity::find()
            .filter(licence::Column::Niw.eq(niw))
            .one(db)
            .await
    }
}
