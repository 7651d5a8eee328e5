//! data center / rack repo

use crate::repo::model::{rack, rack_accessory, server_room};
use crate::repo::sea::SeaRepo;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

pub struct RackRepo;

impl RackRepo {
    pub async fn get_rack<C: ConnectionTrait>(db: &C, id: &str) -> Result<rack::Model, DbErr> {
        SeaRepo::find_by_id::<rack::Entity, _>(db, id).await
    }

    pub async fn get_server_room<C: ConnectionTrait>(db: &C, id: &str) -> Result<server_room::Model, DbErr> {
        SeaRepo::find_by_id::<server_room::Entity, _>(db, id).await
    }

    /// Other racks of the data center placed on the given grid cell.
    pub async fn racks_at<C: ConnectionTrait>(
        db: &C,
        data_center_id: &str,
        col: i32,
        row: i32,
        exclude_id: Option<&str>,
    ) -> Result<Vec<rack::Model>, DbErr> {
        let mut select = rack::Entity::find()
            .filter(rack::Column::DataCenterId.eq(data_center_id))
            .filter(rack::Column::VisualizationCol.eq(col))
            .filter(rack::Column::VisualizationRow.eq(row))
            .filter(rack::Column::Deleted.eq(0));
        if let Some(id) = exclude_id {
            select = select.filter(rack::Column::Id.ne(id));
        }
        select.all(db).await
    }

    pub async fn find_by_name_in<C: ConnectionTrait>(
        db: &C,
        data_center_id: &str,
        name: &str,
    ) -> Result<Option<rack::Model>, DbErr> {
        rack::Entity::find()
            .filter(rack::Column::DataCenterId.eq(data_center_id))
            .filter(rack::Column::Name.eq(name))
            .one(db)
            .await
    }

    pub async fn accessories_of<C: ConnectionTrait>(
        db: &C,
        rack_id: &str,
    ) -> Result<Vec<rack_accessory::Model>, DbErr> {
        rack_accessory::Entity::find()
            .filter(rack_accessory::Column::RackId.eq(rack_id))
            .filter(rack_accessory::Column::Deleted.eq(0))
            .all(db)
            .await
    }
}
