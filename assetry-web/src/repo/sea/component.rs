//! component repo

use crate::common::{ComponentKind, ComponentType};
use crate::repo::model::{component, component_model, disk_share, disk_share_mount};
use crate::repo::sea::SeaRepo;
use sea_orm::{ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

pub struct ComponentRepo;

impl ComponentRepo {
    /// Looks a model up by its unique key (speed, cores, size, type, family).
    pub async fn find_model_by_key<C: ConnectionTrait>(
        db: &C,
        model: &component_model::Model,
    ) -> Result<Option<component_model::Model>, DbErr> {
        component_model::Entity::find()
            .filter(component_model::Column::Speed.eq(model.speed))
            .filter(component_model::Column::Cores.eq(model.cores))
            .filter(component_model::Column::Size.eq(model.size))
            .filter(component_model::Column::ComponentType.eq(model.component_type))
            .filter(component_model::Column::Family.eq(model.family.as_str()))
            .one(db)
            .await
    }

    pub async fn get_model<C: ConnectionTrait>(db: &C, id: &str) -> Result<component_model::Model, DbErr> {
        SeaRepo::find_by_id::<component_model::Entity, _>(db, id).await
    }

    pub async fn models_of_type<C: ConnectionTrait>(
        db: &C,
        component_type: ComponentType,
    ) -> Result<Vec<component_model::Model>, DbErr> {
        component_model::Entity::find()
            .filter(component_model::Column::ComponentType.eq(component_type))
            .filter(component_model::Column::Deleted.eq(0))
            .all(db)
            .await
    }

    pub async fn count_by_model(db: &DbConn, model_id: &str) -> Result<u64, DbErr> {
        component::Entity::find()
            .filter(component::Column::ModelId.eq(model_id))
            .filter(component::Column::Deleted.eq(0))
            .count(db)
            .await
    }

    pub async fn of_asset<C: ConnectionTrait>(
        db: &C,
        asset_id: &str,
        kind: Option<ComponentKind>,
    ) -> Result<Vec<component::Model>, DbErr> {
        let mut select = component::Entity::find()
            .filter(component::Column::AssetId.eq(asset_id))
            .filter(component::Column::Deleted.eq(0));
        if let Some(kind) = kind {
            select = select.filter(component::Column::Kind.eq(kind));
        }
        select.all(db).await
    }

    pub async fn find_by_mac<C: ConnectionTrait>(db: &C, mac: &str) -> Result<Option<component::Model>, DbErr> {
        component::Entity::find()
            .filter(component::Column::Mac.eq(mac))
            .one(db)
            .await
    }

    pub async fn find_share_by_wwn<C: ConnectionTrait>(
        db: &C,
        wwn: &str,
    ) -> Result<Option<disk_share::Model>, DbErr> {
        disk_share::Entity::find()
            .filter(disk_share::Column::Wwn.eq(wwn))
            .filter(disk_share::Column::Deleted.eq(0))
            .one(db)
            .await
    }

    pub async fn find_mount<C: ConnectionTrait>(
        db: &C,
        share_id: &str,
        asset_id: &str,
    ) -> Result<Option<disk_share_mount::Model>, DbErr> {
        disk_share_mount::Entity::find()
            .filter(disk_share_mount::Column::ShareId.eq(share_id))
            .filter(disk_share_mount::Column::AssetId.eq(asset_id))
            .filter(disk_share_mount::Column::Deleted.eq(0))
            .one(db)
            .await
    }
}
