//! catalog repo: categories, models, profiles and the plain named tables

use crate::common::AssetType;
use crate::repo::model::{asset_category, asset_model, profile};
use crate::repo::sea::SeaRepo;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

pub struct CatalogRepo;

impl CatalogRepo {
    /// Row of `E` whose `name` column equals `name`, deleted rows included
    /// since they keep holding the unique index.
    pub async fn find_by_name<E, C>(db: &C, name: &str) -> Result<Option<E::Model>, DbErr>
    where
        E: EntityTrait,
        C: ConnectionTrait,
    {
        E::find().filter(SeaRepo::column::<E>("name")?.eq(name)).one(db).await
    }

    pub async fn list_all<E, C>(db: &C) -> Result<Vec<E::Model>, DbErr>
    where
        E: EntityTrait,
        C: ConnectionTrait,
    {
        let mut select = E::find();
        if let Ok(deleted) = SeaRepo::column::<E>("deleted") {
            select = select.filter(deleted.eq(0));
        }
        if let Ok(name) = SeaRepo::column::<E>("name") {
            select = select.order_by_asc(name);
        }
        select.all(db).await
    }

    pub async fn get_category<C: ConnectionTrait>(db: &C, id: &str) -> Result<asset_category::Model, DbErr> {
        SeaRepo::find_by_id::<asset_category::Entity, _>(db, id).await
    }

    pub async fn find_category_by_slug<C: ConnectionTrait>(
        db: &C,
        slug: &str,
    ) -> Result<Option<asset_category::Model>, DbErr> {
        asset_category::Entity::find()
            .filter(asset_category::Column::Slug.eq(slug))
            .one(db)
            .await
    }

    pub async fn get_model<C: ConnectionTrait>(db: &C, id: &str) -> Result<asset_model::Model, DbErr> {
        SeaRepo::find_by_id::<asset_model::Entity, _>(db, id).await
    }

    pub async fn get_or_create_model<C: ConnectionTrait>(
        db: &C,
        name: &str,
        asset_type: AssetType,
    ) -> anyhow::Result<asset_model::Model> {
        if let Some(found) = CatalogRepo::find_by_name::<asset_model::Entity, _>(db, name).await? {
            if found.deleted != 0 {
                SeaRepo::restore::<asset_model::Entity, _>(db, &found.id).await?;
                return Ok(CatalogRepo::get_model(db, &found.id).await?);
            }
            return Ok(found);
        }
        let model = asset_model::Model {
            name: name.to_string(),
            asset_type: Some(asset_type),
            ..Default::default()
        };
        let id = SeaRepo::insert_with_default::<asset_model::Entity, _>(db, model).await?;
        tracing::info!(model_id = %id, "asset model {name} created");
        Ok(CatalogRepo::get_model(db, &id).await?)
    }

    pub async fn get_profile<C: ConnectionTrait>(db: &C, id: &str) -> Result<profile::Model, DbErr> {
        SeaRepo::find_by_id::<profile::Entity, _>(db, id).await
    }
}
