//! asset repo

use crate::common::{AssetStatus, Orientation};
use crate::repo::model::{
    asset, asset_attachment, asset_history, asset_licence, asset_support, part_info,
};
use crate::repo::sea::SeaRepo;
use chrono::{DateTime, Local};
use sea_orm::sea_query::{ConditionExpression, Expr};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    Order, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

pub struct AssetRepo;

impl AssetRepo {
    pub async fn save_asset<C: ConnectionTrait>(db: &C, model: asset::Model) -> anyhow::Result<String> {
        if model.id.is_empty() {
            AssetRepo::insert_asset_one(db, model).await
        } else {
            AssetRepo::update_asset_by_id(db, model)
                .await
                .map(|data| anyhow::Ok(data.id))?
        }
    }

    /// Writes every column of the model back.
    pub async fn update_asset_by_id<C: ConnectionTrait>(
        db: &C,
        model: asset::Model,
    ) -> anyhow::Result<asset::Model> {
        SeaRepo::update_model::<asset::Entity, _>(db, model).await
    }

    pub async fn insert_asset_one<C: ConnectionTrait>(db: &C, data: asset::Model) -> anyhow::Result<String> {
        SeaRepo::insert_with_default::<asset::Entity, _>(db, data).await
    }

    pub async fn get_asset_by_id<C: ConnectionTrait>(db: &C, id: &str) -> Result<asset::Model, DbErr> {
        SeaRepo::find_by_id::<asset::Entity, _>(db, id).await
    }

    pub async fn find_asset_by(
        db: &DbConn,
        pg: (u64, u64),
        search: Option<Vec<ConditionExpression>>,
    ) -> anyhow::Result<(u64, Vec<asset::Model>)> {
        SeaRepo::page_with_default::<asset::Entity>(db, pg, search).await
    }

    pub async fn find_by_ids<C: ConnectionTrait>(db: &C, ids: &[String]) -> Result<Vec<asset::Model>, DbErr> {
        asset::Entity::find()
            .filter(asset::Column::Id.is_in(ids.iter().cloned()))
            .filter(asset::Column::Deleted.eq(0))
            .all(db)
            .await
    }

    pub async fn find_by_barcodes<C: ConnectionTrait>(
        db: &C,
        barcodes: &[String],
    ) -> Result<Vec<asset::Model>, DbErr> {
        asset::Entity::find()
            .filter(asset::Column::Barcode.is_in(barcodes.iter().cloned()))
            .all(db)
            .await
    }

    pub async fn find_by_sns<C: ConnectionTrait>(db: &C, sns: &[String]) -> Result<Vec<asset::Model>, DbErr> {
        asset::Entity::find()
            .filter(asset::Column::Sn.is_in(sns.iter().cloned()))
            .all(db)
            .await
    }

    pub async fn find_by_hostname<C: ConnectionTrait>(
        db: &C,
        hostname: &str,
    ) -> Result<Option<asset::Model>, DbErr> {
        asset::Entity::find()
            .filter(asset::Column::Hostname.eq(hostname))
            .one(db)
            .await
    }

    pub async fn find_in_rack(db: &DbConn, rack_id: &str) -> Result<Vec<asset::Model>, DbErr> {
        asset::Entity::find()
            .filter(asset::Column::RackId.eq(rack_id))
            .filter(asset::Column::Deleted.eq(0))
            .order_by(asset::Column::Position, Order::Asc)
            .all(db)
            .await
    }

    /// Assets sharing rack, position and orientation with the given asset,
    /// the asset itself excluded.
    pub async fn find_at_position(
        db: &DbConn,
        asset: &asset::Model,
        orientation: Orientation,
    ) -> Result<Vec<asset::Model>, DbErr> {
        let mut select = asset::Entity::find()
            .filter(asset::Column::Id.ne(asset.id.as_str()))
            .filter(asset::Column::Orientation.eq(orientation))
            .filter(asset::Column::Deleted.eq(0));
        select = match &asset.rack_id {
            Some(rack) => select.filter(asset::Column::RackId.eq(rack.as_str())),
            None => select.filter(asset::Column::RackId.is_null()),
        };
        select = match asset.position {
            Some(position) => select.filter(asset::Column::Position.eq(position)),
            None => select.filter(asset::Column::Position.is_null()),
        };
        select.order_by(asset::Column::SlotNo, Order::Asc).all(db).await
    }

    pub async fn count_by_model(db: &DbConn, model_id: &str) -> Result<u64, DbErr> {
        asset::Entity::find()
            .filter(asset::Column::ModelId.eq(model_id))
            .filter(asset::Column::Deleted.eq(0))
            .count(db)
            .await
    }

    pub async fn insert_history<C: ConnectionTrait>(
        db: &C,
        entries: Vec<asset_history::Model>,
    ) -> Result<(), DbErr> {
        if entries.is_empty() {
            return Ok(());
        }
        let models = entries.into_iter().map(|mut e| {
            if e.id.is_empty() {
                e.id = Uuid::new_v4().to_string();
            }
            e.into_active_model().reset_all()
        });
        asset_history::Entity::insert_many(models)
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    pub async fn history_of(db: &DbConn, asset_id: &str) -> Result<Vec<asset_history::Model>, DbErr> {
        asset_history::Entity::find()
            .filter(asset_history::Column::AssetId.eq(asset_id))
            .order_by(asset_history::Column::Date, Order::Desc)
            .all(db)
            .await
    }

    /// When the status was last changed to liquidated.
    pub async fn liquidated_at(db: &DbConn, asset_id: &str) -> Result<Option<DateTime<Local>>, DbErr> {
        let latest = asset_history::Entity::find()
            .filter(asset_history::Column::AssetId.eq(asset_id))
            .filter(asset_history::Column::FieldName.eq("status"))
            .filter(asset_history::Column::NewValue.eq(AssetStatus::Liquidated.as_ref()))
            .order_by(asset_history::Column::Date, Order::Desc)
            .one(db)
            .await?;
        Ok(latest.map(|h| h.date))
    }

    pub async fn has_parts<C: ConnectionTrait>(db: &C, device_id: &str) -> Result<bool, DbErr> {
        let count = part_info::Entity::find()
            .filter(part_info::Column::DeviceId.eq(device_id))
            .filter(part_info::Column::Deleted.eq(0))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn parts_of(db: &DbConn, device_id: &str) -> Result<Vec<part_info::Model>, DbErr> {
        part_info::Entity::find()
            .filter(part_info::Column::DeviceId.eq(device_id))
            .filter(part_info::Column::Deleted.eq(0))
            .all(db)
            .await
    }

    pub async fn insert_part_info<C: ConnectionTrait>(db: &C, info: part_info::Model) -> anyhow::Result<String> {
        SeaRepo::insert_with_default::<part_info::Entity, _>(db, info).await
    }

    /// Re-points the part infos of the given part assets at `device_id`.
    pub async fn move_parts<C: ConnectionTrait>(
        db: &C,
        part_asset_ids: &[String],
        device_id: &str,
    ) -> Result<u64, DbErr> {
        let res = part_info::Entity::update_many()
            .col_expr(part_info::Column::DeviceId, Expr::value(device_id))
            .col_expr(part_info::Column::UpdatedAt, Expr::value(Local::now()))
            .filter(part_info::Column::AssetId.is_in(part_asset_ids.iter().cloned()))
            .filter(part_info::Column::Deleted.eq(0))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_part_info_of<C: ConnectionTrait>(db: &C, asset_id: &str) -> anyhow::Result<u64> {
        SeaRepo::update_with_map::<part_info::Entity, _>(
            db,
            serde_json::json!({ "deleted": 1 }),
            serde_json::json!({ "asset_id": asset_id }),
        )
        .await
    }

    pub async fn licence_ids_of<C: ConnectionTrait>(db: &C, asset_id: &str) -> Result<Vec<String>, DbErr> {
        Ok(asset_licence::Entity::find()
            .filter(asset_licence::Column::AssetId.eq(asset_id))
            .all(db)
            .await?
            .into_iter()
            .map(|l| l.licence_id)
            .collect())
    }

    pub async fn replace_licences<C: ConnectionTrait>(
        db: &C,
        asset_id: &str,
        licence_ids: &[String],
    ) -> Result<(), DbErr> {
        asset_licence::Entity::delete_many()
            .filter(asset_licence::Column::AssetId.eq(asset_id))
            .exec(db)
            .await?;
        for licence_id in licence_ids {
            asset_licence::Entity::insert(asset_licence::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                asset_id: Set(asset_id.to_string()),
                licence_id: Set(licence_id.clone()),
            })
            .exec_without_returning(db)
            .await?;
        }
        Ok(())
    }

    pub async fn support_ids_of<C: ConnectionTrait>(db: &C, asset_id: &str) -> Result<Vec<String>, DbErr> {
        Ok(asset_support::Entity::find()
            .filter(asset_support::Column::AssetId.eq(asset_id))
            .all(db)
            .await?
            .into_iter()
            .map(|s| s.support_id)
            .collect())
    }

    pub async fn replace_supports<C: ConnectionTrait>(
        db: &C,
        asset_id: &str,
        support_ids: &[String],
    ) -> Result<(), DbErr> {
        asset_support::Entity::delete_many()
            .filter(asset_support::Column::AssetId.eq(asset_id))
            .exec(db)
            .await?;
        for support_id in support_ids {
            asset_support::Entity::insert(asset_support::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                asset_id: Set(asset_id.to_string()),
                support_id: Set(support_id.clone()),
            })
            .exec_without_returning(db)
            .await?;
        }
        Ok(())
    }

    pub async fn link_attachment<C: ConnectionTrait>(
        db: &C,
        asset_id: &str,
        attachment_id: &str,
    ) -> Result<(), DbErr> {
        asset_attachment::Entity::insert(asset_attachment::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            asset_id: Set(asset_id.to_string()),
            attachment_id: Set(attachment_id.to_string()),
        })
        .exec_without_returning(db)
        .await?;
        Ok(())
    }
}
