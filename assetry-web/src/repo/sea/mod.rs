mod asset;
mod catalog;
mod component;
mod datacenter;
mod hostname;
mod licence;
mod network;
mod services;

pub use asset::*;
pub use catalog::*;
pub use component::*;
pub use datacenter::*;
pub use hostname::*;
pub use licence::*;
pub use network::*;
pub use services::*;

use std::str::FromStr;

use crate::repo::model::Stamped;
use chrono::Local;
use sea_orm::sea_query::{ConditionExpression, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr,
    EntityTrait, FromQueryResult, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Value,
};
use serde_json::Map;
use uuid::Uuid;

/// Generic helpers over any entity carrying the bookkeeping columns.
pub struct SeaRepo;

impl SeaRepo {
    pub fn column<E: EntityTrait>(name: &str) -> Result<E::Column, DbErr> {
        E::Column::from_str(name).map_err(|_| {
            DbErr::Custom(format!(
                "column {name} does not exist on {}",
                E::default().table_name()
            ))
        })
    }

    pub async fn insert_with_default<E, C>(db: &C, mut data: E::Model) -> anyhow::Result<String>
    where
        E: EntityTrait,
        E::Model: Stamped + IntoActiveModel<E::ActiveModel>,
        C: ConnectionTrait,
    {
        let id = match data.id() {
            "" => Uuid::new_v4().to_string(),
            id => id.to_string(),
        };
        data.stamp(id.clone(), Local::now());
        E::insert(data.into_active_model().reset_all())
            .exec_without_returning(db)
            .await?;
        Ok(id)
    }

    /// Saves the `Set` fields of the active model and bumps `updated_at`.
    pub async fn update_with_default<E, C>(
        db: &C,
        mut active_model: E::ActiveModel,
    ) -> anyhow::Result<E::Model>
    where
        E: EntityTrait,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: Send,
        C: ConnectionTrait,
    {
        if let Ok(col) = SeaRepo::column::<E>("updated_at") {
            active_model.set(col, Value::from(Local::now()));
        }
        Ok(active_model.update(db).await?)
    }

    /// Writes every column of the model back, creation stamps excluded.
    pub async fn update_model<E, C>(db: &C, model: E::Model) -> anyhow::Result<E::Model>
    where
        E: EntityTrait,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: Send,
        C: ConnectionTrait,
    {
        let mut active_model = model.into_active_model().reset_all();
        for name in ["created_at", "created_by"] {
            if let Ok(col) = SeaRepo::column::<E>(name) {
                active_model.not_set(col);
            }
        }
        SeaRepo::update_with_default::<E, C>(db, active_model).await
    }

    pub async fn find_by_id<E, C>(db: &C, id: &str) -> Result<E::Model, DbErr>
    where
        E: EntityTrait,
        C: ConnectionTrait,
    {
        let mut cond = Condition::all().add(SeaRepo::column::<E>("id")?.eq(id));
        if let Ok(deleted) = SeaRepo::column::<E>("deleted") {
            cond = cond.add(deleted.eq(0));
        }
        E::find().filter(cond).one(db).await?.ok_or_else(|| {
            DbErr::RecordNotFound(format!("{} {}", E::default().table_name(), id))
        })
    }

    pub async fn page_with_default<E>(
        db: &DbConn,
        pg: (u64, u64),
        search: Option<Vec<ConditionExpression>>,
    ) -> anyhow::Result<(u64, Vec<E::Model>)>
    where
        E: EntityTrait,
        E::Model: FromQueryResult + Send + Sync,
    {
        let mut cond = Condition::all();
        if let Ok(deleted) = SeaRepo::column::<E>("deleted") {
            cond = cond.add(deleted.eq(0));
        }
        for expr in search.unwrap_or_default() {
            cond = cond.add(expr);
        }
        let mut select = E::find().filter(cond);
        if let Ok(created_at) = SeaRepo::column::<E>("created_at") {
            select = select.order_by_desc(created_at);
        }
        let paginator = select.paginate(db, pg.1);
        let total = paginator.num_items().await?;
        let list = paginator.fetch_page(pg.0).await?;
        Ok((total, list))
    }

    /// Soft delete: flags the row and bumps `updated_at`.
    pub async fn delete_by_id<E, C>(db: &C, id: &str) -> anyhow::Result<u64>
    where
        E: EntityTrait,
        C: ConnectionTrait,
    {
        let res = E::update_many()
            .col_expr(SeaRepo::column::<E>("deleted")?, Expr::value(1))
            .col_expr(SeaRepo::column::<E>("updated_at")?, Expr::value(Local::now()))
            .filter(SeaRepo::column::<E>("id")?.eq(id))
            .exec(db)
            .await?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("{} {}", E::default().table_name(), id)).into());
        }
        Ok(res.rows_affected)
    }

    /// Clears the soft delete flag of a row found by a unique key.
    pub async fn restore<E, C>(db: &C, id: &str) -> anyhow::Result<u64>
    where
        E: EntityTrait,
        C: ConnectionTrait,
    {
        SeaRepo::update_with_map::<E, C>(
            db,
            serde_json::json!({ "deleted": 0 }),
            serde_json::json!({ "id": id }),
        )
        .await
    }

    /// `UPDATE <E> SET <set> WHERE <filter>`; both are flat json objects keyed
    /// by column name.
    pub async fn update_with_map<E, C>(
        db: &C,
        set: serde_json::Value,
        filter: serde_json::Value,
    ) -> anyhow::Result<u64>
    where
        E: EntityTrait,
        C: ConnectionTrait,
    {
        let mut update = E::update_many();
        for (k, v) in json_object(set)? {
            update = update.col_expr(SeaRepo::column::<E>(&k)?, Expr::value(json_to_value(v)));
        }
        for (k, v) in json_object(filter)? {
            update = update.filter(SeaRepo::column::<E>(&k)?.eq(json_to_value(v)));
        }
        Ok(update.exec(db).await?.rows_affected)
    }
}

fn json_object(value: serde_json::Value) -> Result<Map<String, serde_json::Value>, DbErr> {
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(DbErr::Custom(format!("expected a json object, got {other}"))),
    }
}

fn json_to_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::String(None),
        serde_json::Value::Bool(b) => Value::from(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::from(i),
            None => Value::from(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Value::from(s),
        other => Value::from(other.to_string()),
    }
}
