//! hostname counter repo

use crate::repo::model::asset_last_hostname;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

pub struct HostnameRepo;

impl HostnameRepo {
    pub async fn find_counter<C: ConnectionTrait>(
        db: &C,
        prefix: &str,
        postfix: &str,
    ) -> Result<Option<asset_last_hostname::Model>, DbErr> {
        asset_last_hostname::Entity::find()
            .filter(asset_last_hostname::Column::Prefix.eq(prefix))
            .filter(asset_last_hostname::Column::Postfix.eq(postfix))
            .one(db)
            .await
    }

    /// Creates the counter at 1, or bumps it with a single
    /// `counter = counter + 1` statement and reads the row back.
    pub async fn increment_hostname<C: ConnectionTrait>(
        db: &C,
        prefix: &str,
        postfix: &str,
    ) -> Result<asset_last_hostname::Model, DbErr> {
        if HostnameRepo::find_counter(db, prefix, postfix).await?.is_none() {
            let created = asset_last_hostname::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                prefix: Set(prefix.to_string()),
                postfix: Set(postfix.to_string()),
                counter: Set(1),
            };
            // a concurrent insert loses on the (prefix, postfix) unique index
            // and falls through to the increment below
            match asset_last_hostname::Entity::insert(created)
                .exec_without_returning(db)
                .await
            {
                Ok(_) => {
                    return HostnameRepo::find_counter(db, prefix, postfix)
                        .await?
                        .ok_or_else(|| DbErr::RecordNotFound(format!("hostname {prefix}/{postfix}")));
                }
                Err(e) => tracing::debug!("hostname counter already created: {e}"),
            }
        }
        asset_last_hostname::Entity::update_many()
            .col_expr(
                asset_last_hostname::Column::Counter,
                Expr::col(asset_last_hostname::Column::Counter).add(1),
            )
            .filter(asset_last_hostname::Column::Prefix.eq(prefix))
            .filter(asset_last_hostname::Column::Postfix.eq(postfix))
            .exec(db)
            .await?;
        HostnameRepo::find_counter(db, prefix, postfix)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("hostname {prefix}/{postfix}")))
    }
}
