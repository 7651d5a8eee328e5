//! error

use std::collections::BTreeMap;

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::{DbErr, SqlErr};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use validator::Validate;

/// Field name -> messages, rendered the way a form shows them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, msg: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(msg.into());
    }

    pub fn single(field: &str, msg: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, msg);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Form(self))
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("db error: {0}")]
    Db(DbErr),
    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),
    #[error(transparent)]
    JsonRejection(#[from] JsonRejection),
    #[error("invalid form: {0:?}")]
    Form(FieldErrors),
    #[error("{0}")]
    Integrity(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Convert(#[from] assetry_common::ConvertError),
    #[error(transparent)]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Anyhow(anyhow::Error),
}

pub const DUPLICATE_RECORD: &str = "Record with this value already exists.";

impl From<DbErr> for AppError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("unique constraint violated: {detail}");
                AppError::Integrity(DUPLICATE_RECORD.to_string())
            }
            _ => AppError::Db(e),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<DbErr>() {
            Ok(db) => db.into(),
            Err(e) => AppError::Anyhow(e),
        }
    }
}

impl AppError {
    pub fn field(field: &str, msg: impl Into<String>) -> Self {
        AppError::Form(FieldErrors::single(field, msg))
    }

    pub fn message(msg: impl Into<String>) -> Self {
        AppError::Message(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Db(DbErr::RecordNotFound(_)) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Db(_) | AppError::Io(_) | AppError::Toml(_) | AppError::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_)
            | AppError::JsonRejection(_)
            | AppError::Form(_)
            | AppError::Message(_)
            | AppError::Multipart(_)
            | AppError::Convert(_) => StatusCode::BAD_REQUEST,
            AppError::Integrity(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let data = match &self {
            AppError::Form(errors) => json!(errors),
            AppError::Validation(errors) => json!(errors),
            _ => serde_json::Value::Null,
        };
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }
        let body = Json(json!({
            "code": status.as_u16(),
            "msg": self.to_string(),
            "data": data,
        }));
        (status, body).into_response()
    }
}

/// Json extractor that runs `validator` before the handler sees the command.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(AppJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::Db(DbErr::RecordNotFound("asset".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::field("sn", "bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Integrity("dup".into()).status(),
            StatusCode::CONFLICT
        );
        let wrapped: AppError = anyhow::Error::from(DbErr::RecordNotFound("x".into())).into();
        assert_eq!(wrapped.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unique_violation_is_a_conflict() {
        use crate::repo::model::warehouse;
        use crate::repo::sea::SeaRepo;
        use crate::repo::testing::memory_db;
        use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel};

        let db = memory_db().await;
        let row = || warehouse::Model {
            name: "W1".to_string(),
            ..Default::default()
        };
        SeaRepo::insert_with_default::<warehouse::Entity, _>(&db, row()).await.unwrap();

        let wrapped: AppError = SeaRepo::insert_with_default::<warehouse::Entity, _>(&db, row())
            .await
            .unwrap_err()
            .into();
        assert!(matches!(&wrapped, AppError::Integrity(msg) if msg == DUPLICATE_RECORD));
        assert_eq!(wrapped.status(), StatusCode::CONFLICT);

        let mut again = row();
        again.id = "w2".to_string();
        let direct: AppError = warehouse::Entity::insert(again.into_active_model().reset_all())
            .exec_without_returning(&db)
            .await
            .unwrap_err()
            .into();
        assert!(matches!(direct, AppError::Integrity(_)));
    }

    #[test]
    fn field_errors_collect() {
        let mut errors = FieldErrors::new();
        assert!(errors.clone().into_result().is_ok());
        errors.add("sn", "This sn is duplicated");
        errors.add("sn", "Field can't be empty.");
        assert_eq!(errors.get("sn").map(Vec::len), Some(2));
        assert!(matches!(errors.into_result(), Err(AppError::Form(_))));
    }
}
