//! report templates

use crate::error::AppError;
use crate::repo::model::report_odt_source_language::MAX_LANGUAGE_LEN;
use crate::repo::model::{report_odt_source, report_odt_source_language};
use crate::repo::sea::{SeaRepo, ServiceRepo};
use crate::service::catalog::slugify;
use sea_orm::ConnectionTrait;

pub struct ReportService;

impl ReportService {
    pub async fn save_source<C: ConnectionTrait>(db: &C, mut model: report_odt_source::Model) -> Result<String, AppError> {
        if model.slug.trim().is_empty() {
            model.slug = slugify(&model.name);
        }
        if model.slug.is_empty() {
            return Err(AppError::field("slug", "This field is required."));
        }
        if let Some(found) = ServiceRepo::find_report_source(db, &model.slug).await? {
            if found.id != model.id {
                return Err(AppError::field("slug", "Report with this slug already exists."));
            }
        }
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<report_odt_source::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<report_odt_source::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn save_language<C: ConnectionTrait>(
        db: &C,
        mut model: report_odt_source_language::Model,
    ) -> Result<String, AppError> {
        model.language = model.language.trim().to_lowercase();
        if model.language.is_empty() || model.language.chars().count() > MAX_LANGUAGE_LEN {
            return Err(AppError::field("language", "Ensure this value has at most 3 characters."));
        }
        let languages = ServiceRepo::report_languages(db, &model.report_odt_source_id).await?;
        if languages.iter().any(|l| l.language == model.language && l.id != model.id) {
            return Err(AppError::field("language", "Template for this language already exists."));
        }
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<report_odt_source_language::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<report_odt_source_language::Entity, _>(db, model).await?.id)
        }
    }

    /// Template of the first language added to the report.
    pub async fn template<C: ConnectionTrait>(db: &C, source_id: &str) -> Result<Option<String>, AppError> {
        let languages = ServiceRepo::report_languages(db, source_id).await?;
        Ok(languages.into_iter().next().map(|l| l.template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::memory_db;

    #[tokio::test]
    async fn languages_per_source() {
        let db = memory_db().await;
        let source_id = ReportService::save_source(
            &db,
            report_odt_source::Model {
                name: "Release form".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let source = SeaRepo::find_by_id::<report_odt_source::Entity, _>(&db, &source_id).await.unwrap();
        assert_eq!(source.slug, "release-form");
        assert_eq!(ReportService::template(&db, &source_id).await.unwrap(), None);

        let en = report_odt_source_language::Model {
            report_odt_source_id: source_id.clone(),
            language: "EN".to_string(),
            template: "reports/release_en.odt".to_string(),
            ..Default::default()
        };
        ReportService::save_language(&db, en.clone()).await.unwrap();
        assert!(ReportService::save_language(&db, en.clone()).await.is_err());

        let long = report_odt_source_language::Model {
            language: "engl".to_string(),
            ..en
        };
        assert!(ReportService::save_language(&db, long).await.is_err());
        assert_eq!(
            ReportService::template(&db, &source_id).await.unwrap().as_deref(),
            Some("reports/release_en.odt")
        );
    }
}
