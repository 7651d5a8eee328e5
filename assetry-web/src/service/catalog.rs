//! catalog rules: categories, models, profiles and the named dictionaries

use crate::error::AppError;
use crate::repo::model::{asset_category, asset_model, profile, Stamped};
use crate::repo::sea::{AssetRepo, CatalogRepo, SeaRepo};
use sea_orm::{ConnectionTrait, DbConn, EntityTrait, IntoActiveModel};
use serde::Serialize;

pub const PARENT_TYPE_MISMATCH: &str = "Parent type must be the same as selected type";

/// Lowercase ascii slug, runs of other characters collapsed into `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// `<parent slug>_<name>` for child categories, `<type>_<name>` otherwise.
pub fn category_slug(category: &asset_category::Model, parent: Option<&asset_category::Model>) -> String {
    match parent {
        Some(parent) => format!("{}_{}", parent.slug, slugify(&category.name)),
        None => format!("{}_{}", category.category_type.as_ref(), slugify(&category.name)),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetModelItem {
    #[serde(flatten)]
    pub model: asset_model::Model,
    pub assets_count: u64,
    pub front_layout_class: &'static str,
    pub back_layout_class: &'static str,
}

pub struct CatalogService;

impl CatalogService {
    /// Saves any record with a unique `name` column, reporting a taken name as
    /// a field error.
    pub async fn save_named<E, C>(db: &C, model: E::Model, name: &str) -> Result<String, AppError>
    where
        E: EntityTrait,
        E::Model: Stamped + IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: Send,
        C: ConnectionTrait,
    {
        if name.trim().is_empty() {
            return Err(AppError::field("name", "This field is required."));
        }
        if let Some(existing) = CatalogRepo::find_by_name::<E, _>(db, name).await? {
            if existing.id() != model.id() {
                return Err(AppError::field("name", format!("{name} already exists.")));
            }
        }
        if model.id().is_empty() {
            Ok(SeaRepo::insert_with_default::<E, _>(db, model).await?)
        } else {
            let id = model.id().to_string();
            SeaRepo::update_model::<E, _>(db, model).await?;
            Ok(id)
        }
    }

    pub async fn save_category<C: ConnectionTrait>(db: &C, mut model: asset_category::Model) -> Result<String, AppError> {
        if model.code.chars().count() > 4 {
            return Err(AppError::field("code", "Ensure this value has at most 4 characters."));
        }
        let parent = match model.parent_id.as_deref().filter(|p| !p.is_empty()) {
            Some(parent_id) => Some(CatalogRepo::get_category(db, parent_id).await?),
            None => None,
        };
        if let Some(parent) = &parent {
            if parent.category_type != model.category_type {
                return Err(AppError::field("__all__", PARENT_TYPE_MISMATCH));
            }
            if parent.id == model.id {
                return Err(AppError::field("parent", "A category can't be its own parent."));
            }
        } else {
            model.parent_id = None;
        }
        if model.slug.trim().is_empty() {
            model.slug = category_slug(&model, parent.as_ref());
        }
        if let Some(existing) = CatalogRepo::find_category_by_slug(db, &model.slug).await? {
            if existing.id != model.id {
                return Err(AppError::field("slug", "Asset category with this slug already exists."));
            }
        }
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<asset_category::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<asset_category::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn save_profile<C: ConnectionTrait>(db: &C, mut model: profile::Model) -> Result<String, AppError> {
        model.country = model.country.trim().to_uppercase();
        if !model.country.is_empty() && !assetry_common::is_iso2(&model.country) {
            return Err(AppError::field("country", "Select a valid country code."));
        }
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<profile::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<profile::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn model_items(db: &DbConn, models: Vec<asset_model::Model>) -> Result<Vec<AssetModelItem>, AppError> {
        let mut items = Vec::with_capacity(models.len());
        for model in models {
            items.push(AssetModelItem {
                assets_count: AssetRepo::count_by_model(db, &model.id).await?,
                front_layout_class: model.front_layout_class(),
                back_layout_class: model.back_layout_class(),
                model,
            });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{AssetCategoryType, AssetType};
    use crate::repo::model::warehouse;
    use crate::repo::testing::memory_db;

    #[test]
    fn slugs() {
        assert_eq!(slugify("  Blade Servers / HP "), "blade-servers-hp");
        let parent = asset_category::Model {
            slug: "data_center_servers".to_string(),
            ..Default::default()
        };
        let child = asset_category::Model {
            name: "Blade".to_string(),
            ..Default::default()
        };
        assert_eq!(category_slug(&child, Some(&parent)), "data_center_servers_blade");
        assert_eq!(category_slug(&child, None), "data_center_blade");
    }

    #[tokio::test]
    async fn category_parent_type_must_match() {
        let db = memory_db().await;
        let parent_id = CatalogService::save_category(
            &db,
            asset_category::Model {
                name: "Servers".to_string(),
                category_type: AssetCategoryType::DataCenter,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let parent = CatalogRepo::get_category(&db, &parent_id).await.unwrap();
        assert_eq!(parent.slug, "data_center_servers");

        let wrong = asset_category::Model {
            name: "Laptops".to_string(),
            category_type: AssetCategoryType::BackOffice,
            parent_id: Some(parent_id.clone()),
            ..Default::default()
        };
        let Err(AppError::Form(errors)) = CatalogService::save_category(&db, wrong).await else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("__all__").unwrap()[0], PARENT_TYPE_MISMATCH);

        let child = asset_category::Model {
            name: "Blade".to_string(),
            code: "BL".to_string(),
            is_blade: true,
            category_type: AssetCategoryType::DataCenter,
            parent_id: Some(parent_id),
            ..Default::default()
        };
        let child_id = CatalogService::save_category(&db, child).await.unwrap();
        let child = CatalogRepo::get_category(&db, &child_id).await.unwrap();
        assert_eq!(child.slug, "data_center_servers_blade");
        assert_eq!(child.label(), "|-- (data center) Blade");
    }

    #[tokio::test]
    async fn named_records_are_unique() {
        let db = memory_db().await;
        let first = warehouse::Model {
            name: "Krakow".to_string(),
            ..Default::default()
        };
        let id = CatalogService::save_named::<warehouse::Entity, _>(&db, first.clone(), "Krakow")
            .await
            .unwrap();
        assert!(CatalogService::save_named::<warehouse::Entity, _>(&db, first, "Krakow")
            .await
            .is_err());
        let renamed = warehouse::Model {
            id: id.clone(),
            name: "Krakow".to_string(),
            ..Default::default()
        };
        assert_eq!(
            CatalogService::save_named::<warehouse::Entity, _>(&db, renamed, "Krakow").await.unwrap(),
            id
        );
    }

    #[tokio::test]
    async fn deleted_name_stays_taken() {
        let db = memory_db().await;
        let row = || warehouse::Model {
            name: "Gdansk".to_string(),
            ..Default::default()
        };
        let id = CatalogService::save_named::<warehouse::Entity, _>(&db, row(), "Gdansk")
            .await
            .unwrap();
        SeaRepo::delete_by_id::<warehouse::Entity, _>(&db, &id).await.unwrap();
        let Err(AppError::Form(errors)) = CatalogService::save_named::<warehouse::Entity, _>(&db, row(), "Gdansk").await
        else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("name").unwrap()[0], "Gdansk already exists.");
    }

    #[tokio::test]
    async fn deleted_asset_model_comes_back() {
        let db = memory_db().await;
        let model = CatalogRepo::get_or_create_model(&db, "DL360", AssetType::DataCenter).await.unwrap();
        SeaRepo::delete_by_id::<asset_model::Entity, _>(&db, &model.id).await.unwrap();
        let again = CatalogRepo::get_or_create_model(&db, "DL360", AssetType::DataCenter).await.unwrap();
        assert_eq!(again.id, model.id);
        assert_eq!(again.deleted, 0);
    }

    #[tokio::test]
    async fn profile_country_must_be_iso2() {
        let db = memory_db().await;
        let bad = profile::Model {
            username: "jan".to_string(),
            country: "Poland".to_string(),
            ..Default::default()
        };
        assert!(CatalogService::save_profile(&db, bad).await.is_err());
        let id = CatalogService::save_profile(
            &db,
            profile::Model {
                username: "jan".to_string(),
                country: "pl".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(CatalogRepo::get_profile(&db, &id).await.unwrap().country, "PL");
    }
}
