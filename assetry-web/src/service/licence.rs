//! licences, supports and their assignment to assets

use crate::error::AppError;
use crate::repo::model::{licence, support};
use crate::repo::sea::{AssetRepo, LicenceRepo, SeaRepo};
use sea_orm::ConnectionTrait;

pub const NO_FREE_SEATS: &str = "Licence has no free seats";

pub struct LicenceService;

impl LicenceService {
    pub async fn save_licence<C: ConnectionTrait>(db: &C, mut model: licence::Model) -> Result<String, AppError> {
        model.niw = model.niw.trim().to_string();
        if model.niw.is_empty() {
            return Err(AppError::field("niw", "This field is required."));
        }
        if model.number_bought < 0 {
            return Err(AppError::field("number_bought", "Ensure this value is greater than or equal to 0."));
        }
        if let Some(found) = LicenceRepo::find_by_niw(db, &model.niw).await? {
            if found.id != model.id {
                return Err(AppError::field("niw", "Licence with this inventory number already exists."));
            }
        }
        if model.parent_id.as_deref() == Some(model.id.as_str()) && !model.id.is_empty() {
            return Err(AppError::field("parent", "A licence can't be its own parent."));
        }
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<licence::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<licence::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn save_support<C: ConnectionTrait>(db: &C, model: support::Model) -> Result<String, AppError> {
        if let (Some(from), Some(to)) = (model.date_from, model.date_to) {
            if to < from {
                return Err(AppError::field("date_to", "End date must not be before start date."));
            }
        }
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<support::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<support::Entity, _>(db, model).await?.id)
        }
    }

    /// Licences newly given to the asset must still have a seat left; the
    /// ones it already holds keep theirs.
    pub async fn check_seats<C: ConnectionTrait>(db: &C, asset_id: &str, licence_ids: &[String]) -> Result<(), AppError> {
        let held = AssetRepo::licence_ids_of(db, asset_id).await?;
        for id in licence_ids.iter().filter(|id| !held.contains(id)) {
            let licence = LicenceRepo::get_licence(db, id).await?;
            let used = LicenceRepo::used_seats(db, id).await?;
            if used >= u64::try_from(licence.number_bought).unwrap_or(0) {
                return Err(AppError::field("licences", NO_FREE_SEATS));
            }
        }
        Ok(())
    }

    /// Replaces the licence and support assignments of the asset.
    pub async fn assign<C: ConnectionTrait>(
        db: &C,
        asset_id: &str,
        licence_ids: &[String],
        support_ids: &[String],
    ) -> Result<(), AppError> {
        LicenceService::check_seats(db, asset_id, licence_ids).await?;
        AssetRepo::replace_licences(db, asset_id, licence_ids).await?;
        for id in support_ids {
            SeaRepo::find_by_id::<support::Entity, _>(db, id).await?;
        }
        AssetRepo::replace_supports(db, asset_id, support_ids).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::memory_db;

    #[tokio::test]
    async fn seats_are_limited() {
        let db = memory_db().await;
        let id = LicenceService::save_licence(
            &db,
            licence::Model {
                niw: "L-1".to_string(),
                number_bought: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids = vec![id];
        LicenceService::assign(&db, "a1", &ids, &[]).await.unwrap();
        // re-saving the holder keeps its seat
        LicenceService::assign(&db, "a1", &ids, &[]).await.unwrap();

        let Err(AppError::Form(errors)) = LicenceService::assign(&db, "a2", &ids, &[]).await else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("licences").unwrap()[0], NO_FREE_SEATS);
    }

    #[tokio::test]
    async fn niw_is_unique() {
        let db = memory_db().await;
        let licence = licence::Model {
            niw: "L-2".to_string(),
            ..Default::default()
        };
        LicenceService::save_licence(&db, licence.clone()).await.unwrap();
        assert!(LicenceService::save_licence(&db, licence).await.is_err());
    }

    #[tokio::test]
    async fn supports_are_shared() {
        let db = memory_db().await;
        let support_id = LicenceService::save_support(
            &db,
            support::Model {
                name: "NBD".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids = vec![support_id];
        LicenceService::assign(&db, "a1", &[], &ids).await.unwrap();
        LicenceService::assign(&db, "a2", &[], &ids).await.unwrap();
        assert_eq!(AssetRepo::support_ids_of(&db, "a2").await.unwrap(), ids);
    }
}
