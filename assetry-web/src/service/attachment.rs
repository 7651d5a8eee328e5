//! asset attachments stored on disk

use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::repo::model::{asset, attachment};
use crate::repo::sea::{AssetRepo, SeaRepo};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

/// `<root>/assets/<uuid>.<ext>`, the extension taken from the uploaded name.
pub fn attachment_path(root: &Path, original_filename: &str) -> PathBuf {
    let name = Uuid::new_v4().to_string();
    let file = match Path::new(original_filename).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{name}.{}", ext.to_lowercase()),
        _ => name,
    };
    root.join("assets").join(file)
}

pub struct AttachmentService;

impl AttachmentService {
    /// Writes the upload and links it to the asset.
    pub async fn store<C: ConnectionTrait>(
        db: &C,
        root: &Path,
        asset_id: &str,
        original_filename: &str,
        content: &[u8],
        user: &str,
    ) -> Result<attachment::Model, AppError> {
        SeaRepo::find_by_id::<asset::Entity, _>(db, asset_id).await?;
        let path = attachment_path(root, original_filename);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, content).await?;

        let model = attachment::Model {
            original_filename: original_filename.to_string(),
            file: path.to_string_lossy().into_owned(),
            uploaded_by: (!user.is_empty()).then(|| user.to_string()),
            created_by: user.to_string(),
            ..Default::default()
        };
        match AttachmentService::link(db, asset_id, model).await {
            Ok(stored) => {
                tracing::info!(file = %path.display(), size = content.len(), "attachment stored");
                Ok(stored)
            }
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(file = %path.display(), "remove orphaned attachment failed: {rm}");
                }
                Err(e)
            }
        }
    }

    async fn link<C: ConnectionTrait>(
        db: &C,
        asset_id: &str,
        model: attachment::Model,
    ) -> Result<attachment::Model, AppError> {
        let id = SeaRepo::insert_with_default::<attachment::Entity, _>(db, model).await?;
        AssetRepo::link_attachment(db, asset_id, &id).await?;
        Ok(SeaRepo::find_by_id::<attachment::Entity, _>(db, &id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::memory_db;

    #[test]
    fn path_keeps_extension() {
        let path = attachment_path(Path::new("/srv/files"), "Invoice.PDF");
        assert!(path.starts_with("/srv/files/assets"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        let bare = attachment_path(Path::new("/srv/files"), "README");
        assert_eq!(bare.extension(), None);
    }

    #[tokio::test]
    async fn upload_is_linked() {
        let db = memory_db().await;
        let asset_id = AssetRepo::insert_asset_one(&db, asset::Model::default()).await.unwrap();
        let root = std::env::temp_dir().join(format!("assetry-test-{}", Uuid::new_v4()));
        let stored = AttachmentService::store(&db, &root, &asset_id, "scan.png", b"png", "jan")
            .await
            .unwrap();
        assert_eq!(stored.original_filename, "scan.png");
        assert_eq!(tokio::fs::read(&stored.file).await.unwrap(), b"png");
        tokio::fs::remove_dir_all(&root).await.unwrap();

        assert!(AttachmentService::store(&db, &root, "missing", "x.txt", b"x", "jan").await.is_err());
    }

    #[tokio::test]
    async fn failed_insert_removes_the_file() {
        let db = memory_db().await;
        let asset_id = AssetRepo::insert_asset_one(&db, asset::Model::default()).await.unwrap();
        db.execute_unprepared("DROP TABLE attachment").await.unwrap();
        let root = std::env::temp_dir().join(format!("assetry-test-{}", Uuid::new_v4()));
        assert!(AttachmentService::store(&db, &root, &asset_id, "scan.png", b"png", "jan").await.is_err());

        let mut dir = tokio::fs::read_dir(root.join("assets")).await.unwrap();
        assert!(dir.next_entry().await.unwrap().is_none());
        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
