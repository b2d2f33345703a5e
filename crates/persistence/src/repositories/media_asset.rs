//! Media asset repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MediaAssetEntity;
use crate::metrics::QueryTimer;

const MEDIA_COLUMNS: &str = "id, file_name, url, alt_text, mime_type, width, height, category, \
                             created_by, created_at, updated_at";

/// Row to insert for a stored file or an external image URL.
#[derive(Debug, Clone)]
pub struct NewMediaAsset<'a> {
    pub file_name: &'a str,
    pub url: &'a str,
    pub alt_text: Option<&'a str>,
    pub mime_type: Option<&'a str>,
    pub category: Option<&'a str>,
    pub created_by: Option<Uuid>,
}

#[derive(Clone)]
pub struct MediaAssetRepository {
    pool: PgPool,
}

impl MediaAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<MediaAssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_media_assets");
        let result = sqlx::query_as::<_, MediaAssetEntity>(&format!(
            "SELECT {} FROM media_assets ORDER BY created_at DESC",
            MEDIA_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn create(&self, asset: &NewMediaAsset<'_>) -> Result<MediaAssetEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_media_asset");
        let result = sqlx::query_as::<_, MediaAssetEntity>(&format!(
            r#"
            INSERT INTO media_assets (file_name, url, alt_text, mime_type, category, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MEDIA_COLUMNS
        ))
        .bind(asset.file_name)
        .bind(asset.url)
        .bind(asset.alt_text)
        .bind(asset.mime_type)
        .bind(asset.category)
        .bind(asset.created_by)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Delete a row and hand it back so the caller can remove the file.
    pub async fn delete(&self, id: Uuid) -> Result<Option<MediaAssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("delete_media_asset");
        let result = sqlx::query_as::<_, MediaAssetEntity>(&format!(
            "DELETE FROM media_assets WHERE id = $1 RETURNING {}",
            MEDIA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }
}
