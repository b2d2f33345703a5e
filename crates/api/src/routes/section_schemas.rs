//! Read-only catalog of section schemas for the content editor.

use axum::{extract::Path, routing::get, Json, Router};
use domain::services::section_schema::{all_schemas, schema_for, SectionSchema};

use crate::app::AppState;
use crate::error::ApiError;

/// Mounted at `/api/admin/section-schemas`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schemas))
        .route("/:key", get(get_schema))
}

pub async fn list_schemas() -> Json<&'static [SectionSchema]> {
    Json(all_schemas())
}

pub async fn get_schema(Path(key): Path<String>) -> Result<Json<&'static SectionSchema>, ApiError> {
    schema_for(&key)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Section schema not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_known_schema() {
        let Json(schema) = get_schema(Path("cta".to_string())).await.unwrap();
        assert_eq!(schema.key, "cta");
    }

    #[tokio::test]
    async fn test_get_unknown_schema() {
        let err = get_schema(Path("nope".to_string())).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
