//! JSON body extractor that validates the payload.
//!
//! Malformed JSON, missing fields and failed `validator` rules all become
//! 400 responses in the standard error body.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 3))]
        name: String,
    }

    fn request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload() {
        let ValidJson(payload) = ValidJson::<Payload>::from_request(request(r#"{"name":"APECK"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "APECK");
    }

    #[tokio::test]
    async fn test_rule_violation_is_validation_error() {
        let result = ValidJson::<Payload>::from_request(request(r#"{"name":"A"}"#), &()).await;
        assert!(matches!(result, Err(ApiError::InvalidFields(_, _))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let result = ValidJson::<Payload>::from_request(request("{"), &()).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
