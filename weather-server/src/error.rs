//! HTTP-facing error type.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use weather_core::{ProviderError, StoreError, ValidationError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The body was missing, not JSON, or did not match the expected shape.
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    #[error("Weather record not found")]
    RecordNotFound,

    #[error("Location not found or API error")]
    LocationNotFound,

    #[error("Failed to fetch weather data")]
    Provider(#[source] ProviderError),

    #[error("Database error: {0}")]
    Store(#[source] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBody(rejection) => rejection.status(),
            Self::RecordNotFound | Self::LocationNotFound => StatusCode::NOT_FOUND,
            Self::Provider(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::LocationNotFound { .. } => Self::LocationNotFound,
            other => Self::Provider(other),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::RecordNotFound,
            other => Self::Store(other),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Provider(source) => tracing::error!(error = %source, "Weather provider request failed"),
            Self::Store(source) => tracing::error!(error = %source, "Datastore request failed"),
            _ => tracing::debug!(%status, error = %self, "Request rejected"),
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_request() {
        for err in [
            ValidationError::InvalidFormat { field: "start_date" },
            ValidationError::InvalidRange,
            ValidationError::NoFields,
        ] {
            assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn provider_non_success_maps_to_location_not_found() {
        let err = ApiError::from(ProviderError::LocationNotFound {
            status: 404,
            body: "city not found".into(),
        });

        assert!(matches!(err, ApiError::LocationNotFound));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Location not found or API error");
    }

    #[test]
    fn provider_decode_failure_is_internal() {
        let decode = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = ApiError::from(ProviderError::Decode(decode));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch weather data");
    }

    #[test]
    fn store_not_found_is_record_not_found() {
        let err = ApiError::from(StoreError::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Weather record not found");
    }

    #[test]
    fn store_failures_embed_the_underlying_message() {
        let err = ApiError::from(StoreError::Api {
            status: 401,
            code: None,
            body: "Invalid API key".into(),
        });

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Database error: Datastore returned status 401: Invalid API key"
        );
    }
}
