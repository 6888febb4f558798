use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::ValidationErrors;

const PROBLEM_JSON: &str = "application/problem+json";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("one or more validation errors occurred")]
    Validation(ValidationErrors),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

// RFC 9457 problem document
#[derive(Debug, Serialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'static str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let problem = match self {
            AppError::Validation(errors) => Problem {
                kind: "https://tools.ietf.org/html/rfc9110#section-15.5.1",
                title: "One or more validation errors occurred.",
                status: status.as_u16(),
                detail: None,
                errors: Some(errors),
            },
            AppError::MalformedRequest(detail) => Problem {
                kind: "https://tools.ietf.org/html/rfc9110#section-15.5.1",
                title: "Malformed request",
                status: status.as_u16(),
                detail: Some(detail),
                errors: None,
            },
            AppError::Internal(source) => {
                tracing::error!(error = ?source, "internal server error");
                Problem {
                    kind: "https://tools.ietf.org/html/rfc9110#section-15.6.1",
                    title: "An error occurred while processing your request.",
                    status: status.as_u16(),
                    detail: None,
                    errors: None,
                }
            }
        };
        (
            status,
            [(header::CONTENT_TYPE, PROBLEM_JSON)],
            Json(problem),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> anyhow::Result<serde_json::Value> {
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    #[tokio::test]
    async fn test_validation_response() -> anyhow::Result<()> {
        let mut errors = ValidationErrors::new();
        errors.add("Name", "Name must be at least 3 characters long");
        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], PROBLEM_JSON);
        let json = body_json(response).await?;
        assert_eq!(json["status"], 400);
        assert_eq!(
            json["errors"]["Name"][0],
            "Name must be at least 3 characters long"
        );
        assert!(json.get("detail").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_response() -> anyhow::Result<()> {
        let response = AppError::MalformedRequest("expected value".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await?;
        assert_eq!(json["title"], "Malformed request");
        assert_eq!(json["detail"], "expected value");
        assert!(json.get("errors").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_internal_hides_source() -> anyhow::Result<()> {
        let err: AppError = anyhow::anyhow!("disk on fire").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await?;
        assert!(!json.to_string().contains("disk on fire"));
        Ok(())
    }
}
