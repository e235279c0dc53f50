// crates/adapt/src/http/error.rs

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;

use crate::Error as ServiceError;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Serve(#[from] serve::Error),

    #[error("invalid query: {0}")]
    Query(String),
}

impl HttpError {
    pub fn to_status(&self) -> StatusCode {
        match self {
            HttpError::Service(e) => e.to_status(),
            HttpError::Serve(e) => e.to_status(),
            HttpError::Query(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.to_status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = Json(ErrorBody {
            message: self.to_string(),
            status: status.as_u16(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value as Json};

    #[tokio::test]
    async fn renders_message_and_status() {
        let err = HttpError::from(serve::Error::InvalidExtension {
            extension: "xml".into(),
            asset: "variables".into(),
        });
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: Json = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            v,
            json!({ "message": "invalid extension '.xml' for asset 'variables'", "status": 400 })
        );
    }

    #[test]
    fn service_errors_keep_their_status() {
        let err = HttpError::from(ServiceError::Serve(serve::Error::NotFound("logo".into())));
        assert_eq!(err.to_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "asset `logo` not found");
    }
}
