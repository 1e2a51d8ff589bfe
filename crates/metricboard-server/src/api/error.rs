//! HTTP mapping for core errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use metricboard_core::error::{ClientCode, MetricboardError};

/// Wrapper so core errors can be returned straight from handlers.
#[derive(Debug)]
pub struct ApiError(pub MetricboardError);

impl From<MetricboardError> for ApiError {
    fn from(e: MetricboardError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::UnknownUser => StatusCode::NOT_FOUND,
            ClientCode::InvalidInput => StatusCode::BAD_REQUEST,
            ClientCode::BadConfig | ClientCode::UnsupportedVersion | ClientCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": message,
            "detail": message,
        }));
        (self.status(), body).into_response()
    }
}
