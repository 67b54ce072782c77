//! HTTP rendering of [`AppError`] as an RFC 7807 problem document.

use super::app_error::AppError;

impl AppError {
    /// Problem body: `type`, `title`, `status`, `detail`, plus the stable
    /// `code` and the optional `action` hint.
    pub fn problem_details(&self) -> serde_json::Value {
        serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().title(),
            "status": self.status_code(),
            "code": self.code(),
            "detail": self.message(),
            "action": self.action(),
        })
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::{StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            self.problem_details().to_string(),
        )
            .into_response()
    }
}
