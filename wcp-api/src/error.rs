use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use wcp_defs::WcpError;

/// Maps `WcpError` onto the status-code classes in spec §7. Newtype
/// rather than an `impl IntoResponse for WcpError` directly, since
/// `WcpError` lives in `wcp-defs` and axum's trait is foreign to it.
pub struct ApiError(pub WcpError);

impl From<WcpError> for ApiError {
    fn from(e: WcpError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WcpError::Validation(_) => StatusCode::BAD_REQUEST,
            WcpError::Conflict(_) => StatusCode::CONFLICT,
            WcpError::NotFound(_) => StatusCode::NOT_FOUND,
            WcpError::PreconditionFailed(_) => StatusCode::PRECONDITION_REQUIRED,
            WcpError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            WcpError::InconsistentState(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            log::error!("inconsistent state surfaced to caller: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
