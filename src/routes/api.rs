//! JSON issues API.
//!
//! The caller identifies itself with an `x-user-id` header. The header is
//! trusted as-is, so reads run with the service key and are scoped purely by
//! that id.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use crate::baas::Access;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The header's value as a user id. Missing, blank, and non-UUID values
/// all count as absent.
pub(crate) fn header_user_id(headers: &HeaderMap) -> Option<Uuid> {
    let raw = headers.get(USER_ID_HEADER)?.to_str().ok()?.trim();
    Uuid::parse_str(raw).ok()
}

/// `GET /api/issues` — the caller's issues, newest first.
pub async fn list_issues(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(user_id) = header_user_id(&headers) else {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized: user ID missing" }))).into_response();
    };

    match state.issues().list(Access::Service, user_id).await {
        Ok(issues) => Json(json!({ "issues": issues })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, %user_id, "api issue list failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
