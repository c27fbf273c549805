//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Server-rendered pages (login, signup, dashboard, delete confirmation)
//! and their form handlers share one Axum router with the JSON issues API.
//! Every form post ends in a redirect back to a page that refetches, so no
//! handler patches local view state.

pub mod api;
pub mod auth;
pub mod issues;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// JSON API routes, open to cross-origin callers.
fn api_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/issues", get(api::list_issues))
        .layer(cors)
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(auth::login_page))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/signup", get(auth::signup_page).post(auth::signup_submit))
        .route("/logout", get(auth::logout).post(auth::logout_from_dashboard))
        .route("/dashboard", get(issues::dashboard))
        .route("/issues", post(issues::create_issue))
        .route("/issues/{id}", post(issues::update_issue))
        .route("/issues/{id}/delete", get(issues::confirm_delete).post(issues::delete_issue))
        .route("/healthz", get(healthz))
        .merge(api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Render a page, or a bare 500 if the template fails.
pub(crate) fn render_page<S: Serialize>(state: &AppState, template: &str, view: &S, status: StatusCode) -> Response {
    match state.views.render(template, view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, template, "page render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// TEST HELPERS
// =============================================================================
