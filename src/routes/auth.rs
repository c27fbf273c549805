//! Auth routes — login/signup forms, logout, and the session extractor.

use std::convert::Infallible;

use axum::extract::{Form, FromRef, FromRequestParts, Query, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use super::render_page;
use crate::baas::{AuthSession, AuthUser, BaasError};
use crate::pages::login::{AuthMode, CHECK_EMAIL_NOTICE, LoginView, notice_text};
use crate::pages::signup::SignupView;
use crate::services::auth::{self as auth_svc, AuthFlowError};
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";

// =============================================================================
// SESSION EXTRACTOR
// =============================================================================

/// A signed-in user and the access token that proved it.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: AuthUser,
    pub token: String,
}

/// The session behind the request's cookie, if it is still valid. Never
/// rejects: pages decide what to show when nobody is signed in.
pub struct CurrentUser(pub Option<SignedIn>);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Ok(Self(None));
        }

        let app_state = AppState::from_ref(state);
        let user = auth_svc::current_user(app_state.backend.as_ref(), token).await;
        Ok(Self(user.map(|user| SignedIn { user, token: token.to_owned() })))
    }
}

fn session_cookie(session: &AuthSession, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((COOKIE_NAME, session.access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);
    if let Some(secs) = session.expires_in.and_then(|s| i64::try_from(s).ok()) {
        cookie = cookie.max_age(Duration::seconds(secs));
    }
    cookie.build()
}

fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

pub(crate) fn auth_error_to_status(err: &AuthFlowError) -> StatusCode {
    match err {
        AuthFlowError::PasswordTooShort => StatusCode::UNPROCESSABLE_ENTITY,
        AuthFlowError::Backend(BaasError::Api { status, .. }) if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
        }
        AuthFlowError::Backend(_) => StatusCode::BAD_GATEWAY,
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginQuery {
    mode: Option<String>,
    notice: Option<String>,
}

/// `GET /` and `GET /login` — login form, optionally in sign-up mode.
pub async fn login_page(State(state): State<AppState>, Query(query): Query<LoginQuery>) -> Response {
    let view = LoginView::new(
        AuthMode::parse(query.mode.as_deref()),
        String::new(),
        None,
        notice_text(query.notice.as_deref()),
    );
    render_page(&state, "login.html", &view, StatusCode::OK)
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    mode: Option<String>,
}

/// `POST /login` — sign in (or sign up, per the toggle), set the session
/// cookie, continue to the dashboard.
pub async fn login_submit(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    let mode = AuthMode::parse(form.mode.as_deref());
    let backend = state.backend.as_ref();

    let result = match mode {
        AuthMode::SignIn => auth_svc::sign_in(backend, &form.email, &form.password)
            .await
            .map(Some),
        AuthMode::SignUp => {
            auth_svc::sign_up(backend, &form.email, &form.password, Some(state.config.email_redirect_url.as_str()))
                .await
                .map(|outcome| outcome.session)
        }
    };

    match result {
        Ok(Some(session)) => {
            let jar = jar.add(session_cookie(&session, state.config.cookie_secure));
            (jar, Redirect::to("/dashboard")).into_response()
        }
        // Sign-up accepted but the account still needs email confirmation.
        Ok(None) => Redirect::to(&format!("/login?notice={CHECK_EMAIL_NOTICE}")).into_response(),
        Err(e) => {
            tracing::info!(error = %e, mode = mode.as_str(), "login rejected");
            let view = LoginView::new(mode, form.email, Some(e.to_string()), None);
            render_page(&state, "login.html", &view, auth_error_to_status(&e))
        }
    }
}

/// `GET /signup` — dedicated sign-up form.
pub async fn signup_page(State(state): State<AppState>) -> Response {
    render_page(&state, "signup.html", &SignupView::default(), StatusCode::OK)
}

#[derive(Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// `POST /signup` — register with the configured confirmation redirect,
/// then send the user to the login page to wait for the email.
pub async fn signup_submit(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    let result = auth_svc::sign_up(
        state.backend.as_ref(),
        &form.email,
        &form.password,
        Some(state.config.email_redirect_url.as_str()),
    )
    .await;

    match result {
        Ok(_) => Redirect::to(&format!("/login?notice={CHECK_EMAIL_NOTICE}")).into_response(),
        Err(e) => {
            tracing::info!(error = %e, "sign-up rejected");
            let view = SignupView { email: form.email, error: Some(e.to_string()) };
            render_page(&state, "signup.html", &view, auth_error_to_status(&e))
        }
    }
}

async fn end_session(state: &AppState, jar: CookieJar) -> CookieJar {
    if let Some(token) = jar.get(COOKIE_NAME).map(Cookie::value) {
        if !token.is_empty() {
            auth_svc::sign_out(state.backend.as_ref(), token).await;
        }
    }
    jar.add(cleared_session_cookie(state.config.cookie_secure))
}

/// `GET /logout` — sign out, clear the cookie, go to the login page.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (end_session(&state, jar).await, Redirect::to("/login"))
}

/// `POST /logout` — the dashboard's Logout button; lands on `/`.
pub async fn logout_from_dashboard(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (end_session(&state, jar).await, Redirect::to("/"))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
