use axum::http::StatusCode;

use super::*;
use crate::routes::test_support::{get, post_form, send};
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn root_and_login_render_sign_in_form() {
    let (state, _) = test_app_state();
    for uri in ["/", "/login"] {
        let reply = send(&state, get(uri, None)).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains("Login to Your Account"));
        assert!(reply.body.contains("name=\"mode\" value=\"signin\""));
    }
}

#[tokio::test]
async fn login_page_toggles_to_sign_up() {
    let (state, _) = test_app_state();
    let reply = send(&state, get("/login?mode=signup", None)).await;
    assert!(reply.body.contains("Create an Account"));
    assert!(reply.body.contains("/login?mode=signin"));
}

#[tokio::test]
async fn login_page_shows_check_email_notice() {
    let (state, _) = test_app_state();
    let reply = send(&state, get("/login?notice=check-email", None)).await;
    assert!(reply.body.contains("Check your email for confirmation"));
}

#[tokio::test]
async fn login_sets_cookie_and_redirects_to_dashboard() {
    let (state, backend) = test_app_state();
    backend.seed_user("ada@example.com", "hunter22");

    let reply = send(
        &state,
        post_form("/login", None, "email=ada%40example.com&password=hunter22&mode=signin"),
    )
    .await;

    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location(), Some("/dashboard"));
    let cookie = reply
        .cookies()
        .into_iter()
        .find(|c| c.starts_with("session_token="))
        .expect("session cookie set");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=3600"));

    let token = cookie
        .trim_start_matches("session_token=")
        .split(';')
        .next()
        .unwrap();
    assert!(backend.token_is_live(token));
}

#[tokio::test]
async fn bad_password_shows_backend_message() {
    let (state, backend) = test_app_state();
    backend.seed_user("ada@example.com", "hunter22");

    let reply = send(&state, post_form("/login", None, "email=ada%40example.com&password=wrong-one")).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body.contains("Invalid login credentials"));
    assert!(reply.body.contains("value=\"ada@example.com\""));
    assert!(reply.cookies().is_empty());
}

#[tokio::test]
async fn short_password_never_reaches_backend() {
    let (state, backend) = test_app_state();

    let reply = send(&state, post_form("/login", None, "email=a%40b.c&password=abc")).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reply.body.contains("Password should be at least 6 characters"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn sign_up_toggle_redirects_to_notice() {
    let (state, backend) = test_app_state();

    let reply = send(&state, post_form("/login", None, "email=new%40example.com&password=secret1&mode=signup")).await;

    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location(), Some("/login?notice=check-email"));
    assert_eq!(backend.signup_redirects(), vec![Some("http://localhost:3000/login".to_owned())]);
}

#[tokio::test]
async fn signup_page_registers_with_redirect() {
    let (state, backend) = test_app_state();

    let page = send(&state, get("/signup", None)).await;
    assert_eq!(page.status, StatusCode::OK);

    let reply = send(&state, post_form("/signup", None, "email=new%40example.com&password=secret1")).await;
    assert_eq!(reply.location(), Some("/login?notice=check-email"));
    assert_eq!(backend.calls(), vec!["sign_up"]);
    assert_eq!(backend.signup_redirects(), vec![Some("http://localhost:3000/login".to_owned())]);
}

#[tokio::test]
async fn duplicate_signup_rerenders_with_message() {
    let (state, backend) = test_app_state();
    backend.seed_user("ada@example.com", "hunter22");

    let reply = send(&state, post_form("/signup", None, "email=ada%40example.com&password=secret1")).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reply.body.contains("User already registered"));
}

#[tokio::test]
async fn logout_revokes_token_and_clears_cookie() {
    let (state, backend) = test_app_state();
    let (_, token) = backend.seed_user("ada@example.com", "hunter22");

    let reply = send(&state, get("/logout", Some(&token))).await;

    assert_eq!(reply.location(), Some("/login"));
    assert!(!backend.token_is_live(&token));
    assert!(
        reply
            .cookies()
            .iter()
            .any(|c| c.starts_with("session_token=;") && c.contains("Max-Age=0"))
    );
}

#[tokio::test]
async fn dashboard_logout_lands_on_root() {
    let (state, backend) = test_app_state();
    let (_, token) = backend.seed_user("ada@example.com", "hunter22");

    let reply = send(&state, post_form("/logout", Some(&token), "")).await;

    assert_eq!(reply.location(), Some("/"));
    assert_eq!(backend.calls(), vec!["sign_out"]);
}

#[tokio::test]
async fn logout_without_cookie_skips_backend() {
    let (state, backend) = test_app_state();
    let reply = send(&state, get("/logout", None)).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert!(backend.calls().is_empty());
}

#[test]
fn auth_errors_map_to_statuses() {
    assert_eq!(auth_error_to_status(&AuthFlowError::PasswordTooShort), StatusCode::UNPROCESSABLE_ENTITY);
    let rejected = AuthFlowError::Backend(BaasError::Api { status: 400, message: "nope".into() });
    assert_eq!(auth_error_to_status(&rejected), StatusCode::BAD_REQUEST);
    let outage = AuthFlowError::Backend(BaasError::Api { status: 503, message: "down".into() });
    assert_eq!(auth_error_to_status(&outage), StatusCode::BAD_GATEWAY);
}
