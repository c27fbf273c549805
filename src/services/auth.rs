//! Auth flow — credential checks in front of the backend's sign-up/sign-in.
//!
//! The only local validation is the minimum password length; everything
//! else (duplicate accounts, bad passwords, unconfirmed emails) comes back
//! from the backend as a message shown to the user unchanged.

use crate::baas::{AuthSession, AuthUser, BaasError, Backend, Credentials, SignUpOutcome};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum AuthFlowError {
    #[error("Password should be at least 6 characters")]
    PasswordTooShort,
    #[error(transparent)]
    Backend(#[from] BaasError),
}

/// Trim the email and check the password length.
///
/// # Errors
///
/// Returns [`AuthFlowError::PasswordTooShort`] for passwords under
/// [`MIN_PASSWORD_LEN`] characters.
pub fn validate_credentials(email: &str, password: &str) -> Result<Credentials, AuthFlowError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthFlowError::PasswordTooShort);
    }
    Ok(Credentials { email: email.trim().to_owned(), password: password.to_owned() })
}

/// # Errors
///
/// Returns a validation error before any request, or the backend's rejection.
pub async fn sign_up(
    backend: &dyn Backend,
    email: &str,
    password: &str,
    email_redirect_to: Option<&str>,
) -> Result<SignUpOutcome, AuthFlowError> {
    let credentials = validate_credentials(email, password)?;
    let outcome = backend.sign_up(&credentials, email_redirect_to).await?;
    tracing::info!(
        user_id = ?outcome.user.as_ref().map(|u| u.id),
        confirmed = outcome.session.is_some(),
        "sign-up accepted"
    );
    Ok(outcome)
}

/// # Errors
///
/// Returns a validation error before any request, or the backend's rejection.
pub async fn sign_in(backend: &dyn Backend, email: &str, password: &str) -> Result<AuthSession, AuthFlowError> {
    let credentials = validate_credentials(email, password)?;
    let session = backend.sign_in(&credentials).await?;
    tracing::info!(user_id = %session.user.id, "signed in");
    Ok(session)
}

/// Revoke the session. Failures are logged, not returned: the caller drops
/// its cookie either way.
pub async fn sign_out(backend: &dyn Backend, access_token: &str) {
    if let Err(e) = backend.sign_out(access_token).await {
        tracing::warn!(error = %e, "sign-out failed");
    }
}

/// Resolve the signed-in user. Backend failures count as signed out.
pub async fn current_user(backend: &dyn Backend, access_token: &str) -> Option<AuthUser> {
    match backend.get_user(access_token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "user lookup failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
