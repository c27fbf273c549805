//! Login page with an in-page toggle between signing in and signing up.

use serde::Serialize;

/// Query value that switches the notice banner on after a sign-up.
pub const CHECK_EMAIL_NOTICE: &str = "check-email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    /// `signup` selects sign-up; anything else is sign-in.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("signup") => Self::SignUp,
            _ => Self::SignIn,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "signin",
            Self::SignUp => "signup",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }
}

#[must_use]
pub fn notice_text(key: Option<&str>) -> Option<&'static str> {
    (key == Some(CHECK_EMAIL_NOTICE)).then_some("Check your email for confirmation")
}

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub mode: &'static str,
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub toggle_prompt: &'static str,
    pub toggle_label: &'static str,
    pub toggle_mode: &'static str,
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<&'static str>,
}

impl LoginView {
    #[must_use]
    pub fn new(mode: AuthMode, email: String, error: Option<String>, notice: Option<&'static str>) -> Self {
        let (heading, submit_label, toggle_prompt, toggle_label) = match mode {
            AuthMode::SignIn => ("Login to Your Account", "Login", "Don't have an account?", "Sign Up"),
            AuthMode::SignUp => ("Create an Account", "Sign Up", "Already have an account?", "Login"),
        };
        Self {
            mode: mode.as_str(),
            heading,
            submit_label,
            toggle_prompt,
            toggle_label,
            toggle_mode: mode.toggled().as_str(),
            email,
            error,
            notice,
        }
    }
}
