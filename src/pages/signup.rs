//! Dedicated sign-up page.

use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct SignupView {
    pub email: String,
    pub error: Option<String>,
}
