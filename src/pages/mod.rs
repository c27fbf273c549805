//! Server-rendered pages.
//!
//! DESIGN
//! ======
//! Each page module builds a serializable view model; the markup lives in
//! `templates/` and is compiled into the binary. Templates are loaded once
//! at startup into a shared [`Views`] environment with HTML auto-escaping
//! (enabled by the `.html` names).

pub mod confirm;
pub mod dashboard;
pub mod login;
pub mod signup;

use minijinja::Environment;
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("signup.html", include_str!("../../templates/signup.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("issue_list.html", include_str!("../../templates/issue_list.html")),
    ("issue_item.html", include_str!("../../templates/issue_item.html")),
    ("new_issue_form.html", include_str!("../../templates/new_issue_form.html")),
    ("confirm_delete.html", include_str!("../../templates/confirm_delete.html")),
];

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Compiled page templates.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// # Errors
    ///
    /// Returns an error if any embedded template fails to parse.
    pub fn new() -> Result<Self, PageError> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// # Errors
    ///
    /// Returns an error if the template is unknown or rendering fails.
    pub fn render<S: Serialize>(&self, template: &str, view: &S) -> Result<String, PageError> {
        Ok(self.env.get_template(template)?.render(view)?)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
