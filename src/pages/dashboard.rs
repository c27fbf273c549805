//! Dashboard — issue list, inline edit form, and the new-issue form.
//!
//! A single `editing` selector decides which row, if any, renders as an
//! edit form instead of static text.

use serde::Serialize;

use crate::services::issues::{Issue, IssueDraft, IssueStatus};

pub const NOT_LOGGED_IN: &str = "Not logged in";

#[derive(Debug, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Values of a title/description/status form.
#[derive(Debug, Serialize)]
pub struct IssueForm {
    pub title: String,
    pub description: String,
    pub status_options: Vec<StatusOption>,
}

impl IssueForm {
    #[must_use]
    pub fn from_draft(draft: &IssueDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            status_options: IssueStatus::ALL
                .into_iter()
                .map(|s| StatusOption { value: s.as_str(), selected: s == draft.status })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IssueRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: &'static str,
    pub badge_class: &'static str,
    /// Present only for the row being edited.
    pub edit: Option<IssueForm>,
}

/// The row in edit mode. `draft` carries values the user already typed
/// (after a failed save); without it the form starts from the stored issue.
#[derive(Debug, Clone, Copy)]
pub struct Editing<'a> {
    pub id: &'a str,
    pub draft: Option<&'a IssueDraft>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub signed_in: bool,
    pub email: Option<String>,
    pub issues: Vec<IssueRow>,
    pub new_issue: IssueForm,
    pub error: Option<String>,
}

impl DashboardView {
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            email: None,
            issues: Vec::new(),
            new_issue: IssueForm::from_draft(&IssueDraft::default()),
            error: Some(NOT_LOGGED_IN.to_owned()),
        }
    }

    #[must_use]
    pub fn new(
        email: Option<String>,
        issues: &[Issue],
        editing: Option<Editing<'_>>,
        new_issue: &IssueDraft,
        error: Option<String>,
    ) -> Self {
        let issues = issues
            .iter()
            .map(|issue| {
                let edit = editing
                    .filter(|e| e.id == issue.id)
                    .map(|e| match e.draft {
                        Some(draft) => IssueForm::from_draft(draft),
                        None => IssueForm::from_draft(&IssueDraft::from(issue)),
                    });
                IssueRow {
                    id: issue.id.clone(),
                    title: issue.title.clone(),
                    description: issue.description.clone(),
                    status: issue.status.as_str(),
                    badge_class: issue.status.badge_class(),
                    edit,
                }
            })
            .collect();

        Self { signed_in: true, email, issues, new_issue: IssueForm::from_draft(new_issue), error }
    }

    /// Id of the row rendered as an edit form, if any.
    #[cfg(test)]
    #[must_use]
    pub fn editing_id(&self) -> Option<&str> {
        self.issues
            .iter()
            .find(|row| row.edit.is_some())
            .map(|row| row.id.as_str())
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
