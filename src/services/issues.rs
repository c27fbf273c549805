//! Issue service — validation and CRUD against the backend's issues table.
//!
//! Every call is a single round trip. Ownership is scoped by filtering on
//! `user_id`; row-level policies on the backend remain authoritative.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::baas::{Access, BaasError, Backend, Query};

// =============================================================================
// STATUS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IssueStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl IssueStatus {
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Closed];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw.trim())
    }

    /// CSS class for the status badge.
    #[must_use]
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Open => "badge badge-open",
            Self::InProgress => "badge badge-progress",
            Self::Closed => "badge badge-closed",
        }
    }
}

// =============================================================================
// ISSUE
// =============================================================================

/// One row of the issues table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Opaque; the backend may key rows by integer or UUID.
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub status: IssueStatus,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn opaque_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unsupported id: {other}"))),
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Caller-supplied fields for create and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
}

impl IssueDraft {
    /// Title and description must be non-empty before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::MissingFields`] when either is blank.
    pub fn validate(&self) -> Result<(), IssueError> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(IssueError::MissingFields);
        }
        Ok(())
    }

    fn to_patch(&self) -> Value {
        serde_json::json!({
            "title": self.title,
            "description": self.description,
            "status": self.status,
        })
    }
}

impl From<&Issue> for IssueDraft {
    fn from(issue: &Issue) -> Self {
        Self { title: issue.title.clone(), description: issue.description.clone(), status: issue.status }
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Issue not found")]
    NotFound(String),
    #[error(transparent)]
    Backend(#[from] BaasError),
    #[error("unexpected issue row: {0}")]
    Decode(String),
}

// =============================================================================
// STORE
// =============================================================================

/// Issue operations bound to one backend and table.
pub struct IssueStore<'a> {
    backend: &'a dyn Backend,
    table: &'a str,
}

impl<'a> IssueStore<'a> {
    #[must_use]
    pub fn new(backend: &'a dyn Backend, table: &'a str) -> Self {
        Self { backend, table }
    }

    /// All issues owned by `user_id`, newest first. Undecodable rows are
    /// logged and left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn list(&self, access: Access<'_>, user_id: Uuid) -> Result<Vec<Issue>, IssueError> {
        let query = Query::table(self.table)
            .eq("user_id", user_id)
            .order("created_at", false);
        let rows = self.backend.select(access, &query).await?;
        Ok(rows.into_iter().filter_map(decode_listed).collect())
    }

    /// # Errors
    ///
    /// Returns [`IssueError::MissingFields`] without contacting the backend
    /// when the draft is incomplete, otherwise any backend failure.
    pub async fn create(&self, access: Access<'_>, user_id: Uuid, draft: &IssueDraft) -> Result<Issue, IssueError> {
        draft.validate()?;
        let mut row = draft.to_patch();
        row["user_id"] = Value::String(user_id.to_string());

        let stored = self.backend.insert(access, self.table, row).await?;
        let issue = stored
            .into_iter()
            .next()
            .ok_or_else(|| IssueError::Decode("insert returned no rows".into()))
            .and_then(decode)?;
        tracing::info!(issue_id = %issue.id, %user_id, "issue created");
        Ok(issue)
    }

    /// # Errors
    ///
    /// Returns [`IssueError::MissingFields`] for an incomplete draft,
    /// [`IssueError::NotFound`] when no owned row matched, otherwise any
    /// backend failure.
    pub async fn update(
        &self,
        access: Access<'_>,
        user_id: Uuid,
        id: &str,
        draft: &IssueDraft,
    ) -> Result<Issue, IssueError> {
        draft.validate()?;
        let query = Query::table(self.table)
            .eq("id", id)
            .eq("user_id", user_id);

        let updated = self.backend.update(access, &query, draft.to_patch()).await?;
        let issue = updated
            .into_iter()
            .next()
            .ok_or_else(|| IssueError::NotFound(id.to_owned()))
            .and_then(decode)?;
        tracing::info!(issue_id = %issue.id, status = issue.status.as_str(), "issue updated");
        Ok(issue)
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    pub async fn delete(&self, access: Access<'_>, user_id: Uuid, id: &str) -> Result<(), IssueError> {
        let query = Query::table(self.table)
            .eq("id", id)
            .eq("user_id", user_id);
        self.backend.delete(access, &query).await?;
        tracing::info!(issue_id = %id, %user_id, "issue deleted");
        Ok(())
    }
}

fn decode(row: Value) -> Result<Issue, IssueError> {
    serde_json::from_value(row).map_err(|e| IssueError::Decode(e.to_string()))
}

/// Rows written outside this service (e.g. a lowercase or null status) are
/// skipped so the rest of the list still renders.
fn decode_listed(row: Value) -> Option<Issue> {
    let row_id = row.get("id").map(ToString::to_string).unwrap_or_default();
    match decode(row) {
        Ok(issue) => Some(issue),
        Err(e) => {
            tracing::warn!(%row_id, error = %e, "skipping undecodable issue row");
            None
        }
    }
}

#[cfg(test)]
#[path = "issues_test.rs"]
mod tests;
