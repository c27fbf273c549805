//! Dashboard and issue form handlers.
//!
//! Each mutation is one backend round trip followed by a redirect to the
//! dashboard, which refetches the full list. Failures re-render the
//! dashboard in place with the message and the values the user typed.

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::auth::{CurrentUser, SignedIn};
use super::render_page;
use crate::baas::Access;
use crate::pages::confirm::ConfirmDeleteView;
use crate::pages::dashboard::{DashboardView, Editing};
use crate::services::issues::{IssueDraft, IssueError, IssueStatus};
use crate::state::AppState;

pub(crate) fn issue_error_to_status(err: &IssueError) -> StatusCode {
    match err {
        IssueError::MissingFields => StatusCode::UNPROCESSABLE_ENTITY,
        IssueError::NotFound(_) => StatusCode::NOT_FOUND,
        IssueError::Backend(e) if e.is_unauthorized() => StatusCode::UNAUTHORIZED,
        IssueError::Backend(_) | IssueError::Decode(_) => StatusCode::BAD_GATEWAY,
    }
}

fn not_logged_in(state: &AppState) -> Response {
    render_page(state, "dashboard.html", &DashboardView::signed_out(), StatusCode::UNAUTHORIZED)
}

/// Fetch the user's issues and render the dashboard around them.
async fn render_dashboard(
    state: &AppState,
    signed_in: &SignedIn,
    editing: Option<Editing<'_>>,
    new_issue: &IssueDraft,
    error: Option<String>,
    status: StatusCode,
) -> Response {
    let email = signed_in.user.email.clone();
    match state
        .issues()
        .list(Access::User(&signed_in.token), signed_in.user.id)
        .await
    {
        Ok(issues) => {
            let view = DashboardView::new(email, &issues, editing, new_issue, error);
            render_page(state, "dashboard.html", &view, status)
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %signed_in.user.id, "issue list failed");
            let status = if status.is_success() { issue_error_to_status(&e) } else { status };
            let view = DashboardView::new(email, &[], None, new_issue, Some(error.unwrap_or_else(|| e.to_string())));
            render_page(state, "dashboard.html", &view, status)
        }
    }
}

// =============================================================================
// FORMS
// =============================================================================

#[derive(Deserialize)]
pub struct IssueFormBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: String,
}

impl IssueFormBody {
    /// A missing status means the default; an unrecognized one is rejected.
    fn into_draft(self) -> Result<IssueDraft, (IssueDraft, String)> {
        let status = if self.status.trim().is_empty() {
            Some(IssueStatus::default())
        } else {
            IssueStatus::parse(&self.status)
        };
        match status {
            Some(status) => Ok(IssueDraft { title: self.title, description: self.description, status }),
            None => {
                let message = format!("Unknown status: {}", self.status);
                let draft = IssueDraft { title: self.title, description: self.description, status: IssueStatus::default() };
                Err((draft, message))
            }
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct DashboardQuery {
    edit: Option<String>,
}

/// `GET /dashboard` — list the signed-in user's issues, newest first.
/// `?edit=<id>` puts that row in edit mode.
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(signed_in): CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let Some(signed_in) = signed_in else {
        return render_page(&state, "dashboard.html", &DashboardView::signed_out(), StatusCode::OK);
    };
    let editing = query
        .edit
        .as_deref()
        .map(|id| Editing { id, draft: None });
    render_dashboard(&state, &signed_in, editing, &IssueDraft::default(), None, StatusCode::OK).await
}

/// `POST /issues` — create an issue from the new-issue form.
pub async fn create_issue(
    State(state): State<AppState>,
    CurrentUser(signed_in): CurrentUser,
    Form(body): Form<IssueFormBody>,
) -> Response {
    let Some(signed_in) = signed_in else {
        return not_logged_in(&state);
    };
    let draft = match body.into_draft() {
        Ok(draft) => draft,
        Err((draft, message)) => {
            return render_dashboard(&state, &signed_in, None, &draft, Some(message), StatusCode::UNPROCESSABLE_ENTITY)
                .await;
        }
    };

    match state
        .issues()
        .create(Access::User(&signed_in.token), signed_in.user.id, &draft)
        .await
    {
        Ok(_) => Redirect::to("/dashboard").into_response(),
        Err(e) => {
            let status = issue_error_to_status(&e);
            render_dashboard(&state, &signed_in, None, &draft, Some(e.to_string()), status).await
        }
    }
}

/// `POST /issues/:id` — save the inline edit form.
pub async fn update_issue(
    State(state): State<AppState>,
    CurrentUser(signed_in): CurrentUser,
    Path(id): Path<String>,
    Form(body): Form<IssueFormBody>,
) -> Response {
    let Some(signed_in) = signed_in else {
        return not_logged_in(&state);
    };
    let draft = match body.into_draft() {
        Ok(draft) => draft,
        Err((draft, message)) => {
            let editing = Some(Editing { id: &id, draft: Some(&draft) });
            return render_dashboard(
                &state,
                &signed_in,
                editing,
                &IssueDraft::default(),
                Some(message),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };

    match state
        .issues()
        .update(Access::User(&signed_in.token), signed_in.user.id, &id, &draft)
        .await
    {
        Ok(_) => Redirect::to("/dashboard").into_response(),
        Err(e) => {
            let editing = Some(Editing { id: &id, draft: Some(&draft) });
            let status = issue_error_to_status(&e);
            render_dashboard(&state, &signed_in, editing, &IssueDraft::default(), Some(e.to_string()), status).await
        }
    }
}

/// `GET /issues/:id/delete` — ask before deleting.
pub async fn confirm_delete(
    State(state): State<AppState>,
    CurrentUser(signed_in): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    if signed_in.is_none() {
        return not_logged_in(&state);
    }
    render_page(&state, "confirm_delete.html", &ConfirmDeleteView::new(id), StatusCode::OK)
}

#[derive(Deserialize)]
pub struct DeleteForm {
    confirm: Option<String>,
}

/// `POST /issues/:id/delete` — delete only when the prompt was answered yes.
pub async fn delete_issue(
    State(state): State<AppState>,
    CurrentUser(signed_in): CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let Some(signed_in) = signed_in else {
        return not_logged_in(&state);
    };
    if form.confirm.as_deref() != Some("yes") {
        return Redirect::to("/dashboard").into_response();
    }

    match state
        .issues()
        .delete(Access::User(&signed_in.token), signed_in.user.id, &id)
        .await
    {
        Ok(()) => Redirect::to("/dashboard").into_response(),
        Err(e) => {
            let status = issue_error_to_status(&e);
            render_dashboard(&state, &signed_in, None, &IssueDraft::default(), Some(e.to_string()), status).await
        }
    }
}

#[cfg(test)]
#[path = "issues_test.rs"]
mod tests;
