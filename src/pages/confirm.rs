//! Yes/no prompt that gates issue deletion.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ConfirmDeleteView {
    pub id: String,
    pub prompt: &'static str,
}

impl ConfirmDeleteView {
    #[must_use]
    pub fn new(id: String) -> Self {
        Self { id, prompt: "Are you sure you want to delete this issue?" }
    }
}
