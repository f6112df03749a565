use serde::Deserialize;
use validator::Validate;

use crate::domain::contact::ContactPatch;
use crate::domain::types::{ContactPriority, ContactStatus};
use crate::forms::FormError;

pub const ADMIN_NOTES_MAX_LEN: u64 = 2000;

#[derive(Debug, Deserialize)]
/// Status dropdown submitted from a table row.
pub struct StatusForm {
    pub status: String,
    /// Query string of the table view to return to.
    #[serde(default)]
    pub return_query: String,
}

impl StatusForm {
    pub fn status(&self) -> Result<ContactStatus, FormError> {
        self.status.parse().map_err(|_| FormError::InvalidStatus)
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Edit dialog covering status, priority and admin notes.
pub struct EditContactForm {
    pub status: String,
    pub priority: String,
    #[serde(default)]
    #[validate(length(max = ADMIN_NOTES_MAX_LEN))]
    pub admin_notes: String,
    #[serde(default)]
    pub return_query: String,
}

impl TryFrom<EditContactForm> for ContactPatch {
    type Error = FormError;

    /// Validates the form. Notes are sent as typed, only trimmed; templates
    /// escape them on display. Blank notes are sent as an empty string so the
    /// API clears them.
    fn try_from(form: EditContactForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let status = form
            .status
            .parse::<ContactStatus>()
            .map_err(|_| FormError::InvalidStatus)?;
        let priority = form
            .priority
            .parse::<ContactPriority>()
            .map_err(|_| FormError::InvalidPriority)?;
        let admin_notes = form.admin_notes.trim().to_string();

        Ok(ContactPatch {
            status: Some(status),
            priority: Some(priority),
            admin_notes: Some(admin_notes),
        })
    }
}
