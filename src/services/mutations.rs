//! Status changes and edit-form submissions.
//!
//! A patch is folded into the store only after the API accepted it; stats
//! are refetched wholesale after every successful change.

use parking_lot::Mutex;

use crate::domain::contact::{ContactPatch, ContactRecord};
use crate::domain::types::{ContactId, ContactStatus};
use crate::repository::{ContactReader, ContactWriter};
use crate::services::store::{ErrorKind, SharedStore, load_stats};
use crate::services::{ServiceError, ServiceResult};

pub const UPDATE_FAILED: &str = "Failed to update contact";

/// The record currently open in the edit dialog, if any.
#[derive(Debug, Default)]
pub struct EditDialog {
    editing: Mutex<Option<ContactRecord>>,
}

impl EditDialog {
    /// Opens the dialog on a snapshot of `record`.
    pub fn open(&self, record: ContactRecord) {
        *self.editing.lock() = Some(record);
    }

    pub fn current(&self) -> Option<ContactRecord> {
        self.editing.lock().clone()
    }

    pub fn is_open(&self) -> bool {
        self.editing.lock().is_some()
    }

    pub fn close(&self) {
        *self.editing.lock() = None;
    }
}

async fn submit_patch<R>(
    repo: &R,
    store: &SharedStore,
    id: &ContactId,
    patch: &ContactPatch,
) -> ServiceResult<()>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    if let Err(err) = repo.update_contact(id, patch).await {
        log::error!("Failed to update contact {id}: {err}");
        let message = err.user_message(UPDATE_FAILED);
        store.update(|s| s.set_error(ErrorKind::Update, message));
        return Err(err.into());
    }

    store.update(|s| {
        if !s.apply_update(id, patch) {
            log::warn!("Updated contact {id} is no longer in the local list");
        }
        s.clear_error(ErrorKind::Update);
    });

    // A stats failure is recorded in the store and does not undo the update.
    let _ = load_stats(repo, store).await;
    Ok(())
}

/// Sends a status-only patch for `id`. Ids that are not in the loaded list
/// are rejected without a request.
pub async fn update_status<R>(
    repo: &R,
    store: &SharedStore,
    id: &ContactId,
    status: ContactStatus,
) -> ServiceResult<()>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    if store.read().get(id).is_none() {
        log::warn!("Status change for unknown contact {id}");
        return Err(ServiceError::NotFound);
    }

    submit_patch(repo, store, id, &ContactPatch::status(status)).await
}

/// Submits the edit form for the record open in `dialog` and closes the
/// dialog on success. On failure the dialog stays open.
pub async fn update_record<R>(
    repo: &R,
    store: &SharedStore,
    dialog: &EditDialog,
    patch: ContactPatch,
) -> ServiceResult<ContactId>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    let record = dialog
        .current()
        .ok_or_else(|| ServiceError::Conflict("No contact is being edited".to_string()))?;

    if patch.is_empty() {
        return Err(ServiceError::Form("Nothing to update".to_string()));
    }

    submit_patch(repo, store, &record.id, &patch).await?;
    dialog.close();
    Ok(record.id)
}
