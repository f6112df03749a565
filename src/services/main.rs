//! Dashboard state and page loaders used by the HTTP routes.

use crate::domain::types::ContactId;
use crate::dto::main::{ContactRow, ContactTable, DeletePageData, EditPageData, IndexPageData};
use crate::forms::main::IndexQuery;
use crate::repository::ContactReader;
use crate::services::delete_gate::DeleteGate;
use crate::services::export::ExportLock;
use crate::services::mutations::EditDialog;
use crate::services::store::{SharedStore, refresh};
use crate::services::view::{ViewState, derive_view};
use crate::services::{ServiceError, ServiceResult};

/// Everything the single admin dashboard keeps between requests.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub store: SharedStore,
    pub gate: DeleteGate,
    pub editor: EditDialog,
    pub exports: ExportLock,
}

impl DashboardState {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }
}

/// Builds the contact table page. The list is fetched first if no load has
/// succeeded yet.
pub async fn load_index_page<R>(
    repo: &R,
    state: &DashboardState,
    query: &IndexQuery,
) -> ServiceResult<IndexPageData>
where
    R: ContactReader + ?Sized,
{
    if !state.store.read().is_loaded() {
        // Failures are recorded in the store and rendered with the page.
        let _ = refresh(repo, &state.store).await;
    }

    let view_state = query.view_state();
    let store = state.store.read();
    let view = derive_view(store.records(), &view_state);

    let effective = ViewState::new(
        view_state.search(),
        view_state.status(),
        view.contacts.page,
    );
    let table = ContactTable::from(view);

    Ok(IndexPageData {
        can_export: table.total > 0 && !state.exports.is_busy(),
        table,
        stats: store.stats().copied(),
        error: store.error().cloned(),
        search: effective.search().to_string(),
        status_filter: effective.status().to_string(),
        return_query: IndexQuery::from(&effective).to_query_string(),
        delete_gate: state.gate.state(),
    })
}

/// Opens the edit dialog on the stored record `id`.
pub fn open_edit_dialog(
    state: &DashboardState,
    id: &ContactId,
    return_query: String,
) -> ServiceResult<EditPageData> {
    let record = state
        .store
        .read()
        .get(id)
        .cloned()
        .ok_or(ServiceError::NotFound)?;

    state.editor.open(record.clone());
    Ok(EditPageData {
        row: ContactRow::from(record),
        return_query,
    })
}

/// Ensures the edit dialog is open on `id` before its form is submitted.
pub fn ensure_editing(state: &DashboardState, id: &ContactId) -> ServiceResult<()> {
    match state.editor.current() {
        Some(record) if &record.id == id => Ok(()),
        _ => Err(ServiceError::Conflict(
            "This contact is no longer open for editing".to_string(),
        )),
    }
}

/// Data for the delete prompt of the pending candidate.
pub fn load_delete_page(state: &DashboardState, return_query: String) -> Option<DeletePageData> {
    state.gate.candidate().map(|candidate| DeletePageData {
        candidate,
        in_flight: state.gate.is_in_flight(),
        return_query,
    })
}
