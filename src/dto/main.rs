use serde::Serialize;

use crate::domain::contact::ContactRecord;
use crate::domain::display::Badge;
use crate::domain::stats::StatsSummary;
use crate::services::delete_gate::GateState;
use crate::services::store::StoreError;
use crate::services::view::ContactView;

/// One table row with its display badges resolved.
#[derive(Debug, Serialize)]
pub struct ContactRow {
    pub contact: ContactRecord,
    pub status_badge: Badge,
    pub priority_badge: Badge,
}

impl From<ContactRecord> for ContactRow {
    fn from(contact: ContactRecord) -> Self {
        Self {
            status_badge: contact.status.badge(),
            priority_badge: contact.priority.badge(),
            contact,
        }
    }
}

/// The visible page of the contact table.
#[derive(Debug, Serialize)]
pub struct ContactTable {
    pub rows: Vec<ContactRow>,
    pub page: usize,
    pub total_pages: usize,
    /// Page links; `None` renders as an ellipsis.
    pub pages: Vec<Option<usize>>,
    pub has_previous: bool,
    pub has_next: bool,
    /// Records matching the filters across all pages.
    pub total: usize,
    pub show_pagination: bool,
}

impl From<ContactView> for ContactTable {
    fn from(view: ContactView) -> Self {
        let contacts = view.contacts;
        Self {
            page: contacts.page,
            total_pages: contacts.total_pages,
            has_previous: contacts.has_previous(),
            has_next: contacts.has_next(),
            pages: contacts.pages,
            rows: contacts.items.into_iter().map(ContactRow::from).collect(),
            total: view.total,
            show_pagination: view.show_pagination,
        }
    }
}

/// Data required to render the contact table page.
#[derive(Debug, Serialize)]
pub struct IndexPageData {
    pub table: ContactTable,
    /// Export controls are disabled when nothing matches or an export runs.
    pub can_export: bool,
    pub stats: Option<StatsSummary>,
    pub error: Option<StoreError>,
    pub search: String,
    pub status_filter: String,
    /// Query string reproducing the current view, for forms to return to.
    pub return_query: String,
    pub delete_gate: GateState,
}

/// Data for the edit dialog page.
#[derive(Debug, Serialize)]
pub struct EditPageData {
    pub row: ContactRow,
    pub return_query: String,
}

/// Data for the delete confirmation prompt.
#[derive(Debug, Serialize)]
pub struct DeletePageData {
    /// Snapshot taken when delete was clicked.
    pub candidate: ContactRecord,
    pub in_flight: bool,
    pub return_query: String,
}
