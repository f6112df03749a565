//! Pure derivation of the visible contact page from the store and the
//! current search, status filter and page.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::domain::contact::ContactRecord;
use crate::domain::types::{ContactStatus, TypeConstraintError};
use crate::pagination::Paginated;

pub const PAGE_SIZE: usize = 10;

/// Status filter of the contact table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ContactStatus),
}

impl StatusFilter {
    pub fn accepts(self, status: ContactStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        trimmed.parse().map(StatusFilter::Only)
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Client-side table state. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewState {
    search: String,
    status: StatusFilter,
    page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            page: 1,
        }
    }
}

impl ViewState {
    pub fn new(search: impl Into<String>, status: StatusFilter, page: usize) -> Self {
        Self {
            search: search.into(),
            status,
            page: page.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Changing the search term always returns to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Changing the status filter always returns to the first page.
    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
        self.page = 1;
    }

    /// Explicit navigation, clamped into `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }
}

/// Search matches name, email or subject case-insensitively; an empty term
/// matches everything.
pub fn matches(record: &ContactRecord, search: &str, status: StatusFilter) -> bool {
    if !status.accepts(record.status) {
        return false;
    }
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [&record.name, &record.email, &record.subject]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Every record passing the current search and status filter, in store order.
pub fn filter_contacts<'a>(records: &'a [ContactRecord], state: &ViewState) -> Vec<&'a ContactRecord> {
    records
        .iter()
        .filter(|record| matches(record, &state.search, state.status))
        .collect()
}

pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE).max(1)
}

/// Items of the 1-based `page`; empty when the page lies past the end.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(items.len());
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// The derived, disposable view of the table.
#[derive(Debug, Serialize)]
pub struct ContactView {
    pub contacts: Paginated<ContactRecord>,
    /// Number of records matching the filters across all pages.
    pub total: usize,
    /// Pagination controls are hidden entirely when nothing matches.
    pub show_pagination: bool,
}

/// Derives the visible page. A page beyond the last one falls back to the
/// first page.
pub fn derive_view(records: &[ContactRecord], state: &ViewState) -> ContactView {
    let filtered = filter_contacts(records, state);
    let total = filtered.len();
    let pages = total_pages(total);
    let page = if state.page > pages || state.page == 0 {
        1
    } else {
        state.page
    };

    let items = page_slice(&filtered, page)
        .iter()
        .map(|record| (*record).clone())
        .collect();

    ContactView {
        contacts: Paginated::new(items, page, pages),
        total,
        show_pagination: total > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contact::fixtures::contact;

    fn numbered(count: usize) -> Vec<ContactRecord> {
        (1..=count)
            .map(|n| contact(&n.to_string(), ContactStatus::Pending))
            .collect()
    }

    fn ids(records: &[ContactRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn status_filter_selects_matching_records() {
        let records = vec![
            contact("1", ContactStatus::Pending),
            contact("2", ContactStatus::Done),
        ];
        let state = ViewState::new("", StatusFilter::Only(ContactStatus::Pending), 1);

        let view = derive_view(&records, &state);

        assert_eq!(ids(&view.contacts.items), vec!["1"]);
        assert_eq!(view.contacts.total_pages, 1);
    }

    #[test]
    fn search_is_case_insensitive_over_name_email_subject() {
        let mut by_name = contact("1", ContactStatus::Pending);
        by_name.name = "Grace Hopper".to_string();
        let mut by_email = contact("2", ContactStatus::Pending);
        by_email.email = "GRACE@navy.mil".to_string();
        let mut by_subject = contact("3", ContactStatus::Done);
        by_subject.subject = "Amazing grace".to_string();
        let mut by_message = contact("4", ContactStatus::Pending);
        by_message.message = "grace".to_string();
        let records = vec![by_name, by_email, by_subject, by_message];

        let state = ViewState::new("GrAcE", StatusFilter::All, 1);
        let filtered = filter_contacts(&records, &state);

        let found: Vec<_> = filtered.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(found, vec!["1", "2", "3"]);
    }

    #[test]
    fn search_and_status_combine() {
        let mut a = contact("1", ContactStatus::Pending);
        a.name = "Alice".to_string();
        let mut b = contact("2", ContactStatus::Done);
        b.name = "Alice".to_string();
        let records = vec![a, b];

        let state = ViewState::new("alice", StatusFilter::Only(ContactStatus::Done), 1);

        let found: Vec<_> = filter_contacts(&records, &state)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(found, vec!["2"]);
    }

    #[test]
    fn total_pages_is_at_least_one() {
        assert_eq!(total_pages(0), 1);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(25), 3);
    }

    #[test]
    fn twenty_five_records_span_three_pages() {
        let records = numbered(25);

        let first = derive_view(&records, &ViewState::new("", StatusFilter::All, 1));
        let last = derive_view(&records, &ViewState::new("", StatusFilter::All, 3));

        assert_eq!(first.contacts.total_pages, 3);
        assert_eq!(
            ids(&first.contacts.items),
            (1..=10).map(|n| n.to_string()).collect::<Vec<_>>()
        );
        assert_eq!(
            ids(&last.contacts.items),
            (21..=25).map(|n| n.to_string()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn pages_concatenate_to_filtered_set() {
        for count in [0, 1, 9, 10, 11, 37] {
            let records = numbered(count);
            let pages = total_pages(count);

            let rebuilt: Vec<_> = (1..=pages)
                .flat_map(|page| page_slice(&records, page).iter().cloned())
                .collect();

            assert_eq!(rebuilt, records, "count {count}");
        }
    }

    #[test]
    fn changing_criteria_resets_page() {
        let mut state = ViewState::new("", StatusFilter::All, 4);
        state.set_search("bob");
        assert_eq!(state.page(), 1);

        state.go_to_page(3, 5);
        state.set_status(StatusFilter::Only(ContactStatus::Rejected));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut state = ViewState::default();
        state.go_to_page(9, 3);
        assert_eq!(state.page(), 3);
        state.go_to_page(0, 3);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn page_past_end_falls_back_to_first() {
        let records = numbered(12);
        let view = derive_view(&records, &ViewState::new("", StatusFilter::All, 5));

        assert_eq!(view.contacts.page, 1);
        assert_eq!(view.contacts.items.len(), 10);
    }

    #[test]
    fn empty_result_hides_pagination() {
        let records = numbered(3);
        let view = derive_view(&records, &ViewState::new("nobody", StatusFilter::All, 1));

        assert!(view.contacts.items.is_empty());
        assert_eq!(view.total, 0);
        assert!(!view.show_pagination);
    }

    #[test]
    fn status_filter_parses_all_and_statuses() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "review".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(ContactStatus::Review))
        );
        assert!("closed".parse::<StatusFilter>().is_err());
        assert_eq!(StatusFilter::Only(ContactStatus::Done).to_string(), "done");
    }
}
