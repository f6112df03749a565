use serde::{Deserialize, Serialize};

use crate::services::view::{StatusFilter, ViewState};

/// Query string of the contact table.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IndexQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

impl IndexQuery {
    /// Builds the view state; an unrecognised status shows everything.
    pub fn view_state(&self) -> ViewState {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let status = self
            .status
            .as_deref()
            .and_then(|s| s.parse::<StatusFilter>().ok())
            .unwrap_or_default();

        ViewState::new(search, status, self.page.unwrap_or(1))
    }

    /// Encodes the query, leaving out values equal to the defaults.
    pub fn to_query_string(&self) -> String {
        serde_html_form::to_string(self).unwrap_or_else(|err| {
            log::error!("Failed to encode index query: {err}");
            String::new()
        })
    }

    /// Parses a query string submitted back by a form. Malformed input
    /// yields the default view.
    pub fn from_return_query(raw: &str) -> Self {
        serde_html_form::from_str(raw).unwrap_or_else(|err| {
            log::warn!("Ignoring malformed return query {raw:?}: {err}");
            Self::default()
        })
    }

    /// Location of the contact table showing this query.
    pub fn index_location(&self) -> String {
        match self.to_query_string() {
            query if query.is_empty() => "/".to_string(),
            query => format!("/?{query}"),
        }
    }
}

/// Hidden field carried by dashboard forms to restore the table view.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    pub return_query: String,
}

impl From<&ViewState> for IndexQuery {
    fn from(state: &ViewState) -> Self {
        Self {
            search: Some(state.search().to_string()).filter(|s| !s.is_empty()),
            status: match state.status() {
                StatusFilter::All => None,
                status => Some(status.to_string()),
            },
            page: Some(state.page()).filter(|page| *page > 1),
        }
    }
}
