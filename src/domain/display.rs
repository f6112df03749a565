//! Presentation metadata for contact statuses and priorities.
//!
//! The mapping from the closed enums is exhaustive; raw strings that do not
//! parse resolve to [`UNKNOWN_BADGE`] instead of failing.

use serde::Serialize;

use crate::domain::types::{ContactPriority, ContactStatus};

/// Label, Bootstrap badge class and icon name for a value.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub class: &'static str,
    pub icon: &'static str,
}

pub const UNKNOWN_BADGE: Badge = Badge {
    label: "Unknown",
    class: "bg-secondary",
    icon: "bi-question-circle",
};

impl ContactStatus {
    pub const fn badge(self) -> Badge {
        match self {
            ContactStatus::Pending => Badge {
                label: "Pending",
                class: "bg-warning text-dark",
                icon: "bi-hourglass-split",
            },
            ContactStatus::Review => Badge {
                label: "Review",
                class: "bg-info text-dark",
                icon: "bi-eye",
            },
            ContactStatus::Worked => Badge {
                label: "Worked",
                class: "bg-primary",
                icon: "bi-tools",
            },
            ContactStatus::Done => Badge {
                label: "Done",
                class: "bg-success",
                icon: "bi-check-circle",
            },
            ContactStatus::Rejected => Badge {
                label: "Rejected",
                class: "bg-danger",
                icon: "bi-x-circle",
            },
        }
    }
}

impl ContactPriority {
    pub const fn badge(self) -> Badge {
        match self {
            ContactPriority::Low => Badge {
                label: "Low",
                class: "bg-light text-dark",
                icon: "bi-arrow-down",
            },
            ContactPriority::Medium => Badge {
                label: "Medium",
                class: "bg-secondary",
                icon: "bi-dash",
            },
            ContactPriority::High => Badge {
                label: "High",
                class: "bg-warning text-dark",
                icon: "bi-arrow-up",
            },
            ContactPriority::Urgent => Badge {
                label: "Urgent",
                class: "bg-danger",
                icon: "bi-exclamation-triangle",
            },
        }
    }
}

/// Badge for a raw status string.
pub fn status_badge(raw: &str) -> Badge {
    raw.parse::<ContactStatus>()
        .map(ContactStatus::badge)
        .unwrap_or(UNKNOWN_BADGE)
}

/// Badge for a raw priority string.
pub fn priority_badge(raw: &str) -> Badge {
    raw.parse::<ContactPriority>()
        .map(ContactPriority::badge)
        .unwrap_or(UNKNOWN_BADGE)
}
