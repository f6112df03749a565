use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ContactId, ContactPriority, ContactStatus};

/// A single contact-form submission as held by the dashboard.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactRecord {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub priority: ContactPriority,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactRecord {
    /// Shallow-merges `patch` into the record. Absent fields are kept.
    pub fn apply(&mut self, patch: &ContactPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(notes) = &patch.admin_notes {
            self.admin_notes = Some(notes.clone()).filter(|n| !n.is_empty());
        }
    }
}

/// Partial update sent to the API and folded into the local record.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<ContactPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

impl ContactPatch {
    #[must_use]
    pub fn status(status: ContactStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.admin_notes.is_none()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use super::ContactRecord;
    use crate::domain::types::{ContactId, ContactPriority, ContactStatus};

    /// Builds a record with predictable field values derived from `id`.
    pub fn contact(id: &str, status: ContactStatus) -> ContactRecord {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        ContactRecord {
            id: ContactId::new(id).unwrap(),
            name: format!("Name {id}"),
            email: format!("user{id}@example.com"),
            mobile: None,
            subject: format!("Subject {id}"),
            message: format!("Message {id}"),
            status,
            priority: ContactPriority::Medium,
            admin_notes: None,
            created_at: created,
            updated_at: created,
        }
    }
}
