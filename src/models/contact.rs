//! Wire models exchanged with the remote contact API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::contact::ContactRecord;
use crate::domain::stats::StatsSummary;
use crate::domain::types::{ContactId, ContactPriority, ContactStatus, TypeConstraintError};

/// JSON shape of a contact returned by `GET /api/contact`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Envelope of `GET /api/contact`.
#[derive(Debug, Deserialize)]
pub struct ContactList {
    pub contacts: Vec<Contact>,
}

/// One `{_id, count}` bucket of `GET /api/contact/stats`.
#[derive(Debug, Deserialize)]
pub struct StatsBucket {
    #[serde(rename = "_id")]
    pub status: String,
    pub count: u64,
}

/// Envelope of `GET /api/contact/stats`.
#[derive(Debug, Deserialize)]
pub struct StatsList {
    #[serde(default)]
    pub stats: Vec<StatsBucket>,
}

/// Optional error body sent with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

impl TryFrom<Contact> for ContactRecord {
    type Error = TypeConstraintError;

    fn try_from(contact: Contact) -> Result<Self, Self::Error> {
        Ok(ContactRecord {
            id: ContactId::new(contact.id)?,
            name: contact.name,
            email: contact.email,
            mobile: contact.mobile.filter(|m| !m.trim().is_empty()),
            subject: contact.subject,
            message: contact.message,
            status: ContactStatus::parse_or_default(&contact.status),
            priority: ContactPriority::parse_or_default(&contact.priority),
            admin_notes: contact.admin_notes.filter(|n| !n.is_empty()),
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        })
    }
}

impl From<StatsList> for StatsSummary {
    fn from(list: StatsList) -> Self {
        StatsSummary::from_buckets(
            list.stats
                .iter()
                .map(|bucket| (bucket.status.as_str(), bucket.count)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_contact_with_unknown_status() {
        let json = r#"{
            "_id": "65f1",
            "name": "Ann",
            "email": "ann@example.com",
            "subject": "Hello",
            "message": "Hi there",
            "status": "escalated",
            "priority": "high",
            "adminNotes": "",
            "createdAt": "2024-03-01T09:30:00.000Z",
            "updatedAt": "2024-03-02T10:00:00Z"
        }"#;

        let contact: Contact = serde_json::from_str(json).unwrap();
        let record = ContactRecord::try_from(contact).unwrap();

        assert_eq!(record.id.as_str(), "65f1");
        assert_eq!(record.status, ContactStatus::Pending);
        assert_eq!(record.priority, ContactPriority::High);
        assert_eq!(record.mobile, None);
        assert_eq!(record.admin_notes, None);
    }

    #[test]
    fn blank_id_is_rejected() {
        let json = r#"{
            "_id": " ",
            "name": "Ann",
            "email": "ann@example.com",
            "createdAt": "2024-03-01T09:30:00Z",
            "updatedAt": "2024-03-01T09:30:00Z"
        }"#;

        let contact: Contact = serde_json::from_str(json).unwrap();

        assert!(ContactRecord::try_from(contact).is_err());
    }

    #[test]
    fn stats_list_folds_into_summary() {
        let list: StatsList =
            serde_json::from_str(r#"{"stats":[{"_id":"pending","count":2},{"_id":"worked","count":1}]}"#)
                .unwrap();

        let summary = StatsSummary::from(list);

        assert_eq!(summary.total_contacts, 3);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.in_progress, 1);
    }
}
