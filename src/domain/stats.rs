use serde::Serialize;

use crate::domain::types::ContactStatus;

/// Aggregate counts of contacts by processing state.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct StatsSummary {
    pub total_contacts: u64,
    pub pending: u64,
    /// Contacts under review or being worked on.
    pub in_progress: u64,
    pub completed: u64,
    pub rejected: u64,
}

impl StatsSummary {
    /// Folds sparse per-status buckets into a summary. Statuses without a
    /// bucket count as zero; unrecognised buckets only add to the total.
    pub fn from_buckets<'a, I>(buckets: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut summary = Self::default();
        for (status, count) in buckets {
            summary.total_contacts = summary.total_contacts.saturating_add(count);
            let bucket = match status.parse::<ContactStatus>() {
                Ok(ContactStatus::Pending) => &mut summary.pending,
                Ok(ContactStatus::Review | ContactStatus::Worked) => &mut summary.in_progress,
                Ok(ContactStatus::Done) => &mut summary.completed,
                Ok(ContactStatus::Rejected) => &mut summary.rejected,
                Err(_) => {
                    log::warn!("Ignoring stats bucket for unknown status {status:?}");
                    continue;
                }
            };
            *bucket = bucket.saturating_add(count);
        }
        summary
    }
}
