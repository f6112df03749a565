//! Local cache of contacts and stats fetched from the API.
//!
//! [`ContactStore`] is the only writer of contact records. [`SharedStore`]
//! wraps it for handlers; locks are taken for short synchronous sections and
//! never held across a request.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{RwLock, RwLockReadGuard};
use serde::Serialize;

use crate::domain::contact::{ContactPatch, ContactRecord};
use crate::domain::stats::StatsSummary;
use crate::domain::types::ContactId;
use crate::repository::ContactReader;
use crate::services::ServiceResult;

pub const FETCH_CONTACTS_FAILED: &str = "Failed to fetch contacts";
pub const FETCH_STATS_FAILED: &str = "Failed to fetch stats";

/// Operation that produced the message in the error slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Fetch,
    Stats,
    Update,
    Delete,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoreError {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ContactStore {
    records: Vec<ContactRecord>,
    stats: Option<StatsSummary>,
    error: Option<StoreError>,
    loaded: bool,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ContactRecord>) -> Self {
        Self {
            records,
            loaded: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn get(&self, id: &ContactId) -> Option<&ContactRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn stats(&self) -> Option<&StatsSummary> {
        self.stats.as_ref()
    }

    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    /// Whether a list fetch has ever succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replaces every record with a fresh list and clears any error.
    pub fn replace_records(&mut self, records: Vec<ContactRecord>) {
        self.records = records;
        self.loaded = true;
        self.error = None;
    }

    pub fn set_stats(&mut self, stats: StatsSummary) {
        self.stats = Some(stats);
        self.clear_error(ErrorKind::Stats);
    }

    /// Merges `patch` into the record with `id`. Returns `false` when no such
    /// record exists; the store is left unchanged in that case.
    pub fn apply_update(&mut self, id: &ContactId, patch: &ContactPatch) -> bool {
        match self.records.iter_mut().find(|record| &record.id == id) {
            Some(record) => {
                record.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Removes the record with `id`. Returns `false` when it is not present.
    pub fn apply_delete(&mut self, id: &ContactId) -> bool {
        let before = self.records.len();
        self.records.retain(|record| &record.id != id);
        self.records.len() != before
    }

    pub fn set_error(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.error = Some(StoreError {
            kind,
            message: message.into(),
        });
    }

    /// Clears the error slot if it was set by an operation of `kind`.
    pub fn clear_error(&mut self, kind: ErrorKind) {
        if self.error.as_ref().is_some_and(|error| error.kind == kind) {
            self.error = None;
        }
    }
}

/// Cloneable handle to a [`ContactStore`] shared between handlers.
///
/// Once closed, results of requests that are still in flight are dropped
/// instead of being applied.
#[derive(Clone, Debug, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<ContactStore>>,
    closed: Arc<AtomicBool>,
}

impl SharedStore {
    pub fn new(store: ContactStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ContactStore> {
        self.inner.read()
    }

    /// Runs `f` against the store unless the handle has been closed.
    pub fn update<T>(&self, f: impl FnOnce(&mut ContactStore) -> T) -> Option<T> {
        if self.is_closed() {
            log::debug!("Ignoring store update after close");
            return None;
        }
        Some(f(&mut self.inner.write()))
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Fetches every contact and replaces the local list. On failure the current
/// records are kept and the error slot is set.
pub async fn load<R>(repo: &R, store: &SharedStore) -> ServiceResult<usize>
where
    R: ContactReader + ?Sized,
{
    match repo.list_contacts().await {
        Ok(records) => {
            let count = records.len();
            store.update(|s| s.replace_records(records));
            log::info!("Loaded {count} contacts");
            Ok(count)
        }
        Err(err) => {
            log::error!("Failed to fetch contacts: {err}");
            let message = err.user_message(FETCH_CONTACTS_FAILED);
            store.update(|s| s.set_error(ErrorKind::Fetch, message));
            Err(err.into())
        }
    }
}

/// Fetches the aggregate stats. Independent from [`load`]: neither failure
/// affects the other's data.
pub async fn load_stats<R>(repo: &R, store: &SharedStore) -> ServiceResult<StatsSummary>
where
    R: ContactReader + ?Sized,
{
    match repo.fetch_stats().await {
        Ok(stats) => {
            store.update(|s| s.set_stats(stats));
            Ok(stats)
        }
        Err(err) => {
            log::error!("Failed to fetch contact stats: {err}");
            let message = err.user_message(FETCH_STATS_FAILED);
            store.update(|s| s.set_error(ErrorKind::Stats, message));
            Err(err.into())
        }
    }
}

/// User-triggered reload of both the list and the stats. Stats are fetched
/// even when the list fails.
pub async fn refresh<R>(repo: &R, store: &SharedStore) -> ServiceResult<()>
where
    R: ContactReader + ?Sized,
{
    let contacts = load(repo, store).await;
    let stats = load_stats(repo, store).await;
    contacts?;
    stats?;
    Ok(())
}
