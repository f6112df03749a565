//! Two-step confirmation in front of contact deletion.
//!
//! `Idle -> PendingConfirmation -> InFlight -> Idle`, or
//! `PendingConfirmation -> Idle` on cancel. While a request is in flight both
//! confirm and cancel are ignored.

use parking_lot::Mutex;
use serde::Serialize;

use crate::domain::contact::ContactRecord;
use crate::domain::types::ContactId;
use crate::repository::{ContactReader, ContactWriter};
use crate::services::store::{ErrorKind, SharedStore, load_stats};
use crate::services::{ServiceError, ServiceResult};

pub const DELETE_FAILED: &str = "Failed to delete contact";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "contact", rename_all = "snake_case")]
pub enum GateState {
    #[default]
    Idle,
    /// Holds a snapshot of the candidate taken when delete was clicked.
    PendingConfirmation(ContactRecord),
    InFlight(ContactRecord),
}

#[derive(Debug, Default)]
pub struct DeleteGate {
    state: Mutex<GateState>,
}

impl DeleteGate {
    pub fn state(&self) -> GateState {
        self.state.lock().clone()
    }

    /// The contact awaiting confirmation or being deleted.
    pub fn candidate(&self) -> Option<ContactRecord> {
        match &*self.state.lock() {
            GateState::Idle => None,
            GateState::PendingConfirmation(record) | GateState::InFlight(record) => {
                Some(record.clone())
            }
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(*self.state.lock(), GateState::InFlight(_))
    }

    /// Asks for confirmation to delete `record`. Replaces a pending
    /// candidate; refused while a delete is in flight.
    pub fn request(&self, record: &ContactRecord) -> bool {
        let mut state = self.state.lock();
        if matches!(*state, GateState::InFlight(_)) {
            return false;
        }
        *state = GateState::PendingConfirmation(record.clone());
        true
    }

    /// Drops a pending candidate. No effect while in flight.
    pub fn cancel(&self) -> bool {
        let mut state = self.state.lock();
        if matches!(*state, GateState::PendingConfirmation(_)) {
            *state = GateState::Idle;
            true
        } else {
            false
        }
    }

    /// Moves a pending candidate in flight and returns it. Any other state
    /// yields `None`, so repeated clicks cannot issue a second request.
    pub fn confirm(&self) -> Option<ContactRecord> {
        let mut state = self.state.lock();
        match std::mem::take(&mut *state) {
            GateState::PendingConfirmation(record) => {
                *state = GateState::InFlight(record.clone());
                Some(record)
            }
            other => {
                *state = other;
                None
            }
        }
    }

    /// Returns to `Idle` once the request resolved.
    pub fn finish(&self) {
        let mut state = self.state.lock();
        if matches!(*state, GateState::InFlight(_)) {
            *state = GateState::Idle;
        }
    }
}

/// Resets the gate when the in-flight request completes or is dropped.
struct InFlightGuard<'a>(&'a DeleteGate);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.finish();
    }
}

/// Result of a confirm click.
#[derive(Debug, PartialEq)]
pub enum DeleteOutcome {
    Deleted(ContactRecord),
    /// Nothing was pending, or a delete is already in flight.
    Ignored,
}

/// Opens the confirmation step for the contact `id` found in the store.
pub fn request_delete(
    store: &SharedStore,
    gate: &DeleteGate,
    id: &ContactId,
) -> ServiceResult<ContactRecord> {
    let record = store
        .read()
        .get(id)
        .cloned()
        .ok_or(ServiceError::NotFound)?;

    if !gate.request(&record) {
        return Err(ServiceError::Conflict(
            "Another contact is being deleted".to_string(),
        ));
    }
    Ok(record)
}

/// Issues the DELETE for the confirmed candidate. This is the only code path
/// that calls [`ContactWriter::delete_contact`].
pub async fn confirm_delete<R>(
    repo: &R,
    store: &SharedStore,
    gate: &DeleteGate,
) -> ServiceResult<DeleteOutcome>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    let Some(candidate) = gate.confirm() else {
        log::debug!("Delete confirmation ignored, nothing pending");
        return Ok(DeleteOutcome::Ignored);
    };
    let in_flight = InFlightGuard(gate);
    let deleted = repo.delete_contact(&candidate.id).await;
    // InFlight covers only the DELETE itself, not the stats refetch below.
    drop(in_flight);

    if let Err(err) = deleted {
        log::error!("Failed to delete contact {}: {err}", candidate.id);
        let message = err.user_message(DELETE_FAILED);
        store.update(|s| s.set_error(ErrorKind::Delete, message));
        return Err(err.into());
    }

    store.update(|s| {
        s.apply_delete(&candidate.id);
        s.clear_error(ErrorKind::Delete);
    });
    let _ = load_stats(repo, store).await;

    log::info!("Deleted contact {}", candidate.id);
    Ok(DeleteOutcome::Deleted(candidate))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::contact::fixtures::contact;
    use crate::domain::stats::StatsSummary;
    use crate::domain::types::ContactStatus;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::store::ContactStore;

    fn store_with(ids: &[&str]) -> SharedStore {
        SharedStore::new(ContactStore::with_records(
            ids.iter()
                .map(|id| contact(id, ContactStatus::Pending))
                .collect(),
        ))
    }

    fn id(value: &str) -> ContactId {
        ContactId::new(value).unwrap()
    }

    #[test]
    fn cancel_returns_to_idle() {
        let gate = DeleteGate::default();
        gate.request(&contact("5", ContactStatus::Done));

        assert!(gate.cancel());
        assert_eq!(gate.state(), GateState::Idle);
        assert!(!gate.cancel());
    }

    #[test]
    fn confirm_without_request_does_nothing() {
        let gate = DeleteGate::default();

        assert_eq!(gate.confirm(), None);
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn in_flight_ignores_confirm_and_cancel() {
        let gate = DeleteGate::default();
        let record = contact("5", ContactStatus::Done);
        gate.request(&record);

        assert_eq!(gate.confirm(), Some(record.clone()));
        assert_eq!(gate.confirm(), None);
        assert!(!gate.cancel());
        assert!(!gate.request(&contact("6", ContactStatus::Done)));
        assert_eq!(gate.state(), GateState::InFlight(record));

        gate.finish();
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn request_snapshots_the_candidate() {
        let store = store_with(&["5"]);
        let gate = DeleteGate::default();

        let snapshot = request_delete(&store, &gate, &id("5")).unwrap();
        store.update(|s| s.apply_delete(&id("5")));

        assert_eq!(gate.candidate(), Some(snapshot));
        assert_eq!(gate.candidate().unwrap().name, "Name 5");
    }

    #[test]
    fn request_for_missing_contact_is_not_found() {
        let store = store_with(&["1"]);
        let gate = DeleteGate::default();

        let result = request_delete(&store, &gate, &id("2"));

        assert!(matches!(result, Err(ServiceError::NotFound)));
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[actix_web::test]
    async fn cancelled_delete_never_calls_api() {
        let mut repo = MockRepository::new();
        repo.expect_delete_contact().times(0);
        let store = store_with(&["5"]);
        let gate = DeleteGate::default();

        let candidate = request_delete(&store, &gate, &id("5")).unwrap();
        assert_eq!(candidate.email, "user5@example.com");
        gate.cancel();
        let outcome = confirm_delete(&repo, &store, &gate).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Ignored);
        assert!(store.read().get(&id("5")).is_some());
    }

    #[actix_web::test]
    async fn confirmed_delete_removes_record_and_refreshes_stats() {
        let mut repo = MockRepository::new();
        repo.expect_delete_contact()
            .withf(|id| id.as_str() == "5")
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_fetch_stats()
            .times(1)
            .returning(|| Ok(StatsSummary::default()));
        let store = store_with(&["4", "5"]);
        let gate = DeleteGate::default();

        request_delete(&store, &gate, &id("5")).unwrap();
        let outcome = confirm_delete(&repo, &store, &gate).await.unwrap();

        assert!(matches!(outcome, DeleteOutcome::Deleted(ref r) if r.id == id("5")));
        assert_eq!(gate.state(), GateState::Idle);
        assert!(store.read().get(&id("5")).is_none());
        assert_eq!(store.read().records().len(), 1);
    }

    #[actix_web::test]
    async fn failed_delete_keeps_record_and_returns_to_idle() {
        let mut repo = MockRepository::new();
        repo.expect_delete_contact().times(1).returning(|_| {
            Err(RepositoryError::Status {
                status: 500,
                message: None,
            })
        });
        repo.expect_fetch_stats().times(0);
        let store = store_with(&["5"]);
        let gate = DeleteGate::default();

        request_delete(&store, &gate, &id("5")).unwrap();
        let result = confirm_delete(&repo, &store, &gate).await;

        assert!(result.is_err());
        assert_eq!(gate.state(), GateState::Idle);
        assert!(store.read().get(&id("5")).is_some());
        assert_eq!(store.read().error().unwrap().message, DELETE_FAILED);
    }

    #[actix_web::test]
    async fn second_confirm_after_completion_is_ignored() {
        let mut repo = MockRepository::new();
        repo.expect_delete_contact().times(1).returning(|_| Ok(()));
        repo.expect_fetch_stats()
            .returning(|| Ok(StatsSummary::default()));
        let store = store_with(&["5"]);
        let gate = DeleteGate::default();

        request_delete(&store, &gate, &id("5")).unwrap();
        confirm_delete(&repo, &store, &gate).await.unwrap();
        let second = confirm_delete(&repo, &store, &gate).await.unwrap();

        assert_eq!(second, DeleteOutcome::Ignored);
    }

    #[actix_web::test]
    async fn gate_is_idle_while_stats_are_refetched() {
        let gate = Arc::new(DeleteGate::default());
        let store = store_with(&["4", "5"]);
        let seen = Arc::new(Mutex::new(None));
        let mut repo = MockRepository::new();
        repo.expect_delete_contact().times(1).returning(|_| Ok(()));
        {
            let gate = gate.clone();
            let store = store.clone();
            let seen = seen.clone();
            repo.expect_fetch_stats().times(1).returning(move || {
                let next = store.read().get(&ContactId::new("4").unwrap()).cloned().unwrap();
                *seen.lock() = Some((gate.state(), gate.request(&next)));
                Ok(StatsSummary::default())
            });
        }

        request_delete(&store, &gate, &id("5")).unwrap();
        confirm_delete(&repo, &store, &gate).await.unwrap();

        let (state, accepted) = seen.lock().clone().unwrap();
        assert_eq!(state, GateState::Idle);
        assert!(accepted);
        assert_eq!(gate.candidate().unwrap().id, id("4"));
    }
}
