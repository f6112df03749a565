//! Access to the remote contact API.
//!
//! Services depend on the [`ContactReader`] / [`ContactWriter`] traits only;
//! [`HttpRepository`] is the production implementation.

use async_trait::async_trait;

use crate::domain::contact::{ContactPatch, ContactRecord};
use crate::domain::stats::StatsSummary;
use crate::domain::types::ContactId;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpRepository;

#[async_trait]
pub trait ContactReader {
    async fn list_contacts(&self) -> RepositoryResult<Vec<ContactRecord>>;
    async fn fetch_stats(&self) -> RepositoryResult<StatsSummary>;
}

#[async_trait]
pub trait ContactWriter {
    async fn update_contact(&self, id: &ContactId, patch: &ContactPatch) -> RepositoryResult<()>;
    async fn delete_contact(&self, id: &ContactId) -> RepositoryResult<()>;
}
