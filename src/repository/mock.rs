//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::contact::{ContactPatch, ContactRecord};
use crate::domain::stats::StatsSummary;
use crate::domain::types::ContactId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ContactReader, ContactWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl ContactReader for Repository {
        async fn list_contacts(&self) -> RepositoryResult<Vec<ContactRecord>>;
        async fn fetch_stats(&self) -> RepositoryResult<StatsSummary>;
    }

    #[async_trait]
    impl ContactWriter for Repository {
        async fn update_contact(
            &self,
            id: &ContactId,
            patch: &ContactPatch,
        ) -> RepositoryResult<()>;
        async fn delete_contact(&self, id: &ContactId) -> RepositoryResult<()>;
    }
}
