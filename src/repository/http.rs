//! reqwest-backed implementation of the repository traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use crate::domain::contact::{ContactPatch, ContactRecord};
use crate::domain::stats::StatsSummary;
use crate::domain::types::ContactId;
use crate::models::contact::{ContactList, ErrorBody, StatsList};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ContactReader, ContactWriter};

/// Talks to the contact API rooted at `base_url`.
#[derive(Clone, Debug)]
pub struct HttpRepository {
    base_url: Url,
    client: Client,
}

impl HttpRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("pushkind-contacts/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        let base_url = Url::parse(base_url)
            .map_err(|err| RepositoryError::InvalidUrl(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self { base_url, client })
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded,
    /// so ids containing `/`, `?` or `#` stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> RepositoryResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepositoryError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn contact_url(&self, id: &ContactId) -> RepositoryResult<Url> {
        self.endpoint(&["api", "contact", id.as_str()])
    }
}

/// Turns a non-2xx response into [`RepositoryError::Status`], reading the
/// optional `message` field of the body.
async fn ensure_success(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .bytes()
        .await
        .ok()
        .and_then(|body| serde_json::from_slice::<ErrorBody>(&body).ok())
        .and_then(|body| body.message);

    Err(RepositoryError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ContactReader for HttpRepository {
    async fn list_contacts(&self) -> RepositoryResult<Vec<ContactRecord>> {
        let url = self.endpoint(&["api", "contact"])?;
        let response = self.client.get(url).send().await?;
        let body = ensure_success(response).await?.bytes().await?;
        let list: ContactList = serde_json::from_slice(&body)?;

        list.contacts
            .into_iter()
            .map(|contact| ContactRecord::try_from(contact).map_err(RepositoryError::from))
            .collect()
    }

    async fn fetch_stats(&self) -> RepositoryResult<StatsSummary> {
        let url = self.endpoint(&["api", "contact", "stats"])?;
        let response = self.client.get(url).send().await?;
        let body = ensure_success(response).await?.bytes().await?;
        let list: StatsList = serde_json::from_slice(&body)?;

        Ok(StatsSummary::from(list))
    }
}

#[async_trait]
impl ContactWriter for HttpRepository {
    async fn update_contact(&self, id: &ContactId, patch: &ContactPatch) -> RepositoryResult<()> {
        let response = self
            .client
            .patch(self.contact_url(id)?)
            .json(patch)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_contact(&self, id: &ContactId) -> RepositoryResult<()> {
        let response = self.client.delete(self.contact_url(id)?).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(base_url: &str) -> HttpRepository {
        HttpRepository::new(base_url, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn contact_id_is_a_single_encoded_segment() {
        let id = ContactId::new("a?b#c/d").unwrap();

        let url = repo("http://api.local").contact_url(&id).unwrap();

        assert_eq!(url.as_str(), "http://api.local/api/contact/a%3Fb%23c%2Fd");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn base_path_and_trailing_slash_are_kept() {
        let url = repo("http://api.local/v1/").endpoint(&["api", "contact"]).unwrap();

        assert_eq!(url.as_str(), "http://api.local/v1/api/contact");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        for base_url in ["not a url", "mailto:admin@example.com"] {
            assert!(matches!(
                HttpRepository::new(base_url, Duration::from_secs(1)),
                Err(RepositoryError::InvalidUrl(_))
            ));
        }
    }
}
