//! Flathub application directory.
//!
//! Search results are ranked with the same exact / prefix / contains tiers
//! as the local package index, over the application id.

use apm_schema::{MAX_RESULTS, PackageRecord, rank_by_relevance};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::remote::{RemoteError, get_ok};

/// Public Flathub API root.
pub const DEFAULT_FLATHUB_URL: &str = "https://flathub.org/api/v1";

/// A remote directory of sandboxed applications.
#[async_trait]
pub trait AppDirectory: Send + Sync {
    /// Up to [`MAX_RESULTS`] applications matching `query`, most relevant
    /// first. `name` holds the application id.
    async fn search(&self, query: &str) -> Result<Vec<PackageRecord>, RemoteError>;

    /// Whether `app_id` names a published application.
    async fn exists(&self, app_id: &str) -> Result<bool, RemoteError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSummary {
    flatpak_app_id: String,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Clone)]
pub struct Flathub {
    client: Client,
    base_url: String,
}

impl Flathub {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let invalid = || RemoteError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl AppDirectory for Flathub {
    async fn search(&self, query: &str) -> Result<Vec<PackageRecord>, RemoteError> {
        let url = self.endpoint(&["apps", "search", query])?;
        let apps: Vec<AppSummary> = get_ok(&self.client, url.as_str()).await?.json().await?;
        tracing::debug!("flathub returned {} apps for '{query}'", apps.len());

        let records = apps
            .into_iter()
            .map(|a| PackageRecord::new(a.flatpak_app_id, "", a.summary));
        Ok(rank_by_relevance(records, query, PackageRecord::name, MAX_RESULTS))
    }

    async fn exists(&self, app_id: &str) -> Result<bool, RemoteError> {
        let url = self.endpoint(&["apps", app_id])?;
        let resp = self.client.get(url.as_str()).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => {
                let body: serde_json::Value = resp.json().await?;
                Ok(!body.is_null())
            }
            status => Err(RemoteError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}

/// Turn what the user typed into a published application id.
///
/// Without `exact`, a term with no `.` is treated as a search and the top
/// hit is used. Returns `None` when nothing matches or the id is unknown.
pub async fn resolve_app_id(
    directory: &dyn AppDirectory,
    requested: &str,
    exact: bool,
) -> Result<Option<String>, RemoteError> {
    let app_id = if !exact && !requested.contains('.') {
        match directory.search(requested).await?.into_iter().next() {
            Some(top) => top.name,
            None => return Ok(None),
        }
    } else {
        requested.to_string()
    };

    if directory.exists(&app_id).await? {
        Ok(Some(app_id))
    } else {
        Ok(None)
    }
}
