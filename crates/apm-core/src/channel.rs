//! Discovery of the latest stable NixOS release.
//!
//! Several public sources are tried in a fixed order; the first one that
//! yields a parseable version wins. Each failure is logged and the next
//! source is attempted.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::remote::{RemoteError, get_ok};

/// A `YY.MM` release such as `24.05`. Ordered numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseVersion {
    pub major: u32,
    pub minor: u32,
}

impl FromStr for ReleaseVersion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s.split_once('.').ok_or(())?;
        Ok(Self {
            major: major.parse().map_err(|_| ())?,
            minor: minor.parse().map_err(|_| ())?,
        })
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

/// How a source's response body is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// GitHub branches API: `[{"name": "nixos-24.05"}, ...]`
    GithubBranches,
    /// GitHub releases API: `[{"tag_name": "nixos-24.05"}, ...]`
    GithubReleases,
    /// HTML listing of channels.nixos.org
    ChannelListing,
    /// nixos.org front page
    Homepage,
}

#[derive(Debug, Clone)]
pub struct VersionSource {
    pub name: &'static str,
    pub url: String,
    pub kind: SourceKind,
}

impl VersionSource {
    pub fn new(name: &'static str, url: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            name,
            url: url.into(),
            kind,
        }
    }
}

/// The public sources, in the order they are tried.
pub fn default_sources() -> Vec<VersionSource> {
    vec![
        VersionSource::new(
            "GitHub branches",
            "https://api.github.com/repos/NixOS/nixpkgs/branches?per_page=100",
            SourceKind::GithubBranches,
        ),
        VersionSource::new(
            "GitHub releases",
            "https://api.github.com/repos/NixOS/nixpkgs/releases?per_page=100",
            SourceKind::GithubReleases,
        ),
        VersionSource::new(
            "channel listing",
            "https://channels.nixos.org/",
            SourceKind::ChannelListing,
        ),
        VersionSource::new("NixOS homepage", "https://nixos.org/", SourceKind::Homepage),
    ]
}

static CHANNEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"nixos-(\d+\.\d+)").unwrap());

static HOMEPAGE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2}\.\d{2})\b").unwrap());

#[derive(Deserialize)]
struct Branch {
    name: String,
}

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

fn stable_from_ref(name: &str) -> Option<ReleaseVersion> {
    let version = name.strip_prefix("nixos-")?;
    if version == "unstable" || version.contains("-small") {
        return None;
    }
    version.parse().ok()
}

/// Highest version a source's body reports, if any.
pub fn parse_body(kind: SourceKind, body: &str) -> Option<ReleaseVersion> {
    match kind {
        SourceKind::GithubBranches => serde_json::from_str::<Vec<Branch>>(body)
            .ok()?
            .iter()
            .filter_map(|b| stable_from_ref(&b.name))
            .max(),
        SourceKind::GithubReleases => serde_json::from_str::<Vec<Release>>(body)
            .ok()?
            .iter()
            .filter_map(|r| stable_from_ref(&r.tag_name))
            .max(),
        SourceKind::ChannelListing => CHANNEL
            .captures_iter(body)
            .filter_map(|c| c[1].parse().ok())
            .max(),
        SourceKind::Homepage => body
            .lines()
            .filter(|l| l.contains("nixos") || l.contains("NixOS") || l.contains("release"))
            .flat_map(|l| HOMEPAGE_VERSION.captures_iter(l))
            .filter_map(|c| c[1].parse::<ReleaseVersion>().ok())
            .filter(|v| (20..=30).contains(&v.major) && v.minor <= 12)
            .max(),
    }
}

async fn query(
    client: &reqwest::Client,
    source: &VersionSource,
) -> Result<Option<ReleaseVersion>, RemoteError> {
    let body = get_ok(client, &source.url).await?.text().await?;
    Ok(parse_body(source.kind, &body))
}

/// Walk `sources` in order and return the first version found.
pub async fn latest_release(
    client: &reqwest::Client,
    sources: &[VersionSource],
) -> Result<ReleaseVersion, RemoteError> {
    for source in sources {
        tracing::debug!("querying {} ({})", source.name, source.url);
        match query(client, source).await {
            Ok(Some(version)) => {
                tracing::debug!("{} reports nixos-{version}", source.name);
                return Ok(version);
            }
            Ok(None) => tracing::warn!("{}: no release version in response", source.name),
            Err(e) => tracing::warn!("{}: {e}", source.name),
        }
    }
    Err(RemoteError::NoVersion)
}
