use std::time::Duration;

use thiserror::Error;

/// Client-side bound on every outbound request. There is no retry.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("no release version found in any source")]
    NoVersion,
}

/// Shared HTTP client: 15 s timeout and an `apm/<version>` User-Agent.
pub fn http_client() -> Result<reqwest::Client, RemoteError> {
    Ok(reqwest::Client::builder()
        .user_agent(crate::USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

/// Send a GET and turn any non-2xx status into [`RemoteError::Status`].
pub(crate) async fn get_ok(
    client: &reqwest::Client,
    url: &str,
) -> Result<reqwest::Response, RemoteError> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(resp)
}
