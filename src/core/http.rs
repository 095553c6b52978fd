use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::{Client, Response};

use crate::core::error::{LauncherError, LauncherResult};

const APP_USER_AGENT: &str = concat!("mcstart/", env!("CARGO_PKG_VERSION"));

pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .timeout(timeout)
        .build()
}

/// GET `url` and reject non-success statuses.
pub async fn get_ok(client: &Client, url: &str) -> LauncherResult<Response> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LauncherError::DownloadFailed {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}
