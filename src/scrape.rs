use core::time::Duration;

use reqwest::{
    Client,
    header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue},
};

use crate::{Error, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The shared client: fixed user agent, `Accept-Language` on every request.
pub fn basic(user_agent: &str, accept_language: &str) -> reqwest::Result<Client> {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    } else {
        tracing::warn!(target: "scrape", "ignoring invalid Accept-Language {accept_language:?}");
    }

    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let transport = |source| Error::Transport {
        url: url.to_owned(),
        source,
    };

    let res = client.get(url).send().await.map_err(transport)?;
    let status = res.status();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_owned(),
            status,
        });
    }
    let text = res.text().await.map_err(transport)?;
    tracing::debug!(target: "scrape", "{url}: {} bytes", text.len());

    Ok(text)
}
