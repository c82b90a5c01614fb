//! Shared HTTP plumbing for the platform clients.

use reqwest::{header::HeaderMap, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::Result;

const USER_AGENT: &str = concat!("fantasy-insights/", env!("CARGO_PKG_VERSION"));

/// Build the client every platform source uses.
pub fn build_client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()?)
}

/// GET `url` and decode the body as JSON, failing on non-2xx statuses.
pub async fn get_json(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    headers: &HeaderMap,
) -> Result<Value> {
    let builder = client.get(url).headers(headers.clone()).query(params);

    if let Some(req) = builder.try_clone().and_then(|b| b.build().ok()) {
        debug!(url = %req.url(), "GET");
        for (k, v) in req.headers().iter() {
            if k != reqwest::header::COOKIE && k != reqwest::header::AUTHORIZATION {
                debug!(header = %k, value = ?v, "request header");
            }
        }
    }

    let v = builder
        .send()
        .await?
        .error_for_status()?
        .json::<Value>()
        .await?;
    Ok(v)
}
