//! REST plumbing shared by the node and indexer clients.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::blockchain::types::{LedgerError, LedgerResult};

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// One REST endpoint with its token header.
#[derive(Clone)]
pub(crate) struct RestClient {
    http: Client,
    base_url: String,
    token_header: &'static str,
    token: String,
}

impl RestClient {
    pub(crate) fn new(
        base_url: &str,
        token_header: &'static str,
        token: &str,
        timeout_secs: u64,
    ) -> LedgerResult<Self> {
        let base_url = normalize_endpoint(base_url)
            .ok_or_else(|| LedgerError::InvalidEndpoint(format!("'{}'", base_url)))?;
        url::Url::parse(&base_url)
            .map_err(|e| LedgerError::InvalidEndpoint(format!("'{}': {}", base_url, e)))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token_header,
            token: token.to_string(),
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.token.is_empty() {
            builder
        } else {
            builder.header(self.token_header, &self.token)
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> LedgerResult<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "GET");
        let response = self
            .request(self.http.get(&url).query(query))
            .send()
            .await?;
        decode(check(response).await?).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> LedgerResult<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, bytes = body.len(), "POST");
        let response = self
            .request(self.http.post(&url).header(CONTENT_TYPE, content_type).body(body))
            .send()
            .await?;
        decode(check(response).await?).await
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("token_set", &!self.token.is_empty())
            .finish()
    }
}

async fn check(response: Response) -> LedgerResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);
    Err(LedgerError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> LedgerResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| LedgerError::Decode(e.to_string()))
}

/// Trims whitespace and trailing slashes from an endpoint.
fn normalize_endpoint(endpoint: &str) -> Option<String> {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
