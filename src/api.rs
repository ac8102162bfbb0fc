// API client module: a small blocking HTTP client for the rewards
// endpoint. Listing is a GET and purchasing is a POST against the same URL;
// both authenticate with a static `x-api-key` header.

use crate::config::Config;
use crate::error::ApiError;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::debug;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Envelope code that marks a successful listing or purchase.
pub const SUCCESS_CODE: i64 = 200;

/// One purchasable item as returned by the listing endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub points: i64,
    pub available_stock: i64,
}

/// Envelope returned by the listing endpoint.
#[derive(Serialize, Deserialize, Debug)]
pub struct ProductListResponse {
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Item>,
}

/// Body of a purchase request.
#[derive(Serialize, Deserialize, Debug)]
pub struct PurchaseRequest {
    pub item_id: i64,
}

/// Envelope returned by a purchase attempt. The caller decides what a
/// non-200 `code` means; it is not an error at this layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PurchaseResponse {
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

impl PurchaseResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

// The server sends `null` for empty payloads now and then.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The two operations the session needs from the rewards service.
pub trait RewardsApi {
    /// Fetch the current item list, in server order.
    fn fetch_items(&self, api_key: &str) -> std::result::Result<Vec<Item>, ApiError>;

    /// Attempt one purchase and return the envelope verbatim.
    fn purchase(&self, api_key: &str, item_id: i64) -> std::result::Result<PurchaseResponse, ApiError>;
}

/// Blocking client bound to a single rewards endpoint. The inner
/// `reqwest` client (and its connection pool) is reused for every call.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` where every request gives up after
    /// `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    fn key_header(api_key: &str) -> std::result::Result<HeaderValue, ApiError> {
        HeaderValue::from_str(api_key).map_err(|_| ApiError::InvalidApiKey)
    }
}

impl RewardsApi for ApiClient {
    fn fetch_items(&self, api_key: &str) -> std::result::Result<Vec<Item>, ApiError> {
        debug!(url = %self.base_url, "fetching item list");
        let res = self
            .client
            .get(&self.base_url)
            .header(API_KEY_HEADER, Self::key_header(api_key)?)
            .send()?;
        let body = res.text()?;
        let envelope: ProductListResponse = serde_json::from_str(&body)?;
        if envelope.code != SUCCESS_CODE {
            return Err(ApiError::ListingRejected { code: envelope.code });
        }
        debug!(count = envelope.data.len(), "item list received");
        Ok(envelope.data)
    }

    fn purchase(&self, api_key: &str, item_id: i64) -> std::result::Result<PurchaseResponse, ApiError> {
        debug!(item_id, "sending purchase request");
        let res = self
            .client
            .post(&self.base_url)
            .header(API_KEY_HEADER, Self::key_header(api_key)?)
            .json(&PurchaseRequest { item_id })
            .send()?;
        let text = res.text()?;
        let envelope: PurchaseResponse = serde_json::from_str(&text)?;
        debug!(item_id, code = envelope.code, "purchase response");
        Ok(envelope)
    }
}
