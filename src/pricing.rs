//! Spot price client
//!
//! Typed client for the pricing backend endpoint. Requests carry a
//! comma-joined `instanceTypes` list; responses map each instance type to its
//! regional price records under the standard envelope.
//!
//! Large type lists are chunked and fetched concurrently, with the combined
//! map assembled before region selection runs. Missing types and empty
//! sequences are not errors; a type the backend has no offers for simply has
//! no entry in the returned map.

use crate::catalog::API_PREFIX;
use crate::error::{Result, SizectlError};
use crate::types::RegionalSpotPrice;
use crate::validation::price_is_usable;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Keeps the query string well under common URL length limits.
const DEFAULT_CHUNK_SIZE: usize = 40;

/// Source of regional spot prices
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current regional spot prices for the given instance types. Types with
    /// no known offers are absent from the map or map to an empty list.
    async fn get_spot_prices(
        &self,
        instance_types: &[String],
    ) -> Result<HashMap<String, Vec<RegionalSpotPrice>>>;
}

/// Price attributes as they appear on the wire; the instance type name is the
/// enclosing map key.
#[derive(Debug, Deserialize)]
struct WireRegionalPrice {
    region: String,
    price: f64,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct PricesResponse {
    result: HashMap<String, Vec<WireRegionalPrice>>,
}

/// HTTP spot price client
pub struct PricingClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
    chunk_size: usize,
}

impl PricingClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Reuse an existing HTTP client (shared connection pool).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    async fn fetch_chunk(
        &self,
        instance_types: &[String],
    ) -> Result<HashMap<String, Vec<RegionalSpotPrice>>> {
        let url = format!("{}{}/prices", self.base_url, API_PREFIX);
        let joined = instance_types.join(",");

        let response = self
            .client
            .get(&url)
            .query(&[("instanceTypes", joined.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SizectlError::pricing(format!("GET {} failed", url), Some(Box::new(e))))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SizectlError::pricing(
                format!("GET {} returned {}", url, status),
                None,
            ));
        }

        let decoded: PricesResponse = response.json().await.map_err(|e| {
            SizectlError::pricing(format!("undecodable response from {}", url), Some(Box::new(e)))
        })?;

        let mut prices = HashMap::with_capacity(decoded.result.len());
        for (instance_type, records) in decoded.result {
            let usable: Vec<RegionalSpotPrice> = records
                .into_iter()
                .map(|wire| RegionalSpotPrice {
                    instance_type: instance_type.clone(),
                    region: wire.region,
                    price: wire.price,
                    timestamp: wire.timestamp,
                })
                .filter(|price| {
                    if price_is_usable(price) {
                        true
                    } else {
                        warn!(
                            "Dropping malformed price record for {} in {:?}",
                            instance_type, price.region
                        );
                        false
                    }
                })
                .collect();
            prices.insert(instance_type, usable);
        }

        Ok(prices)
    }
}

#[async_trait]
impl PriceSource for PricingClient {
    async fn get_spot_prices(
        &self,
        instance_types: &[String],
    ) -> Result<HashMap<String, Vec<RegionalSpotPrice>>> {
        if instance_types.is_empty() {
            return Ok(HashMap::new());
        }

        let chunks: Vec<_> = instance_types
            .chunks(self.chunk_size)
            .map(|chunk| self.fetch_chunk(chunk))
            .collect();
        debug!(
            "Fetching spot prices for {} instance types in {} request(s)",
            instance_types.len(),
            chunks.len()
        );

        let mut combined = HashMap::with_capacity(instance_types.len());
        for chunk in try_join_all(chunks).await? {
            combined.extend(chunk);
        }

        Ok(combined)
    }
}
