//! Instance catalog client
//!
//! Typed client for the catalog backend's two endpoints: the filtered
//! instance-type listing and the single-type detail lookup. The backend wraps
//! every response in a `{fetched_from, expire_time, result}` envelope; both
//! metadata fields are informational and tolerated-if-absent.
//!
//! The backend filters on constrained dimensions (vCPU >= requiredCpu and so
//! on); this client additionally drops records with unusable capacities so a
//! single bad catalog row never aborts a sizing run.

use crate::error::{Result, SizectlError};
use crate::types::{InstanceTypeSpec, ResourceRequirement};
use crate::validation::spec_is_usable;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

pub const API_PREFIX: &str = "/api/v1.0";

/// Source of instance-type specifications
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List specs satisfying the requirement's constrained dimensions,
    /// ordered by instance type name.
    async fn list_instance_types(
        &self,
        requirement: &ResourceRequirement,
    ) -> Result<Vec<InstanceTypeSpec>>;

    /// Fetch the full spec for one instance type. `Ok(None)` when the catalog
    /// does not know the type.
    async fn describe_instance_type(&self, instance_type: &str)
        -> Result<Option<InstanceTypeSpec>>;
}

/// Spec attributes as they appear on the wire; the instance type name is the
/// enclosing map key, not a field.
#[derive(Debug, Deserialize)]
struct WireInstanceSpec {
    #[serde(rename = "vCPU")]
    vcpu: u64,
    memory_gb: f64,
    storage_gb: f64,
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    network_performance: Option<String>,
}

impl WireInstanceSpec {
    fn into_spec(self, instance_type: &str) -> InstanceTypeSpec {
        InstanceTypeSpec {
            instance_type: instance_type.to_string(),
            vcpu: self.vcpu,
            memory_gb: self.memory_gb,
            storage_gb: self.storage_gb,
            family: self.family,
            network_performance: self.network_performance,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListTypesResponse {
    #[serde(default)]
    #[allow(dead_code)]
    fetched_from: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    expire_time: Option<String>,
    result: HashMap<String, WireInstanceSpec>,
}

#[derive(Debug, Deserialize)]
struct DescribeTypeResponse {
    #[serde(default)]
    result: Option<WireInstanceSpec>,
}

/// HTTP catalog client
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: trim_base_url(base_url.into()),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Reuse an existing HTTP client (shared connection pool).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SizectlError::catalog(format!("GET {} failed", url), Some(Box::new(e))))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SizectlError::catalog(
                format!("GET {} returned {}", url, status),
                None,
            ));
        }

        response.json::<T>().await.map_err(|e| {
            SizectlError::catalog(format!("undecodable response from {}", url), Some(Box::new(e)))
        })
    }
}

fn trim_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Query parameters for the listing endpoint. Only constrained dimensions are
/// sent; the backend treats missing parameters as unfiltered.
fn requirement_query(requirement: &ResourceRequirement) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(cpu) = requirement.cpu_cores.filter(|&v| v > 0) {
        query.push(("requiredCpu", cpu.to_string()));
    }
    if let Some(memory) = requirement.memory_gb.filter(|&v| v > 0) {
        query.push(("requiredMemory", memory.to_string()));
    }
    if let Some(storage) = requirement.storage_gb.filter(|&v| v > 0) {
        query.push(("requiredStorage", storage.to_string()));
    }
    query
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn list_instance_types(
        &self,
        requirement: &ResourceRequirement,
    ) -> Result<Vec<InstanceTypeSpec>> {
        let url = format!("{}{}/instances/types", self.base_url, API_PREFIX);
        let response: ListTypesResponse =
            self.get_json(&url, &requirement_query(requirement)).await?;

        let mut specs: Vec<InstanceTypeSpec> = response
            .result
            .into_iter()
            .map(|(name, wire)| wire.into_spec(&name))
            .filter(|spec| {
                if spec_is_usable(spec) {
                    true
                } else {
                    warn!(
                        "Dropping catalog record {} with unusable capacities",
                        spec.instance_type
                    );
                    false
                }
            })
            .collect();

        // Name order keeps downstream reductions deterministic.
        specs.sort_by(|a, b| a.instance_type.cmp(&b.instance_type));

        debug!("Catalog returned {} usable instance types", specs.len());
        Ok(specs)
    }

    async fn describe_instance_type(
        &self,
        instance_type: &str,
    ) -> Result<Option<InstanceTypeSpec>> {
        let url = format!(
            "{}{}/instances/types/{}",
            self.base_url, API_PREFIX, instance_type
        );
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SizectlError::catalog(format!("GET {} failed", url), Some(Box::new(e))))?;

        // An unknown type is not a backend failure.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            return Err(SizectlError::catalog(
                format!("GET {} returned {}", url, status),
                None,
            ));
        }

        let decoded: DescribeTypeResponse = response.json().await.map_err(|e| {
            SizectlError::catalog(format!("undecodable response from {}", url), Some(Box::new(e)))
        })?;

        Ok(decoded.result.map(|wire| wire.into_spec(instance_type)))
    }
}
