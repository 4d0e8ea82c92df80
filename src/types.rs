//! Type definitions for cluster sizing
//!
//! Contains the data structures flowing through one sizing run: the caller's
//! resource requirement, catalog specs, regional spot prices, and the derived
//! option/result types. Derived types are owned by a single run and rebuilt
//! from scratch on every run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resource requirements for one sizing run
///
/// `None` (or an explicit 0) means "no constraint on that dimension" and
/// produces a zero unit count for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirement {
    pub cpu_cores: Option<u64>,
    pub memory_gb: Option<u64>,
    pub storage_gb: Option<u64>,
}

impl ResourceRequirement {
    pub fn new(cpu_cores: Option<u64>, memory_gb: Option<u64>, storage_gb: Option<u64>) -> Self {
        Self {
            cpu_cores,
            memory_gb,
            storage_gb,
        }
    }

    /// True when no dimension carries a constraint (zeroes count as absent).
    pub fn is_unconstrained(&self) -> bool {
        fn absent(dim: Option<u64>) -> bool {
            matches!(dim, None | Some(0))
        }
        absent(self.cpu_cores) && absent(self.memory_gb) && absent(self.storage_gb)
    }
}

/// Specification of one instance type from the catalog
///
/// Memory and storage are fractional upstream (the catalog carries
/// sub-gigabyte memory sizes for the smallest types).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceTypeSpec {
    pub instance_type: String,
    #[serde(rename = "vCPU")]
    pub vcpu: u64,
    pub memory_gb: f64,
    pub storage_gb: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_performance: Option<String>,
}

/// One regional spot price observation for an instance type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalSpotPrice {
    pub instance_type: String,
    pub region: String,
    pub price: f64,
    /// Informational; when the backend observed this price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// The single lowest-price region for one instance type
///
/// Derived per run; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheapestRegionalPrice {
    pub instance_type: String,
    pub region: String,
    pub price: f64,
}

/// A priced, counted configuration candidate for one instance type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedInstanceOption {
    pub spec: InstanceTypeSpec,
    pub region: String,
    pub unit_price: f64,
    pub unit_count: u64,
    pub total_cost: f64,
}

/// The two recommendations produced by one sizing run
///
/// Both fields are `None` when no instance type had both a spec and a price:
/// a valid "no viable configuration" outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub cheapest: Option<SizedInstanceOption>,
    pub min_instance_count: Option<SizedInstanceOption>,
}

impl SizingResult {
    pub fn is_empty(&self) -> bool {
        self.cheapest.is_none() && self.min_instance_count.is_none()
    }
}
