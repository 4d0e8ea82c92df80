//! Input validation utilities
//!
//! Validation happens at two boundaries: caller input (the resource
//! requirement) and wire data (catalog specs and price records). A bad wire
//! record fails only its own inclusion in the run; callers decide what to do
//! with a rejected requirement.

use crate::error::{Result, SizectlError};
use crate::types::{InstanceTypeSpec, RegionalSpotPrice, ResourceRequirement};

/// Upper bound on a single requirement dimension.
///
/// Catches swapped-unit mistakes (bytes where gigabytes were meant) before
/// they turn into absurd unit counts.
const MAX_DIMENSION: u64 = 10_000_000;

/// Validate a resource requirement before starting a run.
pub fn validate_requirement(requirement: &ResourceRequirement) -> Result<()> {
    for (field, value) in [
        ("cpu_cores", requirement.cpu_cores),
        ("memory_gb", requirement.memory_gb),
        ("storage_gb", requirement.storage_gb),
    ] {
        if let Some(v) = value {
            if v > MAX_DIMENSION {
                return Err(SizectlError::Validation {
                    field: field.to_string(),
                    reason: format!("{} exceeds the supported maximum of {}", v, MAX_DIMENSION),
                });
            }
        }
    }

    Ok(())
}

/// Check a catalog spec for usable capacities.
///
/// Zero or negative (or non-finite) capacities would break ceiling division,
/// so such specs are excluded from the run rather than aborting it.
pub fn spec_is_usable(spec: &InstanceTypeSpec) -> bool {
    spec.vcpu > 0
        && spec.memory_gb.is_finite()
        && spec.memory_gb > 0.0
        && spec.storage_gb.is_finite()
        && spec.storage_gb > 0.0
        && !spec.instance_type.is_empty()
}

/// Check a regional price record for a usable price.
pub fn price_is_usable(price: &RegionalSpotPrice) -> bool {
    price.price.is_finite() && price.price >= 0.0 && !price.region.is_empty()
}
