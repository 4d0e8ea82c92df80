//! Configuration planning
//!
//! Merges catalog specs with each type's cheapest regional price, computes
//! how many units of each type satisfy the requirement, and reduces the
//! candidates to the run's two recommendations.
//!
//! ## Recommendation policy
//!
//! - `cheapest`: smallest `total_cost`; ties keep the first-seen option.
//! - `min_instance_count`: smallest `unit_count`; ties broken by smaller
//!   `total_cost`, remaining ties keep the first-seen option.
//!
//! Both reductions are independent minimizations over the full option set, so
//! the outcome does not depend on iteration order beyond deterministic
//! tie-breaking (callers pass specs in name order).

use crate::types::{
    CheapestRegionalPrice, InstanceTypeSpec, ResourceRequirement, SizedInstanceOption,
    SizingResult,
};
use crate::validation::spec_is_usable;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Integer ceiling division. `divisor` must be non-zero.
fn ceil_div(dividend: u64, divisor: u64) -> u64 {
    dividend.div_ceil(divisor)
}

/// Units needed to cover `required` with a fractional per-unit capacity.
fn units_for_capacity(required: u64, capacity: f64) -> u64 {
    (required as f64 / capacity).ceil() as u64
}

/// Units of `spec` needed to satisfy one requirement dimension.
///
/// Absent or zero requirements cost nothing.
fn dimension_units(required: Option<u64>, capacity: f64) -> u64 {
    match required {
        None | Some(0) => 0,
        Some(r) => units_for_capacity(r, capacity),
    }
}

/// How many units of `spec` satisfy `requirement` across all dimensions.
///
/// The answer is the max over per-dimension counts: every unit brings all
/// three capacities at once.
pub fn units_required(spec: &InstanceTypeSpec, requirement: &ResourceRequirement) -> u64 {
    let cpu = match requirement.cpu_cores {
        None | Some(0) => 0,
        Some(r) => ceil_div(r, spec.vcpu),
    };
    let memory = dimension_units(requirement.memory_gb, spec.memory_gb);
    let storage = dimension_units(requirement.storage_gb, spec.storage_gb);

    cpu.max(memory).max(storage)
}

/// Build the sized option for one spec, or `None` when the spec has no price
/// entry or unusable capacities.
fn size_option(
    spec: &InstanceTypeSpec,
    cheapest_by_type: &HashMap<String, CheapestRegionalPrice>,
    requirement: &ResourceRequirement,
) -> Option<SizedInstanceOption> {
    let price = cheapest_by_type.get(&spec.instance_type)?;

    if !spec_is_usable(spec) {
        warn!(
            "Skipping instance type {} with unusable capacities",
            spec.instance_type
        );
        return None;
    }

    let unit_count = units_required(spec, requirement);
    let total_cost = price.price * unit_count as f64;

    Some(SizedInstanceOption {
        spec: spec.clone(),
        region: price.region.clone(),
        unit_price: price.price,
        unit_count,
        total_cost,
    })
}

/// Plan the two recommendations for one run.
///
/// Specs without a price entry are skipped silently; an empty candidate set
/// yields the empty result (no viable configuration), never an error.
pub fn plan(
    specs: &[InstanceTypeSpec],
    cheapest_by_type: &HashMap<String, CheapestRegionalPrice>,
    requirement: &ResourceRequirement,
) -> SizingResult {
    let mut cheapest: Option<SizedInstanceOption> = None;
    let mut min_count: Option<SizedInstanceOption> = None;

    for spec in specs {
        let Some(option) = size_option(spec, cheapest_by_type, requirement) else {
            continue;
        };

        debug!(
            "Candidate {}: {} x {} in {} = {:.4}/hr",
            option.spec.instance_type,
            option.unit_count,
            option.unit_price,
            option.region,
            option.total_cost
        );

        match &cheapest {
            Some(best) if option.total_cost >= best.total_cost => {}
            _ => cheapest = Some(option.clone()),
        }

        match &min_count {
            Some(best)
                if option.unit_count > best.unit_count
                    || (option.unit_count == best.unit_count
                        && option.total_cost >= best.total_cost) => {}
            _ => min_count = Some(option),
        }
    }

    SizingResult {
        cheapest,
        min_instance_count: min_count,
    }
}
