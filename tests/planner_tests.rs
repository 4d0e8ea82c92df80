//! Exact-value planning tests
//!
//! Pin down the unit-count arithmetic and recommendation selection over
//! hand-computed scenarios.

use sizectl::planner::{plan, units_required};
use sizectl::types::{CheapestRegionalPrice, InstanceTypeSpec, ResourceRequirement};
use std::collections::HashMap;

fn spec(name: &str, vcpu: u64, memory_gb: f64, storage_gb: f64) -> InstanceTypeSpec {
    InstanceTypeSpec {
        instance_type: name.to_string(),
        vcpu,
        memory_gb,
        storage_gb,
        family: None,
        network_performance: None,
    }
}

fn priced(name: &str, region: &str, price: f64) -> (String, CheapestRegionalPrice) {
    (
        name.to_string(),
        CheapestRegionalPrice {
            instance_type: name.to_string(),
            region: region.to_string(),
            price,
        },
    )
}

#[test]
fn ceiling_division_exact_cases() {
    let s = spec("t", 4, 4.0, 4.0);
    for (required, expected) in [(10, 3), (8, 2), (1, 1), (4, 1), (5, 2)] {
        let req = ResourceRequirement::new(Some(required), None, None);
        assert_eq!(
            units_required(&s, &req),
            expected,
            "ceil({}/4) should be {}",
            required,
            expected
        );
    }
}

#[test]
fn all_dimensions_absent_yields_zero_everywhere() {
    let specs = vec![
        spec("small", 1, 1.7, 160.0),
        spec("large", 8, 32.0, 200.0),
    ];
    let cheapest_by_type: HashMap<_, _> = [
        priced("small", "us-east-1", 0.007),
        priced("large", "us-west-2", 0.25),
    ]
    .into_iter()
    .collect();

    for s in &specs {
        assert_eq!(units_required(s, &ResourceRequirement::default()), 0);
    }

    let result = plan(&specs, &cheapest_by_type, &ResourceRequirement::default());
    let cheapest = result.cheapest.unwrap();
    assert_eq!(cheapest.unit_count, 0);
    assert_eq!(cheapest.total_cost, 0.0);
}

#[test]
fn three_way_scenario_with_distinct_winners() {
    // tiny: cheap per unit but needs many; big: few units at a premium;
    // mid: neither the cheapest total nor the fewest units.
    let specs = vec![
        spec("tiny", 1, 2.0, 20.0),
        spec("mid", 4, 16.0, 100.0),
        spec("big", 16, 64.0, 500.0),
    ];
    let cheapest_by_type: HashMap<_, _> = [
        priced("tiny", "us-east-1", 0.01),
        priced("mid", "us-east-1", 0.09),
        priced("big", "eu-west-1", 0.40),
    ]
    .into_iter()
    .collect();
    let req = ResourceRequirement::new(Some(16), Some(32), Some(200));

    let result = plan(&specs, &cheapest_by_type, &req);

    // tiny: max(16, 16, 10) = 16 units -> 0.16
    // mid: max(4, 2, 2) = 4 units -> 0.36
    // big: max(1, 1, 1) = 1 unit -> 0.40
    let cheapest = result.cheapest.unwrap();
    assert_eq!(cheapest.spec.instance_type, "tiny");
    assert_eq!(cheapest.unit_count, 16);
    assert!((cheapest.total_cost - 0.16).abs() < 1e-9);

    let min_count = result.min_instance_count.unwrap();
    assert_eq!(min_count.spec.instance_type, "big");
    assert_eq!(min_count.unit_count, 1);
    assert!((min_count.total_cost - 0.40).abs() < 1e-9);
}

#[test]
fn single_candidate_wins_both_recommendations() {
    let specs = vec![spec("only", 4, 16.0, 100.0)];
    let cheapest_by_type: HashMap<_, _> =
        [priced("only", "us-east-1", 0.10)].into_iter().collect();
    let req = ResourceRequirement::new(Some(6), None, None);

    let result = plan(&specs, &cheapest_by_type, &req);
    let cheapest = result.cheapest.unwrap();
    let min_count = result.min_instance_count.unwrap();
    assert_eq!(cheapest.spec.instance_type, "only");
    assert_eq!(min_count.spec.instance_type, "only");
    assert_eq!(cheapest.unit_count, 2);
}

#[test]
fn fractional_memory_capacity_rounds_up() {
    // 4 GB on 1.7 GB units takes 3 units, and the total follows.
    let specs = vec![spec("m1.small", 1, 1.7, 160.0)];
    let cheapest_by_type: HashMap<_, _> =
        [priced("m1.small", "us-east-1", 0.007)].into_iter().collect();
    let req = ResourceRequirement::new(None, Some(4), None);

    let result = plan(&specs, &cheapest_by_type, &req);
    let cheapest = result.cheapest.unwrap();
    assert_eq!(cheapest.unit_count, 3);
    assert!((cheapest.total_cost - 0.021).abs() < 1e-9);
}
