//! Cheapest-region selection
//!
//! Reduces each instance type's regional spot price observations to the
//! single lowest-priced region. Only the minimum is needed, so this is one
//! linear scan per instance type with no sorting.

use crate::types::{CheapestRegionalPrice, RegionalSpotPrice};
use crate::validation::price_is_usable;
use std::collections::HashMap;
use tracing::warn;

/// Pick the cheapest region per instance type.
///
/// Ties on price keep the first region encountered. Instance types with no
/// usable price records are omitted from the output; they have no viable
/// region and drop out of the run.
pub fn select_cheapest_region(
    prices_by_type: &HashMap<String, Vec<RegionalSpotPrice>>,
) -> HashMap<String, CheapestRegionalPrice> {
    let mut cheapest = HashMap::with_capacity(prices_by_type.len());

    for (instance_type, prices) in prices_by_type {
        let mut best: Option<&RegionalSpotPrice> = None;
        for price in prices {
            if !price_is_usable(price) {
                warn!(
                    "Skipping malformed price record for {} in {:?}",
                    instance_type, price.region
                );
                continue;
            }
            // Strict comparison keeps the first-seen region on exact ties.
            match best {
                Some(b) if price.price >= b.price => {}
                _ => best = Some(price),
            }
        }

        if let Some(b) = best {
            cheapest.insert(
                instance_type.clone(),
                CheapestRegionalPrice {
                    instance_type: instance_type.clone(),
                    region: b.region.clone(),
                    price: b.price,
                },
            );
        }
    }

    cheapest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(instance_type: &str, region: &str, price: f64) -> RegionalSpotPrice {
        RegionalSpotPrice {
            instance_type: instance_type.to_string(),
            region: region.to_string(),
            price,
            timestamp: None,
        }
    }

    #[test]
    fn picks_minimum_price() {
        let mut prices = HashMap::new();
        prices.insert(
            "m1.small".to_string(),
            vec![
                price("m1.small", "us-east-1", 0.012),
                price("m1.small", "eu-west-1", 0.007),
                price("m1.small", "ap-southeast-2", 0.019),
            ],
        );

        let cheapest = select_cheapest_region(&prices);
        let entry = &cheapest["m1.small"];
        assert_eq!(entry.region, "eu-west-1");
        assert_eq!(entry.price, 0.007);
    }

    #[test]
    fn exact_tie_keeps_first_seen_region() {
        let mut prices = HashMap::new();
        prices.insert(
            "c4.large".to_string(),
            vec![
                price("c4.large", "us-west-2", 0.02),
                price("c4.large", "us-east-1", 0.02),
            ],
        );

        let cheapest = select_cheapest_region(&prices);
        assert_eq!(cheapest["c4.large"].region, "us-west-2");
    }

    #[test]
    fn empty_sequence_is_omitted() {
        let mut prices = HashMap::new();
        prices.insert("m1.small".to_string(), vec![]);
        prices.insert(
            "c4.large".to_string(),
            vec![price("c4.large", "us-east-1", 0.02)],
        );

        let cheapest = select_cheapest_region(&prices);
        assert!(!cheapest.contains_key("m1.small"));
        assert!(cheapest.contains_key("c4.large"));
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let mut prices = HashMap::new();
        prices.insert(
            "m1.small".to_string(),
            vec![
                price("m1.small", "us-east-1", -1.0),
                price("m1.small", "eu-west-1", 0.01),
            ],
        );

        let cheapest = select_cheapest_region(&prices);
        assert_eq!(cheapest["m1.small"].region, "eu-west-1");
    }

    #[test]
    fn all_malformed_omits_the_type() {
        let mut prices = HashMap::new();
        prices.insert(
            "m1.small".to_string(),
            vec![price("m1.small", "us-east-1", f64::NAN)],
        );

        assert!(select_cheapest_region(&prices).is_empty());
    }
}
