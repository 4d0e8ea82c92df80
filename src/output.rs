//! Terminal rendering for sizing results
//!
//! Table output for the recommendation pair, the qualifying-type listing, and
//! raw regional prices, plus a JSON mode for scripting.

use crate::types::{InstanceTypeSpec, RegionalSpotPrice, SizedInstanceOption, SizingResult};
use comfy_table::{Cell, Table};
use console::style;
use std::collections::HashMap;

/// Render one sizing run's recommendations.
pub fn print_sizing_result(result: &SizingResult, output_format: &str) -> crate::error::Result<()> {
    if output_format == "json" {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    if result.is_empty() {
        println!(
            "{} No instance type has both a catalog entry and a spot price for this requirement.",
            style("No viable configuration.").yellow().bold()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Recommendation",
        "Instance Type",
        "Region",
        "Units",
        "$/unit/hr",
        "$/hr total",
        "vCPU",
        "Mem GB",
        "Storage GB",
    ]);

    if let Some(option) = &result.cheapest {
        table.add_row(recommendation_row("Cheapest", option, comfy_table::Color::Green));
    }
    if let Some(option) = &result.min_instance_count {
        table.add_row(recommendation_row(
            "Fewest instances",
            option,
            comfy_table::Color::Cyan,
        ));
    }

    println!("{table}");
    Ok(())
}

fn recommendation_row(
    label: &str,
    option: &SizedInstanceOption,
    color: comfy_table::Color,
) -> Vec<Cell> {
    vec![
        Cell::new(label).fg(color),
        Cell::new(&option.spec.instance_type),
        Cell::new(&option.region),
        Cell::new(option.unit_count),
        Cell::new(format!("${:.4}", option.unit_price)),
        Cell::new(format!("${:.4}", option.total_cost)),
        Cell::new(option.spec.vcpu),
        Cell::new(format!("{:.1}", option.spec.memory_gb)),
        Cell::new(format!("{:.0}", option.spec.storage_gb)),
    ]
}

/// Render the qualifying instance types for a requirement.
pub fn print_instance_types(specs: &[InstanceTypeSpec], output_format: &str) -> crate::error::Result<()> {
    if output_format == "json" {
        println!("{}", serde_json::to_string_pretty(specs)?);
        return Ok(());
    }

    if specs.is_empty() {
        println!("{}", style("No qualifying instance types.").yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Instance Type", "vCPU", "Mem GB", "Storage GB", "Family"]);
    for spec in specs {
        table.add_row(vec![
            Cell::new(&spec.instance_type),
            Cell::new(spec.vcpu),
            Cell::new(format!("{:.1}", spec.memory_gb)),
            Cell::new(format!("{:.0}", spec.storage_gb)),
            Cell::new(spec.family.as_deref().unwrap_or("-")),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Render one instance type's full spec.
pub fn print_instance_detail(spec: &InstanceTypeSpec, output_format: &str) -> crate::error::Result<()> {
    if output_format == "json" {
        println!("{}", serde_json::to_string_pretty(spec)?);
        return Ok(());
    }

    println!("{}", style(&spec.instance_type).bold());
    println!("  vCPU:        {}", spec.vcpu);
    println!("  Memory:      {:.1} GB", spec.memory_gb);
    println!("  Storage:     {:.0} GB", spec.storage_gb);
    if let Some(family) = &spec.family {
        println!("  Family:      {}", family);
    }
    if let Some(network) = &spec.network_performance {
        println!("  Network:     {}", network);
    }
    Ok(())
}

/// Render raw regional spot prices per instance type.
pub fn print_spot_prices(
    prices: &HashMap<String, Vec<RegionalSpotPrice>>,
    output_format: &str,
) -> crate::error::Result<()> {
    if output_format == "json" {
        println!("{}", serde_json::to_string_pretty(prices)?);
        return Ok(());
    }

    let mut names: Vec<&String> = prices.keys().collect();
    names.sort();

    let mut table = Table::new();
    table.set_header(vec!["Instance Type", "Region", "$/hr", "Observed"]);
    for name in names {
        let records = &prices[name];
        if records.is_empty() {
            table.add_row(vec![
                Cell::new(name),
                Cell::new("-").fg(comfy_table::Color::Yellow),
                Cell::new("no offers"),
                Cell::new("-"),
            ]);
            continue;
        }
        for record in records {
            let observed = record
                .timestamp
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                Cell::new(name),
                Cell::new(&record.region),
                Cell::new(format!("${:.4}", record.price)),
                Cell::new(observed),
            ]);
        }
    }

    println!("{table}");
    Ok(())
}
