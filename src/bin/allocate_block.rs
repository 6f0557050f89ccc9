//! Compute allocations for every policy in the register
//!
//! Outputs one row per policy plus per line-of-business totals, flagging
//! policies whose treaties leave exposure unabsorbed.

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use reinsurance_allocation::allocation::DEFAULT_COVERAGE_TOLERANCE;
use reinsurance_allocation::policy::{load_policies, loader::DEFAULT_POLICIES_PATH};
use reinsurance_allocation::treaty::{load_treaties, loader::DEFAULT_TREATIES_PATH};
use reinsurance_allocation::{compute_allocation, AllocationError, LineOfBusiness, TreatyCatalog};

#[derive(Debug, Parser)]
#[command(name = "allocate_block", about = "Allocate every policy in a register export")]
struct Cli {
    #[arg(long, default_value = DEFAULT_POLICIES_PATH)]
    policies: PathBuf,
    #[arg(long, default_value = DEFAULT_TREATIES_PATH)]
    treaties: PathBuf,
    /// Per-policy results CSV
    #[arg(long, default_value = "block_allocation_output.csv")]
    output: PathBuf,
}

/// One output row per policy
#[derive(Debug, Serialize)]
struct PolicyRow {
    #[serde(rename = "PolicyNumber")]
    policy_number: String,
    #[serde(rename = "LineOfBusiness")]
    line_of_business: LineOfBusiness,
    #[serde(rename = "SumInsured")]
    sum_insured: f64,
    #[serde(rename = "Retained")]
    retained: f64,
    #[serde(rename = "Ceded")]
    ceded: f64,
    #[serde(rename = "Unabsorbed")]
    unabsorbed: f64,
    #[serde(rename = "Lines")]
    lines: usize,
    #[serde(rename = "Status")]
    status: &'static str,
}

/// Totals across one line of business
#[derive(Debug, Default)]
struct LineTotals {
    policies: usize,
    sum_insured: f64,
    retained: f64,
    ceded: f64,
    unabsorbed: f64,
    no_treaty: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let policies = load_policies(&cli.policies)
        .with_context(|| format!("loading policies from {}", cli.policies.display()))?;
    let catalog = TreatyCatalog::new(
        load_treaties(&cli.treaties)
            .with_context(|| format!("loading treaties from {}", cli.treaties.display()))?,
    );
    println!(
        "Loaded {} policies and {} treaties in {:?}",
        policies.len(),
        catalog.len(),
        start.elapsed()
    );

    // Allocate in parallel; the catalog is read-only
    let rows: Vec<PolicyRow> = policies
        .par_iter()
        .map(|policy| {
            let treaties = catalog.eligible_for(policy, None);
            match compute_allocation(policy, &treaties) {
                Ok(result) => PolicyRow {
                    policy_number: policy.policy_number.clone(),
                    line_of_business: policy.line_of_business,
                    sum_insured: policy.sum_insured,
                    retained: result.retained_amount,
                    ceded: result.ceded_total(),
                    unabsorbed: result.unabsorbed(),
                    lines: result.allocations.len(),
                    status: if result.is_fully_covered(DEFAULT_COVERAGE_TOLERANCE) {
                        "COVERED"
                    } else {
                        "PARTIAL"
                    },
                },
                Err(AllocationError::NoEligibleTreaty { ceded, .. }) => PolicyRow {
                    policy_number: policy.policy_number.clone(),
                    line_of_business: policy.line_of_business,
                    sum_insured: policy.sum_insured,
                    retained: policy.sum_insured - ceded,
                    ceded: 0.0,
                    unabsorbed: ceded,
                    lines: 0,
                    status: "NO_TREATY",
                },
            }
        })
        .collect();

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Output written to {}", cli.output.display());

    let mut totals: BTreeMap<&'static str, LineTotals> = BTreeMap::new();
    for row in &rows {
        let t = totals.entry(row.line_of_business.as_str()).or_default();
        t.policies += 1;
        t.sum_insured += row.sum_insured;
        t.retained += row.retained;
        t.ceded += row.ceded;
        t.unabsorbed += row.unabsorbed;
        if row.status == "NO_TREATY" {
            t.no_treaty += 1;
        }
    }

    println!("\nBlock Summary:");
    println!(
        "{:<10} {:>8} {:>18} {:>18} {:>18} {:>16} {:>9}",
        "LOB", "Policies", "SumInsured", "Retained", "Ceded", "Unabsorbed", "NoTreaty"
    );
    println!("{}", "-".repeat(103));
    for (line, t) in &totals {
        println!(
            "{:<10} {:>8} {:>18.2} {:>18.2} {:>18.2} {:>16.2} {:>9}",
            line, t.policies, t.sum_insured, t.retained, t.ceded, t.unabsorbed, t.no_treaty
        );
    }

    let flagged = rows.iter().filter(|r| r.status != "COVERED").count();
    if flagged > 0 {
        log::warn!("{} of {} policies are not fully covered", flagged, rows.len());
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
