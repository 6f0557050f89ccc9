//! Reinsurance Allocation CLI
//!
//! Computes, approves and reviews risk allocations against CSV exports of
//! the policy register and treaty catalog.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use reinsurance_allocation::allocation::{validate_allocation, AllocationSummary};
use reinsurance_allocation::policy::{load_policies, loader::DEFAULT_POLICIES_PATH, parse_date};
use reinsurance_allocation::store::InMemoryStore;
use reinsurance_allocation::treaty::{load_treaties, loader::DEFAULT_TREATIES_PATH};
use reinsurance_allocation::{
    compute_allocation, Actor, ApprovalWorkflow, Policy, Role, TreatyCatalog, WorkflowConfig,
};

#[derive(Debug, Parser)]
#[command(name = "reinsurance_allocation", version, about = "Reinsurance risk allocation tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the retained/ceded split for one policy without persisting it
    Allocate(Inputs),
    /// Approve a DRAFT policy and print the resulting allocation record
    Approve {
        #[command(flatten)]
        inputs: Inputs,
        /// Approving user id
        #[arg(long)]
        user: String,
        /// Approving user's role (e.g. UNDERWRITER)
        #[arg(long, default_value = "UNDERWRITER")]
        role: String,
        /// Workflow configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Compute an allocation and run the review checks on it
    Validate {
        #[command(flatten)]
        inputs: Inputs,
        /// Allowed shortfall, in currency units, for the total-match check
        #[arg(long, default_value_t = 1.0)]
        tolerance: f64,
    },
}

#[derive(Debug, Args)]
struct Inputs {
    /// Policy register export
    #[arg(long, default_value = DEFAULT_POLICIES_PATH)]
    policies: PathBuf,
    /// Treaty catalog export
    #[arg(long, default_value = DEFAULT_TREATIES_PATH)]
    treaties: PathBuf,
    /// Business key of the policy to process
    #[arg(long)]
    policy: String,
    /// Only use treaties in force on this date (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<String>,
}

impl Inputs {
    fn load(&self) -> Result<(Vec<Policy>, TreatyCatalog)> {
        let policies = load_policies(&self.policies)
            .with_context(|| format!("loading policies from {}", self.policies.display()))?;
        let treaties = load_treaties(&self.treaties)
            .with_context(|| format!("loading treaties from {}", self.treaties.display()))?;
        log::info!("loaded {} policies and {} treaties", policies.len(), treaties.len());
        Ok((policies, TreatyCatalog::new(treaties)))
    }

    fn as_of(&self) -> Result<Option<NaiveDate>> {
        self.as_of
            .as_deref()
            .map(|d| parse_date("as-of", d))
            .transpose()
            .context("parsing --as-of")
    }

    fn find<'a>(&self, policies: &'a [Policy]) -> Result<&'a Policy> {
        policies
            .iter()
            .find(|p| p.policy_number == self.policy)
            .with_context(|| format!("policy {} not found", self.policy))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Allocate(inputs) => {
            let (policies, catalog) = inputs.load()?;
            let policy = inputs.find(&policies)?;
            let treaties = catalog.eligible_for(policy, inputs.as_of()?);
            let result = compute_allocation(policy, &treaties)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::Approve { inputs, user, role, config } => {
            let Some(role) = Role::parse(&role) else {
                bail!("unknown role {}", role);
            };
            let config = match config {
                Some(path) => WorkflowConfig::from_path(&path)
                    .with_context(|| format!("reading config {}", path.display()))?,
                None => WorkflowConfig::default(),
            };

            let (policies, catalog) = inputs.load()?;
            let store = InMemoryStore::new(policies, catalog.treaties().to_vec());
            let workflow = ApprovalWorkflow::new(store, config);

            let outcome = workflow.approve(&inputs.policy, &Actor::new(&user, role))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Command::Validate { inputs, tolerance } => {
            let (policies, catalog) = inputs.load()?;
            let policy = inputs.find(&policies)?;
            let treaties = catalog.eligible_for(policy, inputs.as_of()?);
            let result = compute_allocation(policy, &treaties)?;
            let report = validate_allocation(policy, &result, catalog.treaties(), tolerance);

            let summary: &AllocationSummary = &report.summary;
            println!("Policy: {}", report.policy_number);
            println!("  Sum Insured: {:>16.2}", summary.sum_insured);
            println!("  Retained:    {:>16.2} ({:.2}%)", summary.retained_amount, summary.retained_pct);
            println!("  Ceded:       {:>16.2} ({:.2}%)", summary.ceded_amount, summary.ceded_pct);
            println!("  Unabsorbed:  {:>16.2}", summary.unabsorbed_amount);
            println!();
            for check in &report.checks {
                let mark = if check.passed {
                    "ok"
                } else if check.kind.is_informational() {
                    "--"
                } else {
                    "!!"
                };
                println!("  [{}] {:<24} {}", mark, check.kind.label(), check.detail);
            }
            println!();
            println!(
                "{}",
                if report.all_passed() { "Allocation validated" } else { "Allocation needs review" }
            );
        }
    }

    Ok(())
}
