use std::path::PathBuf;

use tracing::info;

use tabgrid_alloc::{AllocationContext, Strategy};

use super::{persist, print_outcome, LoadedRound};

#[derive(clap::Args)]
pub struct AllocateArgs {
    /// Round snapshot (JSON)
    #[arg(long)]
    pub snapshot: PathBuf,
    /// Allocation settings (tabgrid.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Allocation strategy
    #[arg(long, default_value = "hungarian-voting")]
    pub strategy: String,
    /// Allocate to preformed panels instead of debates
    #[arg(long)]
    pub preformed: bool,
    /// Seed for tie-breaking between equally scored adjudicators
    #[arg(long)]
    pub seed: Option<u64>,
    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
    /// Allocation store to update (JSON)
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// Compute the store diff without writing it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn allocate(args: &AllocateArgs) -> anyhow::Result<()> {
    let strategy: Strategy = args.strategy.parse()?;
    let round = LoadedRound::load(&args.snapshot, args.config.as_deref())?;

    let containers = if args.preformed {
        round.snapshot.panel_containers()
    } else {
        round.snapshot.debate_containers()
    };

    let ctx = AllocationContext::new(&round.config, &round.conflicts, &round.history).with_seed(args.seed);
    let outcome = strategy.allocate(&containers, &round.snapshot.adjudicators, &ctx)?;
    info!(
        strategy = %strategy,
        allocations = outcome.allocations.len(),
        warnings = outcome.warnings.len(),
        "allocation finished"
    );

    let title = format!("Allocation: {strategy}");
    print_outcome(&args.format, &title, &round, &containers, &outcome)?;
    persist(&outcome, args.store.as_deref(), args.dry_run)
}
