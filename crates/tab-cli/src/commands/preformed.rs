use std::path::PathBuf;

use tracing::info;

use tabgrid_alloc::{AllocationContext, PreformedAllocator};

use super::{persist, print_outcome, LoadedRound};

#[derive(clap::Args)]
pub struct PreformedArgs {
    /// Round snapshot (JSON)
    #[arg(long)]
    pub snapshot: PathBuf,
    /// Allocation settings (tabgrid.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Panel allocator (direct, dumb, hungarian)
    #[arg(long, default_value = "hungarian")]
    pub allocator: String,
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

pub fn preformed(args: &PreformedArgs) -> anyhow::Result<()> {
    let allocator: PreformedAllocator = args.allocator.parse()?;
    let round = LoadedRound::load(&args.snapshot, args.config.as_deref())?;

    let ctx = AllocationContext::new(&round.config, &round.conflicts, &round.history);
    let outcome = allocator.allocate(&round.snapshot.debates, &round.snapshot.panels, &ctx)?;
    info!(allocator = %allocator, warnings = outcome.warnings.len(), "preformed panels placed");

    let containers = round.snapshot.debate_containers();
    let title = format!("Preformed panels: {allocator}");
    print_outcome(&args.format, &title, &round, &containers, &outcome)?;
    persist(&outcome, args.store.as_deref(), args.dry_run)
}
