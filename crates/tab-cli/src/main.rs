use clap::{Parser, Subcommand};

mod commands;
mod report;

#[derive(Parser)]
#[command(
    name = "tab",
    about = "Tabgrid — adjudicator allocation for debating tournaments",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate adjudicators to the debates of a round snapshot.
    ///
    /// Strategies: trivial, hungarian-voting, hungarian-consensus.
    /// With --preformed, adjudicators are allocated to the snapshot's
    /// preformed panels instead of its debates.
    Allocate(commands::allocate::AllocateArgs),
    /// Assign preformed panels to the debates of a round snapshot.
    Preformed(commands::preformed::PreformedArgs),
    /// Write a tabgrid.toml scaffold
    InitConfig(commands::config::InitConfigArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tab=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Allocate(args) => commands::allocate::allocate(&args),
        Commands::Preformed(args) => commands::preformed::preformed(&args),
        Commands::InitConfig(args) => commands::config::init(&args),
    }
}
