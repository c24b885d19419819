use std::path::PathBuf;

use anyhow::bail;

use tab_core::AllocationConfig;

#[derive(clap::Args)]
pub struct InitConfigArgs {
    /// Where to write the config
    #[arg(long, default_value = "tabgrid.toml")]
    pub path: PathBuf,
    /// Lowest adjudicator score used by the tournament
    #[arg(long, default_value_t = 0.0)]
    pub min: f64,
    /// Highest adjudicator score used by the tournament
    #[arg(long, default_value_t = 5.0)]
    pub max: f64,
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn init(args: &InitConfigArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.path.display());
    }

    let config = AllocationConfig::scaffold(args.min, args.max);
    config.validate()?;
    std::fs::write(&args.path, config.to_toml_string()?)?;
    println!("✓ Generated {}", args.path.display());

    Ok(())
}
