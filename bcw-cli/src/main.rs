//! BCW CLI - Command line tool for analyzing Brazilian cotton planting
//! against daily weather observations.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bcw-cli",
    version,
    about = "Brazilian cotton and weather analysis toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: bcw_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    log::debug!("cli: running {:?}", cli.command);
    bcw_cmd::run(cli.command)
}
