mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use ensurebin_core::config::consts::env;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let package_dir = cli.package_dir;
    let result = match cli.command {
        Commands::Install {
            target,
            network,
            json,
        } => commands::install::run(package_dir, network.into_overrides(target), json),
        Commands::Path { json } => commands::path::run(package_dir, json),
        Commands::Platform { target, json } => {
            commands::platform::run(package_dir, target.into_overrides(), json)
        }
        Commands::Shim { bin_dir } => commands::shim::run(package_dir, bin_dir),
        Commands::Exec { args } => commands::exec::run(package_dir, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; `ENSUREBIN_LOG` takes env_logger filter syntax
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(env::LOG, default_filter))
        .format_timestamp(None)
        .init();
}
