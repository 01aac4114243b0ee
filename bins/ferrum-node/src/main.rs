//! Ferrum execution-core node binary.
use clap::Parser;
use command::{Cli, Commands};
use eyre::Result;
use ferrum_chain::ChainConfig;
use pretty_print::{print_config, print_startup_banner};
use tracing_subscriber::{fmt, EnvFilter};

mod command;
mod fixture;
mod pretty_print;
mod run;

/// Initialize the logger with a nice formatted output
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::fmt().with_env_filter(filter).with_target(false).init();
}

fn load_fixture(path: Option<std::path::PathBuf>) -> Result<fixture::Fixture> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(fixture::Fixture::demo()),
    }
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();
    let is_dev = cli.dev;

    match cli.command {
        Some(Commands::Run { fixture: fixture_path }) => {
            print_startup_banner(is_dev);
            run::run_fixture(load_fixture(fixture_path)?)?;
        }
        None => {
            print_startup_banner(is_dev);
            run::run_fixture(load_fixture(None)?)?;
        }
        Some(Commands::Config) => {
            print_config(&ChainConfig::default());
        }
    }

    Ok(())
}
