//! Testbed CLI - apply test scenarios and serve their mocks

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{apply, constants, export, import, ls, plan, resolve, rm, serve, validate};

/// Log records from every crate go to stderr. `--verbose` forces debug,
/// otherwise `RUST_LOG` applies with a default of warn.
fn init_logging(verbose: bool) {
    // `init` also bridges the `log` facade used by the library crates
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Validate(args) => validate::execute(args, &cli.global).await,
        cli::Commands::Plan(args) => plan::execute(args, &cli.global).await,
        cli::Commands::Apply(args) => apply::execute(args, &cli.global).await,
        cli::Commands::Serve(args) => serve::execute(args, &cli.global).await,
        cli::Commands::Ls(args) => ls::execute(args, &cli.global).await,
        cli::Commands::Import(args) => import::execute(args, &cli.global).await,
        cli::Commands::Export(args) => export::execute(args, &cli.global).await,
        cli::Commands::Rm(args) => rm::execute(args, &cli.global).await,
        cli::Commands::Constants => constants::execute().await,
        cli::Commands::Resolve(args) => resolve::execute(args).await,
    };

    if let Err(err) = result {
        let code = match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => *code,
            None => {
                eprintln!("Error: {:#}", err);
                1
            }
        };
        std::process::exit(code);
    }
}
