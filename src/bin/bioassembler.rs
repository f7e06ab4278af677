use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use pretty_env_logger::env_logger::DEFAULT_FILTER_ENV;

mod commands;

use commands::{build, identities};

#[derive(Parser, Debug)]
#[command(
    name = "bioassembler",
    about = "Builds macromolecular complexes from pairwise chain-interaction PDB files.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Directory holding the two-chain PDB fragments.
    #[arg(short, long, value_name = "DIR", global = true)]
    input: Option<PathBuf>,
    /// Log every placement decision. See more with e.g. RUST_LOG=trace.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble one or more complex models and write them as mmCIF.
    Build(build::BuildArgs),
    /// List the chain identities found in the fragments.
    Identities(identities::IdentitiesArgs),
}

fn init_logger(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var(DEFAULT_FILTER_ENV) {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter_level(if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            });
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let input = commands::require_input(cli.input.as_deref())?;

    match cli.command {
        Command::Build(args) => build::run(input, &args)?,
        Command::Identities(args) => identities::run(input, &args)?,
    }

    Ok(())
}
