use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use bio_assembler::SequenceRegistry;
use bio_assembler::ops::unify_identities;

use crate::commands::{load_fragments, print_boxed_label, run_with_spinner};

/// Report-only command listing identity symbols and their sequences.
#[derive(Debug, Default, Args)]
pub struct IdentitiesArgs {}

pub fn run(input: &Path, _args: &IdentitiesArgs) -> Result<()> {
    let mut fragments = load_fragments(input)?;
    let registry = run_with_spinner("Unifying chain identities", || {
        unify_identities(&mut fragments).map_err(anyhow::Error::new)
    })?;

    print_identities(&registry)
}

fn print_identities(registry: &SequenceRegistry) -> Result<()> {
    let mut stdout = io::stdout().lock();

    print_boxed_label(&mut stdout, "Chain Identities")?;
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["Identity", "Chains", "Length", "Sequence"]);

    for (sequence, identity) in registry.iter() {
        table.add_row(row![
            identity,
            registry.member_count(identity),
            sequence.len(),
            sequence
        ]);
    }

    table
        .print(&mut stdout)
        .context("Failed to render identity table")?;
    Ok(())
}
