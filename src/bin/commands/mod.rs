use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use bio_assembler::Fragment;
use bio_assembler::io::read_pdb_directory;

pub mod build;
pub mod identities;

/// Returns the fragment directory or a usage error when none was given.
pub fn require_input(input: Option<&Path>) -> Result<&Path> {
    input.ok_or_else(|| {
        anyhow!("No --input provided. Point -i/--input at a directory of two-chain PDB files.")
    })
}

/// Reads every PDB file of `dir` and wraps each into a [`Fragment`].
pub fn load_fragments(dir: &Path) -> Result<Vec<Fragment>> {
    let fragments = run_with_spinner("Reading fragments", || {
        let structures = read_pdb_directory(dir)
            .with_context(|| format!("Failed to read fragments from {}", dir.display()))?;
        structures
            .into_iter()
            .map(|(name, structure)| {
                Fragment::from_structure(name, structure).map_err(anyhow::Error::new)
            })
            .collect::<Result<Vec<_>>>()
    })?;
    info!("Read {} fragments from {}", fragments.len(), dir.display());
    Ok(fragments)
}

/// Wraps long-running operations with a spinner rendered to stderr.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}

pub fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}
