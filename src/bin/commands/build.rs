use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use log::{error, info};
use prettytable::{Table, format, row};

use bio_assembler::Complex;
use bio_assembler::io::{read_pdb_file, write_mmcif_complex};
use bio_assembler::ops::{
    AssemblyConfig, GrowthObserver, ModelOutcome, StoichiometrySource, assemble,
};

use crate::commands::{load_fragments, print_boxed_label, run_with_spinner};

/// Options controlling how complexes are grown and where they are written.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Base name of the output files.
    #[arg(short, long, value_name = "NAME", default_value = "macrocomplex")]
    pub output: String,
    /// Directory receiving the output files.
    #[arg(long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
    /// Stop growing once a model holds this many chains.
    #[arg(short = 'c', long = "max-chains", value_name = "N", default_value_t = 300)]
    pub max_chains: usize,
    /// Number of independent models to build.
    #[arg(short = 'n', long, value_name = "N", default_value_t = 1)]
    pub models: usize,
    /// Also write a snapshot after every accepted chain.
    #[arg(short, long)]
    pub dirty: bool,
    /// Seed for the interaction shuffling; model k uses seed + k - 1.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
    /// Reference structure whose chain counts become the stoichiometry.
    #[arg(short, long, value_name = "FILE", conflicts_with = "stoichiometry")]
    pub template: Option<PathBuf>,
    /// Maximum copies per identity, e.g. A:2,B:1.
    #[arg(short, long, value_name = "SPEC")]
    pub stoichiometry: Option<String>,
}

/// Writes intermediate snapshots as `<output><k>_tmp_<n>.cif`.
struct SnapshotTrace {
    dir: PathBuf,
    prefix: String,
}

impl GrowthObserver for SnapshotTrace {
    fn chain_added(&self, model: usize, complex: &Complex) -> io::Result<()> {
        let path = self
            .dir
            .join(format!("{}{}_tmp_{}.cif", self.prefix, model, complex.len()));
        write_model(&path, complex).map_err(io::Error::other)
    }
}

pub fn run(input: &Path, args: &BuildArgs) -> Result<()> {
    let fragments = load_fragments(input)?;

    let template = args
        .template
        .as_deref()
        .map(|path| {
            read_pdb_file(path)
                .with_context(|| format!("Failed to read template {}", path.display()))
        })
        .transpose()?;
    let source = StoichiometrySource::select(args.stoichiometry.clone(), template)?;

    fs::create_dir_all(&args.out_dir).with_context(|| {
        format!("Failed to create output directory {}", args.out_dir.display())
    })?;

    let config = AssemblyConfig {
        max_chains: args.max_chains,
        models: args.models,
        rng_seed: args.seed,
    };

    let run = if args.dirty {
        let trace = SnapshotTrace {
            dir: args.out_dir.clone(),
            prefix: args.output.clone(),
        };
        run_with_spinner("Assembling complexes", || {
            assemble(fragments, source.as_ref(), &config, &trace).map_err(anyhow::Error::new)
        })?
    } else {
        run_with_spinner("Assembling complexes", || {
            assemble(fragments, source.as_ref(), &config, &()).map_err(anyhow::Error::new)
        })?
    };

    let mut failures = 0usize;
    for (index, outcome) in run.models.iter().enumerate() {
        let path = args
            .out_dir
            .join(format!("{}_{}.cif", args.output, index + 1));
        match write_model(&path, &outcome.complex) {
            Ok(()) => info!("Wrote {}", path.display()),
            Err(err) => {
                error!("{:#}", err);
                failures += 1;
            }
        }
    }

    print_summary(&run.models)?;

    if failures == run.models.len() {
        bail!("None of the {} models could be written", failures);
    }
    Ok(())
}

fn write_model(path: &Path, complex: &Complex) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_mmcif_complex(&mut writer, complex)
        .with_context(|| format!("Failed to write mmCIF output to {}", path.display()))?;
    writer.flush().context("Failed to flush output writer")?;
    Ok(())
}

fn print_summary(models: &[ModelOutcome]) -> Result<()> {
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "Assembly Summary")?;
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row![
        "Model",
        "Chains",
        "Profile",
        "Stopped",
        "Added",
        "Clashes",
        "Skipped",
        "Passes"
    ]);
    for outcome in models {
        table.add_row(row![
            outcome.complex.id,
            outcome.complex.len(),
            outcome.complex.profile_string(),
            outcome.termination,
            outcome.stats.added,
            outcome.stats.clash_rejections,
            outcome.stats.stoichiometry_skips,
            outcome.stats.passes
        ]);
    }
    table
        .print(&mut stderr)
        .context("Failed to render assembly summary")?;

    for outcome in models.iter().filter(|o| !o.complex.grew()) {
        writeln!(
            &mut stderr,
            "{} did not grow beyond its seed pair",
            outcome.complex.id
        )?;
    }
    Ok(())
}
