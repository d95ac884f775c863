//! `chop` — Computes the composition factors of a module over GF(q).
//!
//! Reads the generators from `<name>.1` … `<name>.<n>` (text matrix
//! format), chops the module into irreducibles and writes:
//! - `<name><dim><letter>.<i>`: generators of each distinct constituent in
//!   its canonical basis
//! - `<name>.cfinfo.json`: the constituent table, composition series and
//!   statistics
//!
//! **Usage:**
//! ```
//! chop [-G] [-g <n>] [-d <max_degree>] [-n <max_nullity>] [--seed <u64>] [--reuse <cfinfo.json>] [-v...] <name>
//! ```
//!
//! Exits non-zero if the search gives up, naming the node and the last
//! word tried.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chop::{ChopContext, ChopEngine, ChopOptions, ChopReport, FileSink, KnownIdWord};
use clap::Parser;
use mtx::{parse_matrix, Matrix};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Chop a module into its irreducible constituents.
#[derive(Parser)]
#[command(name = "chop", about = "Composition factors of a module over GF(q)")]
struct Args {
    /// Print the final report as JSON on stdout.
    #[arg(short = 'G')]
    json: bool,

    /// Number of generators to read.
    #[arg(short = 'g', default_value_t = 2)]
    generators: usize,

    /// Largest factor degree tried per word.
    #[arg(short = 'd')]
    max_degree: Option<usize>,

    /// Largest kernel searched as a whole.
    #[arg(short = 'n')]
    max_nullity: Option<usize>,

    /// Seed of the exceptional-case search.
    #[arg(long)]
    seed: Option<u64>,

    /// Reuse identifying words from an earlier `.cfinfo.json`.
    #[arg(long)]
    reuse: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Module name: the base of the generator file names.
    name: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let gens = read_generators(&args.name, args.generators)?;

    let mut options = ChopOptions::default();
    if let Some(d) = args.max_degree {
        options.max_degree = d;
    }
    if let Some(n) = args.max_nullity {
        options.max_nullity = n;
    }
    if let Some(seed) = args.seed {
        options.seed = seed;
    }

    let (dir, module) = split_name(&args.name)?;
    let mut ctx = ChopContext::new(options, FileSink::new(dir, module));
    if let Some(path) = &args.reuse {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let earlier = ChopReport::from_json(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        ctx = ctx.with_known_id_words(KnownIdWord::from_report(&earlier));
    }

    let report = ChopEngine::new(ctx)
        .run(gens)
        .with_context(|| format!("chop of {} failed", args.name.display()))?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&args.name, &report);
    }
    Ok(())
}

/// Install the global subscriber on stderr; stdout is kept for results.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    Registry::default().with(filter).with(fmt_layer).init();
}

/// Read `<name>.1` … `<name>.<count>`.
///
/// # Errors
///
/// Fails if a file is missing or does not hold exactly one matrix.
fn read_generators(name: &Path, count: usize) -> Result<Vec<Matrix>> {
    (1..=count)
        .map(|i| {
            let path = PathBuf::from(format!("{}.{i}", name.display()));
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_matrix(&text).with_context(|| format!("failed to parse {}", path.display()))
        })
        .collect()
}

/// Directory and file stem of the module name.
///
/// # Errors
///
/// Fails if the name has no file component.
fn split_name(name: &Path) -> Result<(PathBuf, String)> {
    let module = name
        .file_name()
        .with_context(|| format!("invalid module name {}", name.display()))?
        .to_string_lossy()
        .into_owned();
    let dir = name
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok((dir, module))
}

fn print_summary(name: &Path, report: &ChopReport) {
    println!(
        "{}: dimension {} over GF({}), {} generators",
        name.display(),
        report.dim,
        report.field,
        report.generators
    );
    println!();
    println!("Name   Mult  SF  Word");
    println!("----------------------------------------");
    for c in &report.constituents {
        println!(
            "{:<6} {:>4}  {:>2}  {} ({}), {}",
            c.name, c.multiplicity, c.splitting_degree, c.id_word, c.id_word_name, c.id_poly_text
        );
    }
    println!();
    let series: Vec<&str> = report.series.iter().map(|s| s.constituent.as_str()).collect();
    println!("Composition series: {}", series.join(" "));

    let s = &report.stats;
    println!();
    println!(
        "Splits: {} saved vector, {} normal, {} dual, {} exceptional",
        s.saved_vector_splits, s.normal_splits, s.dual_splits, s.exceptional_splits
    );
    println!(
        "Irreducibles: {} ({} by characteristic polynomial), {} words tried, {} nodes",
        s.irreducibles, s.charpoly_irreducible, s.words_tried, s.nodes
    );
}
