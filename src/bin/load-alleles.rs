//! A binary to run one allele load against a registry snapshot.
//!
//! ```shell
//! cargo run --release --bin=load-alleles --features=binaries -- \
//!     --config eucomm.cfg --family targeted input.tsv.gz
//! ```
//!
//! The registry is seeded from tab-delimited reference files (markers and
//! strains) and the quality-control report is written to standard output.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

use alleleload::config::Config;
use alleleload::load;
use alleleload::model::Marker;
use alleleload::model::marker::MarkerStatus;
use alleleload::provider::Family;
use alleleload::store::memory::MemoryStore;

#[derive(Parser)]
struct Args {
    /// The provider input file (`.tsv`, optionally gzipped).
    input: PathBuf,

    /// The load configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// The provider file family (`targeted` or `deletion`).
    #[arg(short, long, default_value = "targeted")]
    family: String,

    /// A tab-delimited marker reference file: `id<TAB>symbol<TAB>chromosome<TAB>status`.
    #[arg(short, long)]
    markers: Option<PathBuf>,

    /// A strain reference file, one strain name per line.
    #[arg(short, long)]
    strains: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity,
}

/// Seeds the in-memory registry from the reference files.
fn seed(store: &mut MemoryStore, args: &Args) -> Result<()> {
    if let Some(path) = &args.markers {
        let reader = alleleload::input::open(path)
            .with_context(|| format!("opening marker file {}", path.display()))?;

        for row in reader.rows() {
            let row = row?;
            if row.len() < 4 {
                bail!("malformed marker row: {}", row.join("\t"));
            }

            let status = row[3]
                .parse::<MarkerStatus>()
                .with_context(|| format!("marker {}", row[0]))?;

            store.insert_marker(Marker::new(&row[0], &row[1], &row[2], status));
        }
    }

    if let Some(path) = &args.strains {
        let reader = alleleload::input::open(path)
            .with_context(|| format!("opening strain file {}", path.display()))?;

        for row in reader.rows() {
            let row = row?;
            if !row[0].is_empty() {
                store.insert_strain(&row[0]);
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    let family = args
        .family
        .parse::<Family>()
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    let config = Config::from_path(&args.config)
        .with_context(|| format!("reading configuration {}", args.config.display()))?;

    let mut store = MemoryStore::new();
    seed(&mut store, &args)?;

    let reader = alleleload::input::open(&args.input)
        .with_context(|| format!("opening input {}", args.input.display()))?;

    let report = load::run(family, &config, &mut store, reader.rows())
        .with_context(|| "running load")?;

    println!("{report}");

    Ok(())
}
