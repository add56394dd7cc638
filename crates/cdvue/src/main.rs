use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use itertools::Itertools;
use mimalloc::MiMalloc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Fixed output file name in the working directory.
const DEFAULT_OUTPUT: &str = "mapper.html";

/// Environment toggle routing extractor narration to the log, the
/// successor of the original tool's `cdvueDebug` variable.
const DEBUG_ENV: &str = "CDVUE_DEBUG";

/// Map component/service dependencies in an annotated Java source tree
/// and emit an interactive HTML graph.
///
/// Classes marked @Component declare dependencies through @Reference
/// fields; classes marked @Service fulfill the contracts they
/// implement. The resolved graph is written as a self-contained HTML
/// file.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Path to the source tree to scan
    path: String,

    /// Output file path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Print the extracted class facts as JSON to stdout instead of
    /// writing the graph
    #[arg(long)]
    dump_facts: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let facts = cdvue_extract::scan_facts(&cli.path)
        .context("could not process source files")?;

    if cli.dump_facts {
        // Facts go to stdout for piping; all logging is on stderr.
        let stdout = std::io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), &facts)?;
        println!();
        return Ok(());
    }

    let indexes = cdvue_resolve::DependencyIndexes::build(&facts);
    let catalog = cdvue_resolve::resolve_catalog(&indexes);
    cdvue_viz::write_graph(&catalog, &cli.path, &cli.output)
        .context("could not write dependency graph")?;

    info!(
        classes = facts.len(),
        nodes = catalog.len(),
        output = %cli.output.display(),
        "dependency graph complete"
    );
    Ok(())
}

/// Initializes structured logging on stderr. Default to warn, allowlist
/// our crates at the requested verbosity.
fn init_logging(cli: &Cli) {
    const CRATES: &[&str] = &[
        "cdvue",
        "cdvue_extract",
        "cdvue_resolve",
        "cdvue_schemas",
        "cdvue_viz",
    ];
    let level = cli.verbose.tracing_level_filter();
    let mut allowlist =
        CRATES.iter().map(|c| format!("{c}={level}")).join(",");
    if std::env::var(DEBUG_ENV).is_ok_and(|v| v == "true") {
        allowlist.push_str(",cdvue_extract=debug");
    }
    let filter = EnvFilter::new(format!("warn,{allowlist}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
