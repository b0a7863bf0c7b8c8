//! Scans a source tree for types deriving `DecodeObject` and inserts the
//! attribute and include directive the decoder generator expects.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod rewrite;

use rewrite::{PrepOptions, PrepReport};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory of the project to prepare.
    root: PathBuf,

    /// Subdirectory under the root to scan.
    #[arg(long, default_value = "src")]
    target: PathBuf,

    /// Report the edits without writing any file.
    #[arg(long)]
    dry_run: bool,

    /// Also report skipped files.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    debug!(root = ?args.root, target = ?args.target, dry_run = args.dry_run);

    let options = PrepOptions {
        root: args.root,
        target: args.target,
        dry_run: args.dry_run,
        verbose: args.verbose,
    };
    let report = rewrite::run(&options)?;
    print_report(&report, &options);
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

fn print_report(report: &PrepReport, options: &PrepOptions) {
    let action = if options.dry_run {
        "would update"
    } else {
        "updated"
    };
    for change in &report.changed {
        let mut edits = Vec::new();
        if change.attribute_inserted {
            edits.push("companion attribute");
        }
        if change.include_inserted {
            edits.push("include directive");
        }
        println!("{} {}: {}", action, change.path.display(), edits.join(" + "));
    }
    if options.verbose {
        for path in &report.skipped {
            println!("skipped {}", path.display());
        }
    }
    println!(
        "{} file(s) scanned, {} changed, {} skipped",
        report.scanned,
        report.changed.len(),
        report.skipped.len()
    );
}
