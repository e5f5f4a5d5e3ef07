#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use cloudtree::cli::Args;
use cloudtree::filter::FilterSet;
use cloudtree::settings::{default_config_path, default_output_dir, Settings};
use cloudtree::snapshot::{self, Outputs, SnapshotEvent, SnapshotRequest, DEFAULT_SUFFIX};
use cloudtree::summary::{summary_lines, PERMISSION_WARNING};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Exit status after Ctrl-C, as shells report SIGINT.
const INTERRUPTED_EXIT: i32 = 130;

fn main() {
    match run_app() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("cloudtree: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run_app() -> Result<i32> {
    let args = Args::parse().validated();
    init_tracing(args.log_level());

    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => default_config_path()
            .map_err(|e| tracing::warn!(error = %e, "settings disabled"))
            .ok(),
    };
    let stored = config_path
        .as_deref()
        .map(Settings::load_or_default)
        .unwrap_or_default();

    let request = build_request(&args, stored.active())?;

    // Setup errors must surface before any traversal starts.
    let root = snapshot::validate_root(&request.root)?;
    let request = SnapshotRequest { root, ..request };

    let (tx, rx) = crossbeam_channel::unbounded();
    let ctrlc_tx = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(SnapshotEvent::Interrupted);
    }) {
        tracing::warn!(error = %e, "cannot install Ctrl-C handler");
    }

    let _worker = snapshot::spawn(request.clone(), tx);

    let outcome = loop {
        match rx.recv() {
            Ok(SnapshotEvent::Progress(msg)) => {
                if !args.quiet {
                    eprintln!("cloudtree: {msg}");
                }
            }
            Ok(SnapshotEvent::Finished(outcome)) => break outcome,
            Ok(SnapshotEvent::Interrupted) => {
                eprintln!("cloudtree: interrupted, snapshot abandoned");
                return Ok(INTERRUPTED_EXIT);
            }
            Err(_) => anyhow::bail!("snapshot worker exited without a result"),
        }
    };
    let result = outcome.context("snapshot failed")?;

    if result.permission_error {
        eprintln!("cloudtree: {PERMISSION_WARNING}");
    }
    for line in summary_lines(&result) {
        println!("{line}");
    }

    if let Some(path) = config_path {
        let to_store = if args.forget {
            Some(Settings::forgotten())
        } else if args.remember || stored.remember_settings {
            // opting in once keeps refreshing the stored values on later runs
            Some(request.settings())
        } else {
            None
        };
        if let Some(settings) = to_store {
            if let Err(e) = settings.save(&path) {
                eprintln!("cloudtree: warning: {e:#}");
            }
        }
    }

    Ok(0)
}

fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Merge command-line arguments over remembered settings. Arguments win;
/// remembered values fill the gaps only when remembering is enabled.
fn build_request(args: &Args, stored: Option<&Settings>) -> Result<SnapshotRequest> {
    let remembered = |pick: fn(&Settings) -> Option<String>| stored.and_then(pick);

    let root: PathBuf = args
        .root
        .clone()
        .or_else(|| stored.and_then(|s| s.root.clone()))
        .context("no folder given and none remembered; pass a ROOT argument")?;

    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| stored.and_then(|s| s.out_dir.clone()))
        .unwrap_or_else(default_output_dir);

    let exclude_exts = args
        .exclude_exts
        .clone()
        .or_else(|| remembered(|s| s.exclude_exts.clone()));
    let exclude_words = args
        .exclude_words
        .clone()
        .or_else(|| remembered(|s| s.exclude_words.clone()));

    // Only one of the two flags can be set; with neither, fall back to what
    // was remembered, then to both.
    let outputs = if args.tree_only || args.index_only {
        Outputs {
            tree: args.wants_tree(),
            index: args.wants_index(),
        }
    } else {
        Outputs {
            tree: stored.and_then(|s| s.tree).unwrap_or(true),
            index: stored.and_then(|s| s.index).unwrap_or(true),
        }
    };

    Ok(SnapshotRequest {
        label: args
            .label
            .clone()
            .or_else(|| remembered(|s| s.label.clone()))
            .unwrap_or_default(),
        suffix: args
            .suffix
            .clone()
            .or_else(|| remembered(|s| s.suffix.clone()))
            .unwrap_or_else(|| DEFAULT_SUFFIX.to_string()),
        depth: args.depth.or_else(|| stored.and_then(|s| s.depth)).unwrap_or(0),
        outputs,
        filters: FilterSet::from_overrides(exclude_exts.as_deref(), exclude_words.as_deref()),
        prefer_external: args.external_tree,
        exclude_exts_text: exclude_exts,
        exclude_words_text: exclude_words,
        ..SnapshotRequest::new(root, out_dir)
    })
}
