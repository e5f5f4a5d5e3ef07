use clap::Parser;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Examples:
  cloudtree ~/Projects/site
  cloudtree ~/Projects/site --label site --out ~/snapshots -L 3
  cloudtree . --exclude-exts 'obj, fbx; e57' --exclude-words 'draft, tmp'
  cloudtree . --index-only --remember";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "cloudtree",
    version,
    about = "Filtered tree and file index snapshots of a folder",
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Folder to snapshot (default: the remembered root)
    pub root: Option<PathBuf>,

    /// Label used in output file names (default: the root's folder name)
    #[arg(short = 'l', long)]
    pub label: Option<String>,

    /// Output directory for snapshots
    #[arg(short = 'o', long = "out")]
    pub out_dir: Option<PathBuf>,

    /// Max tree depth (0 = unlimited)
    #[arg(short = 'L', long = "level")]
    pub depth: Option<usize>,

    /// Tag placed in output file names
    #[arg(long)]
    pub suffix: Option<String>,

    /// Extensions to exclude, comma/space/semicolon separated (replaces the defaults)
    #[arg(short = 'e', long = "exclude-exts")]
    pub exclude_exts: Option<String>,

    /// Words to exclude from names, comma/semicolon/newline separated, case-insensitive
    #[arg(short = 'w', long = "exclude-words")]
    pub exclude_words: Option<String>,

    /// Write only the tree file
    #[arg(long = "tree-only", conflicts_with = "index_only")]
    pub tree_only: bool,

    /// Write only the TSV index
    #[arg(long = "index-only")]
    pub index_only: bool,

    /// Render the tree with the external `tree` binary when available
    #[arg(long = "external-tree")]
    pub external_tree: bool,

    /// Remember this run's settings for next time
    #[arg(long, conflicts_with = "forget")]
    pub remember: bool,

    /// Clear remembered settings
    #[arg(long)]
    pub forget: bool,

    /// Settings file (default: <config dir>/cloudtree/config.json)
    #[arg(long = "config", env = "CLOUDTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress messages
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        // blank free text behaves as if the flag were absent
        self.label = self.label.filter(|s| !s.trim().is_empty());
        self.suffix = self.suffix.filter(|s| !s.trim().is_empty());
        if self.quiet {
            self.verbose = 0;
        }
        self
    }

    pub fn wants_tree(&self) -> bool {
        !self.index_only
    }

    pub fn wants_index(&self) -> bool {
        !self.tree_only
    }

    /// Default log filter for the verbosity count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
