//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::Vector;

/// Stern-Brocot mediant trees and continued-fraction convergents in exact arithmetic
#[derive(Parser, Debug)]
#[command(name = "mediant")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Directory holding a local .mediant.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human readable
    #[default]
    Text,
    /// JSON for downstream plotting
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate mediant tree levels
    Tree {
        /// Number of generations
        #[arg(short, long, default_value_t = 4)]
        generations: usize,

        /// Vector dimension
        #[arg(short = 'D', long, default_value_t = 2)]
        dimensions: usize,

        /// Basis vectors as comma separated components, e.g. `0,1 1,0`
        /// (default: Stern-Brocot basis for 2-D, unit vectors otherwise)
        #[arg(short, long, num_args = 2.., value_parser = parse_vector)]
        basis: Option<Vec<Vector>>,

        /// Only show vectors new at each level
        #[arg(short, long)]
        unique: bool,

        /// Use the arena-backed recursive generator
        #[arg(short, long)]
        recursive: bool,

        /// Render the parent/child structure instead of levels
        #[arg(long, conflicts_with_all = ["unique", "format"])]
        structure: bool,

        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// Split Stern-Brocot levels into fractions below and above 1
    Split {
        /// Number of generations
        #[arg(short, long, default_value_t = 4)]
        generations: usize,

        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Continued fraction of sqrt(n), optionally for every n up to --to
    Sqrt {
        /// Radicand
        #[arg(allow_negative_numbers = true)]
        n: i64,

        /// Expand every radicand in n..=to
        #[arg(short, long, allow_negative_numbers = true)]
        to: Option<i64>,

        /// Maximum number of terms (default from config)
        #[arg(short = 'l', long)]
        max_length: Option<usize>,

        /// Also compute convergents
        #[arg(short, long)]
        convergents: bool,

        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Continued fraction of Euler's number
    E {
        /// Number of terms (default from config)
        #[arg(short = 'l', long)]
        limit: Option<usize>,

        /// Also compute convergents
        #[arg(short, long)]
        convergents: bool,

        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Write a default global config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parses `a,b,c` into a vector.
pub fn parse_vector(s: &str) -> Result<Vector, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid component '{}': {}", part, e))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Vector::new)
}
