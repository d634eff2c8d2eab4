//! CLI command definitions using clap.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;
use crate::edit::EditOp;

/// Bayes Ball - d-separation explorer for Bayesian networks
#[derive(Parser, Debug)]
#[command(name = "bayesball")]
#[command(version)]
#[command(
    about = "Find the states conditionally dependent on a source with the Bayes Ball algorithm"
)]
#[command(
    long_about = "Networks are passed as compact model strings such as 'OFC2;OFC2;OFC3,4;OFC;OFC;': one ';'-terminated segment per state, 'O' + observed flag (T/F) + 'C' + comma-separated children, and an empty segment for a removed state."
)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Model string (defaults to the config's default_model)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Output format (defaults to the config's format)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List states with their observation flag, parents, and children
    Show,

    /// Check that the network is a directed acyclic graph
    Check,

    /// Run Bayes Ball from a source state
    Run {
        /// Source state index
        #[arg(short, long)]
        source: usize,
    },

    /// Apply edit operations in order and print the resulting model string
    Edit {
        /// Edit operation, e.g. add-state=observed, add-edge=0>1, toggle=2
        #[arg(short, long = "op", required = true)]
        ops: Vec<EditOp>,
    },

    /// Print a shareable link embedding the model string
    Link,
}
