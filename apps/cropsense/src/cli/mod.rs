//! # CLI Module
//!
//! Command-line interface for CropSense.
//!
//! Each subcommand is a `cmd_*` function so it can be exercised from tests
//! without spawning the binary.

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_MAIZE_MODEL, DEFAULT_WHEAT_MODEL};

/// Crop disease prediction server
#[derive(Parser, Debug)]
#[command(name = "cropsense")]
#[command(version)]
#[command(about = "Serve and inspect crop disease model bundles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 5000)]
        port: u16,

        /// Maize model bundle
        #[arg(long, default_value = DEFAULT_MAIZE_MODEL)]
        maize_model: PathBuf,

        /// Wheat model bundle
        #[arg(long, default_value = DEFAULT_WHEAT_MODEL)]
        wheat_model: PathBuf,

        /// HTML file served at / instead of the built-in page
        #[arg(long)]
        index_file: Option<PathBuf>,
    },

    /// Show what a bundle contains
    Inspect {
        /// Bundle file
        path: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the stages a bundle accepts
    Stages {
        /// Bundle file
        path: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Predict diseases for one stage
    Predict {
        /// Bundle file
        path: PathBuf,

        /// Stage code
        #[arg(short, long, allow_hyphen_values = true)]
        stage: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Re-encode a bundle as JSON or binary
    Convert {
        /// Source bundle (format detected from content)
        input: PathBuf,

        /// Destination file
        output: PathBuf,

        /// Target format: json or binary
        #[arg(long, default_value = "binary")]
        to: String,
    },
}
