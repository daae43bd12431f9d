//! Placement CLI Library
//!
//! This crate provides the command-line interface for the placement
//! dashboard:
//!
//! - **Serve**: run the HTTP dashboard
//! - **Predict**: score one student profile from the terminal
//! - **Analyze**: print the dataset statistics behind the charts
//!
//! # Example
//!
//! ```bash
//! # Serve the dashboard
//! placement serve --model placement_model.json --dataset campus_placement.csv --port 8501
//!
//! # One-off prediction
//! placement predict --model placement_model.json --cgpa 8.4 --internships 2 \
//!     --projects 5 --communication 8 --resume-score 90
//!
//! # Dataset summary
//! placement analyze --dataset campus_placement.csv --model placement_model.json
//! ```

pub mod commands;

use clap::{Parser, Subcommand};

pub use commands::{AnalyzeCommand, PredictCommand, ServeCommand};

/// Smart Placement AI - campus placement prediction dashboard
#[derive(Parser, Debug)]
#[command(name = "placement")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the dashboard over HTTP
    Serve(ServeCommand),

    /// Predict placement for a single student
    Predict(PredictCommand),

    /// Summarize the historical placement dataset
    Analyze(AnalyzeCommand),
}
