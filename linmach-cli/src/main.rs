//! linmach - Linear machine tool
//! Command-line interface for creating, inspecting and evaluating linear machines
//!
//! ## Environment Variables
//! - `RUST_LOG`: log filter (default: `linmach=warn,linmach_core=warn`)
//! - `LINMACH_GROUP`: default group inside the store
//! - `LINMACH_STORE_PRETTY`, `LINMACH_STORE_FLUSH_ON_DROP`: see `linmach_core::config`

mod commands;
mod parse;

use clap::{Parser, Subcommand};
use colored::*;
use linmach_core::Activation;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::SetArgs;

#[derive(Parser)]
#[command(name = "linmach")]
#[command(author = "Silvano Neto")]
#[command(version = "2026.1.16")]
#[command(about = "Create, inspect and evaluate linear machines", long_about = None)]
struct Cli {
    /// Group inside the store holding the machine
    #[arg(short, long, global = true, default_value = "", env = "LINMACH_GROUP")]
    group: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a zero-initialized machine
    New {
        /// Store file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of inputs
        #[arg(short, long)]
        inputs: usize,

        /// Number of outputs
        #[arg(short, long)]
        outputs: usize,

        /// Activation (identity, tanh, logistic)
        #[arg(short, long, default_value = "identity")]
        activation: Activation,

        /// Replace an existing machine in the same group
        #[arg(long)]
        force: bool,
    },

    /// Show a stored machine
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update parameters of a stored machine
    Set {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Weight matrix, rows separated by ';' (e.g. "0.4,0.1;0.4,0.2")
        #[arg(long, allow_hyphen_values = true)]
        weights: Option<String>,

        /// Bias vector (e.g. "0.3,-3.0")
        #[arg(long, allow_hyphen_values = true)]
        biases: Option<String>,

        /// Per-input subtraction
        #[arg(long, allow_hyphen_values = true)]
        input_sub: Option<String>,

        /// Per-input division
        #[arg(long, allow_hyphen_values = true)]
        input_div: Option<String>,

        /// Activation (identity, tanh, logistic)
        #[arg(short, long)]
        activation: Option<Activation>,
    },

    /// Change the number of inputs and outputs, keeping overlapping values
    Resize {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(value_name = "INPUTS")]
        inputs: usize,

        #[arg(value_name = "OUTPUTS")]
        outputs: usize,
    },

    /// Evaluate the machine on one or more input rows
    Forward {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input row (e.g. "1,1,1"); repeat for several rows
        #[arg(short, long = "input", required = true, allow_hyphen_values = true)]
        inputs: Vec<String>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linmach=warn,linmach_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let group = cli.group.as_str();

    let result = match cli.command {
        Commands::New {
            file,
            inputs,
            outputs,
            activation,
            force,
        } => commands::new_command(&file, group, inputs, outputs, activation, force),

        Commands::Info { file, json } => commands::info_command(&file, group, json),

        Commands::Set {
            file,
            weights,
            biases,
            input_sub,
            input_div,
            activation,
        } => commands::set_command(
            &file,
            group,
            SetArgs {
                weights,
                biases,
                input_sub,
                input_div,
                activation,
            },
        ),

        Commands::Resize {
            file,
            inputs,
            outputs,
        } => commands::resize_command(&file, group, inputs, outputs),

        Commands::Forward { file, inputs } => {
            commands::forward_command(&file, group, &inputs).map(|_| ())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
