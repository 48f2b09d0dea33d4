use clap::{Parser, Subcommand};
use miette::{miette, Result};
use std::path::PathBuf;

use eosgen::cli;

#[derive(Parser)]
#[command(name = "eosgen")]
#[command(about = "Declaration scanner and binding model resolver for EOS SDK headers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a header directory into per-file declaration tables
    Scan {
        /// Directory containing the SDK headers
        input: PathBuf,

        /// Output format (json, text)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Run the full pipeline and emit the resolved binding model
    Resolve {
        /// Directory containing the SDK headers
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (json, summary)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Expand input structs with at most this many fields (0 disables)
        #[arg(long, default_value_t = 3)]
        max_input_fields: usize,

        /// Expand callback payloads with at most this many fields (0 disables)
        #[arg(long, default_value_t = 3)]
        max_callback_fields: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { input, format } => {
            cli::scan::scan(&input, &format).map_err(|e| miette!("{}", e))
        }
        Commands::Resolve {
            input,
            output,
            format,
            max_input_fields,
            max_callback_fields,
        } => {
            let args = cli::resolve::ResolveArgs {
                input_path: input,
                output_path: output,
                format,
                max_input_fields,
                max_callback_fields,
            };
            cli::resolve::resolve(&args).map_err(|e| miette!("{}", e))
        }
    }
}
