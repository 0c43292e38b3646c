use clap::{Parser, Subcommand};
use hcsv_spec::HeaderStyle;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use config::{CliConfig, CompileOverrides, OutputFormat};
use error::CliResult;

#[derive(Parser)]
#[command(name = "hcsv-spec")]
#[command(about = "hcsv spec compiler - resolves column specs into schemas for code generation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a spec file and print the resolved schema
    Compile {
        /// Spec file (may instead come from the config file)
        spec: Option<PathBuf>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Treat any bad spec row as fatal
        #[arg(long)]
        strict: bool,

        /// Header row style: internal (column names) or external (header strings)
        #[arg(long)]
        header_style: Option<HeaderStyle>,

        /// Default separator for composite index keys
        #[arg(long)]
        separator: Option<String>,
    },

    /// Generate a spec skeleton from the header line of an hcsv file
    Skeleton {
        /// Comma-separated header line
        header_line: String,

        /// Output spec file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    // stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            spec,
            config,
            format,
            strict,
            header_style,
            separator,
        } => {
            let file_config = match config {
                Some(path) => CliConfig::load(&path)?,
                None => CliConfig::default(),
            };
            let settings = file_config.resolve(CompileOverrides {
                spec,
                header_style,
                strict,
                separator,
                format,
            })?;
            commands::compile_spec::execute(settings)
        }

        Commands::Skeleton {
            header_line,
            output,
        } => commands::gen_skeleton::execute(header_line, output),
    }
}
