//! quizdeck CLI: play exam question banks from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizdeck", version, about = "Quiz player for exam question banks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the manifest and question files come from.
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source name from the config (default: `default_source`)
    #[arg(long)]
    source: Option<String>,

    /// Manifest reference (default: config `manifest`)
    #[arg(long)]
    manifest: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and a sample data set
    Init,

    /// List subjects and rounds from the manifest
    Catalog {
        /// Only show this subject
        #[arg(long)]
        subject: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Parse every registered file and report data problems
    Validate {
        /// Only check this subject
        #[arg(long)]
        subject: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Play a quiz session and write the wrong-answer note
    Play {
        /// Subject to play
        #[arg(long)]
        subject: String,

        /// Round to play
        #[arg(long, conflicts_with = "all_rounds", required_unless_present = "all_rounds")]
        round: Option<String>,

        /// Pool every round of the subject
        #[arg(long)]
        all_rounds: bool,

        /// Number of questions (default: config `default_count`)
        #[arg(long)]
        count: Option<usize>,

        /// Seed for question sampling
        #[arg(long)]
        seed: Option<u64>,

        /// TOML file mapping question codes to answers (non-interactive)
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Output format: text, json, html, all (comma-separated)
        #[arg(long, default_value = "text")]
        format: String,

        /// Output directory (default: config `output_dir`)
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Re-render a saved JSON grade report
    Report {
        /// Grade report JSON
        #[arg(long)]
        input: PathBuf,

        /// Output format: text, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizdeck=info,warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Catalog { subject, source } => commands::catalog::execute(subject, source).await,
        Commands::Validate { subject, source } => {
            commands::validate::execute(subject, source).await
        }
        Commands::Play {
            subject,
            round,
            all_rounds,
            count,
            seed,
            answers,
            format,
            output,
            source,
        } => {
            commands::play::execute(commands::play::PlayOptions {
                subject,
                round: if all_rounds { None } else { round },
                count,
                seed,
                answers,
                format,
                output,
                source,
            })
            .await
        }
        Commands::Report {
            input,
            format,
            output,
        } => commands::report::execute(input, format, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
