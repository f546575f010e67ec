mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "grader-cli")]
#[command(about = "Grader CLI - Run code batches against the sandboxed grading engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch file against the grading engine
    Run {
        /// Path to a batch JSON file ({ "sourceCode": ..., "testCases": [...] })
        #[arg(short, long)]
        file: String,

        /// Deadline budget in milliseconds (defaults to GRADER_TIMEOUT_MS or 5000)
        #[arg(short, long)]
        timeout_ms: Option<u64>,
    },

    /// Write an example batch file
    Sample {
        /// Output path
        #[arg(short, long, default_value = "batch.json")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, timeout_ms } => commands::run_batch_file(&file, timeout_ms).await,
        Commands::Sample { path } => commands::write_sample(&path),
    }
}
