//! Redraft CLI
//!
//! Main entry point for the redraft command-line tool: rewrite a source
//! file from natural-language instructions, locally or inside a remote
//! repository (opening a pull request in the remote case).

mod app;

use clap::Parser;
use std::path::PathBuf;

/// Rewrite a source file from natural-language instructions
#[derive(Parser, Debug)]
#[command(name = "redraft")]
#[command(about = "Rewrite a source file from natural-language instructions", long_about = None)]
#[command(version)]
struct Cli {
    /// File reference: a local path, `owner/repo/branch:path`, or a
    /// `https://host/owner/repo/blob/branch/path` URL
    reference: String,

    /// Natural-language description of the change to make
    instructions: String,

    /// Path to config file
    #[arg(short, long, env = "REDRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// Change-engine provider (openai, ollama)
    #[arg(short, long, env = "REDRAFT_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, env = "REDRAFT_MODEL")]
    model: Option<String>,

    /// Custom provider endpoint
    #[arg(long, env = "REDRAFT_ENDPOINT")]
    endpoint: Option<String>,

    /// Maximum lines per rewrite segment
    #[arg(long, env = "REDRAFT_MAX_LINES")]
    max_lines: Option<usize>,

    /// Sampling temperature for rewrite requests
    #[arg(long)]
    temperature: Option<f32>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Warn when segment line counts drift after the rewrite
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() {
    // A fixed exit code of 1 covers usage errors too, so clap's default
    // exit status is not used.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    };

    if let Err(err) = app::run(cli).await {
        tracing::error!("Invocation failed: {}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
