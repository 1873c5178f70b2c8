//! End-to-end invocation: resolve the reference, rewrite the file, write
//! the result, and publish remote changes.
//!
//! The file is only overwritten after a complete replacement body was
//! obtained; any failure before that leaves the original untouched.

use std::path::Path;

use redraft_chunk::{ChunkConfig, Document};
use redraft_core::{config::AppConfig, logging, AppError, AppResult};
use redraft_engine::{create_engine, RewriteOptions, RewriteOrchestrator};
use redraft_remote::{resolve_local, GitHubHost, RemoteHost, SourceRef};

use crate::Cli;

/// Run a full invocation.
pub async fn run(cli: Cli) -> AppResult<()> {
    // Load base configuration and apply CLI overrides
    let config = AppConfig::load()?.with_overrides(
        cli.config.clone(),
        cli.provider.clone(),
        cli.model.clone(),
        cli.endpoint.clone(),
        cli.max_lines,
        cli.temperature,
        cli.log_level.clone(),
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration; the guard keeps the
    // file appender alive until the invocation ends.
    let _guard = logging::init_logging(
        config.log_level.as_deref(),
        config.no_color,
        Some(&config.log_dir),
    )?;

    tracing::info!("Redraft starting");
    tracing::debug!("Provider: {}, model: {}", config.provider, config.model);

    // Missing credentials are fatal before any file is read or cloned
    config.validate()?;

    let source = SourceRef::classify(&cli.reference)?;

    let orchestrator = build_orchestrator(&config, cli.check)?;

    match source {
        SourceRef::Local(path) => {
            let path = resolve_local(&path)?;
            tracing::info!("Rewriting local file {}", path.display());

            rewrite_file(&orchestrator, &path, &cli.instructions).await?;

            println!("updated {}", path.display());
        }
        SourceRef::Remote(remote) => {
            let token = config.require_github_token()?;
            let host = GitHubHost::new(token);

            let checkout = host.acquire(&remote).await?;
            let path = checkout.file_path();
            if !path.exists() {
                return Err(AppError::Usage(format!(
                    "file not found in {}/{}@{}: {}",
                    remote.owner, remote.repo, remote.branch, remote.path
                )));
            }

            tracing::info!("Rewriting remote file {}", remote.path);

            rewrite_file(&orchestrator, &path, &cli.instructions).await?;

            let url = host
                .publish(&checkout, Path::new(&remote.path), &cli.instructions)
                .await?;

            println!("{}", url);
        }
    }

    tracing::info!("Redraft finished");

    Ok(())
}

/// Build the orchestrator from configuration.
fn build_orchestrator(config: &AppConfig, check: bool) -> AppResult<RewriteOrchestrator> {
    let engine = create_engine(
        &config.provider,
        config.endpoint.as_deref(),
        config.api_key.as_deref(),
    )?;

    let options = RewriteOptions {
        model: config.model.clone(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        chunk: ChunkConfig {
            max_lines: config.max_lines,
            ..ChunkConfig::default()
        },
        verify_merge: check,
    };

    Ok(RewriteOrchestrator::new(engine, options))
}

/// Read, rewrite, and overwrite one file.
///
/// The write happens only after the orchestrator returned a complete
/// replacement body.
async fn rewrite_file(
    orchestrator: &RewriteOrchestrator,
    path: &Path,
    instructions: &str,
) -> AppResult<()> {
    let original = std::fs::read_to_string(path)?;
    let document = Document::parse(&original);

    let rewritten = orchestrator.rewrite(&document, instructions).await?;

    std::fs::write(path, rewritten.render())?;

    tracing::info!("Wrote {} lines to {}", rewritten.line_count(), path.display());

    Ok(())
}
