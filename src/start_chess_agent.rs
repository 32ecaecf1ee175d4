//! Startup helpers for the chess agent binaries.
//!
//! Both entry points load configuration from the environment (and `.env`),
//! refuse to start without `GROQ_API_KEY`, and own their tokio runtime.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::chat::core::config::{AgentConfig, api_key_from_env};
use crate::chat::core::errors::AgentResult;
use crate::chat::orchestrator::ResponseOrchestrator;
use crate::llm::GroqChatModel;
use crate::repl::{self, InputSource};
use crate::server::{self, AppState};

const DEFAULT_LOG_FILTER: &str = "info";

fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_tracing() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(io::stderr)
        .try_init();
}

fn load_config() -> AgentResult<AgentConfig> {
    let config = AgentConfig::from_env();
    config.validate()?;
    tracing::info!(
        "Model: {} (temperature {}, max tokens {}, window {})",
        config.llm.model,
        config.llm.temperature,
        config.llm.max_tokens,
        config.session.window
    );
    Ok(config)
}

fn build_runtime() -> Option<tokio::runtime::Runtime> {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => Some(rt),
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Run the HTTP server (used by the `chess-agent-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run_server() -> ExitCode {
    init_tracing();
    tracing::info!("Starting Chess Q&A Agent server v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let state = match AppState::new(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to create state: {e}");
            return ExitCode::from(1);
        }
    };

    let Some(rt) = build_runtime() else {
        return ExitCode::from(1);
    };

    if let Err(e) = rt.block_on(server::run_server_with_shutdown(
        state,
        config.server.port,
        shutdown_signal(),
    )) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Run the interactive terminal chat (used by the `chess-agent` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` when the user quits, `1` on failure.
#[must_use]
pub fn run_repl() -> ExitCode {
    init_tracing();

    let orchestrator = match build_orchestrator() {
        Ok(o) => o,
        Err(e) => {
            tracing::error!("Failed to start chat: {e}");
            return ExitCode::from(1);
        }
    };

    let Some(rt) = build_runtime() else {
        return ExitCode::from(1);
    };

    let mut input = match InputSource::new() {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("Failed to open terminal: {e}");
            return ExitCode::from(1);
        }
    };

    let mut session = orchestrator.new_session();
    let mut stdout = io::stdout();

    if let Err(e) = rt.block_on(repl::run_repl(&orchestrator, &mut session, &mut input, &mut stdout)) {
        tracing::error!("Chat error: {e:#}");
        return ExitCode::from(1);
    }

    tracing::info!(
        "Session ended after {} questions",
        session.question_count()
    );
    ExitCode::SUCCESS
}

fn build_orchestrator() -> AgentResult<ResponseOrchestrator> {
    let config = load_config()?;
    let api_key = api_key_from_env()?;
    let model = GroqChatModel::new(&config.llm, &api_key)?;
    ResponseOrchestrator::new(Arc::new(model), &config)
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn test_rust_log_level_is_respected() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_default_log_level_is_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("chess=loud")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
