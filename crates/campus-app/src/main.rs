//! Campus assistant binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Build the catalog store (seed data or dataset file)
//! 3. Build the intent oracle (Gemini, or an always-failing stand-in
//!    when no API key is configured)
//! 4. Wire both into the chat orchestrator
//! 5. Serve the HTTP API, or run an interactive chat in the terminal

mod cli;
mod render;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

use campus_api::{routes, AppState};
use campus_catalog::InMemoryCatalog;
use campus_chat::{ChatOrchestrator, GeminiOracle, IntentOracle, TurnStatus, UnconfiguredOracle};
use campus_core::config::CampusConfig;

use cli::{CliArgs, Mode};

/// Pick the oracle implementation for this configuration.
fn build_oracle(config: &CampusConfig) -> Arc<dyn IntentOracle> {
    match GeminiOracle::from_config(&config.oracle) {
        Ok(oracle) => {
            tracing::info!(model = %oracle.model(), "Gemini oracle ready");
            Arc::new(oracle)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Oracle unavailable; set GEMINI_API_KEY or oracle.api_key. Every turn will get the apology reply"
            );
            Arc::new(UnconfiguredOracle)
        }
    }
}

/// Interactive terminal chat over a single conversation.
///
/// `/reset` starts over, `/context` shows what the assistant remembers and
/// `/quit` (or end of input) exits.
async fn run_chat(orchestrator: Arc<ChatOrchestrator>) -> Result<(), Box<dyn std::error::Error>> {
    let id: Uuid = orchestrator.start_conversation()?;
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for turn in orchestrator.transcript(id)? {
        stdout
            .write_all(format!("{}\n", render::render_turn(&turn)).as_bytes())
            .await?;
    }

    loop {
        stdout.write_all(b"you> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match line.trim() {
            "/quit" | "/exit" => break,
            "/reset" => {
                orchestrator.reset(id)?;
                orchestrator
                    .transcript(id)?
                    .iter()
                    .map(render::render_turn)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            "/context" => render::render_context(&orchestrator.context(id)?),
            _ => match orchestrator.handle_message(id, &line).await {
                Ok(outcome) => {
                    if outcome.status == TurnStatus::OracleFailed {
                        tracing::debug!(conversation_id = %id, "Turn answered with apology");
                    }
                    render::render_turn(&outcome.reply)
                }
                Err(campus_chat::ChatError::EmptyMessage) => continue,
                Err(e) => format!("error: {}", e),
            },
        };

        stdout.write_all(format!("{}\n", output).as_bytes()).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = CampusConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    config.general.log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing. RUST_LOG wins over the configured level. Logs go to stderr so
    // they do not interleave with the terminal chat.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting campus assistant v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Catalog.
    let catalog = Arc::new(InMemoryCatalog::from_config(&config.catalog)?);
    tracing::info!(
        courses = catalog.all_courses().len(),
        materials = catalog.all_materials().len(),
        past_questions = catalog.all_past_questions().len(),
        "Catalog loaded"
    );

    // Orchestrator.
    let oracle = build_oracle(&config);
    let orchestrator = Arc::new(ChatOrchestrator::new(
        oracle,
        catalog.clone(),
        config.chat.clone(),
    ));

    match args.mode() {
        Mode::Chat => run_chat(orchestrator).await,
        Mode::Serve => {
            let state = AppState::new(config.clone(), orchestrator, catalog);
            if let Err(e) = routes::start_server(&config, state).await {
                tracing::error!(error = %e, "API server stopped");
                tracing::error!(
                    "Try: CAMPUS_PORT={} campus serve",
                    config.general.port.saturating_add(1)
                );
                return Err(e.into());
            }
            Ok(())
        }
    }
}
