//! edubot - a terminal study assistant backed by a local Ollama server.
//!
//! Prompts typed at the terminal are forwarded to Ollama's generate
//! endpoint, optionally enriched with a syllabus document from the working
//! directory, and the streamed answer is printed once complete.

mod chat;
mod config;
mod error;
mod ollama;
mod syllabus;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "edubot")]
#[command(author, version, about = "A terminal study assistant backed by a local Ollama server")]
#[command(
    long_about = "Chat with a locally hosted model. Set OLLAMA_URL and MODEL_NAME to override \
                  the endpoint and model; drop a syllabus.json in the working directory to give \
                  the model course context."
)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    let config = Config::from_env();
    init_logging(&config)?;

    chat::run(&config).await
}

/// Route diagnostics to the append-mode log file, keeping stdout clean for
/// the conversation itself.
fn init_logging(config: &Config) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file: {}", config.log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("edubot=debug".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();

    Ok(())
}
