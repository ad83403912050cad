//! Command-line interface parsing and handling
//!
//! This module parses arguments, dispatches the read-only and maintenance
//! flags, and runs the streaming exchange that is the default action.

pub mod init;

use chrono::Utc;
use clap::{CommandFactory, Parser};
use std::error::Error;
use tracing_subscriber::EnvFilter;

use crate::api::stream::ChatStream;
use crate::api::{to_api_messages, ChatRequest};
use crate::core::chat_stream::accumulate;
use crate::core::config::{default_config_path, Config};
use crate::core::constants::{DEFAULT_BASE_URL, MAX_COMPLETION_TOKENS, TEMPERATURE};
use crate::core::models;
use crate::utils::color::role_label;
use crate::utils::input::join_prompt_words;

#[derive(Parser)]
#[command(name = "explain")]
#[command(about = "Ask a question from your terminal and keep the conversation going")]
#[command(
    long_about = "Explain is a terminal chat client that persists one running conversation \
across invocations. Responses stream to the terminal as they arrive and the \
completed exchange is written back to ~/.explain.json.\n\n\
Conversations untouched for more than 24 hours are discarded and restarted \
from the default persona.\n\n\
Example usage: `$ explain what is the meaning of life`"
)]
pub struct Args {
    /// Clear the conversation history
    #[arg(long)]
    pub clear: bool,

    /// Change the model used for the conversation
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Initialize the configuration file
    #[arg(long)]
    pub init: bool,

    /// Show the current configuration
    #[arg(long)]
    pub config: bool,

    /// Show the current conversation
    #[arg(long)]
    pub conversation: bool,

    /// The prompt to send
    #[arg(trailing_var_arg = true)]
    pub prompt: Vec<String>,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("EXPLAIN_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config_path = default_config_path()?;

    if args.init {
        return init::run_init(&config_path);
    }

    let mut config = match Config::load_from_path(&config_path) {
        Ok(config) => config,
        Err(err) if err.is_not_found() => {
            eprintln!("Failed to read the configuration file: {err}");
            eprintln!("Please run `explain --init` to create a new configuration file");
            std::process::exit(1);
        }
        // Corrupt state never falls back to defaults; fail loudly.
        Err(err) => return Err(err.into()),
    };

    if args.clear {
        config.clear_conversation(Utc::now());
        config.save_to_path(&config_path)?;
        println!("Conversation cleared");
        return Ok(());
    }

    if let Some(identifier) = args.model.as_deref() {
        match models::validate(identifier) {
            Ok(model) => {
                config.model = model.to_string();
                config.save_to_path(&config_path)?;
                println!("Model set to {model}");
            }
            Err(err) => {
                eprintln!(
                    "Invalid model {:?}, please provide one of the following:\n{}",
                    err.requested,
                    models::format_model_list()
                );
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    if args.config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if args.conversation {
        for msg in &config.conversation {
            println!("{}", role_label(msg.role));
            println!("{}\n", msg.content);
        }
        return Ok(());
    }

    run_exchange(&args.prompt, config, &config_path).await
}

/// The default action: append a user turn, stream the reply to stdout, and
/// persist the completed exchange.
async fn run_exchange(
    prompt_words: &[String],
    mut config: Config,
    config_path: &std::path::Path,
) -> Result<(), Box<dyn Error>> {
    // Reject an empty prompt before any state mutation or network call.
    let Some(prompt) = join_prompt_words(prompt_words) else {
        eprintln!("Please provide a prompt\n");
        Args::command().print_help()?;
        std::process::exit(1);
    };

    let now = Utc::now();
    if config.ensure_seeded(now) {
        println!(
            "system: {}",
            crate::core::constants::DEFAULT_SYSTEM_PROMPT
        );
    }

    config.append_user(&prompt)?;

    let request = ChatRequest {
        model: config.effective_model().to_string(),
        messages: to_api_messages(&config.conversation),
        max_tokens: MAX_COMPLETION_TOKENS,
        temperature: TEMPERATURE,
        stream: true,
    };

    let client = reqwest::Client::new();
    let mut stream =
        ChatStream::open(&client, DEFAULT_BASE_URL, &config.openai_api_key, &request).await?;

    // A stream failure propagates from here before any save: the fragments
    // already printed stay on screen, but no assistant turn is committed.
    let reply = {
        let stdout = std::io::stdout();
        let mut sink = stdout.lock();
        accumulate(&mut stream, &mut sink).await?
    };
    println!();

    config.append_assistant(reply);
    config.touch(Utc::now());
    config.save_to_path(config_path)?;
    Ok(())
}
