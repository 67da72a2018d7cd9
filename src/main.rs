//! persona-sim - persona synthesis and persona-grounded chat
//!
//! Entry point for the `persona-sim` binary. Validates the hints, drives a
//! `PersonaSession` and renders its output on the terminal.

mod cli;

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use persona_sim::config::{self, AppConfig};
use persona_sim::error::{Error, Result};
use persona_sim::llm::LlmGateway;
use persona_sim::logging::{self, LogGuards};
use persona_sim::persona::{IdentityHints, PersonaSynthesizer};
use persona_sim::session::PersonaSession;
use persona_sim::version;

use crate::cli::{Cli, Commands, HintArgs};

fn main() -> Result<()> {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    let (hints, config_path) = match &cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone());
        }
        Commands::Chat { hints, config } | Commands::Synthesize { hints, config, .. } => {
            (hints.clone(), config.clone())
        }
    };

    // Reject blank hints before anything touches the provider
    let hints = require_hints(&hints).unwrap_or_else(|e| exit_with(e));

    let config = AppConfig::load(config_path.as_deref()).unwrap_or_else(|e| exit_with(e));

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = init_logging_from_config(&config, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    info!(
        version = %build.full_version(),
        target = %build.target,
        "Starting persona-sim"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("persona-sim")
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

    let result = match cli.command {
        Commands::Chat { .. } => runtime.block_on(run_chat(&config, hints, cli.quiet)),
        Commands::Synthesize { output, .. } => {
            runtime.block_on(run_synthesize(&config, hints, output))
        }
        Commands::Version | Commands::Config { .. } => {
            // Already handled above
            Ok(())
        }
    };

    // A stdin read left pending by Ctrl-C would otherwise hold up shutdown
    runtime.shutdown_background();

    if let Err(e) = result {
        warn!(error = %e.format_for_log(), "Command failed");
        exit_with(e);
    }

    Ok(())
}

/// Print the error the way the terminal expects and exit with its code
fn exit_with(e: Error) -> ! {
    eprint!("{}", e.format_for_terminal());
    std::process::exit(e.exit_code());
}

fn require_hints(args: &HintArgs) -> Result<IdentityHints> {
    let hints = args.to_hints();
    if hints.is_empty() {
        return Err(Error::EmptyHints);
    }
    Ok(hints)
}

/// Initialize logging from configuration
fn init_logging_from_config(config: &AppConfig, verbose: u8, quiet: bool) -> Result<LogGuards> {
    logging::init_logging(&config.logging, verbose, quiet)
}

// ─────────────────────────────────────────────────────────────────
// Synthesize
// ─────────────────────────────────────────────────────────────────

async fn run_synthesize(
    config: &AppConfig,
    hints: IdentityHints,
    output: Option<String>,
) -> Result<()> {
    let gateway = Arc::new(LlmGateway::from_config(config));
    let synthesizer = PersonaSynthesizer::from_config(gateway, config)?;
    let persona = synthesizer.synthesize(&hints).await?;

    if persona.profile.is_empty() {
        eprintln!("The provider returned an empty profile.");
    }

    match output {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(&path).into_owned());
            fs::write(&path, persona.profile.as_str()).map_err(|source| Error::IoWrite {
                path: path.clone(),
                source,
            })?;
            println!("Profile written to {}", path.display());
        }
        None => println!("{}", persona.profile),
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────

async fn run_chat(config: &AppConfig, hints: IdentityHints, quiet: bool) -> Result<()> {
    let session = PersonaSession::from_config(config)?;

    if !quiet {
        eprintln!("Researching persona...");
    }
    let persona = session.create_persona(&hints).await?;
    if persona.profile.is_empty() {
        eprintln!("The provider returned an empty profile; replies will be ungrounded.");
    }

    let label = session.display_label();
    if !quiet {
        eprintln!("Talking with {}. Commands: /profile, /clear, /quit", label);
    }

    let mut interrupts = interrupt_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !quiet {
            print!("you> ");
            std::io::stdout().flush()?;
        }

        // Ctrl-C at the prompt ends the conversation
        let line = tokio::select! {
            line = lines.next_line() => line?,
            Some(()) = interrupts.recv() => {
                eprintln!();
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        let input = line.trim();
        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/profile" => {
                match session.profile() {
                    Some(profile) if !profile.is_empty() => {
                        println!("{}", profile.render_sections())
                    }
                    _ => println!("(empty profile)"),
                }
                continue;
            }
            "/clear" => {
                session.clear_history()?;
                println!("History cleared.");
                continue;
            }
            _ => {}
        }

        match send_turn(&session, input, &mut interrupts).await {
            Ok(reply) if reply.is_empty() => println!("{}> (no reply)", label),
            Ok(reply) => println!("{}> {}", label, reply),
            Err(Error::Cancelled) => eprintln!("Cancelled."),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    info!(turns = session.turns().len(), "Conversation ended");
    Ok(())
}

/// Forward every Ctrl-C into a channel.
///
/// Once a listener is installed the default SIGINT handling is gone for
/// good, so the REPL owns the signal from here on and no press is lost
/// between awaits.
fn interrupt_channel() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Send one turn; Ctrl-C cancels the pending reply instead of the process
async fn send_turn(
    session: &PersonaSession,
    input: &str,
    interrupts: &mut mpsc::UnboundedReceiver<()>,
) -> Result<String> {
    let (cancel_tx, cancel_rx) = oneshot::channel();
    let reply = session.chat_cancellable(input, cancel_rx);
    tokio::pin!(reply);

    tokio::select! {
        result = &mut reply => result,
        Some(()) = interrupts.recv() => {
            let _ = cancel_tx.send(());
            reply.await
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────

/// Handle configuration subcommands
fn handle_config_command(subcommand: cli::ConfigSubcommand) -> Result<()> {
    use cli::ConfigSubcommand;

    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = AppConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg.redacted())?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration written to {}", written.display());
        }
        ConfigSubcommand::Validate { config } => match AppConfig::load(config.as_deref()) {
            Ok(_) => {
                println!("Configuration is valid.");
            }
            Err(e) => exit_with(e),
        },
    }

    Ok(())
}
