//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for persona-sim.

use clap::{Args, Parser, Subcommand};

use persona_sim::persona::IdentityHints;

/// persona-sim - chat with a persona synthesized from public information
///
/// Researches a person from a name, profile links or free-form notes,
/// builds a redacted persona profile, and lets you talk to an LLM that
/// answers as that persona.
#[derive(Parser, Debug)]
#[command(name = "persona-sim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize a persona and start an interactive conversation
    Chat {
        #[command(flatten)]
        hints: HintArgs,

        /// Path to configuration file
        #[arg(short, long, env = "PERSONA_SIM_CONFIG")]
        config: Option<String>,
    },

    /// Synthesize a persona profile and print or save it
    Synthesize {
        #[command(flatten)]
        hints: HintArgs,

        /// Path to configuration file
        #[arg(short, long, env = "PERSONA_SIM_CONFIG")]
        config: Option<String>,

        /// Write the profile to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Identity hints; at least one is required
#[derive(Args, Debug, Clone, Default)]
pub struct HintArgs {
    /// Full name of the person
    #[arg(long)]
    pub name: Option<String>,

    /// LinkedIn profile URL
    #[arg(long, value_name = "URL")]
    pub linkedin: Option<String>,

    /// X (Twitter) profile URL
    #[arg(long = "x", value_name = "URL")]
    pub x_url: Option<String>,

    /// Additional context (role, employer, topics)
    #[arg(long, value_name = "TEXT")]
    pub info: Option<String>,
}

impl HintArgs {
    pub fn to_hints(&self) -> IdentityHints {
        IdentityHints {
            full_name: self.name.clone(),
            linkedin_url: self.linkedin.clone(),
            x_url: self.x_url.clone(),
            additional_info: self.info.clone(),
        }
        .normalized()
    }
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration (API key masked)
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
