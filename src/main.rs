//! # Style Editor CLI (`sted`)
//!
//! The `sted` binary learns an author's editing style from pairs of
//! chapters (as drafted, as edited) and keeps it in a JSON style profile.
//!
//! ## Usage
//!
//! ```bash
//! sted --config ./config/sted.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sted learn <original> <edited>` | Extract style rules from an edit and merge them into the profile |
//! | `sted diff <original> <edited>` | Show changed paragraphs without classifying |
//! | `sted profile` | Print the accumulated style profile |
//! | `sted reset` | Delete the style profile |
//! | `sted history` | List archived learn sessions |
//!
//! ## Examples
//!
//! ```bash
//! # Learn from a chapter and keep a copy of both versions
//! sted learn drafts/ch3.md final/ch3.md --archive
//!
//! # Preview what would be sent to the classifier
//! sted diff drafts/ch4.md final/ch4.md --json
//!
//! # Inspect the profile with debug logging
//! sted --verbose profile
//! ```

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use style_editor::{config, history, learn, report, store};

/// Style Editor: learn an author's editing style from their own edits.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/sted.example.toml` for a full example; a missing file
/// means built-in defaults.
#[derive(Parser)]
#[command(
    name = "sted",
    about = "Style Editor: learn an author's editing style from before/after chapter pairs",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/sted.toml`. Profile location, matching
    /// threshold, classifier and history settings are read from this file.
    #[arg(long, global = true, default_value = "./config/sted.toml")]
    config: PathBuf,

    /// Enable debug logging on stderr (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Learn style rules from an original/edited pair.
    ///
    /// Aligns the two documents paragraph by paragraph, sends the changed
    /// paragraphs to the classifier and merges the returned patterns into
    /// the style profile.
    Learn {
        /// The chapter as originally drafted.
        original: PathBuf,

        /// The same chapter after editing.
        edited: PathBuf,

        /// Copy both inputs into a timestamped session under `history.dir`.
        #[arg(long)]
        archive: bool,

        /// Classify and merge in memory, but do not save the profile.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the changed paragraphs between two documents.
    ///
    /// Runs alignment only: no classifier call, no profile access.
    Diff {
        original: PathBuf,
        edited: PathBuf,

        /// Print the edit records as a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Print the style profile.
    Profile {
        /// Print the raw profile JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete the style profile and start fresh.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// List archived learn sessions, newest first.
    History,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,style_editor=debug,sted=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N]: ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config;
    let load_config = || -> anyhow::Result<config::Config> {
        let cfg = config::load_or_default(&config_path)?;
        tracing::debug!(
            profile = %cfg.profile.path.display(),
            provider = %cfg.classifier.provider,
            "config loaded"
        );
        Ok(cfg)
    };

    match cli.command {
        Commands::Learn {
            original,
            edited,
            archive,
            dry_run,
        } => {
            let cfg = load_config()?;
            learn::run_learn(&cfg, &original, &edited, archive, dry_run).await?;
        }
        // Diff needs neither config nor profile
        Commands::Diff {
            original,
            edited,
            json,
        } => {
            report::run_diff(&original, &edited, json)?;
        }
        Commands::Profile { json } => {
            report::run_profile(&load_config()?, json)?;
        }
        Commands::Reset { yes } => {
            let cfg = load_config()?;
            if !yes && !confirm("Delete the style profile and start fresh?")? {
                println!("Aborted!");
                std::process::exit(1);
            }
            if store::reset_profile(&cfg.profile.path)? {
                println!("Profile reset.");
            } else {
                println!("No profile found, nothing to reset.");
            }
        }
        Commands::History => {
            history::run_history(&load_config()?.history.dir)?;
        }
    }

    Ok(())
}
