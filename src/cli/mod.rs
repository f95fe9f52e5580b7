pub mod commands;
pub mod output;

use crate::config::{self, StackSettings};
use crate::errors::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stackpr")]
#[command(about = "stackpr - stacked branch management for Git")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default is .stackpr.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the .stackpr.yaml configuration file
    Init,

    /// Create a new stacked branch
    New {
        /// Branch name
        branch: String,
    },

    /// List branches in the stack
    List,

    /// Sync child branches with their parents
    Sync,

    /// Push all stacked branches
    Push {
        /// Force push branches
        #[arg(long)]
        force: bool,

        /// Echo remote and per-branch push parameters
        #[arg(long)]
        debug: bool,
    },

    /// Show the latest commit of each stacked branch
    Status,

    /// Merge a stacked branch into its parent
    Merge {
        /// Branch to merge
        branch: String,
    },

    /// Reorder branches in the stack
    Reorder {
        /// All current branches, in the new order
        #[arg(required = true)]
        branches: Vec<String>,
    },

    /// Remove a branch from the stack
    Remove {
        /// Branch to remove
        branch: String,
    },

    /// View or modify configuration
    Config {
        /// Configuration key (remote, base, branches, syncMode)
        key: String,
        /// Value to set; omit to view
        value: Option<String>,
    },

    /// Generate the autocompletion script for the specified shell
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        self.setup_logging();

        // Loaded once here, passed down; written back by the commands that
        // change state.
        let config_path = config::config_path(self.config.as_deref());
        let mut settings = StackSettings::load_from_file(&config_path)?;

        match self.command {
            Commands::Init => commands::init::run(&mut settings, &config_path),
            Commands::New { branch } => commands::new::run(&mut settings, &config_path, &branch),
            Commands::List => commands::list::run(&settings),
            Commands::Sync => commands::sync::run(&settings),
            Commands::Push { force, debug } => commands::push::run(&settings, force, debug),
            Commands::Status => commands::status::run(&settings),
            Commands::Merge { branch } => commands::merge::run(&settings, &branch),
            Commands::Reorder { branches } => {
                commands::reorder::run(&mut settings, &config_path, branches)
            }
            Commands::Remove { branch } => {
                commands::remove::run(&mut settings, &config_path, &branch)
            }
            Commands::Config { key, value } => {
                commands::config::run(&mut settings, &config_path, &key, value.as_deref())
            }
            Commands::Completion { shell } => commands::completion::run(shell),
        }
    }

    fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .without_time();

        if self.no_color {
            subscriber.with_ansi(false).init();
        } else {
            subscriber.init();
        }
    }
}
