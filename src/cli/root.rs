use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use dialogkit::config::Config;
use dialogkit::tui::{
    self,
    components::dialogs::{DialogManager, OverlayOptions},
    App,
};

/// Show a dialog in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "dialogkit",
    version,
    about = "Show a dialog in the terminal",
    long_about = r#"Shows a single dialog and exits once it has been dismissed.

Examples:
  dialogkit "Saved"                        # message only
  dialogkit "Notice" "Build finished"      # title and message
  dialogkit --modal --closable "Are you sure?"
  dialogkit --effect fade --hide-after 2000 "Bye""#
)]
pub struct Cli {
    /// `[MESSAGE]` or `[TITLE] [MESSAGE]`
    #[arg(num_args = 0..=2)]
    pub args: Vec<String>,

    /// Use exclusive presentation
    #[arg(short = 'm', long)]
    pub modal: bool,

    /// Put a click-to-dismiss backdrop behind the dialog
    #[arg(short = 'o', long)]
    pub overlay: bool,

    /// Put a backdrop behind the dialog that does not dismiss it
    #[arg(long, conflicts_with = "overlay")]
    pub sticky_overlay: bool,

    /// Show the close affordance
    #[arg(short = 'c', long)]
    pub closable: bool,

    /// Transition effect name, overrides the configured default
    #[arg(short = 'e', long)]
    pub effect: Option<String>,

    /// Do not dismiss on Esc
    #[arg(long)]
    pub no_escape: bool,

    /// Hide the dialog after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub hide_after: Option<u64>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Write logs to this file. While a dialog is on screen logs default to
    /// the cache directory, otherwise to stderr.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the effective configuration as JSON
    Config,
}

impl Cli {
    /// Where logs go. `None` means stderr, which would draw over the
    /// alternate screen while the dialog is up.
    pub fn log_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.log_file {
            return Some(path.clone());
        }
        if self.command.is_some() || self.args.is_empty() {
            return None;
        }
        dirs::cache_dir().map(|dir| dir.join("dialogkit").join("dialogkit.log"))
    }

    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        let config = Config::init().await?;
        debug!(?config, "Configuration initialized");

        match self.command {
            Some(Commands::Config) => {
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
            None => self.start_interactive_mode(&config).await,
        }
    }

    /// Build the dialog described by the arguments. Returns `None` when no
    /// message was given.
    pub fn build_manager(&self, config: &Config) -> Option<DialogManager> {
        let mut manager = DialogManager::from_config(config);
        if self.effect.is_some() {
            manager.set_default_effect(self.effect.clone());
        }

        let id = manager.from_args(&self.args)?;
        let dialog = manager.get_mut(&id)?;
        if self.modal {
            dialog.modal();
        }
        if self.overlay || self.sticky_overlay {
            dialog.overlay(OverlayOptions::default().closable(!self.sticky_overlay));
        }
        if self.closable {
            dialog.closable();
        }
        dialog.escapable(!self.no_escape).show();
        if let Some(ms) = self.hide_after {
            dialog.hide_after(Duration::from_millis(ms));
        }
        Some(manager)
    }

    async fn start_interactive_mode(&self, config: &Config) -> Result<()> {
        let Some(manager) = self.build_manager(config) else {
            info!("No message given, nothing to show");
            return Ok(());
        };

        info!("Starting interactive mode");
        tui::run(
            App::new(manager),
            Duration::from_millis(config.tick_rate_ms),
            config.mouse,
        )
        .await?;

        info!("Application finished");
        Ok(())
    }
}
