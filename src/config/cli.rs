use crate::config::toml_config::{TomlConfig, MAX_TIMEOUT_SECONDS};
use crate::core::sequencer::PersistenceMode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, Parser)]
#[command(name = "board-reorder")]
#[command(about = "Reorder cards on a board through its REST API")]
pub struct CliConfig {
    /// Base URL of the board API
    #[arg(long, env = "BOARD_API_URL")]
    pub api_url: Option<String>,

    #[arg(long)]
    pub board_id: Option<u64>,

    /// Bearer token sent with every request
    #[arg(long, env = "BOARD_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub mode: Option<PersistenceMode>,

    /// Patch the local snapshot before the refetch arrives
    #[arg(long)]
    pub optimistic: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the board's lists and cards
    Show,
    /// Print the update plan for a move without sending it
    Plan(MoveArgs),
    /// Move a card and persist the new positions
    Move(MoveArgs),
}

#[derive(Debug, Clone, clap::Args)]
pub struct MoveArgs {
    /// Card to move
    #[arg(long)]
    pub card: u64,

    /// Destination list
    #[arg(long)]
    pub list: u64,

    /// Drop slot in the destination list, 0..=len
    #[arg(long)]
    pub position: u32,
}

impl CliConfig {
    /// Fills every value not given on the command line from the file.
    pub fn merge_file(&mut self, file: &TomlConfig) {
        if self.api_url.is_none() {
            self.api_url = Some(file.api.base_url.clone());
        }
        if self.board_id.is_none() {
            self.board_id = file.board_id();
        }
        if self.token.is_none() {
            self.token = file.api.auth_token.clone();
        }
        if self.timeout_seconds.is_none() {
            self.timeout_seconds = file.api.timeout_seconds;
        }
        if self.mode.is_none() {
            self.mode = Some(file.persistence_mode());
        }
        self.optimistic |= file.optimistic();
        self.verbose |= file.verbose();
        self.json_logs |= file.json_logs();
    }

    pub fn persistence_mode(&self) -> PersistenceMode {
        self.mode.unwrap_or_default()
    }
}

impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    fn board_id(&self) -> Option<u64> {
        self.board_id
    }

    fn auth_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_url", self.api_base_url())?;
        validation::validate_required_field("board_id", &self.board_id)?;

        if let Some(token) = &self.token {
            validation::validate_non_empty_string("token", token)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        Ok(())
    }
}
