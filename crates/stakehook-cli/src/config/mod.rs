mod amount;
mod output;

pub use amount::Amount;
pub use output::{DisplayOptions, OutputFormat};

const DEFAULT_POOL_MANAGER: &str = "pool-manager";

/// Configuration.
///
/// Every field is optional so that a layer only overrides what it sets.
#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct Config {
    /// Output format.
    #[arg(long, short)]
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<OutputFormat>,
    /// Sender used to deliver every replayed event.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pool_manager: Option<String>,
    /// Balance credited to each funder before a replay.
    ///
    /// Defaults to exactly what the funder's initializations need.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    initial_balance: Option<Amount>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: Some(OutputFormat::default()),
            pool_manager: Some(DEFAULT_POOL_MANAGER.to_string()),
            initial_balance: None,
        }
    }
}

impl Config {
    /// Get the output format.
    pub fn output(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }

    /// Get the pool manager identity.
    pub fn pool_manager(&self) -> &str {
        self.pool_manager.as_deref().unwrap_or(DEFAULT_POOL_MANAGER)
    }

    /// Get the initial balance of funders, if configured.
    pub fn initial_balance(&self) -> Option<u128> {
        self.initial_balance.map(|amount| amount.get())
    }
}
