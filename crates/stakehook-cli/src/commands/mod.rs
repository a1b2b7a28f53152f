use std::path::Path;

use enum_dispatch::enum_dispatch;
use init_config::InitConfig;
use inspect::Inspect;
use replay::Replay;

use crate::config::Config;

mod init_config;
mod inspect;
mod replay;

/// Commands.
#[enum_dispatch]
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Initialize config file.
    InitConfig(InitConfig),
    /// Replay a scenario and print the resulting ledger.
    Replay(Replay),
    /// Validate a scenario and print its steps.
    Inspect(Inspect),
}

#[enum_dispatch(Commands)]
pub(crate) trait Command {
    fn execute(&self, ctx: Context<'_>) -> eyre::Result<()>;
}

/// Execution context.
pub(crate) struct Context<'a> {
    config: &'a Config,
    config_path: &'a Path,
}

impl<'a> Context<'a> {
    pub(crate) fn new(config: &'a Config, config_path: &'a Path) -> Self {
        Self {
            config,
            config_path,
        }
    }

    pub(crate) fn config(&self) -> &Config {
        self.config
    }

    pub(crate) fn config_path(&self) -> &Path {
        self.config_path
    }
}
