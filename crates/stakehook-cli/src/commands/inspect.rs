use std::path::PathBuf;

use crate::{config::DisplayOptions, scenario::Scenario};

use super::{Command, Context};

/// Validate a scenario and print its steps.
#[derive(Debug, clap::Args)]
pub struct Inspect {
    /// Path to the scenario file.
    scenario: PathBuf,
}

#[derive(serde::Serialize)]
struct Row<'a> {
    at: String,
    sender: &'a str,
    event: &'static str,
    pool: &'a str,
    account: &'a str,
    details: String,
}

impl Command for Inspect {
    fn execute(&self, ctx: Context<'_>) -> eyre::Result<()> {
        let config = ctx.config();
        let scenario = Scenario::load(&self.scenario)?;
        let rows = scenario.steps().iter().map(|step| {
            let action = step.action();
            Row {
                at: humantime::format_duration(step.at()).to_string(),
                sender: step.sender().unwrap_or(config.pool_manager()),
                event: action.name(),
                pool: action.pool(),
                account: action.account().unwrap_or_default(),
                details: action.to_string(),
            }
        });
        println!(
            "{}",
            config.output().display_many(rows, DisplayOptions::default())?
        );
        Ok(())
    }
}
