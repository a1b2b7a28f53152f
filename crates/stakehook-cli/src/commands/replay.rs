use std::{path::PathBuf, time::Duration};

use crate::{
    config::{DisplayOptions, OutputFormat},
    replay::replay,
    scenario::Scenario,
};

use super::{Command, Context};

/// Replay a scenario and print the resulting ledger.
#[derive(Debug, clap::Args)]
pub struct Replay {
    /// Path to the scenario file.
    scenario: PathBuf,
    /// Read the final state at this offset instead of at the last step.
    #[arg(long, value_parser = humantime::parse_duration)]
    until: Option<Duration>,
    /// Only print the final state.
    #[arg(long, short)]
    quiet: bool,
}

impl Command for Replay {
    fn execute(&self, ctx: Context<'_>) -> eyre::Result<()> {
        let config = ctx.config();
        let scenario = Scenario::load(&self.scenario)?;
        let report = replay(&scenario, config, self.until)?;
        tracing::debug!(steps = report.steps.len(), end = %report.end, "replayed");

        let output = config.output();
        match output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Table => {
                if !self.quiet {
                    println!("Steps");
                    println!(
                        "{}",
                        output.display_many(&report.steps, DisplayOptions::default())?
                    );
                }
                println!("Pools at {}", report.end);
                println!(
                    "{}",
                    output.display_many(
                        &report.pools,
                        DisplayOptions::table_projection([
                            ("pool", "pool"),
                            ("status", "status"),
                            ("program.token", "token"),
                            ("program.reward_rate", "rate"),
                            ("program.finish_at", "finish_at"),
                            ("program.total_staked", "staked"),
                            ("program.funded", "funded"),
                            ("program.claimed", "claimed"),
                            ("program.dust", "dust"),
                        ]),
                    )?
                );
                println!("Accounts at {}", report.end);
                println!(
                    "{}",
                    output.display_many(&report.accounts, DisplayOptions::default())?
                );
            }
        }
        Ok(())
    }
}
