use crate::config::Settings;
use crate::error::AppError;
use crate::ledger::ActivityLedger;
use crate::report::{format_duration, format_share, ActivityReport};
use crate::storage::KeyValueStore;
use clap::{Parser, Subcommand};
use std::fmt::Write as _;

#[derive(Parser, Debug)]
#[command(
    name = "sitetime",
    version = env!("CARGO_PKG_VERSION"),
    about = "Active browsing time per website"
)]
pub struct Args {
    #[arg(short, long, action)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(about = "Show time spent per website")]
    Report {
        #[arg(long)]
        json: bool,

        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    #[command(about = "Erase all recorded website activity")]
    Reset {
        #[arg(long)]
        yes: bool,
    },

    #[command(about = "Print the database location")]
    Path,
}

/// Run `command` and return what to print.
///
/// `open_store` is only called by commands that touch the ledger.
pub async fn execute<S, F>(
    command: &Command,
    settings: &Settings,
    open_store: F,
) -> Result<String, AppError>
where
    S: KeyValueStore,
    F: FnOnce() -> Result<S, AppError>,
{
    match command {
        Command::Report { json, limit } => {
            let activity = ActivityLedger::new(open_store()?).load().await?;
            let mut report = ActivityReport::from_activity(&activity);
            if let Some(limit) = limit {
                report = report.truncate(*limit);
            }
            if *json {
                Ok(serde_json::to_string_pretty(&report)?)
            } else {
                Ok(render_report(&report))
            }
        }
        Command::Reset { yes } => {
            if !yes {
                return Err(AppError::InvalidInput {
                    field: "reset",
                    reason: "pass --yes to erase all recorded activity".into(),
                });
            }
            ActivityLedger::new(open_store()?).reset().await?;
            Ok("Website activity has been reset".into())
        }
        Command::Path => Ok(settings.db_path.display().to_string()),
    }
}

/// Plain-text table in the dashboard's layout.
pub fn render_report(report: &ActivityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Time: {}", format_duration(report.total_secs));
    let _ = writeln!(out, "Sites Visited: {}", report.site_count);

    if report.domains.is_empty() {
        out.push_str("No activity recorded yet\n");
        return out;
    }

    let width = report.domains.iter().map(|d| d.domain.len()).max().unwrap_or(0);
    out.push('\n');
    for stat in &report.domains {
        let _ = writeln!(
            out,
            "{:<width$}  {:>8}  {:>6}",
            stat.domain,
            format_duration(stat.duration_secs),
            format_share(stat.share_permille),
        );
    }
    out
}
