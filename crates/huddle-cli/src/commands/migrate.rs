//! `huddle migrate` - bulk re-ingestion of historical messages and bios.

use super::{context, load_config};
use clap::Args;
use huddle_pipeline::MigrateOptions;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Args)]
pub struct MigrateArgs {
    /// Delete every record in the agent index before re-ingesting.
    /// Irreversible.
    #[arg(long)]
    pub purge_agent_index: bool,
}

pub async fn run(config_path: Option<&Path>, args: MigrateArgs) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let ctx = context::build(&config)?;

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping after in-flight items");
            ctrl_c_cancel.cancel();
        }
    });

    let report = ctx
        .migrate_all(MigrateOptions {
            purge_agent_index: args.purge_agent_index,
            cancel,
        })
        .await?;

    println!("Migration finished{}", if report.cancelled { " (cancelled)" } else { "" });
    println!("  processed: {}", report.total_processed);
    println!("  messages:  {}", report.total_messages);
    println!("  bios:      {}", report.total_bios);
    println!("  users:     {}", report.total_users);
    println!("  errors:    {}", report.errors.len());
    for error in &report.errors {
        println!("    {}", error);
    }

    if report.errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} item(s) failed; re-run to retry them", report.errors.len())
    }
}
