//! Bulk migration: re-ingest every historical message and bio.
//!
//! Used to backfill the vector indexes or repair metadata after a schema
//! change. Traversal is decoupled from per-item ingestion: the job first
//! walks workspaces → channels → messages (and threads, and users → bios)
//! into a flat item list, then consumes it with bounded concurrency so a
//! full re-run does not storm the embedding API's rate limits.
//!
//! Safe to re-run at any time: record ids make re-ingestion overwrite
//! in place rather than duplicate.

use crate::{PipelineContext, Result};
use futures::stream::{self, StreamExt};
use huddle_core::{Message, UserProfile};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Options for a migration run.
#[derive(Debug, Default, Clone)]
pub struct MigrateOptions {
    /// Delete every record in the agent index before re-ingesting, so no
    /// stale records from deleted messages linger. Irreversible; always
    /// opt-in.
    pub purge_agent_index: bool,

    /// Checked between items; a cancelled token stops the job after the
    /// in-flight items finish.
    pub cancel: CancellationToken,
}

/// Summary of a migration run.
#[derive(Debug, Default, Clone)]
pub struct MigrationReport {
    /// Messages and bios actually embedded and upserted.
    pub total_processed: usize,

    /// Users enumerated.
    pub total_users: usize,

    /// Messages embedded (top-level and thread messages).
    pub total_messages: usize,

    /// Bios embedded.
    pub total_bios: usize,

    /// Per-item failures, as `<id>: <error>` strings. The job never aborts
    /// on the first error.
    pub errors: Vec<String>,

    /// Whether the run stopped early due to cancellation.
    pub cancelled: bool,
}

/// One unit of migration work.
enum MigrationItem {
    Message(Message),
    Bio(UserProfile),
}

impl MigrationItem {
    fn id(&self) -> String {
        match self {
            Self::Message(message) => message.id.to_string(),
            Self::Bio(profile) => format!("bio-{}", profile.user_id),
        }
    }
}

enum ItemOutcome {
    Message,
    Bio,
    Skipped,
    Failed(String),
    Cancelled,
}

impl PipelineContext {
    /// Re-ingest all historical messages and bios.
    pub async fn migrate_all(&self, options: MigrateOptions) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        if options.purge_agent_index {
            warn!("purging agent index before migration (irreversible)");
            self.agent_index.delete_all().await?;
        }

        let items = self.collect_items(&mut report).await?;
        info!(
            items = items.len(),
            concurrency = self.migration_concurrency,
            "starting bulk migration"
        );

        let outcomes: Vec<ItemOutcome> = stream::iter(items)
            .map(|item| {
                let cancel = options.cancel.clone();
                async move {
                    if cancel.is_cancelled() {
                        return ItemOutcome::Cancelled;
                    }
                    self.process_item(item).await
                }
            })
            .buffer_unordered(self.migration_concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                ItemOutcome::Message => {
                    report.total_messages += 1;
                    report.total_processed += 1;
                }
                ItemOutcome::Bio => {
                    report.total_bios += 1;
                    report.total_processed += 1;
                }
                ItemOutcome::Skipped => {}
                ItemOutcome::Failed(error) => report.errors.push(error),
                ItemOutcome::Cancelled => report.cancelled = true,
            }
        }

        info!(
            processed = report.total_processed,
            messages = report.total_messages,
            bios = report.total_bios,
            errors = report.errors.len(),
            cancelled = report.cancelled,
            "bulk migration finished"
        );
        Ok(report)
    }

    async fn process_item(&self, item: MigrationItem) -> ItemOutcome {
        let id = item.id();
        let result = match &item {
            MigrationItem::Message(message) => {
                self.ingest_message(message).await.map(|embedded| {
                    if embedded {
                        ItemOutcome::Message
                    } else {
                        ItemOutcome::Skipped
                    }
                })
            }
            MigrationItem::Bio(profile) => self.ingest_bio(profile).await.map(|embedded| {
                if embedded {
                    ItemOutcome::Bio
                } else {
                    ItemOutcome::Skipped
                }
            }),
        };

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(id = %id, error = %err, "migration item failed, continuing");
                ItemOutcome::Failed(format!("{}: {}", id, err))
            }
        }
    }

    /// Walk the whole chat tree into a flat work list.
    ///
    /// Listing failures below the workspace level are recorded in the
    /// report and skip only the affected subtree.
    async fn collect_items(&self, report: &mut MigrationReport) -> Result<Vec<MigrationItem>> {
        let mut items = Vec::new();

        for workspace in self.messages.list_workspaces().await? {
            let channels = match self.messages.list_channels(&workspace).await {
                Ok(channels) => channels,
                Err(err) => {
                    report
                        .errors
                        .push(format!("workspace {}: {}", workspace, err));
                    continue;
                }
            };

            for channel in channels {
                match self.messages.list_messages(&workspace, &channel).await {
                    Ok(messages) => {
                        items.extend(messages.into_iter().map(MigrationItem::Message))
                    }
                    Err(err) => report
                        .errors
                        .push(format!("channel {}/{}: {}", workspace, channel, err)),
                }

                let threads = match self.messages.list_threads(&workspace, &channel).await {
                    Ok(threads) => threads,
                    Err(err) => {
                        report
                            .errors
                            .push(format!("channel {}/{}: {}", workspace, channel, err));
                        continue;
                    }
                };

                for thread in threads {
                    match self
                        .messages
                        .list_thread_messages(&workspace, &channel, &thread)
                        .await
                    {
                        Ok(messages) => {
                            items.extend(messages.into_iter().map(MigrationItem::Message))
                        }
                        Err(err) => report.errors.push(format!(
                            "thread {}/{}/{}: {}",
                            workspace, channel, thread, err
                        )),
                    }
                }
            }
        }

        for user in self.messages.list_users().await? {
            report.total_users += 1;
            match self.profiles.get_profile(&user).await {
                Ok(Some(profile)) => items.push(MigrationItem::Bio(profile)),
                Ok(None) => {}
                Err(err) => report.errors.push(format!("bio-{}: {}", user, err)),
            }
        }

        Ok(items)
    }
}
