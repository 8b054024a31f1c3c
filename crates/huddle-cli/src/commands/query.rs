//! `huddle query` - ad-hoc scoped retrieval.

use super::{context, load_config};
use clap::Args;
use huddle_pipeline::record::RecordKind;
use huddle_pipeline::{ScopeFilter, DEFAULT_TOP_K};
use std::path::Path;

#[derive(Args)]
pub struct QueryArgs {
    /// Free-text query.
    pub text: String,

    /// Scope to a workspace (general search).
    #[arg(long, conflicts_with_all = ["user", "bios_only"])]
    pub workspace: Option<String>,

    /// Scope to a user (AI-agent search).
    #[arg(long)]
    pub user: Option<String>,

    /// With --user, restrict to bio records.
    #[arg(long, requires = "user")]
    pub bios_only: bool,

    /// Maximum results.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub limit: usize,
}

impl QueryArgs {
    fn scope(&self) -> Option<ScopeFilter> {
        if let Some(workspace) = &self.workspace {
            return Some(ScopeFilter::workspace(workspace.as_str()));
        }
        self.user.as_ref().map(|user| {
            if self.bios_only {
                ScopeFilter::user_records(user.as_str(), RecordKind::Bio)
            } else {
                ScopeFilter::user(user.as_str())
            }
        })
    }
}

pub async fn run(config_path: Option<&Path>, args: QueryArgs) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let ctx = context::build(&config)?;

    // An unscoped query is rejected by the pipeline; surface the same
    // requirement as a CLI usage error.
    let scope = args.scope();
    if scope.is_none() {
        anyhow::bail!("a scope is required: pass --workspace <id> or --user <id>");
    }

    let results = ctx.query_context(&args.text, scope, Some(args.limit)).await?;

    if results.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    for result in results {
        println!(
            "{:.3}  {}  [{}]  {}",
            result.score, result.id, result.context, result.content
        );
    }
    Ok(())
}
