//! `huddle persona` - AI-agent persona summary for a user.

use super::{context, load_config};
use clap::Args;
use huddle_core::UserId;
use std::path::Path;

#[derive(Args)]
pub struct PersonaArgs {
    /// User to summarize.
    pub user_id: String,
}

pub async fn run(config_path: Option<&Path>, args: PersonaArgs) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let ctx = context::build(&config)?;

    let summary = ctx
        .generate_persona_summary(&UserId::new(args.user_id.as_str()))
        .await?;
    println!("{}", summary);
    Ok(())
}
