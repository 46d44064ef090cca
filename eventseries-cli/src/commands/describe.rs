use std::path::Path;

use anyhow::Result;
use eventseries_core::{GenerationLimits, plan};
use owo_colors::OwoColorize;
use uuid::Uuid;

use crate::render::Render;

/// Sessions listed before the rest is collapsed to a count
const PREVIEW_LIMIT: usize = 10;

pub fn run(submission_path: &Path, limits: &GenerationLimits) -> Result<()> {
    let submission = super::load_submission(submission_path)?;

    println!("{}", submission.draft.title.bold());
    println!("  {}", submission.pattern.describe(limits));
    println!();

    let batch = plan(&submission, Uuid::nil(), limits)?;

    println!("  {}", batch.aggregate.render());
    for event in batch.events.iter().take(PREVIEW_LIMIT) {
        println!("   {}", event.render());
    }

    let hidden = batch.events.len().saturating_sub(PREVIEW_LIMIT);
    if hidden > 0 {
        println!("   {}", format!("... and {hidden} more").dimmed());
    }

    Ok(())
}
