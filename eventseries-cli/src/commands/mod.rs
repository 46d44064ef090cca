pub mod config;
pub mod dates;
pub mod describe;
pub mod generate;

use std::path::Path;

use anyhow::{Context, Result};
use eventseries_core::Submission;

fn load_submission(path: &Path) -> Result<Submission> {
    Submission::load(path)
        .with_context(|| format!("Could not read submission {}", path.display()))
}
