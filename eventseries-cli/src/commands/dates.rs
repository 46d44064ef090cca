use std::path::Path;

use anyhow::Result;
use eventseries_core::{GenerationLimits, SeriesError};

pub fn run(submission_path: &Path, limits: &GenerationLimits) -> Result<()> {
    let submission = super::load_submission(submission_path)?;
    let dates = submission.pattern.expand_dates(limits)?;

    if dates.is_empty() {
        return Err(SeriesError::NoOccurrencesGenerated.into());
    }

    for date in dates {
        println!("{}", date.format("%Y-%m-%d"));
    }

    Ok(())
}
