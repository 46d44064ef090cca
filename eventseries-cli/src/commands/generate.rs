use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::ValueEnum;
use eventseries_core::{GenerationLimits, SeriesBatch, ics, plan};
use owo_colors::OwoColorize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Ics,
}

pub fn run(
    submission_path: &Path,
    limits: &GenerationLimits,
    series_id: Uuid,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let submission = super::load_submission(submission_path)?;
    tracing::debug!(%series_id, ?format, title = %submission.draft.title, "Generating batch");

    let batch = plan(&submission, series_id, limits)?;
    let content = render_batch(&batch, format)?;

    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Could not write {}", path.display()))?;
            println!(
                "{}",
                format!(
                    "  Generated {} sessions ({} to {}) -> {}",
                    batch.aggregate.total_sessions,
                    batch.aggregate.start_date,
                    batch.aggregate.end_date,
                    path.display()
                )
                .green()
            );
        }
        None => print!("{content}"),
    }

    Ok(())
}

fn render_batch(batch: &SeriesBatch, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(batch)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Ics => Ok(ics::generate_calendar(batch, Utc::now())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use eventseries_core::{EventDraft, SessionTimes, TitleTemplate, materialize};

    fn make_batch() -> SeriesBatch {
        let dates = [
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 2).unwrap(),
        ];
        materialize(
            &EventDraft::new("Choir"),
            Uuid::nil(),
            &dates,
            SessionTimes::Duration {
                start: chrono::NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                minutes: 60,
            },
            &TitleTemplate::Plain,
        )
        .unwrap()
    }

    #[test]
    fn json_output_carries_aggregate() {
        let json = render_batch(&make_batch(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["aggregate"]["total_sessions"], 2);
        assert_eq!(value["aggregate"]["start_date"], "2026-06-01");
        assert_eq!(value["events"][1]["sequence_number"], 2);
    }

    #[test]
    fn ics_output_is_a_calendar() {
        let ics = render_batch(&make_batch(), OutputFormat::Ics).unwrap();
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    }

    #[test]
    fn writes_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let submission = dir.path().join("talk.toml");
        std::fs::write(
            &submission,
            "[draft]\ntitle = \"Talk\"\n\n[pattern]\ntype = \"single\"\ndate = \"2026-02-02\"\nstart_time = \"18:00\"\nend_time = \"19:00\"\n",
        )
        .unwrap();
        let output = dir.path().join("out.json");

        run(
            &submission,
            &GenerationLimits::default(),
            Uuid::nil(),
            OutputFormat::Json,
            Some(&output),
        )
        .unwrap();

        let written: SeriesBatch =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written.events[0].title, "Talk");
        assert_eq!(written.series_id, Uuid::nil());
    }
}
