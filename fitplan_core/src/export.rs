//! CSV export of the progress ledger and the workout log book.
//!
//! Files are written to a temp file in the target directory, synced, and
//! renamed into place so a crash never leaves a half-written export.

use crate::ledger::ProgressLedger;
use crate::logbook::WorkoutLogBook;
use crate::{Error, ProgressEntry, Result, WorkoutLog};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Serialize)]
struct ProgressRow {
    date: String,
    weight: f64,
}

impl From<&ProgressEntry> for ProgressRow {
    fn from(entry: &ProgressEntry) -> Self {
        ProgressRow {
            date: entry.date.to_string(),
            weight: entry.weight,
        }
    }
}

#[derive(Debug, Serialize)]
struct LogRow {
    id: String,
    date: String,
    day_id: Option<String>,
    day_name: String,
    focus: String,
    duration: u32,
    calories: Option<u32>,
    notes: Option<String>,
}

impl From<&WorkoutLog> for LogRow {
    fn from(log: &WorkoutLog) -> Self {
        LogRow {
            id: log.id.clone(),
            date: log.date.to_string(),
            day_id: log.day_id.map(|d| d.to_string()),
            day_name: log.day_name.clone(),
            focus: log.focus.clone(),
            duration: log.duration,
            calories: log.calories,
            notes: log.notes.clone(),
        }
    }
}

fn write_rows<R: Serialize>(path: &Path, rows: impl Iterator<Item = R>) -> Result<usize> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::Other(format!("export path {:?} has no parent", path)))?;
    std::fs::create_dir_all(dir)?;

    let temp = NamedTempFile::new_in(dir)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(temp.as_file());

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;
    drop(writer);

    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(count)
}

/// Paths written by `export_all`
#[derive(Debug)]
pub struct ExportSummary {
    pub progress_path: PathBuf,
    pub progress_rows: usize,
    pub logs_path: PathBuf,
    pub log_rows: usize,
}

pub fn export_progress(ledger: &ProgressLedger, path: &Path) -> Result<usize> {
    let count = write_rows(path, ledger.entries().iter().map(ProgressRow::from))?;
    tracing::info!("Exported {} progress entries to {:?}", count, path);
    Ok(count)
}

pub fn export_logs(logs: &WorkoutLogBook, path: &Path) -> Result<usize> {
    let count = write_rows(path, logs.entries().iter().map(LogRow::from))?;
    tracing::info!("Exported {} workout logs to {:?}", count, path);
    Ok(count)
}

/// Write `progress.csv` and `workout_logs.csv` into `dir`
pub fn export_all(ledger: &ProgressLedger, logs: &WorkoutLogBook, dir: &Path) -> Result<ExportSummary> {
    let progress_path = dir.join("progress.csv");
    let logs_path = dir.join("workout_logs.csv");
    Ok(ExportSummary {
        progress_rows: export_progress(ledger, &progress_path)?,
        log_rows: export_logs(logs, &logs_path)?,
        progress_path,
        logs_path,
    })
}
