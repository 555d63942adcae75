use crate::errors::{AppError, AppResult};
use crate::models::workout::Workout;
use crate::ui::prompt::ask_confirmation;
use crate::utils::formatting::format_weight;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// One set per row: the flat shape used for CSV.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SetExport {
    pub workout_id: String,
    pub performed_at: String,
    pub duration: u64,
    pub exercise: String,
    pub set: usize,
    pub weight: String,
    pub reps: u32,
}

pub fn flatten(workouts: &[Workout]) -> Vec<SetExport> {
    let mut rows = Vec::new();
    for w in workouts {
        for ex in &w.exercises {
            for (i, set) in ex.sets.iter().enumerate() {
                rows.push(SetExport {
                    workout_id: w.id.to_string(),
                    performed_at: w.performed_at.to_rfc3339(),
                    duration: w.duration,
                    exercise: ex.name.clone(),
                    set: i + 1,
                    weight: format_weight(set.weight),
                    reps: set.reps,
                });
            }
        }
    }
    rows
}

pub struct ExportLogic;

impl ExportLogic {
    /// Write `workouts` to `path`. An existing file is only replaced with
    /// `force` or after confirmation. Returns the number of records written.
    pub fn export(
        workouts: &[Workout],
        format: ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<usize> {
        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(workouts, path),
            ExportFormat::Json => export_json(workouts, path),
        }
    }
}

fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    let question = format!("File '{}' already exists. Overwrite?", path.display());
    if ask_confirmation(&question)? {
        Ok(())
    } else {
        Err(AppError::Export(
            "Export cancelled: existing file not overwritten".into(),
        ))
    }
}

/// Whole workouts, nested, as a pretty JSON array.
fn export_json(workouts: &[Workout], path: &Path) -> AppResult<usize> {
    let json_data = serde_json::to_string_pretty(workouts)?;
    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    Ok(workouts.len())
}

fn export_csv(workouts: &[Workout], path: &Path) -> AppResult<usize> {
    let rows = flatten(workouts);
    let mut wtr = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        wtr.write_record([
            "workout_id",
            "performed_at",
            "duration",
            "exercise",
            "set",
            "weight",
            "reps",
        ])?;
    }
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}
