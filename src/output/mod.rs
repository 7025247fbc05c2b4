use std::io::Write;

use thiserror::Error;

use crate::data::Dataset;
use crate::simulator::{SimulationOutput, Trajectory};

/// Errors while writing result artifacts.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the simulated trajectory as CSV (`time,glucose,insulin_action`).
///
/// The plotting collaborator consumes these columns directly; no chart
/// library is involved here.
pub fn write_trajectory_csv<W: Write>(
    trajectory: &Trajectory,
    writer: W,
) -> Result<(), OutputError> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(["time", "glucose", "insulin_action"])?;
    for i in 0..trajectory.len() {
        writer.write_record([
            trajectory.times()[i].to_string(),
            trajectory.glucose()[i].to_string(),
            trajectory.action()[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the measured series as CSV (`time,glucose,insulin`).
pub fn write_dataset_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<(), OutputError> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(["time", "glucose", "insulin"])?;
    for i in 0..dataset.len() {
        writer.write_record([
            dataset.time()[i].to_string(),
            dataset.glucose()[i].to_string(),
            dataset.insulin()[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a whole run (parameters, measured series, trajectory) as one JSON
/// document.
pub fn write_json<W: Write>(output: &SimulationOutput, writer: W) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(writer, output)?;
    Ok(())
}
