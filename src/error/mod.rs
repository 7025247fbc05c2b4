use thiserror::Error;

use crate::data::parser::DatafileError;
use crate::data::DataShapeError;
use crate::output::OutputError;
use crate::simulator::IntegrationError;

/// Top-level error type, aggregating the errors of the individual modules.
#[derive(Error, Debug)]
pub enum GlucosimError {
    #[error("Data shape error: {0}")]
    DataShape(#[from] DataShapeError),
    #[error("Datafile error: {0}")]
    Datafile(#[from] DatafileError),
    #[error("Integration error: {0}")]
    Integration(#[from] IntegrationError),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}
