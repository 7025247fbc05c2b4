pub mod forcing;
pub mod parser;

pub use forcing::InsulinInput;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Shape violations in measured series or reporting grids.
///
/// These are surfaced to the caller before any integration begins; the core
/// performs no silent repair of malformed input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataShapeError {
    #[error("series '{name}' is empty")]
    EmptySeries { name: &'static str },
    #[error("series '{name}' has {len} values for {expected} time points")]
    LengthMismatch {
        name: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("time is not strictly ascending at index {index} ({prev} followed by {next})")]
    NonAscendingTime { index: usize, prev: f64, next: f64 },
    #[error("time grid is empty")]
    EmptyGrid,
    #[error("time grid decreases at index {index} ({prev} followed by {next})")]
    DecreasingGrid { index: usize, prev: f64, next: f64 },
}

/// A measured glucose/insulin dataset: three aligned series sampled at the
/// same (strictly ascending) time points.
///
/// Time is in minutes, glucose and insulin in the units of the source assay.
/// Construction validates the shape of the data; a [Dataset] that exists is
/// always well-formed, so downstream components can consume its columns
/// without re-checking. The contained series are read-only.
///
/// # Example
///
/// ```
/// use glucosim::Dataset;
///
/// let dataset = Dataset::new(
///     vec![0.0, 10.0, 20.0],
///     vec![15.2, 9.8, 7.1],
///     vec![104.0, 60.0, 31.0],
/// )
/// .unwrap();
///
/// assert_eq!(dataset.len(), 3);
/// assert_eq!(dataset.first_glucose(), 15.2);
/// assert_eq!(dataset.max_time(), 20.0);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dataset {
    time: Vec<f64>,
    glucose: Vec<f64>,
    insulin: Vec<f64>,
}

impl Dataset {
    /// Construct a dataset from the three measured series.
    ///
    /// # Errors
    ///
    /// Returns a [DataShapeError] if any series is empty, the lengths do not
    /// match, or the time values are not strictly ascending.
    pub fn new(
        time: Vec<f64>,
        glucose: Vec<f64>,
        insulin: Vec<f64>,
    ) -> Result<Self, DataShapeError> {
        if time.is_empty() {
            return Err(DataShapeError::EmptySeries { name: "time" });
        }
        if glucose.len() != time.len() {
            return Err(DataShapeError::LengthMismatch {
                name: "glucose",
                len: glucose.len(),
                expected: time.len(),
            });
        }
        if insulin.len() != time.len() {
            return Err(DataShapeError::LengthMismatch {
                name: "insulin",
                len: insulin.len(),
                expected: time.len(),
            });
        }
        validate_ascending(&time)?;
        Ok(Dataset {
            time,
            glucose,
            insulin,
        })
    }

    /// Number of samples in the dataset.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample times, in minutes.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Measured glucose concentrations, aligned with [Dataset::time].
    pub fn glucose(&self) -> &[f64] {
        &self.glucose
    }

    /// Measured insulin concentrations, aligned with [Dataset::time].
    pub fn insulin(&self) -> &[f64] {
        &self.insulin
    }

    /// The first measured glucose value, used as the initial condition G(0).
    pub fn first_glucose(&self) -> f64 {
        self.glucose[0]
    }

    /// The last (largest) sample time.
    pub fn max_time(&self) -> f64 {
        self.time[self.time.len() - 1]
    }

    /// Measured glucose as `(time, value)` pairs, for plotting consumers.
    pub fn glucose_points(&self) -> Vec<(f64, f64)> {
        self.time.iter().copied().zip(self.glucose.iter().copied()).collect()
    }

    /// Measured insulin as `(time, value)` pairs, for plotting consumers.
    pub fn insulin_points(&self) -> Vec<(f64, f64)> {
        self.time.iter().copied().zip(self.insulin.iter().copied()).collect()
    }

    /// Build the continuous insulin forcing function from the measured
    /// insulin series. Infallible: the shape was validated on construction.
    pub fn insulin_input(&self) -> InsulinInput {
        InsulinInput::from_sorted(&self.time, &self.insulin)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dataset with {} samples over [{}, {}] minutes",
            self.len(),
            self.time[0],
            self.max_time()
        )
    }
}

pub(crate) fn validate_ascending(time: &[f64]) -> Result<(), DataShapeError> {
    for (index, pair) in time.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(DataShapeError::NonAscendingTime {
                index: index + 1,
                prev: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_accessors() {
        let dataset = Dataset::new(
            vec![0.0, 5.0, 10.0],
            vec![15.2, 11.0, 9.8],
            vec![104.0, 80.0, 60.0],
        )
        .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.first_glucose(), 15.2);
        assert_eq!(dataset.max_time(), 10.0);
        assert_eq!(dataset.glucose_points()[1], (5.0, 11.0));
        assert_eq!(dataset.insulin_points()[2], (10.0, 60.0));
    }

    #[test]
    fn test_empty_series_rejected() {
        let result = Dataset::new(vec![], vec![], vec![]);
        assert_eq!(
            result.unwrap_err(),
            DataShapeError::EmptySeries { name: "time" }
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = Dataset::new(vec![0.0, 1.0], vec![5.0], vec![18.0, 19.0]);
        assert_eq!(
            result.unwrap_err(),
            DataShapeError::LengthMismatch {
                name: "glucose",
                len: 1,
                expected: 2,
            }
        );
    }

    #[test]
    fn test_non_ascending_time_rejected() {
        let result = Dataset::new(
            vec![0.0, 10.0, 10.0],
            vec![5.0, 5.0, 5.0],
            vec![18.0, 18.0, 18.0],
        );
        assert_eq!(
            result.unwrap_err(),
            DataShapeError::NonAscendingTime {
                index: 2,
                prev: 10.0,
                next: 10.0,
            }
        );
    }
}
