pub mod model;
pub mod ode;
pub mod trajectory;

pub use model::{BergmanParameters, MinimalModel};
pub use ode::IntegrationError;
pub use trajectory::Trajectory;

use serde::Serialize;
use tracing::debug;

use crate::data::{DataShapeError, Dataset};
use crate::error::GlucosimError;

/// Number of reporting points in the driver's default time grid.
pub const DEFAULT_GRID_POINTS: usize = 1000;

/// An evenly spaced reporting grid of `n` points spanning `[start, end]`.
///
/// Both endpoints are included exactly; the grid need not coincide with the
/// measurement times.
pub fn time_grid(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

pub(crate) fn validate_grid(grid: &[f64]) -> Result<(), DataShapeError> {
    if grid.is_empty() {
        return Err(DataShapeError::EmptyGrid);
    }
    for (index, pair) in grid.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(DataShapeError::DecreasingGrid {
                index: index + 1,
                prev: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

/// One end-to-end simulation run over a measured dataset.
///
/// The driver wires the pipeline together: it builds the insulin forcing
/// function from the dataset, takes the initial state from the first measured
/// glucose value (with X = 0), fixes the parameters, lays a reporting grid of
/// [DEFAULT_GRID_POINTS] evenly spaced points over `[0, max observed time]`,
/// invokes the integrator, and bundles the results for the plotting
/// collaborator. It holds no state across runs.
///
/// # Example
///
/// ```
/// use glucosim::{Dataset, Simulation};
///
/// let dataset = Dataset::new(
///     vec![0.0, 10.0, 20.0],
///     vec![15.2, 9.8, 7.1],
///     vec![104.0, 60.0, 31.0],
/// )
/// .unwrap();
///
/// let output = Simulation::new(dataset).run().unwrap();
/// assert_eq!(output.trajectory.len(), 1000);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    dataset: Dataset,
    parameters: BergmanParameters,
    grid_points: usize,
}

impl Simulation {
    /// A simulation over `dataset` with the default parameters and grid.
    pub fn new(dataset: Dataset) -> Self {
        Simulation {
            dataset,
            parameters: BergmanParameters::default(),
            grid_points: DEFAULT_GRID_POINTS,
        }
    }

    /// Replace the physiological parameters for this run.
    pub fn with_parameters(mut self, parameters: BergmanParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Change the number of points in the default reporting grid.
    pub fn with_grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points;
        self
    }

    /// Run over the default grid: evenly spaced points from 0 to the last
    /// observed time.
    pub fn run(&self) -> Result<SimulationOutput, GlucosimError> {
        let grid = time_grid(0.0, self.dataset.max_time(), self.grid_points);
        self.run_on_grid(&grid)
    }

    /// Run over a caller-supplied reporting grid.
    pub fn run_on_grid(&self, grid: &[f64]) -> Result<SimulationOutput, GlucosimError> {
        let model = MinimalModel::new(self.parameters, self.dataset.insulin_input());
        let initial = (self.dataset.first_glucose(), 0.0);
        debug!(
            samples = self.dataset.len(),
            g0 = initial.0,
            "starting simulation run"
        );
        let trajectory = ode::solve_grid(&model, initial, grid)?;
        Ok(SimulationOutput {
            parameters: self.parameters,
            measured: self.dataset.clone(),
            trajectory,
        })
    }
}

/// The artifacts of a completed run, as handed to the plotting collaborator:
/// the raw measured series for descriptive plots and the simulated trajectory
/// (with its grid) for simulated-vs-measured overlays.
#[derive(Serialize, Debug, Clone)]
pub struct SimulationOutput {
    pub parameters: BergmanParameters,
    pub measured: Dataset,
    pub trajectory: Trajectory,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_time_grid_endpoints_and_spacing() {
        let grid = time_grid(0.0, 20.0, 1000);
        assert_eq!(grid.len(), 1000);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[999], 20.0);
        assert_relative_eq!(grid[1] - grid[0], 20.0 / 999.0);
    }

    #[test]
    fn test_time_grid_degenerate_sizes() {
        assert!(time_grid(0.0, 10.0, 0).is_empty());
        assert_eq!(time_grid(0.0, 10.0, 1), vec![0.0]);
        assert_eq!(time_grid(0.0, 10.0, 2), vec![0.0, 10.0]);
    }

    #[test]
    fn test_validate_grid() {
        assert_eq!(validate_grid(&[]), Err(DataShapeError::EmptyGrid));
        assert!(validate_grid(&[0.0, 1.0, 1.0, 2.0]).is_ok());
        assert_eq!(
            validate_grid(&[0.0, 2.0, 1.0]),
            Err(DataShapeError::DecreasingGrid {
                index: 2,
                prev: 2.0,
                next: 1.0,
            })
        );
    }
}
