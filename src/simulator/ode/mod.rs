use diffsol::error::{DiffsolError, OdeSolverError};
use diffsol::{NalgebraLU, NalgebraMat, OdeBuilder, OdeSolverMethod, OdeSolverStopReason};
use thiserror::Error;
use tracing::debug;

use super::model::MinimalModel;
use super::trajectory::Trajectory;
use super::validate_grid;
use crate::error::GlucosimError;

type M = NalgebraMat<f64>;
type LS = NalgebraLU<f64>;

const RTOL: f64 = 1e-6;
const ATOL: f64 = 1e-8;
const H0: f64 = 1e-3;

/// Failure of the numerical integration.
///
/// The solver's own adaptive control is the only recovery attempted; when it
/// gives up, the run is aborted and the failing time together with the last
/// valid state is reported for diagnosis. No partial trajectory is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("failed to set up the ODE problem: {0}")]
    Setup(String),
    #[error("step size underflow at t = {time} (last state: G = {glucose}, X = {action})")]
    StepSizeUnderflow { time: f64, glucose: f64, action: f64 },
    #[error("solver failure at t = {time} (last state: G = {glucose}, X = {action}): {message}")]
    Solver {
        time: f64,
        glucose: f64,
        action: f64,
        message: String,
    },
}

/// Integrate the model over a reporting grid.
///
/// Advances the initial value problem from `grid[0]` through every grid
/// point with an adaptive BDF method; the solver's internal step size is
/// independent of, and generally finer than, the reporting grid, and the
/// model derivative is evaluated at arbitrary intermediate times.
///
/// The returned [Trajectory] holds exactly one state per grid entry, in grid
/// order. Each call builds a fresh problem and solver, so separate calls are
/// independent and reentrant.
///
/// # Arguments
///
/// * `model` - The dynamics with their parameters and insulin input
/// * `initial` - Initial state `(G, X)` at `grid[0]`
/// * `grid` - Monotonically non-decreasing reporting times
///
/// # Errors
///
/// [DataShapeError](crate::DataShapeError) for an empty or decreasing grid,
/// [IntegrationError] if the solver cannot meet its tolerances.
pub fn solve_grid(
    model: &MinimalModel,
    initial: (f64, f64),
    grid: &[f64],
) -> Result<Trajectory, GlucosimError> {
    validate_grid(grid)?;
    let (g0, x0) = initial;

    let rhs_model = model.clone();
    let jac_model = model.clone();
    let problem = OdeBuilder::<M>::new()
        .t0(grid[0])
        .h0(H0)
        .rtol(RTOL)
        .atol(vec![ATOL, ATOL])
        .rhs_implicit(
            move |x, _p, t, y| {
                let (dg, dx) = rhs_model.derivative(t, x[0], x[1]);
                y[0] = dg;
                y[1] = dx;
            },
            move |x, _p, _t, v, y| {
                let (jg, jx) = jac_model.jacobian_mul(x[0], x[1], v[0], v[1]);
                y[0] = jg;
                y[1] = jx;
            },
        )
        .init(
            move |_p, _t, y| {
                y[0] = g0;
                y[1] = x0;
            },
            2,
        )
        .build()
        .map_err(|e| IntegrationError::Setup(e.to_string()))?;

    let mut solver = problem
        .bdf::<LS>()
        .map_err(|e| IntegrationError::Setup(e.to_string()))?;

    debug!(
        points = grid.len(),
        t_end = grid[grid.len() - 1],
        "integrating over reporting grid"
    );

    let mut trajectory = Trajectory::with_capacity(grid.len());
    for &t in grid {
        // A grid point at the solver's current time (the first point, or a
        // duplicate) reports the current state without stepping.
        if t > solver.state().t {
            match solver.set_stop_time(t) {
                Ok(()) => loop {
                    match solver.step() {
                        Ok(OdeSolverStopReason::InternalTimestep) => continue,
                        Ok(OdeSolverStopReason::TstopReached) => break,
                        Ok(OdeSolverStopReason::RootFound(_)) => {
                            let state = solver.state();
                            return Err(IntegrationError::Solver {
                                time: state.t,
                                glucose: state.y[0],
                                action: state.y[1],
                                message: "unexpected root event".to_string(),
                            }
                            .into());
                        }
                        Err(DiffsolError::OdeSolverError(
                            OdeSolverError::StepSizeTooSmall { .. },
                        )) => {
                            let state = solver.state();
                            return Err(IntegrationError::StepSizeUnderflow {
                                time: state.t,
                                glucose: state.y[0],
                                action: state.y[1],
                            }
                            .into());
                        }
                        Err(e) => {
                            let state = solver.state();
                            return Err(IntegrationError::Solver {
                                time: state.t,
                                glucose: state.y[0],
                                action: state.y[1],
                                message: e.to_string(),
                            }
                            .into());
                        }
                    }
                },
                Err(DiffsolError::OdeSolverError(OdeSolverError::StopTimeAtCurrentTime)) => {}
                Err(e) => {
                    let state = solver.state();
                    return Err(IntegrationError::Solver {
                        time: state.t,
                        glucose: state.y[0],
                        action: state.y[1],
                        message: e.to_string(),
                    }
                    .into());
                }
            }
        }
        let state = solver.state();
        trajectory.push(t, state.y[0], state.y[1]);
    }

    Ok(trajectory)
}
