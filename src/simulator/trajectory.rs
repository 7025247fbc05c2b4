use serde::{Deserialize, Serialize};

/// A simulated state trajectory: exactly one `(G, X)` state per reporting
/// grid point, in grid order.
///
/// Produced once per run and immutable afterwards; the terminal artifact of
/// the core, stored as aligned arrays so plotting consumers can take the
/// columns directly.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    glucose: Vec<f64>,
    action: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Trajectory {
            times: Vec::with_capacity(n),
            glucose: Vec::with_capacity(n),
            action: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, time: f64, glucose: f64, action: f64) {
        self.times.push(time);
        self.glucose.push(glucose);
        self.action.push(action);
    }

    /// Number of reported states; equals the length of the time grid.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The reporting grid the states are aligned to.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Simulated glucose concentration G, aligned to [Trajectory::times].
    pub fn glucose(&self) -> &[f64] {
        &self.glucose
    }

    /// Simulated remote insulin action X, aligned to [Trajectory::times].
    pub fn action(&self) -> &[f64] {
        &self.action
    }

    /// Simulated glucose as `(time, value)` pairs, for plotting consumers.
    pub fn glucose_points(&self) -> Vec<(f64, f64)> {
        self.times.iter().copied().zip(self.glucose.iter().copied()).collect()
    }

    /// Simulated insulin action as `(time, value)` pairs, for plotting consumers.
    pub fn action_points(&self) -> Vec<(f64, f64)> {
        self.times.iter().copied().zip(self.action.iter().copied()).collect()
    }
}
