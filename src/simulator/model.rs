use serde::{Deserialize, Serialize};

use crate::data::InsulinInput;

/// The five fixed physiological constants of the Bergman minimal model.
///
/// Parameters are supplied once per simulation run and never mutated; they
/// are not estimated from data.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BergmanParameters {
    /// Decay rate of remote insulin action (1/min)
    pub p2: f64,
    /// Baseline insulin concentration Ib (µU/mL)
    pub ib: f64,
    /// Insulin sensitivity SI
    pub si: f64,
    /// Glucose effectiveness SG (1/min)
    pub sg: f64,
    /// Baseline glucose concentration Gb
    pub gb: f64,
}

impl Default for BergmanParameters {
    /// The documented IVGTT reference values.
    fn default() -> Self {
        BergmanParameters {
            p2: 1.0160e-4,
            ib: 18.02,
            si: 1.3612e-1,
            sg: 3.6105e-2,
            gb: 4.70376,
        }
    }
}

/// The minimal-model dynamics: a parameter-closed, pure state-transition
/// function over the two states G (glucose) and X (remote insulin action),
/// driven by the interpolated insulin input:
///
/// ```text
/// dG/dt = -(SG + X) * G + SG * Gb
/// dX/dt = -p2 * X + p2 * SI * (I(t) - Ib)
/// ```
///
/// Every evaluation is independent and valid at arbitrary intermediate
/// times, so an adaptive solver may probe freely between reporting points.
/// G and X are not clamped; they may go negative for pathological
/// parameters, in keeping with the mathematical model.
#[derive(Debug, Clone)]
pub struct MinimalModel {
    params: BergmanParameters,
    insulin: InsulinInput,
}

impl MinimalModel {
    pub fn new(params: BergmanParameters, insulin: InsulinInput) -> Self {
        MinimalModel { params, insulin }
    }

    pub fn parameters(&self) -> &BergmanParameters {
        &self.params
    }

    pub fn insulin(&self) -> &InsulinInput {
        &self.insulin
    }

    /// Instantaneous derivative `(dG/dt, dX/dt)` at time `t` and state `(g, x)`.
    #[inline]
    pub fn derivative(&self, t: f64, g: f64, x: f64) -> (f64, f64) {
        let p = &self.params;
        let insulin = self.insulin.interpolate(t);
        let dg = -(p.sg + x) * g + p.sg * p.gb;
        let dx = -p.p2 * x + p.p2 * p.si * (insulin - p.ib);
        (dg, dx)
    }

    /// Action of the Jacobian at state `(g, x)` on the direction `(vg, vx)`.
    ///
    /// The insulin input only enters the constant term of dX/dt, so the
    /// Jacobian is independent of time.
    #[inline]
    pub fn jacobian_mul(&self, g: f64, x: f64, vg: f64, vx: f64) -> (f64, f64) {
        let p = &self.params;
        (-(p.sg + x) * vg - g * vx, -p.p2 * vx)
    }
}
