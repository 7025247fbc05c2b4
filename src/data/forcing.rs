use serde::{Deserialize, Serialize};

use super::{validate_ascending, DataShapeError};

/// A single span between two adjacent samples.
///
/// The stored value is the sample at `from`; interpolating as
/// `value + (t - from) * slope` reproduces the sample values exactly at the
/// span boundaries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Segment {
    from: f64,
    to: f64,
    value: f64,
    slope: f64,
}

impl Segment {
    #[inline]
    fn interpolate(&self, time: f64) -> f64 {
        self.value + (time - self.from) * self.slope
    }
}

/// Continuous insulin input built once from a sampled measurement series.
///
/// Inside the sampled range the value is the linear interpolation between the
/// two bracketing samples; outside it, the nearest boundary sample's value is
/// carried flat. The flat clamp is deliberate behavior, not a fallback.
///
/// Lookup is a binary search over precomputed segments, so evaluation stays
/// cheap under the many off-grid calls an adaptive ODE solver makes. The
/// input is immutable after construction and evaluation is deterministic.
///
/// # Example
///
/// ```
/// use glucosim::InsulinInput;
///
/// let insulin = InsulinInput::new(&[0.0, 10.0, 20.0], &[18.0, 40.0, 30.0]).unwrap();
///
/// assert_eq!(insulin.interpolate(10.0), 40.0);
/// assert_eq!(insulin.interpolate(5.0), 29.0);
/// assert_eq!(insulin.interpolate(-3.0), 18.0);
/// assert_eq!(insulin.interpolate(90.0), 30.0);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InsulinInput {
    segments: Vec<Segment>,
    first_time: f64,
    first_value: f64,
    last_time: f64,
    last_value: f64,
}

impl InsulinInput {
    /// Build the forcing function from aligned `(time, value)` samples.
    ///
    /// # Errors
    ///
    /// Returns a [DataShapeError] if the series is empty, the lengths differ,
    /// or the times are not strictly ascending.
    pub fn new(times: &[f64], values: &[f64]) -> Result<Self, DataShapeError> {
        if times.is_empty() {
            return Err(DataShapeError::EmptySeries { name: "insulin time" });
        }
        if values.len() != times.len() {
            return Err(DataShapeError::LengthMismatch {
                name: "insulin",
                len: values.len(),
                expected: times.len(),
            });
        }
        validate_ascending(times)?;
        Ok(Self::from_sorted(times, values))
    }

    /// Build from series already known to be aligned and strictly ascending.
    pub(crate) fn from_sorted(times: &[f64], values: &[f64]) -> Self {
        debug_assert!(!times.is_empty());
        debug_assert_eq!(times.len(), values.len());
        debug_assert!(times.windows(2).all(|pair| pair[0] < pair[1]));

        let n = times.len();
        let mut segments = Vec::with_capacity(n.saturating_sub(1));
        for i in 0..n - 1 {
            let slope = (values[i + 1] - values[i]) / (times[i + 1] - times[i]);
            segments.push(Segment {
                from: times[i],
                to: times[i + 1],
                value: values[i],
                slope,
            });
        }

        InsulinInput {
            segments,
            first_time: times[0],
            first_value: values[0],
            last_time: times[n - 1],
            last_value: values[n - 1],
        }
    }

    /// Insulin concentration at time `t`.
    ///
    /// `t` may take any value; times outside the sampled range return the
    /// nearest boundary sample's value.
    #[inline]
    pub fn interpolate(&self, t: f64) -> f64 {
        if t <= self.first_time {
            return self.first_value;
        }
        if t >= self.last_time {
            return self.last_value;
        }
        // First segment whose right edge lies beyond t; contiguity of the
        // segments guarantees it also starts at or before t.
        let index = self.segments.partition_point(|segment| segment.to <= t);
        self.segments[index].interpolate(t)
    }

    /// The sampled time range `(first, last)`.
    pub fn time_span(&self) -> (f64, f64) {
        (self.first_time, self.last_time)
    }
}
