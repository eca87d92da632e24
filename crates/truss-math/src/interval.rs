use serde::{Deserialize, Serialize};
use truss_core::{Result, TrussError};

/// A closed parameter interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Build an interval, rejecting empty, reversed, or non-finite bounds.
    pub fn try_new(min: f64, max: f64) -> Result<Self> {
        let interval = Self { min, max };
        if !interval.is_valid() {
            return Err(TrussError::InvalidDomain(format!(
                "[{min}, {max}] is not an increasing finite interval"
            )));
        }
        Ok(interval)
    }

    pub fn unit() -> Self {
        Self::UNIT
    }

    pub fn as_tuple(self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn is_valid(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.max > self.min
    }

    pub fn length(self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(self, t: f64) -> f64 {
        t.clamp(self.min, self.max)
    }

    /// Map `t` in this interval to `[0, 1]`.
    pub fn normalized_parameter(self, t: f64) -> f64 {
        (t - self.min) / self.length()
    }

    /// Map `s` in `[0, 1]` to this interval.
    pub fn parameter_at(self, s: f64) -> f64 {
        self.min + s * self.length()
    }

    /// Map `t` in this interval to the corresponding parameter in `to`.
    pub fn remap(self, t: f64, to: Interval) -> f64 {
        to.parameter_at(self.normalized_parameter(t))
    }
}
