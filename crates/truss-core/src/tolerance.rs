use crate::error::{Result, TrussError};
use crate::traits::Validate;

/// Tolerances used by geometric queries.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Distance below which two points coincide (model units).
    pub linear: f64,
    /// Step below which a parameter iteration is considered converged.
    pub parametric: f64,
    /// Angular tolerance (radians).
    pub angular: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-7;
    pub const DEFAULT_PARAMETRIC: f64 = 1e-10;
    pub const DEFAULT_ANGULAR: f64 = 1e-10;

    pub fn new(linear: f64, parametric: f64, angular: f64) -> Self {
        Self {
            linear,
            parametric,
            angular,
        }
    }

    pub fn default_precision() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
            parametric: Self::DEFAULT_PARAMETRIC,
            angular: Self::DEFAULT_ANGULAR,
        }
    }

    pub fn loose() -> Self {
        Self {
            linear: 1e-4,
            parametric: 1e-7,
            angular: 1e-6,
        }
    }

    pub fn tight() -> Self {
        Self {
            linear: 1e-10,
            parametric: 1e-13,
            angular: 1e-12,
        }
    }

    /// Check if the cosine between two directions is within angular
    /// tolerance of a right angle.
    pub fn is_perpendicular(self, cosine: f64) -> bool {
        cosine.abs() <= self.angular
    }

    /// Check if a length is zero within linear tolerance.
    pub fn is_zero(self, v: f64) -> bool {
        v.abs() < self.linear
    }

    /// Check if a parameter step has converged.
    pub fn is_converged(self, step: f64) -> bool {
        step.abs() < self.parametric
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}

impl Validate for Tolerance {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("linear", self.linear),
            ("parametric", self.parametric),
            ("angular", self.angular),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TrussError::InvalidParameter(format!(
                    "{name} tolerance must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_ordered() {
        let loose = Tolerance::loose();
        let default = Tolerance::default();
        let tight = Tolerance::tight();
        assert!(loose.linear > default.linear && default.linear > tight.linear);
        assert!(loose.parametric > default.parametric && default.parametric > tight.parametric);
    }

    #[test]
    fn test_comparisons() {
        let tol = Tolerance::default();
        assert!(tol.is_perpendicular(-1e-11));
        assert!(!tol.is_perpendicular(1e-6));
        assert!(tol.is_zero(-5e-8));
        assert!(tol.is_converged(1e-12));
        assert!(!tol.is_converged(1e-6));
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        assert!(Tolerance::default().validate().is_ok());
        assert!(Tolerance::new(0.0, 1e-10, 1e-10).validate().is_err());
        assert!(Tolerance::new(1e-7, f64::NAN, 1e-10).validate().is_err());
    }
}
