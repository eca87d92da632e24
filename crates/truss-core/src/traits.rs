use crate::error::Result;

/// Check that a parameter set or geometric entity is usable before computing with it.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
