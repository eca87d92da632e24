pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{GridStage, ParamDirection, Result, TrussError};
pub use tolerance::Tolerance;
pub use traits::Validate;
