use std::fmt;

use thiserror::Error;

/// A parametric direction of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ParamDirection {
    U,
    V,
}

impl fmt::Display for ParamDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U => write!(f, "u"),
            Self::V => write!(f, "v"),
        }
    }
}

/// The grid walk an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GridStage {
    /// First walk: collecting offset samples for the surface fit.
    Sampling,
    /// Second walk: projecting onto the offset surface and emitting members.
    Emission,
}

impl fmt::Display for GridStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sampling => write!(f, "sampling"),
            Self::Emission => write!(f, "emission"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrussError {
    #[error(
        "Invalid grid: u_count={u_count}, v_count={v_count} \
         (both must be at least 2 and the cell count must fit in u32)"
    )]
    InvalidGrid { u_count: usize, v_count: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(
        "Insufficient samples for requested surface degree: {samples} samples in {direction} \
         cannot carry degree {degree}"
    )]
    InsufficientSamples {
        direction: ParamDirection,
        samples: usize,
        degree: usize,
    },

    #[error("Degenerate surface fit: {0}")]
    DegenerateFit(String),

    #[error("Surface normal undefined at ({u}, {v})")]
    DegenerateNormal { u: f64, v: f64 },

    #[error("Closest point projection failed for ({x}, {y}, {z})")]
    ProjectionFailed { x: f64, y: f64, z: f64 },

    #[error("Evaluation failed during {stage} at grid cell ({i}, {j}): {source}")]
    EvaluationFailed {
        stage: GridStage,
        i: usize,
        j: usize,
        #[source]
        source: Box<TrussError>,
    },

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl TrussError {
    /// Attach the grid cell an error occurred at.
    pub fn at_cell(self, stage: GridStage, i: usize, j: usize) -> Self {
        Self::EvaluationFailed {
            stage,
            i,
            j,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping grid-cell wrappers.
    pub fn root_cause(&self) -> &TrussError {
        match self {
            Self::EvaluationFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrussError>;
