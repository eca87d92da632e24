//! Spatial truss generator geometry: curves, surfaces, NURBS fitting and projection.

pub mod curve;
pub mod nurbs;
pub mod surface;
pub mod tessellate;

pub use curve::{AnyCurve, Curve};
pub use surface::{ProjectionOptions, Surface};
