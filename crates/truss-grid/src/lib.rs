//! Spatial truss generation from a parametric surface.
//!
//! The base surface is sampled on a regular `u_count x v_count` grid. Midpoints
//! between adjacent grid rows are pushed along the surface normal and an offset
//! surface is interpolated through them. A second walk over the grid projects
//! onto that offset surface and emits isocurves plus the diagonal truss members
//! joining each base row edge to its displaced midpoint.

pub mod emitter;
pub mod generator;
pub mod grid;
pub mod output;
pub mod params;
pub mod sampler;

pub use generator::{generate_truss, TrussGridGenerator};
pub use grid::Grid;
pub use output::TrussGeometry;
pub use params::{DegreePolicy, FitOptions, TrussParams};
