//! NURBS core algorithms: knot vectors, rational evaluation, and global interpolation.

pub mod eval;
pub mod interpolate;
pub mod knot;

pub use eval::{blend_control_lines, curve_derivative, curve_point, SurfaceDerivatives, SurfaceNet};
pub use interpolate::{interpolate_surface, SurfaceFit};
pub use knot::{basis_derivatives, basis_functions, find_span};
