pub mod aabb;
pub mod interval;

pub use glam::{dvec3, DVec3};
pub use aabb::Aabb3;
pub use interval::Interval;

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
