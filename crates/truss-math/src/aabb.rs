use crate::Point3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of truss geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb3 {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Bounding box of an iterator of points, `None` when it is empty.
    pub fn from_iter_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |b, p| b.include(p)))
    }

    /// Grow the box to contain `p`.
    pub fn include(self, p: Point3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_from_iter_points() {
        let pts = [dvec3(1.0, 2.0, 3.0), dvec3(-1.0, 5.0, 0.0), dvec3(3.0, -1.0, 2.0)];
        let aabb = Aabb3::from_iter_points(pts).unwrap();
        assert_eq!(aabb.min, dvec3(-1.0, -1.0, 0.0));
        assert_eq!(aabb.max, dvec3(3.0, 5.0, 3.0));
    }

    #[test]
    fn test_from_iter_points_empty() {
        assert!(Aabb3::from_iter_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_include() {
        let b = Aabb3::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 1.0, 1.0));
        let b = b.include(dvec3(2.0, -1.0, 0.5));
        assert_eq!(b.min, dvec3(0.0, -1.0, 0.0));
        assert_eq!(b.max, dvec3(2.0, 1.0, 1.0));
    }
}
