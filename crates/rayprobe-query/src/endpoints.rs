use crate::Real;
use na::{Point3, Vector3};

/// The two ends of the segment tested by a ray query.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RayEndpoints {
    pub start: Point3<Real>,
    pub end: Point3<Real>,
}

impl RayEndpoints {
    pub fn new(start: Point3<Real>, end: Point3<Real>) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x0: Real, y0: Real, z0: Real, x1: Real, y1: Real, z1: Real) -> Self {
        Self::new(Point3::new(x0, y0, z0), Point3::new(x1, y1, z1))
    }

    /// The unnormalized direction `end - start`.
    pub fn dir(&self) -> Vector3<Real> {
        self.end - self.start
    }

    pub fn length(&self) -> Real {
        self.dir().norm()
    }

    /// Segments with coincident ends can't hit anything.
    pub fn is_degenerate(&self) -> bool {
        self.dir().norm_squared() == 0.0
    }

    /// The point at fraction `t` of the segment, `0` being `start` and `1` being `end`.
    pub fn point_at(&self, t: Real) -> Point3<Real> {
        self.start + self.dir() * t
    }
}
