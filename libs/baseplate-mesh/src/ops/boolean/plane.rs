//! # Splitting Planes
//!
//! Oriented planes `normal · p = w` used to partition polygons. Points
//! closer than `CSG_PLANE_EPSILON` count as lying on the plane.

use config::constants::{CSG_PLANE_EPSILON, DEGENERATE_AREA_EPSILON};
use glam::DVec3;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Side of a plane a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Same side as the normal
    Front,
    /// Opposite side to the normal
    Back,
    Coplanar,
}

// =============================================================================
// PLANE
// =============================================================================

/// Unit normal plus offset along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: DVec3,
    w: f64,
}

impl Plane {
    /// Plane through a counter-clockwise triangle, facing the side the
    /// triangle is wound towards. `None` for collinear points.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let cross = (b - a).cross(c - a);
        if cross.length() < DEGENERATE_AREA_EPSILON {
            return None;
        }
        let normal = cross.normalize();
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    #[inline]
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    #[inline]
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Same plane, facing the other way.
    #[inline]
    pub fn flip(&self) -> Plane {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Positive in front, negative behind.
    #[inline]
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    pub fn classify_point(&self, point: DVec3) -> Classification {
        let distance = self.signed_distance(point);
        if distance > CSG_PLANE_EPSILON {
            Classification::Front
        } else if distance < -CSG_PLANE_EPSILON {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_through_triangle() {
        let plane = Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::Y).unwrap();
        assert_eq!(plane.normal(), DVec3::Z);
        assert_eq!(plane.w(), 0.0);
    }

    #[test]
    fn test_plane_from_collinear_points() {
        assert!(Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::X * 2.0).is_none());
    }

    #[test]
    fn test_plane_classify() {
        let plane = Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::Y).unwrap();
        assert_eq!(plane.classify_point(DVec3::new(0.0, 0.0, 1.0)), Classification::Front);
        assert_eq!(plane.classify_point(DVec3::new(0.0, 0.0, -1.0)), Classification::Back);
        assert_eq!(plane.classify_point(DVec3::new(5.0, 5.0, 1e-7)), Classification::Coplanar);
    }

    #[test]
    fn test_plane_flip() {
        let plane = Plane::from_points(DVec3::Z, DVec3::Z + DVec3::X, DVec3::Z + DVec3::Y).unwrap();
        let reversed = plane.flip();
        assert_eq!(reversed.normal(), -DVec3::Z);
        assert_eq!(reversed.w(), -1.0);
        assert_eq!(reversed.classify_point(DVec3::ZERO), Classification::Front);
    }
}
