//! # Convex Polygon for BSP Operations
//!
//! Planar polygon with its supporting plane and splitting logic.

use glam::DVec3;

use super::plane::{Classification, Plane};

/// A convex planar polygon.
///
/// Fragments produced by splitting keep the plane of the polygon they were
/// cut from, so coplanar pieces stay exactly coplanar.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<DVec3>,
    plane: Plane,
}

impl Polygon {
    /// Creates a polygon from a counter-clockwise triangle.
    ///
    /// Returns `None` for degenerate triangles.
    pub fn from_triangle([a, b, c]: [DVec3; 3]) -> Option<Self> {
        let plane = Plane::from_points(a, b, c)?;
        Some(Self {
            vertices: vec![a, b, c],
            plane,
        })
    }

    fn with_plane(vertices: Vec<DVec3>, plane: Plane) -> Self {
        Self { vertices, plane }
    }

    /// Get vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Get plane.
    #[inline]
    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// Flip polygon orientation.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane = self.plane.flip();
    }

    /// Split this polygon by `plane`, appending the pieces to `out`.
    ///
    /// Coplanar polygons go to `coplanar_front` or `coplanar_back` depending
    /// on whether their normal agrees with the plane.
    pub fn split(self, plane: &Plane, out: &mut Fragments) {
        let classes: Vec<Classification> = self
            .vertices
            .iter()
            .map(|v| plane.classify_point(*v))
            .collect();

        let has_front = classes.contains(&Classification::Front);
        let has_back = classes.contains(&Classification::Back);

        match (has_front, has_back) {
            (false, false) => {
                if plane.normal().dot(self.plane.normal()) > 0.0 {
                    out.coplanar_front.push(self);
                } else {
                    out.coplanar_back.push(self);
                }
            }
            (true, false) => out.front.push(self),
            (false, true) => out.back.push(self),
            (true, true) => {
                let n = self.vertices.len();
                let mut front = Vec::with_capacity(n + 1);
                let mut back = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ci, cj) = (classes[i], classes[j]);
                    let (vi, vj) = (self.vertices[i], self.vertices[j]);

                    if ci != Classification::Back {
                        front.push(vi);
                    }
                    if ci != Classification::Front {
                        back.push(vi);
                    }

                    let crosses = matches!(
                        (ci, cj),
                        (Classification::Front, Classification::Back)
                            | (Classification::Back, Classification::Front)
                    );
                    if crosses {
                        let t = (plane.w() - plane.normal().dot(vi))
                            / plane.normal().dot(vj - vi);
                        let v = vi.lerp(vj, t);
                        front.push(v);
                        back.push(v);
                    }
                }

                if front.len() >= 3 {
                    out.front.push(Polygon::with_plane(front, self.plane));
                    out.created += 1;
                }
                if back.len() >= 3 {
                    out.back.push(Polygon::with_plane(back, self.plane));
                    out.created += 1;
                }
            }
        }
    }
}

/// Output lists of [`Polygon::split`].
#[derive(Debug, Default)]
pub struct Fragments {
    pub coplanar_front: Vec<Polygon>,
    pub coplanar_back: Vec<Polygon>,
    pub front: Vec<Polygon>,
    pub back: Vec<Polygon>,
    /// Number of new polygons produced by spanning splits
    pub created: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_square() -> Polygon {
        let mut polygon = Polygon::from_triangle([
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(1.0, -1.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
        ])
        .unwrap();
        polygon.vertices.push(DVec3::new(-1.0, 1.0, 0.0));
        polygon
    }

    #[test]
    fn test_degenerate_triangle_has_no_polygon() {
        assert!(Polygon::from_triangle([DVec3::ZERO, DVec3::X, DVec3::X * 3.0]).is_none());
    }

    #[test]
    fn test_flip_reverses_winding_and_plane() {
        let mut polygon = xy_square();
        polygon.flip();
        assert_eq!(polygon.vertices()[0], DVec3::new(-1.0, 1.0, 0.0));
        assert_eq!(polygon.plane().normal(), -DVec3::Z);
    }

    #[test]
    fn test_split_spanning() {
        let plane = Plane::from_points(DVec3::ZERO, DVec3::Y, DVec3::Z).unwrap();
        let mut out = Fragments::default();
        xy_square().split(&plane, &mut out);

        assert_eq!(out.front.len(), 1);
        assert_eq!(out.back.len(), 1);
        assert_eq!(out.created, 2);
        assert!(out.front[0].vertices().iter().all(|v| v.x >= 0.0));
        assert!(out.back[0].vertices().iter().all(|v| v.x <= 0.0));
        assert_eq!(out.front[0].vertices().len(), 4);
        // Fragments inherit the parent plane
        assert_eq!(out.front[0].plane(), xy_square().plane());
    }

    #[test]
    fn test_split_coplanar() {
        let plane = xy_square().plane();
        let mut out = Fragments::default();
        xy_square().split(&plane, &mut out);
        assert_eq!(out.coplanar_front.len(), 1);

        let mut out = Fragments::default();
        xy_square().split(&plane.flip(), &mut out);
        assert_eq!(out.coplanar_back.len(), 1);
    }

    #[test]
    fn test_split_one_side() {
        let plane = Plane::from_points(DVec3::Z, DVec3::Z + DVec3::X, DVec3::Z + DVec3::Y).unwrap();
        let mut out = Fragments::default();
        xy_square().split(&plane, &mut out);
        assert_eq!(out.back.len(), 1);
        assert_eq!(out.created, 0);
    }
}
