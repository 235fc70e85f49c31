//! # Planar Outlines
//!
//! 2D outlines for the extruded shapes. Coordinates are in the ground plane
//! and scale linearly with `size`.

use std::f64::consts::{PI, TAU};

use config::constants::BEZIER_STEPS;
use glam::DVec2;

use crate::ops::extrude::{regular_ring, Polygon2D};

/// Five-pointed star, outer radius `size`, inner radius `size / 2`.
pub fn star(size: f64) -> Polygon2D {
    const SPIKES: u32 = 5;
    let points = (0..SPIKES * 2)
        .map(|i| {
            let angle = TAU * f64::from(i) / f64::from(SPIKES * 2);
            let radius = if i % 2 == 0 { size } else { size * 0.5 };
            DVec2::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect();
    Polygon2D::new(points)
}

/// Heart built from four cubic Bézier arcs, each sampled with
/// `BEZIER_STEPS` segments.
pub fn heart(size: f64) -> Polygon2D {
    let p = |x: f64, y: f64| DVec2::new(x * size, y * size);
    let start = p(0.0, -0.5);
    let curves = [
        [p(0.0, -0.8), p(-0.8, -0.8), p(-0.5, -0.3)],
        [p(-0.8, 0.0), p(-0.3, 0.3), p(0.0, 0.8)],
        [p(0.3, 0.3), p(0.8, 0.0), p(0.5, -0.3)],
        [p(0.8, -0.8), p(0.0, -0.8), p(0.0, -0.5)],
    ];

    let mut points = vec![start];
    let mut from = start;
    for [c1, c2, to] in curves {
        for step in 1..=BEZIER_STEPS {
            let t = f64::from(step) / f64::from(BEZIER_STEPS);
            points.push(cubic_bezier(from, c1, c2, to, t));
        }
        from = to;
    }
    // The last sample closes the loop onto `start`
    points.pop();
    Polygon2D::new(points)
}

fn cubic_bezier(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Plus sign with arm half-thickness `0.3 * size`.
pub fn plus(size: f64) -> Polygon2D {
    let (s, t) = (size, size * 0.3);
    Polygon2D::new(vec![
        DVec2::new(-t, s),
        DVec2::new(t, s),
        DVec2::new(t, t),
        DVec2::new(s, t),
        DVec2::new(s, -t),
        DVec2::new(t, -t),
        DVec2::new(t, -s),
        DVec2::new(-t, -s),
        DVec2::new(-t, -t),
        DVec2::new(-s, -t),
        DVec2::new(-s, t),
        DVec2::new(-t, t),
    ])
}

/// Zig-zag lightning bolt spanning `[-size, size]` vertically.
pub fn lightning(size: f64) -> Polygon2D {
    let p = |x: f64, y: f64| DVec2::new(x * size, y * size);
    Polygon2D::new(vec![
        p(0.2, 1.0),
        p(-0.5, -0.05),
        p(-0.05, -0.05),
        p(-0.2, -1.0),
        p(0.5, 0.05),
        p(0.05, 0.05),
    ])
}

/// Disc of radius `size` with an offset circular bite of radius
/// `0.7 * size`.
///
/// The bite is shifted by `0.25 * size` so it stays strictly inside the
/// disc (a shift of `0.3` would make the two circles touch).
pub fn crescent(size: f64, segments: u32) -> Polygon2D {
    let outer = regular_ring(size, segments, 0.0);
    let bite = regular_ring(size * 0.7, segments, 0.0)
        .into_iter()
        .map(|p| p + DVec2::new(size * 0.25, 0.0))
        .collect();
    Polygon2D::with_holes(outer, vec![bite])
}

/// Spur gear: trapezoidal teeth between radius `0.8 * size` and `size`,
/// with a bore of radius `0.3 * size`.
pub fn gear(size: f64, teeth: u32, segments: u32) -> Polygon2D {
    let (tip, root) = (size, size * 0.8);
    let pitch = TAU / f64::from(teeth);
    let at = |radius: f64, angle: f64| DVec2::new(radius * angle.cos(), radius * angle.sin());

    let mut outline = Vec::with_capacity(teeth as usize * 4);
    for i in 0..teeth {
        let base = TAU * f64::from(i) / f64::from(teeth);
        outline.push(at(root, base));
        outline.push(at(tip, base + pitch * 0.25));
        outline.push(at(tip, base + pitch * 0.5));
        outline.push(at(root, base + pitch * 0.75));
    }
    Polygon2D::with_holes(outline, vec![regular_ring(size * 0.3, segments, 0.0)])
}

/// Hexagon nut (flat sides up and down) with a round bore of radius
/// `0.5 * size`.
pub fn nut(size: f64, segments: u32) -> Polygon2D {
    Polygon2D::regular(size, 6, 0.0).with_hole(regular_ring(size * 0.5, segments, PI / 6.0))
}

/// Flat ring with outer radius `size` and inner radius `0.5 * size`.
pub fn washer(size: f64, segments: u32) -> Polygon2D {
    Polygon2D::regular(size, segments, 0.0).with_hole(regular_ring(size * 0.5, segments, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::extrude::signed_area;
    use approx::assert_relative_eq;

    #[test]
    fn test_star_alternates_radius() {
        let star = star(1.0);
        assert_eq!(star.vertex_count(), 10);
        assert_relative_eq!(star.outer[0].length(), 1.0);
        assert_relative_eq!(star.outer[1].length(), 0.5);
    }

    #[test]
    fn test_heart_is_closed_loop_without_repeat() {
        let heart = heart(1.0);
        assert_eq!(heart.vertex_count(), 4 * BEZIER_STEPS as usize);
        assert_eq!(heart.outer[0], DVec2::new(0.0, -0.5));
        assert_ne!(heart.outer.last(), heart.outer.first());
        assert!(signed_area(&heart.outer).abs() > 0.1);
    }

    #[test]
    fn test_plus_area() {
        // Two 2s x 2t bars minus their 2t x 2t overlap
        let area = signed_area(&plus(1.0).outer).abs();
        assert_relative_eq!(area, 2.0 * 2.0 * 0.6 - 0.6 * 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_crescent_hole_inside_disc() {
        let crescent = crescent(1.0, 32);
        let hole = &crescent.holes[0];
        assert!(hole.iter().all(|p| p.length() < 1.0));
    }

    #[test]
    fn test_gear_tooth_count() {
        let gear = gear(1.0, 12, 16);
        assert_eq!(gear.vertex_count(), 48);
        assert_eq!(gear.holes[0].len(), 16);
    }
}
