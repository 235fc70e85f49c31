//! # Vertex Welding and Stitching
//!
//! Turns the polygon soup produced by BSP clipping back into a closed,
//! indexed triangle mesh:
//!
//! 1. Weld vertices closer than the tolerance (spatial hash).
//! 2. Drop repeated vertices and collapsed loops.
//! 3. Repair T-junctions, where one polygon's vertex lies on the edge of a
//!    neighbour that was split differently.
//! 4. Triangulate each convex loop.
//! 5. Verify every edge is matched.

use std::collections::{BTreeSet, HashMap, HashSet};

use config::constants::{CSG_PLANE_EPSILON, DEGENERATE_AREA_EPSILON, MAX_TJUNCTION_PASSES};
use glam::DVec3;

use crate::error::CsgFailure;
use crate::mesh::{EdgeReport, Mesh};

use super::polygon::Polygon;

// =============================================================================
// VERTEX WELDER
// =============================================================================

/// Merges positions within `tolerance` of each other.
///
/// Positions are bucketed in a grid with cell size equal to the tolerance,
/// so a match can only be in the same or one of the 26 neighbouring cells.
#[derive(Debug)]
pub struct VertexWelder {
    tolerance: f64,
    grid: HashMap<(i64, i64, i64), Vec<u32>>,
    positions: Vec<DVec3>,
}

impl VertexWelder {
    /// Creates an empty welder.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            grid: HashMap::new(),
            positions: Vec::new(),
        }
    }

    /// Returns the index of a welded position matching `point`, inserting
    /// it when nothing is close enough.
    pub fn insert(&mut self, point: DVec3) -> u32 {
        let (cx, cy, cz) = self.cell(point);
        let limit = self.tolerance * self.tolerance;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    if let Some(&index) = bucket
                        .iter()
                        .find(|&&i| self.positions[i as usize].distance_squared(point) <= limit)
                    {
                        return index;
                    }
                }
            }
        }

        let index = self.positions.len() as u32;
        self.positions.push(point);
        self.grid.entry((cx, cy, cz)).or_default().push(index);
        index
    }

    fn cell(&self, point: DVec3) -> (i64, i64, i64) {
        let scaled = (point / self.tolerance).floor();
        (scaled.x as i64, scaled.y as i64, scaled.z as i64)
    }

    /// Consumes the welder, returning the unique positions.
    pub fn into_positions(self) -> Vec<DVec3> {
        self.positions
    }
}

// =============================================================================
// STITCHING
// =============================================================================

/// Converts clipped polygons into a closed indexed mesh.
///
/// # Errors
///
/// - `CsgFailure::EmptyResult` when nothing survives welding
/// - `CsgFailure::OpenResult` when edges remain unmatched after repair
pub fn stitch(polygons: &[Polygon], tolerance: f64) -> Result<Mesh, CsgFailure> {
    let mut welder = VertexWelder::new(tolerance);
    let mut loops: Vec<Vec<u32>> = polygons
        .iter()
        .filter_map(|polygon| {
            let mut indices: Vec<u32> = Vec::with_capacity(polygon.vertices().len());
            for &vertex in polygon.vertices() {
                let index = welder.insert(vertex);
                if indices.last() != Some(&index) {
                    indices.push(index);
                }
            }
            while indices.len() > 1 && indices.first() == indices.last() {
                indices.pop();
            }
            (indices.len() >= 3).then_some(indices)
        })
        .collect();

    if loops.is_empty() {
        return Err(CsgFailure::EmptyResult);
    }

    let mut positions = welder.into_positions();
    repair_t_junctions(&mut loops, &positions);
    let indices = triangulate_loops(&loops, &mut positions);

    if indices.is_empty() {
        return Err(CsgFailure::EmptyResult);
    }

    let report = EdgeReport::from_triangles(
        indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize]),
    );
    if !report.is_closed() {
        return Err(CsgFailure::OpenResult {
            edges: report.boundary_edges + report.non_manifold_edges,
        });
    }

    Ok(Mesh::indexed(positions, indices)?)
}

/// Inserts vertices that lie on unmatched edges into those edges.
fn repair_t_junctions(loops: &mut [Vec<u32>], positions: &[DVec3]) {
    for _ in 0..MAX_TJUNCTION_PASSES {
        let open = unmatched_edges(loops);
        if open.is_empty() {
            return;
        }

        // Sorted for deterministic insertion order
        let candidates: BTreeSet<u32> = open.iter().flat_map(|&(a, b)| [a, b]).collect();
        let mut changed = false;

        for indices in loops.iter_mut() {
            let mut repaired = Vec::with_capacity(indices.len());
            for k in 0..indices.len() {
                let (a, b) = (indices[k], indices[(k + 1) % indices.len()]);
                repaired.push(a);
                if !open.contains(&(a, b)) {
                    continue;
                }

                let (pa, pb) = (positions[a as usize], positions[b as usize]);
                let mut hits: Vec<(f64, u32)> = candidates
                    .iter()
                    .filter(|&&v| v != a && v != b && !indices.contains(&v))
                    .filter_map(|&v| on_segment(pa, pb, positions[v as usize]).map(|t| (t, v)))
                    .collect();
                if hits.is_empty() {
                    continue;
                }
                hits.sort_by(|x, y| x.0.total_cmp(&y.0));
                repaired.extend(hits.into_iter().map(|(_, v)| v));
                changed = true;
            }
            *indices = repaired;
        }

        if !changed {
            return;
        }
    }
}

/// Directed edges whose reverse is not used equally often.
fn unmatched_edges(loops: &[Vec<u32>]) -> HashSet<(u32, u32)> {
    let mut counts: HashMap<(u32, u32), i64> = HashMap::new();
    for indices in loops {
        for k in 0..indices.len() {
            let edge = (indices[k], indices[(k + 1) % indices.len()]);
            *counts.entry(edge).or_default() += 1;
        }
    }
    counts
        .iter()
        .filter(|(&(a, b), &count)| counts.get(&(b, a)).copied().unwrap_or(0) != count)
        .map(|(&edge, _)| edge)
        .collect()
}

/// Parameter of `p` along `a -> b` if it lies strictly inside the segment.
fn on_segment(a: DVec3, b: DVec3, p: DVec3) -> Option<f64> {
    let d = b - a;
    let length = d.length();
    if length <= CSG_PLANE_EPSILON {
        return None;
    }
    let t = (p - a).dot(d) / (length * length);
    let interior = t * length > CSG_PLANE_EPSILON && (1.0 - t) * length > CSG_PLANE_EPSILON;
    (interior && (a + d * t).distance(p) <= CSG_PLANE_EPSILON).then_some(t)
}

/// Triangulates convex loops, adding a centroid vertex where a plain fan
/// would produce slivers.
fn triangulate_loops(loops: &[Vec<u32>], positions: &mut Vec<DVec3>) -> Vec<u32> {
    let mut indices = Vec::new();

    for ring in loops {
        if ring.len() == 3 {
            push_triangle(&mut indices, [ring[0], ring[1], ring[2]]);
        } else if is_strictly_convex(ring, positions) {
            for k in 1..ring.len() - 1 {
                push_triangle(&mut indices, [ring[0], ring[k], ring[k + 1]]);
            }
        } else {
            let centroid = ring.iter().map(|&i| positions[i as usize]).sum::<DVec3>()
                / ring.len() as f64;
            let center = positions.len() as u32;
            positions.push(centroid);
            for k in 0..ring.len() {
                push_triangle(&mut indices, [center, ring[k], ring[(k + 1) % ring.len()]]);
            }
        }
    }

    indices
}

// Triangles with a repeated index only contribute edges that cancel out
fn push_triangle(indices: &mut Vec<u32>, [a, b, c]: [u32; 3]) {
    if a != b && b != c && c != a {
        indices.extend_from_slice(&[a, b, c]);
    }
}

/// True when every corner turns the same way as the loop normal.
fn is_strictly_convex(ring: &[u32], positions: &[DVec3]) -> bool {
    let point = |k: usize| positions[ring[k % ring.len()] as usize];

    // Newell normal
    let normal = (0..ring.len()).fold(DVec3::ZERO, |n, k| {
        let (p, q) = (point(k), point(k + 1));
        n + DVec3::new(
            (p.y - q.y) * (p.z + q.z),
            (p.z - q.z) * (p.x + q.x),
            (p.x - q.x) * (p.y + q.y),
        )
    });

    (0..ring.len()).all(|k| {
        let (prev, here, next) = (point(k), point(k + 1), point(k + 2));
        (here - prev).cross(next - here).dot(normal) > DEGENERATE_AREA_EPSILON
    })
}
