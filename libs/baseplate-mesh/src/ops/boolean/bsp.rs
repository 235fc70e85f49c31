//! # BSP Tree
//!
//! Binary Space Partitioning tree for CSG subtraction.
//! Based on the csg.js algorithm by Evan Wallace.
//!
//! ## Algorithm
//!
//! Each BSP node contains:
//! - A dividing plane
//! - Polygons coplanar with the plane
//! - Front subtree (polygons in front of plane)
//! - Back subtree (polygons behind plane)
//!
//! ## Storage
//!
//! Nodes live in a flat arena and refer to their children by index. Every
//! traversal uses an explicit work stack, so deep trees built from finely
//! tessellated meshes cannot overflow the call stack.
//!
//! ## Budget
//!
//! Splitting can multiply polygon counts on badly conditioned input. Every
//! node and every split fragment is charged against a [`Budget`]; exhausting
//! it aborts the operation with `CsgFailure::BudgetExceeded`.

use crate::error::CsgFailure;

use super::plane::Plane;
use super::polygon::{Fragments, Polygon};

// =============================================================================
// BUDGET
// =============================================================================

/// Work allowance shared by all trees taking part in one operation.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    limit: usize,
    remaining: usize,
}

impl Budget {
    /// Creates a budget of `limit` polygons.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Charges `amount` units, failing once the allowance is used up.
    pub fn spend(&mut self, amount: usize) -> Result<(), CsgFailure> {
        match self.remaining.checked_sub(amount) {
            Some(rest) => {
                self.remaining = rest;
                Ok(())
            }
            None => Err(CsgFailure::BudgetExceeded { limit: self.limit }),
        }
    }
}

// =============================================================================
// TREE
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Node {
    plane: Option<Plane>,
    polygons: Vec<Polygon>,
    front: Option<usize>,
    back: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Front,
    Back,
}

/// A BSP tree stored as an arena of nodes. Index 0 is the root.
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<Node>,
}

impl BspTree {
    /// Builds a tree from polygons.
    pub fn new(polygons: Vec<Polygon>, budget: &mut Budget) -> Result<Self, CsgFailure> {
        let mut tree = Self {
            nodes: vec![Node::default()],
        };
        tree.build(polygons, budget)?;
        Ok(tree)
    }

    /// Inserts polygons into the tree, creating nodes as needed.
    ///
    /// The first polygon reaching an empty node supplies its plane.
    pub fn build(&mut self, polygons: Vec<Polygon>, budget: &mut Budget) -> Result<(), CsgFailure> {
        let mut stack = vec![(0usize, polygons)];

        while let Some((index, polygons)) = stack.pop() {
            let Some(first) = polygons.first() else {
                continue;
            };
            let plane = *self.nodes[index].plane.get_or_insert(first.plane());

            let mut fragments = Fragments::default();
            for polygon in polygons {
                polygon.split(&plane, &mut fragments);
            }
            budget.spend(fragments.created)?;

            let node = &mut self.nodes[index];
            node.polygons.append(&mut fragments.coplanar_front);
            node.polygons.append(&mut fragments.coplanar_back);

            if !fragments.front.is_empty() {
                let child = self.child(index, Side::Front, budget)?;
                stack.push((child, fragments.front));
            }
            if !fragments.back.is_empty() {
                let child = self.child(index, Side::Back, budget)?;
                stack.push((child, fragments.back));
            }
        }

        Ok(())
    }

    fn child(&mut self, index: usize, side: Side, budget: &mut Budget) -> Result<usize, CsgFailure> {
        let existing = match side {
            Side::Front => self.nodes[index].front,
            Side::Back => self.nodes[index].back,
        };
        if let Some(child) = existing {
            return Ok(child);
        }

        budget.spend(1)?;
        let child = self.nodes.len();
        self.nodes.push(Node::default());
        match side {
            Side::Front => self.nodes[index].front = Some(child),
            Side::Back => self.nodes[index].back = Some(child),
        }
        Ok(child)
    }

    /// Converts solid space to empty space and vice versa.
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            node.plane = node.plane.map(|plane| plane.flip());
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Removes the parts of `polygons` that lie inside this tree's solid.
    pub fn clip_polygons(
        &self,
        polygons: Vec<Polygon>,
        budget: &mut Budget,
    ) -> Result<Vec<Polygon>, CsgFailure> {
        let mut kept = Vec::new();
        let mut stack = vec![(0usize, polygons)];

        while let Some((index, polygons)) = stack.pop() {
            let node = &self.nodes[index];
            let Some(plane) = node.plane else {
                kept.extend(polygons);
                continue;
            };

            let mut fragments = Fragments::default();
            for polygon in polygons {
                polygon.split(&plane, &mut fragments);
            }
            budget.spend(fragments.created)?;

            let mut front = fragments.front;
            front.append(&mut fragments.coplanar_front);
            let mut back = fragments.back;
            back.append(&mut fragments.coplanar_back);

            match node.front {
                Some(child) if !front.is_empty() => stack.push((child, front)),
                Some(_) => {}
                None => kept.extend(front),
            }
            // Without a back subtree, everything behind the plane is inside
            if let Some(child) = node.back {
                if !back.is_empty() {
                    stack.push((child, back));
                }
            }
        }

        Ok(kept)
    }

    /// Removes every polygon of this tree that lies inside `other`.
    pub fn clip_to(&mut self, other: &BspTree, budget: &mut Budget) -> Result<(), CsgFailure> {
        for node in &mut self.nodes {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons, budget)?;
        }
        Ok(())
    }

    /// Collects copies of all polygons in arena order.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes
            .iter()
            .flat_map(|node| node.polygons.iter().cloned())
            .collect()
    }

    /// Consumes the tree, returning its polygons in arena order.
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.nodes
            .into_iter()
            .flat_map(|node| node.polygons)
            .collect()
    }

    /// Number of nodes in the arena.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::triangle_area;
    use crate::shapes::cuboid;
    use glam::DVec3;

    fn cube_polygons(size: f64) -> Vec<Polygon> {
        cuboid(DVec3::splat(size))
            .unwrap()
            .triangle_positions()
            .filter_map(Polygon::from_triangle)
            .collect()
    }

    #[test]
    fn test_cube_tree_has_node_per_face() {
        let mut budget = Budget::new(1000);
        let tree = BspTree::new(cube_polygons(2.0), &mut budget).unwrap();
        // Six face planes, both triangles of a face share a node
        assert_eq!(tree.node_count(), 6);
        assert_eq!(tree.all_polygons().len(), 12);
    }

    #[test]
    fn test_clip_removes_inside_polygons() {
        let mut budget = Budget::new(1000);
        let big = BspTree::new(cube_polygons(4.0), &mut budget).unwrap();
        let kept = big.clip_polygons(cube_polygons(1.0), &mut budget).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn test_clip_keeps_outside_polygons() {
        let mut budget = Budget::new(1000);
        let small = BspTree::new(cube_polygons(1.0), &mut budget).unwrap();
        let kept = small.clip_polygons(cube_polygons(4.0), &mut budget).unwrap();

        // Side faces get split by the small cube's planes, but nothing is lost
        assert!(kept.len() >= 12);
        let area: f64 = kept
            .iter()
            .map(|polygon| {
                let v = polygon.vertices();
                (1..v.len() - 1)
                    .map(|i| triangle_area([v[0], v[i], v[i + 1]]))
                    .sum::<f64>()
            })
            .sum();
        assert!((area - 6.0 * 16.0).abs() < 1e-9, "area {area}");
    }

    #[test]
    fn test_invert_twice_restores_tree() {
        let mut budget = Budget::new(1000);
        let mut tree = BspTree::new(cube_polygons(2.0), &mut budget).unwrap();
        let before = tree.all_polygons();
        tree.invert();
        tree.invert();
        assert_eq!(tree.into_polygons(), before);
    }

    #[test]
    fn test_budget_exhaustion() {
        let mut budget = Budget::new(3);
        let err = BspTree::new(cube_polygons(2.0), &mut budget).unwrap_err();
        assert_eq!(err, CsgFailure::BudgetExceeded { limit: 3 });
    }
}
