//! Mesh types for 1-D finite element analysis
//!
//! An interval is split into line elements. Nodes are stored in ascending
//! order and element `e` joins nodes `e` and `e + 1`.

use crate::error::{FemError, Result};
use serde::{Deserialize, Serialize};

/// Boundary marker of the left end point
pub const LEFT_BOUNDARY: usize = 1;
/// Boundary marker of the right end point
pub const RIGHT_BOUNDARY: usize = 2;

/// A two-node line element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Node indices (left, right)
    pub nodes: [usize; 2],
    /// Element ID
    pub id: usize,
}

impl Element {
    pub fn new(nodes: [usize; 2], id: usize) -> Self {
        Self { nodes, id }
    }

    /// Vertex nodes of this element
    pub fn vertices(&self) -> &[usize] {
        &self.nodes
    }
}

/// A boundary point of the interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    /// Node index of the end point
    pub node: usize,
    /// Boundary marker (for identifying different boundaries)
    pub marker: usize,
}

/// 1-D finite element mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Node coordinates, strictly increasing
    pub nodes: Vec<f64>,
    /// Line elements
    pub elements: Vec<Element>,
    /// Marked end points
    pub boundaries: Vec<BoundaryPoint>,
}

impl Mesh {
    /// Build a mesh from strictly increasing node coordinates
    ///
    /// Consecutive nodes are joined into elements, and the end points are
    /// marked [`LEFT_BOUNDARY`] and [`RIGHT_BOUNDARY`].
    pub fn from_nodes(nodes: Vec<f64>) -> Result<Self> {
        if nodes.len() < 2 {
            return Err(FemError::invalid_mesh(format!(
                "at least 2 nodes are required, got {}",
                nodes.len()
            )));
        }
        if let Some(bad) = nodes.iter().find(|x| !x.is_finite()) {
            return Err(FemError::invalid_mesh(format!(
                "node coordinate {bad} is not finite"
            )));
        }
        if let Some(w) = nodes.windows(2).find(|w| w[1] <= w[0]) {
            return Err(FemError::invalid_mesh(format!(
                "nodes must be strictly increasing ({} followed by {})",
                w[0], w[1]
            )));
        }

        let elements = (0..nodes.len() - 1)
            .map(|e| Element::new([e, e + 1], e))
            .collect();
        let boundaries = vec![
            BoundaryPoint {
                node: 0,
                marker: LEFT_BOUNDARY,
            },
            BoundaryPoint {
                node: nodes.len() - 1,
                marker: RIGHT_BOUNDARY,
            },
        ];

        Ok(Self {
            nodes,
            elements,
            boundaries,
        })
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Get element by index
    pub fn element(&self, idx: usize) -> &Element {
        &self.elements[idx]
    }

    /// Physical end points of an element
    pub fn element_coords(&self, elem_idx: usize) -> [f64; 2] {
        let [a, b] = self.elements[elem_idx].nodes;
        [self.nodes[a], self.nodes[b]]
    }

    /// Element length
    pub fn element_measure(&self, elem_idx: usize) -> f64 {
        let [x0, x1] = self.element_coords(elem_idx);
        x1 - x0
    }

    /// Left and right end of the meshed interval
    pub fn bounds(&self) -> (f64, f64) {
        (self.nodes[0], self.nodes[self.nodes.len() - 1])
    }

    /// Nodes carrying the given boundary marker
    pub fn boundary_nodes(&self, marker: usize) -> Vec<usize> {
        self.boundaries
            .iter()
            .filter(|b| b.marker == marker)
            .map(|b| b.node)
            .collect()
    }

    /// Index of the element containing `x`
    ///
    /// Points on an interior node belong to the element on their right; the
    /// right end point belongs to the last element. Returns `None` outside
    /// the interval.
    pub fn locate(&self, x: f64) -> Option<usize> {
        let (lower, upper) = self.bounds();
        if !(lower..=upper).contains(&x) {
            return None;
        }
        let first_right = self.nodes.partition_point(|&node| node <= x);
        Some(first_right.saturating_sub(1).min(self.num_elements() - 1))
    }
}
