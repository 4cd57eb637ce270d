//! Node - a point in the 2D frame

use serde::{Deserialize, Serialize};

/// A node in the planar frame model
///
/// Nodes are created by the model when an element endpoint does not match
/// any existing node position; ids are 1-based and sequential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Node id, assigned by the model
    pub id: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Ids of the elements meeting at this node
    pub elements: Vec<usize>,
}

impl Node {
    pub(crate) fn new(id: usize, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            elements: Vec::new(),
        }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(1, 0.0, 0.0);
        let n2 = Node::new(2, 3.0, 4.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }
}
