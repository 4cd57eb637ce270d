//! Element - planar Euler-Bernoulli frame element

use serde::{Deserialize, Serialize};

use super::section::Section;

/// A frame element connecting two nodes
///
/// Length and orientation are derived from the node positions when the
/// element is added and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Element id, assigned sequentially by the model (1-based)
    pub id: usize,
    /// Start node id
    pub node_i: usize,
    /// End node id
    pub node_j: usize,
    /// Cross-section stiffness properties
    pub section: Section,
    /// Element length
    pub length: f64,
    /// Direction cosine of the element axis (x component)
    pub cos: f64,
    /// Direction sine of the element axis (y component)
    pub sin: f64,
}

impl Element {
    pub(crate) fn new(id: usize, node_i: usize, node_j: usize, section: Section, dx: f64, dy: f64) -> Self {
        let length = (dx * dx + dy * dy).sqrt();
        Self {
            id,
            node_i,
            node_j,
            section,
            length,
            cos: dx / length,
            sin: dy / length,
        }
    }

    /// Orientation angle of the element axis in radians
    pub fn angle(&self) -> f64 {
        self.sin.atan2(self.cos)
    }
}
