//! Distributed loads on elements

use serde::{Deserialize, Serialize};

/// Direction of a distributed load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadDirection {
    /// Perpendicular to the element axis (local y); positive follows the
    /// local y axis, so a negative q on a horizontal element points down
    Element,
    /// Global Y axis, per unit length of the element
    GlobalY,
}

/// A uniform line load over the full length of an element
///
/// Multiple distributed loads on one element accumulate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Load intensity (force per unit length)
    pub q: f64,
    /// Load direction
    pub direction: LoadDirection,
}

impl DistributedLoad {
    /// Create a new uniform distributed load
    pub fn new(q: f64, direction: LoadDirection) -> Self {
        Self { q, direction }
    }

    /// Resolve the load into (axial, transverse) intensities in the
    /// element frame, given the element's direction cosines
    pub fn local_components(&self, cos: f64, sin: f64) -> (f64, f64) {
        match self.direction {
            LoadDirection::Element => (0.0, self.q),
            LoadDirection::GlobalY => (self.q * sin, self.q * cos),
        }
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.q * factor, self.direction)
    }
}
