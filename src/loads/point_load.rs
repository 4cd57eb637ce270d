//! Point loads - forces and moments applied directly to nodes

use serde::{Deserialize, Serialize};

/// A load applied directly to a node
///
/// Multiple point loads at the same node accumulate (vector sum).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointLoad {
    /// Force in global X direction (N)
    pub fx: f64,
    /// Force in global Y direction (N)
    pub fy: f64,
    /// Moment about the out-of-plane axis (N·m, counterclockwise positive)
    pub mz: f64,
}

impl PointLoad {
    /// Create a new point load with all components
    pub fn new(fx: f64, fy: f64, mz: f64) -> Self {
        Self { fx, fy, mz }
    }

    /// Create a force-only point load
    pub fn force(fx: f64, fy: f64) -> Self {
        Self::new(fx, fy, 0.0)
    }

    /// Create a moment-only point load
    pub fn moment(mz: f64) -> Self {
        Self::new(0.0, 0.0, mz)
    }

    /// Get the load as an array [FX, FY, MZ]
    pub fn as_array(&self) -> [f64; 3] {
        [self.fx, self.fy, self.mz]
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.fx * factor, self.fy * factor, self.mz * factor)
    }
}
