//! Section properties for frame elements

use serde::{Deserialize, Serialize};

/// Cross-section stiffness of a planar frame element
///
/// The 2D element consumes exactly two products of material and geometry:
/// axial stiffness EA and bending stiffness EI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Section {
    /// Axial stiffness EA in N
    pub ea: f64,
    /// Bending stiffness EI in N·m²
    pub ei: f64,
}

impl Section {
    /// Create a section from its stiffness products
    pub fn new(ea: f64, ei: f64) -> Self {
        Self { ea, ei }
    }

    /// Create a section from modulus of elasticity, area and moment of inertia
    pub fn from_material(e: f64, a: f64, i: f64) -> Self {
        Self::new(e * a, e * i)
    }

    /// Create a rectangular section
    ///
    /// # Arguments
    /// * `e` - Modulus of elasticity in Pa
    /// * `width` - Section width in m
    /// * `depth` - Section depth (in the bending plane) in m
    pub fn rectangular(e: f64, width: f64, depth: f64) -> Self {
        let a = width * depth;
        let i = width * depth.powi(3) / 12.0;
        Self::from_material(e, a, i)
    }

    /// Create a circular section
    pub fn circular(e: f64, diameter: f64) -> Self {
        let r = diameter / 2.0;
        let a = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * r.powi(4) / 4.0;
        Self::from_material(e, a, i)
    }
}

impl Default for Section {
    /// Default stiffness values matching anastruct's element defaults
    fn default() -> Self {
        Self::new(15e3, 5e3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_section() {
        let e = 200e9;
        let section = Section::rectangular(e, 0.3, 0.5);
        assert!((section.ea - e * 0.15).abs() < 1e-3);
        assert!((section.ei - e * 0.3 * 0.5_f64.powi(3) / 12.0).abs() < 1e-3);
    }

    #[test]
    fn test_default_matches_anastruct() {
        let section = Section::default();
        assert_eq!(section.ea, 15e3);
        assert_eq!(section.ei, 5e3);
    }
}
