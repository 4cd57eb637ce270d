//! Support conditions

use serde::{Deserialize, Serialize};

/// Direction a roll support is free to travel in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollDirection {
    /// Free along global X; restrains the Y translation
    X,
    /// Free along global Y; restrains the X translation
    Y,
}

/// Support conditions at a node
///
/// A node carries at most one support. The three flags restrain the planar
/// DOFs (X translation, Y translation, rotation).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Support {
    /// Restrained in X translation
    pub ux: bool,
    /// Restrained in Y translation
    pub uy: bool,
    /// Restrained in rotation
    pub rotation: bool,
}

impl Support {
    /// Create a fully fixed support (all DOFs restrained)
    pub fn fixed() -> Self {
        Self {
            ux: true,
            uy: true,
            rotation: true,
        }
    }

    /// Create a hinged support (translations restrained, rotation free)
    pub fn hinged() -> Self {
        Self {
            ux: true,
            uy: true,
            rotation: false,
        }
    }

    /// Create a roll support restraining the translation normal to the
    /// direction of travel
    pub fn roll(direction: RollDirection) -> Self {
        match direction {
            RollDirection::X => Self {
                ux: false,
                uy: true,
                rotation: false,
            },
            RollDirection::Y => Self {
                ux: true,
                uy: false,
                rotation: false,
            },
        }
    }

    /// Restraint flags in DOF order [ux, uy, rotation]
    pub fn restraints(&self) -> [bool; 3] {
        [self.ux, self.uy, self.rotation]
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.restraints().iter().filter(|r| **r).count()
    }
}
