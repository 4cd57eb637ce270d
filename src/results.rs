//! Solved model and result access

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Displacement results at a node
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in global X direction
    pub ux: f64,
    /// Displacement in global Y direction
    pub uy: f64,
    /// Rotation (counterclockwise positive)
    pub rotation: f64,
}

impl NodeDisplacement {
    /// Create from array [UX, UY, ROTATION]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            ux: arr[0],
            uy: arr[1],
            rotation: arr[2],
        }
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.ux.powi(2) + self.uy.powi(2)).sqrt()
    }
}

/// Reaction forces at a supported node
///
/// Components at unrestrained DOFs are zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Reaction {
    /// Reaction force in global X direction
    pub fx: f64,
    /// Reaction force in global Y direction
    pub fy: f64,
    /// Reaction moment (counterclockwise positive)
    pub mz: f64,
}

impl Reaction {
    /// Create from array [FX, FY, MZ]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
            mz: arr[2],
        }
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2)).sqrt()
    }
}

/// Internal forces at both ends of an element, in local coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ElementForces {
    /// Axial force at the start node (tension positive)
    pub axial_i: f64,
    /// Shear force at the start node
    pub shear_i: f64,
    /// Bending moment at the start node
    pub moment_i: f64,
    /// Axial force at the end node
    pub axial_j: f64,
    /// Shear force at the end node
    pub shear_j: f64,
    /// Bending moment at the end node
    pub moment_j: f64,
}

/// Per-element solved state in local coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct ElementSolution {
    /// Element length
    pub(crate) length: f64,
    /// Local end forces [Fx_i, Fy_i, M_i, Fx_j, Fy_j, M_j]
    pub(crate) end_forces: [f64; 6],
    /// Local end displacements [u_i, v_i, theta_i, u_j, v_j, theta_j],
    /// with released DOFs recovered from the condensation
    pub(crate) end_displacements: [f64; 6],
    /// Total axial load intensity (local x)
    pub(crate) q_axial: f64,
    /// Total transverse load intensity (local y)
    pub(crate) q_transverse: f64,
}

impl ElementSolution {
    fn clamp(&self, s: f64) -> f64 {
        s.clamp(0.0, self.length)
    }

    /// Axial force at distance s from the start node (tension positive)
    fn axial_at(&self, s: f64) -> f64 {
        -(self.end_forces[0] + self.q_axial * s)
    }

    /// Shear force at distance s from the start node
    fn shear_at(&self, s: f64) -> f64 {
        -(self.end_forces[1] + self.q_transverse * s)
    }

    /// Bending moment at distance s from the start node
    ///
    /// M(s) = M_i - Fy_i*s - q*s^2/2, so dM/ds equals the shear force and a
    /// uniform load q on a simply supported span gives M(L/2) = qL²/8 with
    /// the sign of q.
    fn moment_at(&self, s: f64) -> f64 {
        self.end_forces[2] - self.end_forces[1] * s - self.q_transverse * s * s / 2.0
    }

    /// Transverse displacement at distance s, by cubic Hermite
    /// interpolation of the local end displacements and rotations
    fn displacement_at(&self, s: f64) -> f64 {
        let l = self.length;
        let xi = s / l;
        let xi2 = xi * xi;
        let xi3 = xi2 * xi;

        let h1 = 1.0 - 3.0 * xi2 + 2.0 * xi3;
        let h2 = l * (xi - 2.0 * xi2 + xi3);
        let h3 = 3.0 * xi2 - 2.0 * xi3;
        let h4 = l * (xi3 - xi2);

        let d = &self.end_displacements;
        h1 * d[1] + h2 * d[2] + h3 * d[4] + h4 * d[5]
    }

    fn sample(&self, kind: DiagramKind, s: f64) -> f64 {
        match kind {
            DiagramKind::Moment => self.moment_at(s),
            DiagramKind::Shear => self.shear_at(s),
            DiagramKind::Axial => self.axial_at(s),
            DiagramKind::Displacement => self.displacement_at(s),
        }
    }
}

/// Which quantity a diagram samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagramKind {
    /// Bending moment M(s)
    Moment,
    /// Shear force V(s)
    Shear,
    /// Axial force N(s)
    Axial,
    /// Transverse displacement w(s)
    Displacement,
}

/// A lazy, finite, restartable sequence of (position, value) samples along
/// an element
///
/// Samples are computed on demand at evenly spaced positions from 0 to the
/// element length. The iterator is `Clone`, and `restart` rewinds it to the
/// first sample.
#[derive(Debug, Clone)]
pub struct Diagram {
    element: ElementSolution,
    kind: DiagramKind,
    samples: usize,
    cursor: usize,
}

impl Diagram {
    fn new(element: ElementSolution, kind: DiagramKind, samples: usize) -> Self {
        Self {
            element,
            kind,
            // A diagram needs at least both element ends
            samples: samples.max(2),
            cursor: 0,
        }
    }

    /// The quantity this diagram samples
    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    /// Rewind to the first sample
    pub fn restart(&mut self) {
        self.cursor = 0;
    }
}

impl Iterator for Diagram {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<(f64, f64)> {
        if self.cursor >= self.samples {
            return None;
        }
        let s = self.element.length * self.cursor as f64 / (self.samples - 1) as f64;
        self.cursor += 1;
        Some((s, self.element.sample(self.kind, s)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Diagram {}

/// Results of a linear solve, detached from the model that produced them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolvedModel {
    /// Nodal displacements by node id [ux, uy, rotation]
    pub(crate) displacements: BTreeMap<usize, [f64; 3]>,
    /// Reactions by supported node id [fx, fy, mz]
    pub(crate) reactions: BTreeMap<usize, [f64; 3]>,
    /// Per-element solved state by element id
    pub(crate) elements: BTreeMap<usize, ElementSolution>,
}

impl SolvedModel {
    fn element(&self, element_id: usize) -> FrameResult<&ElementSolution> {
        self.elements
            .get(&element_id)
            .ok_or(FrameError::UnknownElement(element_id))
    }

    /// Get the displacement of a node
    pub fn node_displacement(&self, node_id: usize) -> FrameResult<NodeDisplacement> {
        self.displacements
            .get(&node_id)
            .copied()
            .map(NodeDisplacement::from_array)
            .ok_or(FrameError::UnknownNode(node_id))
    }

    /// Get the reaction at a node
    ///
    /// Nodes without a support report zero reactions; unknown ids fail.
    pub fn reaction_at(&self, node_id: usize) -> FrameResult<Reaction> {
        if !self.displacements.contains_key(&node_id) {
            return Err(FrameError::UnknownNode(node_id));
        }
        Ok(self
            .reactions
            .get(&node_id)
            .copied()
            .map(Reaction::from_array)
            .unwrap_or(Reaction {
                fx: 0.0,
                fy: 0.0,
                mz: 0.0,
            }))
    }

    /// Get the length of an element
    pub fn element_length(&self, element_id: usize) -> FrameResult<f64> {
        Ok(self.element(element_id)?.length)
    }

    /// Bending moment at distance s from the element's start node
    ///
    /// Positions are clamped to [0, L].
    pub fn bending_moment_at(&self, element_id: usize, s: f64) -> FrameResult<f64> {
        let element = self.element(element_id)?;
        Ok(element.moment_at(element.clamp(s)))
    }

    /// Shear force at distance s from the element's start node
    pub fn shear_force_at(&self, element_id: usize, s: f64) -> FrameResult<f64> {
        let element = self.element(element_id)?;
        Ok(element.shear_at(element.clamp(s)))
    }

    /// Axial force at distance s from the element's start node (tension
    /// positive)
    pub fn axial_force_at(&self, element_id: usize, s: f64) -> FrameResult<f64> {
        let element = self.element(element_id)?;
        Ok(element.axial_at(element.clamp(s)))
    }

    /// Transverse displacement at distance s from the element's start node,
    /// in the element's local frame
    pub fn displacement_at(&self, element_id: usize, s: f64) -> FrameResult<f64> {
        let element = self.element(element_id)?;
        Ok(element.displacement_at(element.clamp(s)))
    }

    /// Internal forces at both element ends
    pub fn element_forces(&self, element_id: usize) -> FrameResult<ElementForces> {
        let element = self.element(element_id)?;
        let l = element.length;
        Ok(ElementForces {
            axial_i: element.axial_at(0.0),
            shear_i: element.shear_at(0.0),
            moment_i: element.moment_at(0.0),
            axial_j: element.axial_at(l),
            shear_j: element.shear_at(l),
            moment_j: element.moment_at(l),
        })
    }

    /// Bending moment diagram with the given number of samples
    pub fn moment_diagram(&self, element_id: usize, samples: usize) -> FrameResult<Diagram> {
        Ok(Diagram::new(*self.element(element_id)?, DiagramKind::Moment, samples))
    }

    /// Shear force diagram with the given number of samples
    pub fn shear_diagram(&self, element_id: usize, samples: usize) -> FrameResult<Diagram> {
        Ok(Diagram::new(*self.element(element_id)?, DiagramKind::Shear, samples))
    }

    /// Axial force diagram with the given number of samples
    pub fn axial_diagram(&self, element_id: usize, samples: usize) -> FrameResult<Diagram> {
        Ok(Diagram::new(*self.element(element_id)?, DiagramKind::Axial, samples))
    }

    /// Transverse displacement diagram with the given number of samples
    pub fn displacement_diagram(&self, element_id: usize, samples: usize) -> FrameResult<Diagram> {
        Ok(Diagram::new(
            *self.element(element_id)?,
            DiagramKind::Displacement,
            samples,
        ))
    }

    /// Node ids of the solved model
    pub fn node_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.displacements.keys().copied()
    }

    /// Element ids of the solved model
    pub fn element_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements.keys().copied()
    }
}
