//! FrameModel - structural model container and solver

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::elements::{Element, Node, RollDirection, Section, Support};
use crate::error::{FrameError, FrameResult};
use crate::loads::{DistributedLoad, PointLoad};
use crate::math::{self, DVec, Mat, Mat6, Vec6};
use crate::results::{ElementSolution, SolvedModel};

/// Spatial lookup resolution for implicit node reuse
const POSITION_RESOLUTION: f64 = 1e-9;

/// Elements shorter than this are rejected as degenerate
const MIN_ELEMENT_LENGTH: f64 = 1e-10;

/// Relative residual above which a solution is treated as singular
const RESIDUAL_TOLERANCE: f64 = 1e-6;

/// The planar frame model
///
/// Built incrementally via add-operations; `solve` is a pure function of
/// the current state and returns a detached [`SolvedModel`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameModel {
    /// Nodes by id (1-based, sequential)
    pub nodes: BTreeMap<usize, Node>,
    /// Elements by id (1-based, sequential)
    pub elements: BTreeMap<usize, Element>,
    /// Supports by node id (at most one per node)
    pub supports: BTreeMap<usize, Support>,
    /// Nodes marked as internal hinges
    pub hinges: BTreeSet<usize>,
    /// Point loads by node id (accumulating)
    pub point_loads: BTreeMap<usize, Vec<PointLoad>>,
    /// Distributed loads by element id (accumulating)
    pub distributed_loads: BTreeMap<usize, Vec<DistributedLoad>>,

    /// Rounded-coordinate index for implicit node reuse
    #[serde(skip)]
    position_index: HashMap<(i64, i64), usize>,
}

fn position_key(x: f64, y: f64) -> (i64, i64) {
    (
        (x / POSITION_RESOLUTION).round() as i64,
        (y / POSITION_RESOLUTION).round() as i64,
    )
}

fn dof_index(node_id: usize) -> usize {
    3 * (node_id - 1)
}

/// Per-element matrices prepared for assembly
struct PreparedElement {
    releases: [bool; 6],
    k_raw: Mat6,
    k_condensed: Mat6,
    fer_raw: Vec6,
    fer_condensed: Vec6,
    t: Mat6,
    q_axial: f64,
    q_transverse: f64,
}

impl FrameModel {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add an element between two points with the default section
    ///
    /// Endpoints matching an existing node position (within the spatial
    /// lookup resolution) reuse that node; otherwise a new node is created.
    /// Returns the new element's id.
    pub fn add_element(&mut self, start: [f64; 2], end: [f64; 2]) -> FrameResult<usize> {
        self.add_element_with(start, end, Section::default())
    }

    /// Add an element with explicit section properties
    pub fn add_element_with(
        &mut self,
        start: [f64; 2],
        end: [f64; 2],
        section: Section,
    ) -> FrameResult<usize> {
        let dx = end[0] - start[0];
        let dy = end[1] - start[1];
        let degenerate = (dx * dx + dy * dy).sqrt() < MIN_ELEMENT_LENGTH
            || position_key(start[0], start[1]) == position_key(end[0], end[1]);
        if degenerate {
            return Err(FrameError::DegenerateGeometry(
                start[0], start[1], end[0], end[1],
            ));
        }

        let node_i = self.find_or_create_node(start);
        let node_j = self.find_or_create_node(end);

        let id = self.elements.len() + 1;

        // Use the resolved node positions: an endpoint may have snapped to
        // a previously created node
        let i = self.nodes.get(&node_i).unwrap();
        let j = self.nodes.get(&node_j).unwrap();
        let element = Element::new(id, node_i, node_j, section, j.x - i.x, j.y - i.y);

        self.nodes.get_mut(&node_i).unwrap().elements.push(id);
        self.nodes.get_mut(&node_j).unwrap().elements.push(id);
        self.elements.insert(id, element);

        Ok(id)
    }

    /// Add a fully fixed support at a node
    pub fn add_support_fixed(&mut self, node_id: usize) -> FrameResult<()> {
        self.add_support(node_id, Support::fixed())
    }

    /// Add a hinged (pinned) support at a node
    pub fn add_support_hinged(&mut self, node_id: usize) -> FrameResult<()> {
        self.add_support(node_id, Support::hinged())
    }

    /// Add a roll support at a node
    pub fn add_support_roll(
        &mut self,
        node_id: usize,
        direction: RollDirection,
    ) -> FrameResult<()> {
        self.add_support(node_id, Support::roll(direction))
    }

    /// Add a support with explicit restraints
    ///
    /// A node carries at most one support; a second call for the same node
    /// fails with [`FrameError::DuplicateSupport`].
    pub fn add_support(&mut self, node_id: usize, support: Support) -> FrameResult<()> {
        if !self.nodes.contains_key(&node_id) {
            return Err(FrameError::UnknownNode(node_id));
        }
        if self.supports.contains_key(&node_id) {
            return Err(FrameError::DuplicateSupport(node_id));
        }
        self.supports.insert(node_id, support);
        Ok(())
    }

    /// Mark a node as an internal hinge (moment release between elements)
    ///
    /// The node must be shared by at least two elements when the hinge is
    /// added.
    pub fn add_internal_hinge(&mut self, node_id: usize) -> FrameResult<()> {
        let node = self
            .nodes
            .get(&node_id)
            .ok_or(FrameError::UnknownNode(node_id))?;
        if node.elements.len() < 2 {
            return Err(FrameError::InvalidHinge(node_id));
        }
        self.hinges.insert(node_id);
        Ok(())
    }

    /// Add a point load to a node
    ///
    /// Multiple loads at the same node accumulate (vector sum).
    pub fn add_point_load(&mut self, node_id: usize, load: PointLoad) -> FrameResult<()> {
        if !self.nodes.contains_key(&node_id) {
            return Err(FrameError::UnknownNode(node_id));
        }
        self.point_loads.entry(node_id).or_default().push(load);
        Ok(())
    }

    /// Add a uniform distributed load to an element
    ///
    /// Multiple loads on the same element accumulate.
    pub fn add_distributed_load(
        &mut self,
        element_id: usize,
        load: DistributedLoad,
    ) -> FrameResult<()> {
        if !self.elements.contains_key(&element_id) {
            return Err(FrameError::UnknownElement(element_id));
        }
        self.distributed_loads
            .entry(element_id)
            .or_default()
            .push(load);
        Ok(())
    }

    /// Look up the node at a position, if one exists
    pub fn node_id_at(&self, point: [f64; 2]) -> Option<usize> {
        let key = position_key(point[0], point[1]);
        self.nodes
            .values()
            .find(|node| position_key(node.x, node.y) == key)
            .map(|node| node.id)
    }

    fn find_or_create_node(&mut self, point: [f64; 2]) -> usize {
        self.ensure_position_index();

        let key = position_key(point[0], point[1]);
        if let Some(&id) = self.position_index.get(&key) {
            return id;
        }

        let id = self.nodes.len() + 1;
        self.nodes.insert(id, Node::new(id, point[0], point[1]));
        self.position_index.insert(key, id);
        id
    }

    /// Rebuild the spatial index when it is out of sync with the nodes
    /// (after deserialization the index is empty)
    fn ensure_position_index(&mut self) {
        if self.position_index.len() != self.nodes.len() {
            self.position_index = self
                .nodes
                .values()
                .map(|node| (position_key(node.x, node.y), node.id))
                .collect();
        }
    }

    // ========================
    // Analysis
    // ========================

    /// Run a linear static analysis of the current model state
    ///
    /// Performs a fresh assembly and solve on every call; the model itself
    /// is not modified, so solving an unchanged model twice yields
    /// identical results.
    pub fn solve(&self) -> FrameResult<SolvedModel> {
        let n_nodes = self.nodes.len();
        let n_dofs = 3 * n_nodes;

        debug!(
            "assembling global system: {} nodes, {} elements, {} dofs",
            n_nodes,
            self.elements.len(),
            n_dofs
        );

        let prepared = self.prepare_elements();
        let k_global = self.assemble_stiffness(&prepared, n_dofs);
        let p_global = self.assemble_loads(&prepared, n_dofs);

        let u = self.solve_displacements(&k_global, &p_global, n_dofs)?;

        debug!("solve complete, recovering element forces and reactions");
        Ok(self.post_process(&prepared, &u))
    }

    /// Build per-element matrices: local stiffness, transformation,
    /// fixed-end forces and hinge releases
    fn prepare_elements(&self) -> BTreeMap<usize, PreparedElement> {
        self.elements
            .values()
            .map(|element| {
                let releases = self.element_releases(element);

                let k_raw = math::element_local_stiffness(
                    element.section.ea,
                    element.section.ei,
                    element.length,
                );

                let (mut q_axial, mut q_transverse) = (0.0, 0.0);
                if let Some(loads) = self.distributed_loads.get(&element.id) {
                    for load in loads {
                        let (qx, qy) = load.local_components(element.cos, element.sin);
                        q_axial += qx;
                        q_transverse += qy;
                    }
                }

                let fer_raw = math::fer_uniform(q_axial, q_transverse, element.length);
                let k_condensed = math::apply_releases(&k_raw, &releases);
                let fer_condensed = math::apply_fer_releases(&fer_raw, &k_raw, &releases);
                let t = math::element_transformation(element.cos, element.sin);

                (
                    element.id,
                    PreparedElement {
                        releases,
                        k_raw,
                        k_condensed,
                        fer_raw,
                        fer_condensed,
                        t,
                        q_axial,
                        q_transverse,
                    },
                )
            })
            .collect()
    }

    /// Rotational releases of an element induced by internal hinges
    fn element_releases(&self, element: &Element) -> [bool; 6] {
        let mut releases = [false; 6];
        if self.is_released_at(element.id, element.node_i) {
            releases[2] = true;
        }
        if self.is_released_at(element.id, element.node_j) {
            releases[5] = true;
        }
        releases
    }

    /// At a hinge node the incident element with the smallest id keeps the
    /// nodal rotation DOF; every other element is released there. This
    /// keeps the global matrix nonsingular without renumbering DOFs.
    fn is_released_at(&self, element_id: usize, node_id: usize) -> bool {
        if !self.hinges.contains(&node_id) {
            return false;
        }
        let node = self.nodes.get(&node_id).unwrap();
        node.elements.iter().copied().min() != Some(element_id)
    }

    /// Build the global stiffness matrix
    fn assemble_stiffness(
        &self,
        prepared: &BTreeMap<usize, PreparedElement>,
        n_dofs: usize,
    ) -> Mat {
        let mut k_global = Mat::zeros(n_dofs, n_dofs);

        for element in self.elements.values() {
            let prep = &prepared[&element.id];

            // Transform to global: K_global = T^T * K_local * T
            let k_element = prep.t.transpose() * prep.k_condensed * prep.t;

            let i_dof = dof_index(element.node_i);
            let j_dof = dof_index(element.node_j);

            for a in 0..3 {
                for b in 0..3 {
                    k_global[(i_dof + a, i_dof + b)] += k_element[(a, b)];
                    k_global[(i_dof + a, j_dof + b)] += k_element[(a, b + 3)];
                    k_global[(j_dof + a, i_dof + b)] += k_element[(a + 3, b)];
                    k_global[(j_dof + a, j_dof + b)] += k_element[(a + 3, b + 3)];
                }
            }
        }

        k_global
    }

    /// Build the global load vector
    fn assemble_loads(&self, prepared: &BTreeMap<usize, PreparedElement>, n_dofs: usize) -> DVec {
        let mut p = DVec::zeros(n_dofs);

        // Point loads apply directly
        for (node_id, loads) in &self.point_loads {
            let dof = dof_index(*node_id);
            for load in loads {
                let load_arr = load.as_array();
                for i in 0..3 {
                    p[dof + i] += load_arr[i];
                }
            }
        }

        // Distributed loads enter through their fixed-end forces
        for element in self.elements.values() {
            let prep = &prepared[&element.id];
            if prep.q_axial == 0.0 && prep.q_transverse == 0.0 {
                continue;
            }

            let fer_global = prep.t.transpose() * prep.fer_condensed;

            let i_dof = dof_index(element.node_i);
            let j_dof = dof_index(element.node_j);
            for i in 0..3 {
                p[i_dof + i] -= fer_global[i];
                p[j_dof + i] -= fer_global[i + 3];
            }
        }

        p
    }

    /// Partition the DOFs, solve the reduced system and expand back to the
    /// full displacement vector
    fn solve_displacements(
        &self,
        k_global: &Mat,
        p_global: &DVec,
        n_dofs: usize,
    ) -> FrameResult<DVec> {
        let mut restrained = vec![false; n_dofs];
        for (node_id, support) in &self.supports {
            let base = dof_index(*node_id);
            for (offset, flag) in support.restraints().iter().enumerate() {
                if *flag {
                    restrained[base + offset] = true;
                }
            }
        }

        // A planar structure needs at least three restrained DOFs to
        // suppress rigid-body motion
        let n_restrained = restrained.iter().filter(|r| **r).count();
        if n_restrained < 3 {
            return Err(FrameError::SingularSystem);
        }

        let free_dofs: Vec<usize> = (0..n_dofs).filter(|&dof| !restrained[dof]).collect();
        if free_dofs.is_empty() {
            return Err(FrameError::NoFreeDof);
        }

        let n_free = free_dofs.len();
        let mut k_ff = Mat::zeros(n_free, n_free);
        let mut p_f = DVec::zeros(n_free);

        for (i, &di) in free_dofs.iter().enumerate() {
            p_f[i] = p_global[di];
            for (j, &dj) in free_dofs.iter().enumerate() {
                k_ff[(i, j)] = k_global[(di, dj)];
            }
        }

        let u_f = math::solve_linear_system(&k_ff, &p_f).ok_or(FrameError::SingularSystem)?;

        // LU hands back garbage instead of failing for numerically singular
        // systems; the residual check turns that into an error
        let residual = (&k_ff * &u_f - &p_f).amax();
        let scale = p_f.amax().max(1.0);
        if !residual.is_finite() || residual > RESIDUAL_TOLERANCE * scale {
            return Err(FrameError::SingularSystem);
        }

        let mut u = DVec::zeros(n_dofs);
        for (i, &di) in free_dofs.iter().enumerate() {
            u[di] = u_f[i];
        }
        Ok(u)
    }

    /// Recover element end forces, released-DOF displacements and support
    /// reactions from the displacement vector
    fn post_process(&self, prepared: &BTreeMap<usize, PreparedElement>, u: &DVec) -> SolvedModel {
        let mut displacements = BTreeMap::new();
        for node in self.nodes.values() {
            let base = dof_index(node.id);
            displacements.insert(node.id, [u[base], u[base + 1], u[base + 2]]);
        }

        let mut reactions: BTreeMap<usize, [f64; 3]> =
            self.supports.keys().map(|&id| (id, [0.0; 3])).collect();
        let mut element_solutions = BTreeMap::new();

        for element in self.elements.values() {
            let prep = &prepared[&element.id];
            let i_dof = dof_index(element.node_i);
            let j_dof = dof_index(element.node_j);

            let d_global = Vec6::new(
                u[i_dof],
                u[i_dof + 1],
                u[i_dof + 2],
                u[j_dof],
                u[j_dof + 1],
                u[j_dof + 2],
            );
            let d_local = prep.t * d_global;

            // End forces: F = K_cond * d + FER_cond; released DOFs carry none
            let f_local = prep.k_condensed * d_local + prep.fer_condensed;

            // Displacements at released DOFs come from the condensation,
            // not from the (meaningless) nodal rotation
            let d_recovered = math::recover_released_displacements(
                &d_local,
                &prep.fer_raw,
                &prep.k_raw,
                &prep.releases,
            );

            // Accumulate global end forces into the support reactions
            let f_global = prep.t.transpose() * f_local;
            if let Some(reaction) = reactions.get_mut(&element.node_i) {
                for i in 0..3 {
                    reaction[i] += f_global[i];
                }
            }
            if let Some(reaction) = reactions.get_mut(&element.node_j) {
                for i in 0..3 {
                    reaction[i] += f_global[i + 3];
                }
            }

            let mut end_forces = [0.0; 6];
            let mut end_displacements = [0.0; 6];
            for i in 0..6 {
                end_forces[i] = f_local[i];
                end_displacements[i] = d_recovered[i];
            }

            element_solutions.insert(
                element.id,
                ElementSolution {
                    length: element.length,
                    end_forces,
                    end_displacements,
                    q_axial: prep.q_axial,
                    q_transverse: prep.q_transverse,
                },
            );
        }

        // Subtract loads applied directly to supported nodes, then mask
        // components at unrestrained DOFs (they only hold roundoff)
        for (node_id, reaction) in reactions.iter_mut() {
            if let Some(loads) = self.point_loads.get(node_id) {
                for load in loads {
                    let load_arr = load.as_array();
                    for i in 0..3 {
                        reaction[i] -= load_arr[i];
                    }
                }
            }

            let mask = self.supports.get(node_id).unwrap().restraints();
            for i in 0..3 {
                if !mask[i] {
                    reaction[i] = 0.0;
                }
            }
        }

        SolvedModel {
            displacements,
            reactions,
            elements: element_solutions,
        }
    }
}
