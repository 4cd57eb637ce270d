//! frame2d - A native Rust 2D frame analysis library
//!
//! This library builds and solves planar frame structures with a small,
//! explicit API inspired by anastruct, supporting:
//! - Euler-Bernoulli frame elements (axial stiffness EA, bending stiffness EI)
//! - Fixed, hinged and roll supports
//! - Internal hinges (moment releases between elements)
//! - Nodal point loads and uniform distributed loads
//! - Linear static analysis with reactions and force/displacement diagrams
//!
//! ## Example
//! ```rust
//! use frame2d::prelude::*;
//!
//! let mut model = FrameModel::new();
//!
//! // Portal frame: left column, beam, right column.
//! // Nodes are created implicitly; shared endpoints resolve to one node.
//! model.add_element([0.0, 0.0], [0.0, 5.0]).unwrap();
//! let beam = model.add_element([0.0, 5.0], [5.0, 5.0]).unwrap();
//! model.add_element([5.0, 5.0], [5.0, 0.0]).unwrap();
//!
//! // Fix both column bases
//! model.add_support_fixed(1).unwrap();
//! model.add_support_fixed(4).unwrap();
//!
//! // Uniform downward load on the beam
//! model
//!     .add_distributed_load(beam, DistributedLoad::new(-5.0, LoadDirection::Element))
//!     .unwrap();
//!
//! // Solve and query results
//! let solved = model.solve().unwrap();
//! let eave = solved.node_displacement(2).unwrap();
//! assert!(eave.uy < 0.0);
//! ```

pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::elements::{Element, Node, RollDirection, Section, Support};
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::loads::{DistributedLoad, LoadDirection, PointLoad};
    pub use crate::model::FrameModel;
    pub use crate::results::{
        Diagram, DiagramKind, ElementForces, NodeDisplacement, Reaction, SolvedModel,
    };
}
