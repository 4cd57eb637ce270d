//! Error types for frame analysis

use thiserror::Error;

/// Main error type for model building and analysis
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("element from ({0}, {1}) to ({2}, {3}) has zero length")]
    DegenerateGeometry(f64, f64, f64, f64),

    #[error("node {0} not found in model")]
    UnknownNode(usize),

    #[error("element {0} not found in model")]
    UnknownElement(usize),

    #[error("node {0} already carries a support")]
    DuplicateSupport(usize),

    #[error("internal hinge at node {0} requires at least two connected elements")]
    InvalidHinge(usize),

    #[error("singular stiffness matrix - structure is under-constrained or contains a mechanism")]
    SingularSystem,

    #[error("model has no free degrees of freedom")]
    NoFreeDof,
}

/// Result type for frame analysis operations
pub type FrameResult<T> = Result<T, FrameError>;
