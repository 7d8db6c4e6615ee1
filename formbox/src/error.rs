//! Error types.

use thiserror::Error;

use crate::layout::tree::NodeId;

/// A constraint string that could not be parsed.
///
/// The whole string is rejected; there is no partially applied parse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    #[error("unknown clause name: {0:?}")]
    UnknownName(String),

    #[error("clause has no value: {0:?}")]
    MissingValue(String),

    #[error("invalid number {value:?} in clause {clause:?}")]
    InvalidNumber { clause: String, value: String },
}

/// A unit context field outside its allowed range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i32 },
}

/// Misuse of a layout tree handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("node {0} is not a box")]
    NotABox(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("node {0} already has a parent")]
    AlreadyAttached(NodeId),

    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}
