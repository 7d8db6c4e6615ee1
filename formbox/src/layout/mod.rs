//! Layout system for formbox
//!
//! Boxes lay their children out along one axis. Each element carries a
//! constraint that scales a shared base unit into min/preferred/max pixel
//! extents; a box sums those up, and when it is given more or less room than
//! it prefers, the difference is spread over the children that can still
//! grow or shrink.
//!
//! # Pipeline
//!
//! ```text
//! resolve -> cache -> aggregate -> distribute -> bounds
//! ```
//!
//! `LayoutEngine` runs that pipeline under a single lock per call.

pub mod axis;
pub mod constraint;
pub mod resolve;

// cache and aggregate call into each other for nested boxes
pub mod cache;
pub mod aggregate;

pub mod distribute;
pub mod bounds;
pub mod tree;
pub mod max_grow;
pub mod engine;

// Re-export core types
pub use axis::{Axis, Direction, Insets};
pub use constraint::Constraint;
pub use resolve::{resolve, resolve_constraint, round_up, Intrinsic, SizeSource, SizeTriple};
pub use cache::{Measured, SizeCache};
pub use aggregate::aggregate;
pub use distribute::{distribute, Distribution, DistributionPolicy};
pub use bounds::assign;
pub use tree::{BoxNode, ElementNode, FormTree, Node, NodeId, NodeKind};
pub use max_grow::{propagate_max_grow, MaxGrow};
pub use engine::{CacheMode, LayoutEngine, Placement};
