//! Formbox: box-model form layout
//!
//! Formbox sizes and places the elements of a form. Every element is given a
//! symbolic constraint such as `"sizex:2,growx:0"`, which scales a shared base
//! unit into concrete minimum, preferred and maximum pixel sizes. Rows and
//! columns add those up, and when a container gets more or less room than it
//! prefers, the surplus or deficit is spread over the elements that can still
//! grow or shrink.
//!
//! # Usage
//!
//! ```
//! use formbox::layout::{Constraint, FormTree, LayoutEngine};
//! use formbox::{LayoutConfig, Rect};
//!
//! let mut tree = FormTree::new();
//! let row = tree.add_row();
//! let label = tree.add_element(Constraint::DEFAULT);
//! let field = tree.add_element(Constraint::FILLER_X);
//! tree.attach_child(row, label).unwrap();
//! tree.attach_child(row, field).unwrap();
//!
//! let engine = LayoutEngine::new(tree, LayoutConfig::default());
//! let placements = engine.layout(row, Rect::new(0, 0, 400, 24)).unwrap();
//! assert_eq!(placements[1].bounds.right(), 400);
//! ```

// Core primitives
pub mod primitives;
pub mod error;

// Base unit and configuration
pub mod units;

// Layout system (constraints, boxes, distribution)
pub mod layout;

pub use error::{ConstraintError, LayoutError, UnitError};
pub use primitives::{Point, Rect, Size};
pub use units::{LayoutConfig, UnitContext};
