//! lakeview-algebra
//!
//! The discovery algebra: keyword lookups, neighbor expansion, bounded
//! traversal, transitive path search and set combinators over [`Drs`] values,
//! plus the annotation API built on the same primitives.
//!
//! [`Drs`]: lakeview_core::Drs

pub mod algebra;
pub mod annotate;
pub mod input;

pub use algebra::Algebra;
pub use annotate::{extract_tags, format_metadata, Reference};
pub use input::Input;
