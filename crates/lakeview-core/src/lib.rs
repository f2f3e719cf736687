//! lakeview-core
//!
//! Data model of the discovery algebra (hits, result sets, provenance), the
//! facade traits it is evaluated against, and shared configuration.

#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod catalog;
pub mod config;
pub mod drs;
pub mod error;
pub mod metadata;
pub mod provenance;
pub mod traits;
pub mod types;

pub use drs::Drs;
pub use error::{Error, Result};
pub use provenance::{OpParam, Operation, OperationKind, Provenance};
pub use types::{Hit, KeywordField, MdClass, MdRelation, Mode, NodeId, NodeInfo, NodeTriple, Relation, Scope};
