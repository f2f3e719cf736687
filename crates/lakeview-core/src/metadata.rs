//! Annotation records as exchanged with the metadata store.

use serde::{Deserialize, Serialize};

use crate::types::{MdClass, MdRelation, NodeId};

pub type MetadataId = String;

/// Target of a relational annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRef {
    pub target: NodeId,
    pub relation: MdRelation,
}

/// One write request: a single source element, optionally related to one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataWrite {
    pub author: String,
    pub description: String,
    pub class: MdClass,
    pub source: NodeId,
    pub reference: Option<MetadataRef>,
    pub tags: Vec<String>,
}

/// A stored annotation.
///
/// `ref_type` holds the relation label (e.g. `"MEANS SAME AS"`). `tags` and
/// `comments` only ever grow. `created` mirrors the acknowledgement of the
/// write that produced the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub id: MetadataId,
    pub author: String,
    pub description: String,
    pub class: MdClass,
    pub source: NodeId,
    pub ref_target: Option<NodeId>,
    pub ref_type: Option<String>,
    pub tags: Vec<String>,
    pub comments: Vec<String>,
    #[serde(default)]
    pub created: bool,
}

/// Store answer to a write or extend call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    pub id: MetadataId,
    pub created: bool,
}

/// List-valued fields of a record that can be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Comments,
    Tags,
}
