//! Lineage of result sets.
//!
//! Every non-carrier operation becomes one immutable [`OpNode`] shared through
//! `Arc`. A [`Provenance`] is a set of node handles plus `(parent, child)`
//! edges, so merging two lineages is a plain set union and never rewrites a
//! node another result set already points at.

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::types::{Hit, Relation, Scope};

/// Source of operation ids. Ids only order and name lineage nodes; no result
/// set reads another's state through it, so concurrent callers stay independent.
static NEXT_OP_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OpId(u64);

impl OpId {
    fn fresh() -> Self {
        OpId(NEXT_OP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    /// Carrier: contributes no node of its own.
    None,
    Origin,
    KwLookup,
    Table,
    NeighborExpand,
    Traverse,
    Path,
    Union,
    Intersection,
    Difference,
    FieldsMode,
    TableMode,
}

/// Opaque operation parameter, kept for explanation only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OpParam {
    Text(String),
    Hit(Hit),
    Relation(Relation),
    Scope(Scope),
    Hops(usize),
}

impl std::fmt::Display for OpParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpParam::Text(s) => write!(f, "'{}'", s),
            OpParam::Hit(h) => write!(f, "{}", h),
            OpParam::Relation(r) => write!(f, "{}", r),
            OpParam::Scope(s) => write!(f, "{:?}", s),
            OpParam::Hops(n) => write!(f, "hops={}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub kind: OperationKind,
    pub params: Vec<OpParam>,
}

impl Operation {
    pub fn new(kind: OperationKind, params: Vec<OpParam>) -> Self {
        Self { kind, params }
    }

    pub fn none() -> Self {
        Self::new(OperationKind::None, Vec::new())
    }

    pub fn origin() -> Self {
        Self::new(OperationKind::Origin, Vec::new())
    }

    pub fn is_carrier(&self) -> bool {
        self.kind == OperationKind::None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpNode {
    pub id: OpId,
    pub operation: Operation,
}

/// Operation DAG of one result set.
///
/// `heads` are the most recent operations; absorbing another lineage links its
/// heads as parents of this set's own operation. A carrier (no own operation)
/// instead adopts the absorbed heads.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    nodes: BTreeMap<OpId, Arc<OpNode>>,
    edges: BTreeSet<(OpId, OpId)>,
    heads: BTreeSet<OpId>,
    own: Option<OpId>,
}

impl Provenance {
    pub fn from_operation(operation: Operation) -> Self {
        if operation.is_carrier() {
            return Self::default();
        }
        let id = OpId::fresh();
        let mut nodes = BTreeMap::new();
        nodes.insert(id, Arc::new(OpNode { id, operation }));
        Self { nodes, edges: BTreeSet::new(), heads: BTreeSet::from([id]), own: Some(id) }
    }

    /// Union of both DAGs. Nothing already recorded in either side is dropped.
    pub fn absorb(&self, other: &Provenance) -> Provenance {
        let mut merged = self.clone();
        for (id, node) in &other.nodes {
            merged.nodes.entry(*id).or_insert_with(|| Arc::clone(node));
        }
        merged.edges.extend(other.edges.iter().copied());
        match self.own {
            Some(own) => {
                for parent in &other.heads {
                    if *parent != own {
                        merged.edges.insert((*parent, own));
                    }
                }
            }
            None => merged.heads.extend(other.heads.iter().copied()),
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: OpId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn heads(&self) -> impl Iterator<Item = &OpNode> + '_ {
        self.heads.iter().filter_map(|id| self.nodes.get(id).map(|n| n.as_ref()))
    }

    /// Operations in creation order.
    pub fn operations(&self) -> impl Iterator<Item = &OpNode> + '_ {
        self.nodes.values().map(|n| n.as_ref())
    }

    pub fn parents_of(&self, id: OpId) -> Vec<OpId> {
        self.edges.iter().filter(|(_, child)| *child == id).map(|(parent, _)| *parent).collect()
    }

    pub fn explain(&self) -> String {
        let mut out = String::new();
        for node in self.operations() {
            let params: Vec<String> = node.operation.params.iter().map(|p| p.to_string()).collect();
            let parents: Vec<String> = self.parents_of(node.id).iter().map(|p| format!("#{}", p.0)).collect();
            let _ = write!(out, "#{} {:?}", node.id.0, node.operation.kind);
            if !params.is_empty() {
                let _ = write!(out, " [{}]", params.join(", "));
            }
            if !parents.is_empty() {
                let _ = write!(out, " <- {}", parents.join(" "));
            }
            out.push('\n');
        }
        out
    }
}

/// Two lineages are equal when they record the same operations, edges and
/// heads; whether a set owns a node itself does not matter.
impl PartialEq for Provenance {
    fn eq(&self, other: &Self) -> bool {
        self.heads == other.heads
            && self.edges == other.edges
            && self.nodes.len() == other.nodes.len()
            && self.nodes.keys().all(|k| other.nodes.contains_key(k))
    }
}

impl Serialize for Provenance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let operations: Vec<&OpNode> = self.operations().collect();
        let edges: Vec<(OpId, OpId)> = self.edges.iter().copied().collect();
        let mut state = serializer.serialize_struct("Provenance", 2)?;
        state.serialize_field("operations", &operations)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_has_no_nodes() {
        assert!(Provenance::from_operation(Operation::none()).is_empty());
    }

    #[test]
    fn carrier_absorbing_equals_source() {
        let origin = Provenance::from_operation(Operation::origin());
        let carrier = Provenance::default().absorb(&origin);
        assert_eq!(carrier, origin);
    }

    #[test]
    fn absorb_links_heads_to_own_operation() {
        let a = Provenance::from_operation(Operation::origin());
        let b = Provenance::from_operation(Operation::origin());
        let u = Provenance::from_operation(Operation::new(OperationKind::Union, vec![]));
        let merged = u.absorb(&a).absorb(&b);
        assert_eq!(merged.len(), 3);
        let head = merged.heads().next().map(|n| n.id).unwrap();
        assert_eq!(merged.parents_of(head).len(), 2);
        // sources untouched
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn absorb_is_idempotent() {
        let a = Provenance::from_operation(Operation::origin());
        let u = Provenance::from_operation(Operation::new(OperationKind::Union, vec![]));
        let once = u.absorb(&a);
        assert_eq!(once.absorb(&a), once);
    }
}
