//! Discovery result sets.

use serde::Serialize;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::provenance::{OpParam, Operation, OperationKind, Provenance};
use crate::types::{Hit, Mode, NodeId};

/// A deduplicated, mode-tagged collection of hits with its lineage.
///
/// Hits are unique by `id` and iterate in insertion order. In [`Mode::Table`]
/// the hits are table-level (`Hit::is_table`), one per table. All operations
/// return new values; nothing mutates a set another caller holds.
#[derive(Debug, Clone, Serialize)]
pub struct Drs {
    hits: Vec<Hit>,
    #[serde(skip)]
    index: HashSet<NodeId>,
    mode: Mode,
    operation: Operation,
    provenance: Provenance,
}

impl Drs {
    /// A field-mode set produced by `operation`.
    pub fn new(hits: impl IntoIterator<Item = Hit>, operation: Operation) -> Self {
        Self::with_mode(hits, operation, Mode::Fields)
    }

    pub fn with_mode(hits: impl IntoIterator<Item = Hit>, operation: Operation, mode: Mode) -> Self {
        let provenance = Provenance::from_operation(operation.clone());
        let mut drs = Self { hits: Vec::new(), index: HashSet::new(), mode, operation, provenance };
        drs.extend(hits);
        drs
    }

    /// Empty carrier set: no hits, no lineage of its own.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Operation::none())
    }

    /// Single-hit set with an `ORIGIN` operation.
    pub fn origin(hit: Hit) -> Self {
        Self::new([hit], Operation::origin())
    }

    fn extend(&mut self, hits: impl IntoIterator<Item = Hit>) {
        for hit in hits {
            if self.index.insert(hit.id) {
                self.hits.push(hit);
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn size(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hit> {
        self.hits.iter()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Hit> {
        if !self.contains(id) {
            return None;
        }
        self.hits.iter().find(|h| h.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.hits.iter().map(|h| h.id)
    }

    /// Merge `other`'s lineage into this set's.
    pub fn absorb_provenance(mut self, other: &Drs) -> Drs {
        self.provenance = self.provenance.absorb(&other.provenance);
        self
    }

    /// Append `other`'s hits (skipping known ids) and merge its lineage.
    /// Keeps this set's mode and operation.
    pub fn absorb(mut self, other: &Drs) -> Drs {
        self.extend(other.hits.iter().cloned());
        self.provenance = self.provenance.absorb(&other.provenance);
        self
    }

    /// Same hits, new operation on top of this set's lineage.
    pub fn retag(&self, operation: Operation) -> Drs {
        Drs::with_mode(self.hits.iter().cloned(), operation, self.mode).absorb_provenance(self)
    }

    pub fn union(&self, other: &Drs) -> Result<Drs> {
        self.ensure_same_mode(other)?;
        let hits = self.hits.iter().chain(other.hits.iter()).cloned();
        Ok(self.combined(hits, OperationKind::Union, other))
    }

    pub fn intersection(&self, other: &Drs) -> Result<Drs> {
        self.ensure_same_mode(other)?;
        let hits = self.hits.iter().filter(|h| other.contains(h.id)).cloned();
        Ok(self.combined(hits, OperationKind::Intersection, other))
    }

    /// Hits of `self` whose id does not appear in `other`.
    pub fn difference(&self, other: &Drs) -> Result<Drs> {
        self.ensure_same_mode(other)?;
        let hits = self.hits.iter().filter(|h| !other.contains(h.id)).cloned();
        Ok(self.combined(hits, OperationKind::Difference, other))
    }

    fn combined(&self, hits: impl Iterator<Item = Hit>, kind: OperationKind, other: &Drs) -> Drs {
        Drs::with_mode(hits, Operation::new(kind, Vec::new()), self.mode)
            .absorb_provenance(self)
            .absorb_provenance(other)
    }

    pub fn ensure_same_mode(&self, other: &Drs) -> Result<()> {
        if self.mode != other.mode {
            return Err(Error::InvalidArgument(format!(
                "operands are not in the same mode ({:?} vs {:?})",
                self.mode, other.mode
            )));
        }
        Ok(())
    }

    pub fn ensure_fields_mode(&self, what: &str) -> Result<()> {
        if self.mode != Mode::Fields {
            return Err(Error::InvalidArgument(format!("{} requires a fields-mode input", what)));
        }
        Ok(())
    }

    /// Collapse to one table-level hit per table. Field-mode sets only ever
    /// reach table mode through this explicit call.
    pub fn into_table_mode(self) -> Drs {
        if self.mode == Mode::Table {
            return self;
        }
        let tables: Vec<Hit> = self.hits.iter().map(Hit::table_of).collect();
        let op = Operation::new(OperationKind::TableMode, Vec::new());
        Drs::with_mode(tables, op, Mode::Table).absorb_provenance(&self)
    }

    /// Table-mode set built from column hits, tagged `TABLE` with `hit`.
    pub fn table_of_members(hit: &Hit, members: impl IntoIterator<Item = Hit>) -> Drs {
        let tables: Vec<Hit> = members.into_iter().map(|h| h.table_of()).collect();
        let op = Operation::new(OperationKind::Table, vec![OpParam::Hit(hit.clone())]);
        Drs::with_mode(tables, op, Mode::Table)
    }

    pub fn explain(&self) -> String {
        self.provenance.explain()
    }
}

impl Default for Drs {
    fn default() -> Self {
        Self::empty()
    }
}

/// Set equality: same mode and same ids, regardless of order, scores or lineage.
impl PartialEq for Drs {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.index == other.index
    }
}

impl<'a> IntoIterator for &'a Drs {
    type Item = &'a Hit;
    type IntoIter = std::slice::Iter<'a, Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}
