use crate::drs::Drs;
use crate::error::Result;
use crate::metadata::{MetadataField, MetadataRecord, MetadataWrite, WriteAck};
use crate::types::{Hit, KeywordField, NodeId, NodeInfo, Relation};

/// Structural queries over the profiled lake graph.
pub trait GraphFacade: Send + Sync {
    fn resolve_identity(&self, ids: &[NodeId]) -> Result<Vec<NodeInfo>>;
    /// Column hits of every table named `table`.
    fn hits_for_table(&self, table: &str) -> Result<Vec<Hit>>;
    fn expand_one_hop(&self, hit: &Hit, relation: Relation) -> Result<Drs>;
    fn find_path_at_field_level(&self, from: &Hit, to: &Hit, relation: Relation, max_hops: usize) -> Result<Drs>;
    /// Table-granularity path search. `api` gives access back into the algebra
    /// for field-level expansion of the tables involved.
    fn find_path_at_table_level(
        &self,
        from: &Hit,
        to: &Hit,
        relation: Relation,
        api: &dyn FieldResolver,
        max_hops: usize,
    ) -> Result<Drs>;
}

/// The slice of the algebra a table-level path search needs.
pub trait FieldResolver {
    /// All column hits of the table `table` belongs to, in fields mode.
    fn fields_of(&self, table: &Hit) -> Result<Drs>;
    /// One-hop neighbors of every hit in `fields`.
    fn neighbors_of(&self, fields: &Drs, relation: Relation) -> Result<Drs>;
}

/// Keyword index plus annotation store.
pub trait StoreFacade: Send + Sync {
    fn search_keywords(&self, keyword: &str, field: KeywordField, max_hits: usize) -> Result<Vec<Hit>>;
    fn write_metadata(&self, write: &MetadataWrite) -> Result<WriteAck>;
    fn extend_field(&self, author: &str, field: MetadataField, record_id: &str, values: &[String]) -> Result<WriteAck>;
    fn get_metadata_about(&self, id: NodeId) -> Result<Vec<MetadataRecord>>;
    /// `(source name, column name)` of a node.
    fn readable_name(&self, id: NodeId) -> Result<(String, String)>;
}
