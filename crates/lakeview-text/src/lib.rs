//! lakeview-text
//!
//! Keyword/metadata store backed by a Tantivy index over table names, column
//! names and column values, plus in-process annotation records.

pub mod tantivy_utils;
pub mod index;
pub mod metadata;

use std::path::PathBuf;

use lakeview_core::catalog::Catalog;
use lakeview_core::error::Result;
use lakeview_core::metadata::{MetadataField, MetadataRecord, MetadataWrite, WriteAck};
use lakeview_core::traits::StoreFacade;
use lakeview_core::{Hit, KeywordField, NodeId};

pub use index::KeywordIndex;
pub use metadata::MetadataRecords;

pub struct TantivyKeywordStore {
    index: KeywordIndex,
    metadata: MetadataRecords,
}

impl TantivyKeywordStore {
    pub fn in_memory() -> Result<Self> {
        Ok(Self { index: KeywordIndex::in_memory()?, metadata: MetadataRecords::new() })
    }

    pub fn create_in_dir(index_dir: PathBuf) -> Result<Self> {
        Ok(Self { index: KeywordIndex::create_in_dir(index_dir)?, metadata: MetadataRecords::new() })
    }

    pub fn index_catalog(&self, catalog: &Catalog) -> Result<usize> {
        self.index.index_catalog(catalog)
    }

    pub fn metadata(&self) -> &MetadataRecords {
        &self.metadata
    }
}

impl StoreFacade for TantivyKeywordStore {
    fn search_keywords(&self, keyword: &str, field: KeywordField, max_hits: usize) -> Result<Vec<Hit>> {
        self.index.search(keyword, field, max_hits)
    }

    fn write_metadata(&self, write: &MetadataWrite) -> Result<WriteAck> {
        self.metadata.write(write)
    }

    fn extend_field(&self, author: &str, field: MetadataField, record_id: &str, values: &[String]) -> Result<WriteAck> {
        self.metadata.extend(author, field, record_id, values)
    }

    fn get_metadata_about(&self, id: NodeId) -> Result<Vec<MetadataRecord>> {
        self.metadata.about(id)
    }

    fn readable_name(&self, id: NodeId) -> Result<(String, String)> {
        self.index.readable_name(id)
    }
}
