#![allow(dead_code)]

use std::sync::Mutex;

use lakeview_core::error::{Error, Result};
use lakeview_core::metadata::{MetadataField, MetadataRecord, MetadataWrite, WriteAck};
use lakeview_core::traits::StoreFacade;
use lakeview_core::{Hit, KeywordField, NodeId, Relation};
use lakeview_graph::InMemoryGraph;

pub fn hit(id: u64, source: &str, field: &str) -> Hit {
    Hit::new(NodeId(id), "d", source, field, 0.0)
}

/// t1.c1 -SCHEMA- t2.c2 -SCHEMA- t3.c3, plus t1.c4 -PKFK- t3.c3
pub fn lake() -> InMemoryGraph {
    let mut g = InMemoryGraph::new();
    for h in [hit(1, "t1", "c1"), hit(2, "t2", "c2"), hit(3, "t3", "c3"), hit(4, "t1", "c4")] {
        g.add_hit(h);
    }
    g.connect(NodeId(1), NodeId(2), Relation::SchemaSim, 0.7).unwrap();
    g.connect(NodeId(2), NodeId(3), Relation::SchemaSim, 0.6).unwrap();
    g.connect(NodeId(4), NodeId(3), Relation::Pkfk, 1.0).unwrap();
    g
}

/// Store double that records every call. Writes past `created_limit`
/// are acknowledged with `created: false`.
#[derive(Default)]
pub struct RecordingStore {
    hits: Vec<Hit>,
    created_limit: Option<usize>,
    searches: Mutex<Vec<(String, KeywordField, usize)>>,
    writes: Mutex<Vec<MetadataWrite>>,
    extends: Mutex<Vec<(String, MetadataField, String, Vec<String>)>>,
}

impl RecordingStore {
    pub fn with_hits(hits: Vec<Hit>) -> Self {
        Self { hits, ..Self::default() }
    }

    pub fn creating_at_most(limit: usize) -> Self {
        Self { created_limit: Some(limit), ..Self::default() }
    }

    pub fn last_search(&self) -> Option<(String, KeywordField, usize)> {
        self.searches.lock().unwrap().last().cloned()
    }

    pub fn writes(&self) -> Vec<MetadataWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub fn extends(&self) -> Vec<(String, MetadataField, String, Vec<String>)> {
        self.extends.lock().unwrap().clone()
    }
}

impl StoreFacade for RecordingStore {
    fn search_keywords(&self, keyword: &str, field: KeywordField, max_hits: usize) -> Result<Vec<Hit>> {
        self.searches.lock().unwrap().push((keyword.to_string(), field, max_hits));
        Ok(self.hits.iter().take(max_hits).cloned().collect())
    }

    fn write_metadata(&self, write: &MetadataWrite) -> Result<WriteAck> {
        let mut writes = self.writes.lock().unwrap();
        writes.push(write.clone());
        let n = writes.len();
        let created = self.created_limit.map_or(true, |limit| n <= limit);
        Ok(WriteAck { id: format!("md-{}", n), created })
    }

    fn extend_field(&self, author: &str, field: MetadataField, record_id: &str, values: &[String]) -> Result<WriteAck> {
        self.extends.lock().unwrap().push((author.to_string(), field, record_id.to_string(), values.to_vec()));
        Ok(WriteAck { id: record_id.to_string(), created: false })
    }

    fn get_metadata_about(&self, id: NodeId) -> Result<Vec<MetadataRecord>> {
        let records = self
            .writes()
            .into_iter()
            .enumerate()
            .filter(|(_, w)| w.source == id || w.reference.as_ref().is_some_and(|r| r.target == id))
            .map(|(i, w)| MetadataRecord {
                id: format!("md-{}", i + 1),
                author: w.author,
                description: w.description,
                class: w.class,
                source: w.source,
                ref_target: w.reference.as_ref().map(|r| r.target),
                ref_type: w.reference.as_ref().map(|r| r.relation.label().to_string()),
                tags: w.tags,
                comments: vec![],
                created: self.created_limit.map_or(true, |limit| i < limit),
            })
            .collect();
        Ok(records)
    }

    fn readable_name(&self, id: NodeId) -> Result<(String, String)> {
        match id.0 {
            1 => Ok(("t1".into(), "c1".into())),
            _ => Err(Error::NotFound(format!("node {}", id))),
        }
    }
}
