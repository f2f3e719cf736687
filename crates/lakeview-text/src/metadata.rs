//! In-process annotation records.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use lakeview_core::error::{Error, Result};
use lakeview_core::metadata::{MetadataField, MetadataRecord, MetadataWrite, WriteAck};
use lakeview_core::NodeId;

#[derive(Default)]
struct Records {
    by_id: BTreeMap<u64, MetadataRecord>,
    next_id: u64,
}

#[derive(Default)]
pub struct MetadataRecords {
    inner: RwLock<Records>,
}

fn record_key(id: &str) -> Result<u64> {
    id.strip_prefix("md-")
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| Error::NotFound(format!("metadata '{}'", id)))
}

impl MetadataRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, write: &MetadataWrite) -> Result<WriteAck> {
        let mut records = self.inner.write().map_err(|_| Error::Backend("metadata store lock poisoned".into()))?;
        records.next_id += 1;
        let key = records.next_id;
        let id = format!("md-{}", key);
        let mut tags: Vec<String> = Vec::new();
        for tag in &write.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        let record = MetadataRecord {
            id: id.clone(),
            author: write.author.clone(),
            description: write.description.clone(),
            class: write.class,
            source: write.source,
            ref_target: write.reference.as_ref().map(|r| r.target),
            ref_type: write.reference.as_ref().map(|r| r.relation.label().to_string()),
            tags,
            comments: Vec::new(),
            created: true,
        };
        records.by_id.insert(key, record);
        debug!(%id, author = %write.author, "metadata written");
        Ok(WriteAck { id, created: true })
    }

    /// Append to a list-valued field. Tags keep set semantics.
    pub fn extend(&self, author: &str, field: MetadataField, record_id: &str, values: &[String]) -> Result<WriteAck> {
        let key = record_key(record_id)?;
        let mut records = self.inner.write().map_err(|_| Error::Backend("metadata store lock poisoned".into()))?;
        let record = records.by_id.get_mut(&key).ok_or_else(|| Error::NotFound(format!("metadata '{}'", record_id)))?;
        match field {
            MetadataField::Comments => record.comments.extend(values.iter().cloned()),
            MetadataField::Tags => {
                for value in values {
                    if !record.tags.contains(value) {
                        record.tags.push(value.clone());
                    }
                }
            }
        }
        debug!(id = record_id, author, ?field, added = values.len(), "metadata extended");
        Ok(WriteAck { id: record_id.to_string(), created: false })
    }

    /// Records whose source or reference target is `id`, oldest first.
    pub fn about(&self, id: NodeId) -> Result<Vec<MetadataRecord>> {
        let records = self.inner.read().map_err(|_| Error::Backend("metadata store lock poisoned".into()))?;
        Ok(records
            .by_id
            .values()
            .filter(|r| r.source == id || r.ref_target == Some(id))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|r| r.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
