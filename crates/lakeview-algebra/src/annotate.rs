//! Metadata API: free-text annotations attached to one or two columns.

use regex::Regex;
use std::fmt::Write as _;
use std::sync::LazyLock;

use tracing::{debug, warn};

use lakeview_core::error::Result;
use lakeview_core::metadata::{MetadataField, MetadataRecord, MetadataRef, MetadataWrite, WriteAck};
use lakeview_core::traits::{GraphFacade, StoreFacade};
use lakeview_core::{MdClass, MdRelation, NodeId};

use crate::algebra::Algebra;
use crate::input::Input;

// Constant pattern: compiling it cannot fail at runtime.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([A-Za-z0-9]+)").expect("tag pattern"));

/// Optional second element of an annotation.
///
/// Without a relation the annotation is written once per source element and
/// `target` is only validated.
#[derive(Debug, Clone, Default)]
pub struct Reference {
    pub target: Input,
    pub relation: Option<MdRelation>,
}

impl Reference {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn to(target: impl Into<Input>, relation: MdRelation) -> Self {
        Self { target: target.into(), relation: Some(relation) }
    }
}

/// Lower-cased `#tag` words of `description`, first occurrence kept.
pub fn extract_tags(description: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for cap in TAG_RE.captures_iter(description) {
        let tag = cap[1].to_lowercase();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

impl<G, S> Algebra<G, S>
where
    G: GraphFacade,
    S: StoreFacade,
{
    /// Write an annotation about `source`, optionally related to `reference.target`.
    ///
    /// Relational annotations are written for every (source, target) pair.
    /// Returns `false` as soon as a write is not acknowledged as created;
    /// earlier writes stay in the store.
    pub fn annotate(
        &self,
        author: &str,
        description: &str,
        class: MdClass,
        source: impl Into<Input>,
        reference: Reference,
    ) -> Result<bool> {
        let sources = self.make_drs(source)?;
        let targets = self.make_drs(reference.target)?;
        sources.ensure_fields_mode("annotate source")?;
        targets.ensure_fields_mode("annotate target")?;

        let tags = extract_tags(description);
        let write = |source: NodeId, reference: Option<MetadataRef>| MetadataWrite {
            author: author.to_string(),
            description: description.to_string(),
            class,
            source,
            reference,
            tags: tags.clone(),
        };

        let mut written = 0usize;
        match reference.relation {
            None => {
                for hit in &sources {
                    if !self.commit(&write(hit.id, None), written)? {
                        return Ok(false);
                    }
                    written += 1;
                }
            }
            Some(relation) => {
                for hit_source in &sources {
                    for hit_target in &targets {
                        let reference = MetadataRef { target: hit_target.id, relation };
                        if !self.commit(&write(hit_source.id, Some(reference)), written)? {
                            return Ok(false);
                        }
                        written += 1;
                    }
                }
            }
        }
        debug!(author, %class, written, ?tags, "annotation stored");
        Ok(true)
    }

    fn commit(&self, write: &MetadataWrite, written: usize) -> Result<bool> {
        let ack = self.store.write_metadata(write)?;
        if !ack.created {
            warn!(source = %write.source, id = %ack.id, written, "metadata write not created; earlier writes kept");
        }
        Ok(ack.created)
    }

    pub fn add_comments(&self, author: &str, md_id: &str, comments: &[String]) -> Result<WriteAck> {
        self.store.extend_field(author, MetadataField::Comments, md_id, comments)
    }

    pub fn add_tags(&self, author: &str, md_id: &str, tags: &[String]) -> Result<WriteAck> {
        self.store.extend_field(author, MetadataField::Tags, md_id, tags)
    }

    /// All annotations that mention `id` as source or target.
    pub fn metadata_search(&self, id: NodeId) -> Result<Vec<MetadataRecord>> {
        self.store.get_metadata_about(id)
    }

    /// `(<id>, <source name>, <column name>)`
    pub fn format_node(&self, id: NodeId) -> Result<String> {
        let (source, column) = self.store.readable_name(id)?;
        Ok(format!("({}, {}, {})", id, source, column))
    }
}

/// One line per record, for human inspection.
pub fn format_metadata(records: &[MetadataRecord]) -> String {
    let mut out = String::new();
    for md in records {
        let relation = match (&md.ref_target, &md.ref_type) {
            (Some(target), Some(kind)) => format!("{} {} {}", md.source, kind, target),
            _ => md.source.to_string(),
        };
        let _ = writeln!(out, "ID: {:20} RELATION: {:40} DESCRIPTION: {}", md.id, relation, md.description);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_lowercased_and_deduplicated() {
        assert_eq!(extract_tags("be careful with #PII and #pii, see #gdpr2018"), vec!["pii", "gdpr2018"]);
    }

    #[test]
    fn tags_stop_at_non_alphanumerics() {
        assert_eq!(extract_tags("##double #snake_case #"), vec!["double", "snake"]);
        assert!(extract_tags("no tags here").is_empty());
    }

    #[test]
    fn format_metadata_renders_relations() {
        let record = |id: &str, target: Option<u64>| MetadataRecord {
            id: id.into(),
            author: "alice".into(),
            description: "note".into(),
            class: MdClass::Insight,
            source: NodeId(1),
            ref_target: target.map(NodeId),
            ref_type: target.map(|_| MdRelation::MeansSameAs.label().to_string()),
            tags: vec![],
            comments: vec![],
            created: true,
        };
        let out = format_metadata(&[record("md-1", None), record("md-2", Some(2))]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID: md-1"));
        assert!(lines[1].contains("RELATION: 1 MEANS SAME AS 2"));
        assert!(lines[1].ends_with("DESCRIPTION: note"));
    }
}
