mod common;

use lakeview_algebra::{format_metadata, Algebra, Reference};
use lakeview_core::error::Error;
use lakeview_core::metadata::MetadataField;
use lakeview_core::{Drs, MdClass, MdRelation, NodeId, Operation};
use lakeview_text::TantivyKeywordStore;

use common::{hit, lake, RecordingStore};

fn store_backed() -> Algebra<lakeview_graph::InMemoryGraph, TantivyKeywordStore> {
    Algebra::new(lake(), TantivyKeywordStore::in_memory().expect("store"))
}

#[test]
fn plain_annotation_writes_one_tagged_record() {
    let api = store_backed();
    let ok = api
        .annotate("alice", "Contains #PII", MdClass::Warning, hit(1, "t1", "c1"), Reference::none())
        .unwrap();
    assert!(ok);

    let records = api.metadata_search(NodeId(1)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tags, vec!["pii".to_string()]);
    assert_eq!(records[0].ref_target, None);
    assert_eq!(records[0].ref_type, None);
    assert_eq!(records[0].class, MdClass::Warning);
    assert_eq!(records[0].author, "alice");
    assert!(records[0].created);
}

#[test]
fn relational_annotation_records_the_relation_label() {
    let api = store_backed();
    let ok = api
        .annotate(
            "alice",
            "same customer key",
            MdClass::Insight,
            hit(1, "t1", "c1"),
            Reference::to(hit(2, "t2", "c2"), MdRelation::MeansSameAs),
        )
        .unwrap();
    assert!(ok);

    let about_target = api.metadata_search(NodeId(2)).unwrap();
    assert_eq!(about_target.len(), 1);
    assert_eq!(about_target[0].source, NodeId(1));
    assert_eq!(about_target[0].ref_target, Some(NodeId(2)));
    assert_eq!(about_target[0].ref_type.as_deref(), Some("MEANS SAME AS"));
    assert!(about_target[0].tags.is_empty());

    let text = format_metadata(&about_target);
    assert!(text.contains("MEANS SAME AS"));
}

#[test]
fn relational_annotation_covers_every_pair() {
    let api = Algebra::new(lake(), RecordingStore::default());
    let sources = Drs::new([hit(1, "t1", "c1"), hit(4, "t1", "c4")], Operation::origin());
    let targets = Drs::new([hit(2, "t2", "c2"), hit(3, "t3", "c3")], Operation::origin());
    assert!(api
        .annotate("bob", "#join #Join keys", MdClass::Question, &sources, Reference::to(&targets, MdRelation::IsMemberOf))
        .unwrap());

    let writes = api.store().writes();
    assert_eq!(writes.len(), 4);
    let pairs: Vec<(u64, u64)> = writes
        .iter()
        .map(|w| (w.source.0, w.reference.as_ref().map(|r| r.target.0).unwrap_or(0)))
        .collect();
    assert_eq!(pairs, vec![(1, 2), (1, 3), (4, 2), (4, 3)]);
    assert!(writes.iter().all(|w| w.tags == vec!["join".to_string()]));
}

#[test]
fn plain_annotation_writes_once_per_source() {
    let api = Algebra::new(lake(), RecordingStore::default());
    let sources = Drs::new([hit(1, "t1", "c1"), hit(2, "t2", "c2")], Operation::origin());
    // target is ignored without a relation
    let reference = Reference { target: hit(3, "t3", "c3").into(), relation: None };
    assert!(api.annotate("bob", "note", MdClass::Insight, &sources, reference).unwrap());
    let writes = api.store().writes();
    assert_eq!(writes.len(), 2);
    assert!(writes.iter().all(|w| w.reference.is_none()));
}

#[test]
fn annotation_stops_at_first_rejected_write() {
    let api = Algebra::new(lake(), RecordingStore::creating_at_most(1));
    let sources = Drs::new([hit(1, "t1", "c1"), hit(2, "t2", "c2"), hit(3, "t3", "c3")], Operation::origin());
    let ok = api.annotate("bob", "note", MdClass::Insight, &sources, Reference::none()).unwrap();
    assert!(!ok);
    // first write kept, second rejected, third never attempted
    assert_eq!(api.store().writes().len(), 2);
    let kept = api.metadata_search(NodeId(1)).unwrap();
    assert!(kept[0].created);
    assert!(!api.metadata_search(NodeId(2)).unwrap()[0].created);
}

#[test]
fn annotation_rejects_table_mode_operands() {
    let api = Algebra::new(lake(), RecordingStore::default());
    let tables = api.to_table_mode(hit(1, "t1", "c1")).unwrap();
    assert!(matches!(
        api.annotate("bob", "note", MdClass::Insight, &tables, Reference::none()),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        api.annotate("bob", "note", MdClass::Insight, hit(1, "t1", "c1"), Reference::to(&tables, MdRelation::IsContainerOf)),
        Err(Error::InvalidArgument(_))
    ));
    assert!(api.store().writes().is_empty());
}

#[test]
fn comments_and_tags_go_to_the_store() {
    let api = Algebra::new(lake(), RecordingStore::default());
    api.add_comments("carol", "md-7", &["checked".into()]).unwrap();
    api.add_tags("carol", "md-7", &["pii".into()]).unwrap();
    let extends = api.store().extends();
    assert_eq!(extends.len(), 2);
    assert_eq!(extends[0].1, MetadataField::Comments);
    assert_eq!(extends[1].1, MetadataField::Tags);
    assert!(extends.iter().all(|e| e.0 == "carol" && e.2 == "md-7"));
}

#[test]
fn tags_extension_round_trips_through_the_store() {
    let api = store_backed();
    api.annotate("alice", "#pii", MdClass::Warning, hit(1, "t1", "c1"), Reference::none()).unwrap();
    let id = api.metadata_search(NodeId(1)).unwrap()[0].id.clone();
    api.add_tags("bob", &id, &["gdpr".into(), "pii".into()]).unwrap();
    api.add_comments("bob", &id, &["confirmed".into()]).unwrap();
    let record = &api.metadata_search(NodeId(1)).unwrap()[0];
    assert_eq!(record.tags, vec!["pii".to_string(), "gdpr".to_string()]);
    assert_eq!(record.comments, vec!["confirmed".to_string()]);
}

#[test]
fn format_node_uses_readable_names() {
    let api = Algebra::new(lake(), RecordingStore::default());
    assert_eq!(api.format_node(NodeId(1)).unwrap(), "(1, t1, c1)");
    assert!(matches!(api.format_node(NodeId(9)), Err(Error::NotFound(_))));
}
