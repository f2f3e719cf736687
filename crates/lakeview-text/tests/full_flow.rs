use lakeview_core::catalog::{Catalog, CatalogColumn, CatalogEdge};
use lakeview_core::error::Error;
use lakeview_core::metadata::{MetadataField, MetadataRef, MetadataWrite};
use lakeview_core::traits::StoreFacade;
use lakeview_core::{KeywordField, MdClass, MdRelation, NodeId, NodeTriple, Relation};
use lakeview_text::TantivyKeywordStore;

fn column(t: &str, c: &str, values: &[&str]) -> CatalogColumn {
    CatalogColumn {
        database: "lake".into(),
        source: t.into(),
        field: c.into(),
        values: values.iter().map(|v| v.to_string()).collect(),
    }
}

fn store() -> TantivyKeywordStore {
    let catalog = Catalog {
        columns: vec![
            column("orders.csv", "customer_id", &["c1", "c2"]),
            column("orders.csv", "shipping_city", &["Boston", "Lisbon"]),
            column("customers.csv", "city", &["Boston", "Porto"]),
        ],
        edges: vec![CatalogEdge {
            from: NodeTriple::new("lake", "customers.csv", "id"),
            to: NodeTriple::new("lake", "orders.csv", "customer_id"),
            relation: Relation::Pkfk,
            score: 1.0,
        }],
    };
    let store = TantivyKeywordStore::in_memory().expect("store");
    let count = store.index_catalog(&catalog).expect("index");
    assert_eq!(count, 4, "edge endpoints are indexed once");
    store
}

fn write(source: NodeId, reference: Option<MetadataRef>) -> MetadataWrite {
    MetadataWrite {
        author: "alice".into(),
        description: "check #pii".into(),
        class: MdClass::Warning,
        source,
        reference,
        tags: vec!["pii".into(), "pii".into()],
    }
}

#[test]
fn keyword_search_targets_requested_field() {
    let store = store();
    let by_table = store.search_keywords("customers", KeywordField::Table, 10).unwrap();
    assert_eq!(by_table.len(), 2);
    assert!(by_table.iter().all(|h| h.source == "customers.csv"));

    let by_schema = store.search_keywords("city", KeywordField::Schema, 10).unwrap();
    let fields: Vec<&str> = by_schema.iter().map(|h| h.field.as_str()).collect();
    assert!(fields.contains(&"city"));
    assert!(fields.contains(&"shipping_city"));

    let by_content = store.search_keywords("boston", KeywordField::Text, 10).unwrap();
    assert_eq!(by_content.len(), 2);
    let porto = store.search_keywords("porto", KeywordField::Text, 10).unwrap();
    assert_eq!(porto.len(), 1);
    assert_eq!(porto[0].id, NodeTriple::new("lake", "customers.csv", "city").id());
}

#[test]
fn keyword_search_caps_results() {
    let store = store();
    assert_eq!(store.search_keywords("boston", KeywordField::Text, 1).unwrap().len(), 1);
    assert!(store.search_keywords("boston", KeywordField::Text, 0).unwrap().is_empty());
}

#[test]
fn readable_name_resolves_stored_names() {
    let store = store();
    let id = NodeTriple::new("lake", "orders.csv", "shipping_city").id();
    let (source, column) = store.readable_name(id).unwrap();
    assert_eq!(source, "orders.csv");
    assert_eq!(column, "shipping_city");
    assert!(matches!(store.readable_name(NodeId(3)), Err(Error::NotFound(_))));
}

#[test]
fn metadata_round_trip_with_extensions() {
    let store = TantivyKeywordStore::in_memory().unwrap();
    let a = NodeId(1);
    let b = NodeId(2);
    let plain = store.write_metadata(&write(a, None)).unwrap();
    assert!(plain.created);
    let related = store
        .write_metadata(&write(a, Some(MetadataRef { target: b, relation: MdRelation::MeansSameAs })))
        .unwrap();

    let about_a = store.get_metadata_about(a).unwrap();
    assert_eq!(about_a.len(), 2);
    assert_eq!(about_a[0].tags, vec!["pii".to_string()]);
    assert_eq!(about_a[0].ref_target, None);

    let about_b = store.get_metadata_about(b).unwrap();
    assert_eq!(about_b.len(), 1);
    assert_eq!(about_b[0].ref_type.as_deref(), Some("MEANS SAME AS"));

    store
        .extend_field("bob", MetadataField::Comments, &related.id, &["looks right".into()])
        .unwrap();
    store
        .extend_field("bob", MetadataField::Tags, &related.id, &["pii".into(), "customer".into()])
        .unwrap();
    let updated = store.get_metadata_about(b).unwrap();
    assert_eq!(updated[0].comments, vec!["looks right".to_string()]);
    assert_eq!(updated[0].tags, vec!["pii".to_string(), "customer".to_string()]);

    assert!(matches!(
        store.extend_field("bob", MetadataField::Tags, "md-99", &[]),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn on_disk_index_is_recreated() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("keywords");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("stale"), "left over").unwrap();

    let store = TantivyKeywordStore::create_in_dir(dir.clone()).expect("store");
    assert!(!dir.join("stale").exists());
    let catalog = Catalog { columns: vec![column("t.csv", "a", &["x"])], edges: vec![] };
    assert_eq!(store.index_catalog(&catalog).unwrap(), 1);
    assert_eq!(store.search_keywords("x", KeywordField::Text, 5).unwrap().len(), 1);
}
