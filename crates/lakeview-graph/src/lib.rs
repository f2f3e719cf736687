//! lakeview-graph
//!
//! In-memory lake graph: column nodes grouped by table and symmetric,
//! relation-typed, scored edges between columns. Implements [`GraphFacade`]
//! with bounded breadth-first path search at field and table granularity.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tracing::{debug, info};

use lakeview_core::catalog::Catalog;
use lakeview_core::error::{Error, Result};
use lakeview_core::traits::{FieldResolver, GraphFacade};
use lakeview_core::{Drs, Hit, Mode, NodeId, NodeInfo, OpParam, Operation, OperationKind, Relation};

#[derive(Debug, Default)]
pub struct InMemoryGraph {
    nodes: HashMap<NodeId, Hit>,
    /// Column ids per table, keyed by `NodeId::table(db, source)`.
    tables: BTreeMap<NodeId, Vec<NodeId>>,
    table_ids: HashMap<NodeId, Hit>,
    adjacency: HashMap<(NodeId, Relation), Vec<(NodeId, f32)>>,
    edge_count: usize,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: &Catalog) -> Result<Self> {
        let mut graph = Self::new();
        for column in &catalog.columns {
            graph.add_hit(column.hit());
        }
        for edge in &catalog.edges {
            let from = graph.add_hit(Hit::from_triple(&edge.from, 0.0));
            let to = graph.add_hit(Hit::from_triple(&edge.to, 0.0));
            graph.connect(from, to, edge.relation, edge.score)?;
        }
        info!(nodes = graph.node_count(), tables = graph.tables.len(), edges = graph.edge_count, "graph built");
        Ok(graph)
    }

    /// Register a column hit; known ids are left untouched.
    pub fn add_hit(&mut self, hit: Hit) -> NodeId {
        let id = hit.id;
        if self.nodes.contains_key(&id) {
            return id;
        }
        let table = hit.table_of();
        self.tables.entry(table.id).or_default().push(id);
        self.table_ids.entry(table.id).or_insert(table);
        self.nodes.insert(id, Hit { score: 0.0, ..hit });
        id
    }

    /// Add an undirected edge between two known columns.
    pub fn connect(&mut self, a: NodeId, b: NodeId, relation: Relation, score: f32) -> Result<()> {
        for id in [a, b] {
            if !self.nodes.contains_key(&id) {
                return Err(Error::NotFound(format!("node {}", id)));
            }
        }
        if a == b {
            return Ok(());
        }
        let forward = self.adjacency.entry((a, relation)).or_default();
        if forward.iter().any(|(n, _)| *n == b) {
            return Ok(());
        }
        forward.push((b, score));
        self.adjacency.entry((b, relation)).or_default().push((a, score));
        self.edge_count += 1;
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn node(&self, id: NodeId) -> Result<&Hit> {
        self.nodes.get(&id).ok_or_else(|| Error::NotFound(format!("node {}", id)))
    }

    fn neighbors(&self, id: NodeId, relation: Relation) -> &[(NodeId, f32)] {
        self.adjacency.get(&(id, relation)).map(Vec::as_slice).unwrap_or(&[])
    }

    fn path_op(from: &Hit, to: &Hit, relation: Relation, max_hops: usize) -> Operation {
        Operation::new(
            OperationKind::Path,
            vec![OpParam::Hit(from.clone()), OpParam::Hit(to.clone()), OpParam::Relation(relation), OpParam::Hops(max_hops)],
        )
    }
}

impl GraphFacade for InMemoryGraph {
    fn resolve_identity(&self, ids: &[NodeId]) -> Result<Vec<NodeInfo>> {
        ids.iter()
            .map(|id| {
                let hit = self
                    .nodes
                    .get(id)
                    .or_else(|| self.table_ids.get(id))
                    .ok_or_else(|| Error::NotFound(format!("node {}", id)))?;
                Ok(NodeInfo {
                    id: hit.id,
                    database: hit.database.clone(),
                    source: hit.source.clone(),
                    field: hit.field.clone(),
                })
            })
            .collect()
    }

    /// Columns of every table called `table`, database by database.
    fn hits_for_table(&self, table: &str) -> Result<Vec<Hit>> {
        let mut hits = Vec::new();
        let mut matched = false;
        for (table_id, ids) in &self.tables {
            if !matches!(self.table_ids.get(table_id), Some(t) if t.source == table) {
                continue;
            }
            matched = true;
            for id in ids {
                hits.push(self.node(*id)?.clone());
            }
        }
        if !matched {
            return Err(Error::NotFound(format!("table '{}'", table)));
        }
        Ok(hits)
    }

    fn expand_one_hop(&self, hit: &Hit, relation: Relation) -> Result<Drs> {
        self.node(hit.id)?;
        let hits: Vec<Hit> = self
            .neighbors(hit.id, relation)
            .iter()
            .filter_map(|(id, score)| self.nodes.get(id).map(|h| Hit { score: *score, ..h.clone() }))
            .collect();
        debug!(node = %hit.id, %relation, found = hits.len(), "one-hop expansion");
        let op = Operation::new(OperationKind::NeighborExpand, vec![OpParam::Hit(hit.clone()), OpParam::Relation(relation)]);
        Ok(Drs::new(hits, op))
    }

    /// Shortest path of at most `max_hops` edges, endpoints included.
    /// Empty when the endpoints coincide or nothing connects them.
    fn find_path_at_field_level(&self, from: &Hit, to: &Hit, relation: Relation, max_hops: usize) -> Result<Drs> {
        self.node(from.id)?;
        self.node(to.id)?;
        let op = Self::path_op(from, to, relation, max_hops);
        if from.id == to.id {
            return Ok(Drs::new(Vec::new(), op));
        }

        let mut visited: HashSet<NodeId> = HashSet::from([from.id]);
        let mut queue: VecDeque<Vec<NodeId>> = VecDeque::from([vec![from.id]]);
        while let Some(path) = queue.pop_front() {
            if path.len() > max_hops {
                continue;
            }
            let current = match path.last() {
                Some(id) => *id,
                None => continue,
            };
            for (next, _) in self.neighbors(current, relation) {
                if !visited.insert(*next) {
                    continue;
                }
                let mut new_path = path.clone();
                new_path.push(*next);
                if *next == to.id {
                    let hits = new_path.iter().filter_map(|id| self.nodes.get(id).cloned());
                    return Ok(Drs::new(hits, op));
                }
                queue.push_back(new_path);
            }
        }
        Ok(Drs::new(Vec::new(), op))
    }

    /// Breadth-first search over tables: a table reaches another when any of
    /// its columns has a `relation` edge into it. Returns the table hits along
    /// the shortest such path, in table mode.
    fn find_path_at_table_level(
        &self,
        from: &Hit,
        to: &Hit,
        relation: Relation,
        api: &dyn FieldResolver,
        max_hops: usize,
    ) -> Result<Drs> {
        let start = from.table_of();
        let target = to.table_of();
        let op = Self::path_op(&start, &target, relation, max_hops);
        if start.id == target.id {
            return Ok(Drs::with_mode(Vec::new(), op, Mode::Table));
        }

        let mut visited: HashSet<NodeId> = HashSet::from([start.id]);
        let mut queue: VecDeque<Vec<Hit>> = VecDeque::from([vec![start]]);
        while let Some(path) = queue.pop_front() {
            if path.len() > max_hops {
                continue;
            }
            let current = match path.last() {
                Some(hit) => hit,
                None => continue,
            };
            let fields = api.fields_of(current)?;
            let reached = api.neighbors_of(&fields, relation)?;
            for table in reached.iter().map(Hit::table_of) {
                if !visited.insert(table.id) {
                    continue;
                }
                let mut new_path = path.clone();
                let found = table.id == target.id;
                new_path.push(table);
                if found {
                    return Ok(Drs::with_mode(new_path, op, Mode::Table));
                }
                queue.push_back(new_path);
            }
        }
        Ok(Drs::with_mode(Vec::new(), op, Mode::Table))
    }
}
