use tracing::{debug, warn};

use lakeview_core::config::AlgebraSettings;
use lakeview_core::error::{Error, Result};
use lakeview_core::traits::{FieldResolver, GraphFacade, StoreFacade};
use lakeview_core::{Drs, Hit, KeywordField, Mode, NodeId, OpParam, Operation, OperationKind, Relation, Scope};

use crate::input::Input;

/// Discovery algebra over a lake graph and a keyword/metadata store.
///
/// Every operation normalizes its inputs to [`Drs`] values first and returns
/// a new result set whose lineage absorbs that of its inputs. Facade errors
/// are passed through untouched.
pub struct Algebra<G, S>
where
    G: GraphFacade,
    S: StoreFacade,
{
    pub(crate) network: G,
    pub(crate) store: S,
    settings: AlgebraSettings,
}

impl<G, S> Algebra<G, S>
where
    G: GraphFacade,
    S: StoreFacade,
{
    pub fn new(network: G, store: S) -> Self {
        Self::with_settings(network, store, AlgebraSettings::default())
    }

    pub fn with_settings(network: G, store: S, settings: AlgebraSettings) -> Self {
        Self { network, store, settings }
    }

    pub fn settings(&self) -> AlgebraSettings {
        self.settings
    }

    pub fn network(&self) -> &G {
        &self.network
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ---- input normalization ----

    /// Turn any accepted input into a result set.
    pub fn make_drs(&self, input: impl Into<Input>) -> Result<Drs> {
        let drs = match input.into() {
            Input::Drs(drs) => drs,
            Input::None => Drs::empty(),
            Input::Node(id) => Drs::origin(self.nid_to_hit(id)?),
            Input::Text(text) => {
                let id: NodeId = text.parse().map_err(|_| {
                    Error::InvalidArgument(format!(
                        "'{}' is not None, a node id, field triple, Hit, or DRS",
                        text
                    ))
                })?;
                Drs::origin(self.nid_to_hit(id)?)
            }
            Input::Triple(triple) => Drs::origin(Hit::from_triple(&triple, 0.0)),
            Input::Hit(hit) => Drs::origin(hit),
        };
        debug!(size = drs.len(), mode = ?drs.mode(), "input normalized");
        Ok(drs)
    }

    fn nid_to_hit(&self, id: NodeId) -> Result<Hit> {
        self.network
            .resolve_identity(&[id])?
            .into_iter()
            .next()
            .map(Hit::from)
            .ok_or_else(|| Error::NotFound(format!("node {}", id)))
    }

    /// Columns of the table `hit` belongs to. The graph answers by table name
    /// only, so same-named tables of other databases are dropped here.
    fn members_of(&self, hit: &Hit) -> Result<Vec<Hit>> {
        let mut members = self.network.hits_for_table(&hit.source)?;
        members.retain(|m| m.database == hit.database);
        Ok(members)
    }

    /// Table-mode set for the table `hit` belongs to.
    pub fn table_drs(&self, hit: &Hit) -> Result<Drs> {
        let members = self.members_of(hit)?;
        debug!(table = %hit.source, database = %hit.database, columns = members.len(), "table membership");
        Ok(Drs::table_of_members(hit, members))
    }

    /// Expand every table hit into its columns. Field-mode input is returned as is.
    fn promote_to_fields(&self, drs: Drs) -> Result<Drs> {
        if drs.mode() == Mode::Fields {
            return Ok(drs);
        }
        let mut fields = Drs::new(Vec::new(), Operation::new(OperationKind::FieldsMode, Vec::new())).absorb_provenance(&drs);
        for table in &drs {
            let members = self.members_of(table)?;
            let op = Operation::new(OperationKind::Table, vec![OpParam::Hit(table.clone())]);
            fields = fields.absorb(&Drs::new(members, op));
        }
        Ok(fields)
    }

    pub fn to_fields_mode(&self, input: impl Into<Input>) -> Result<Drs> {
        let drs = self.make_drs(input)?;
        let inputs = drs.len();
        let fields = self.promote_to_fields(drs)?;
        debug!(inputs, fields = fields.len(), "promoted to fields mode");
        Ok(fields)
    }

    /// Explicit collapse to one hit per table.
    pub fn to_table_mode(&self, input: impl Into<Input>) -> Result<Drs> {
        let drs = self.make_drs(input)?;
        let inputs = drs.len();
        let tables = drs.into_table_mode();
        debug!(inputs, tables = tables.len(), "collapsed to table mode");
        Ok(tables)
    }

    // ---- basic API ----

    pub fn keyword_search(&self, keyword: &str, scope: Scope, max_results: usize) -> Result<Drs> {
        let field = scope_to_keyword_field(scope)?;
        let hits = self.store.search_keywords(keyword, field, max_results)?;
        debug!(keyword, ?scope, max_results, found = hits.len(), "keyword search");
        let op = Operation::new(OperationKind::KwLookup, vec![OpParam::Text(keyword.to_string()), OpParam::Scope(scope)]);
        Ok(Drs::new(hits, op))
    }

    /// One-hop neighbors of every element of `input` along `relation`.
    ///
    /// Table-mode input is promoted to its columns first. `max_hops` is
    /// accepted for symmetry with [`Algebra::traverse`]; exactly one hop is taken.
    pub fn neighbor_search(&self, input: impl Into<Input>, relation: Relation, max_hops: Option<usize>) -> Result<Drs> {
        let input = self.make_drs(input)?;
        let fields = self.promote_to_fields(input)?;
        let op = Operation::new(OperationKind::NeighborExpand, vec![OpParam::Relation(relation)]);
        let mut out = Drs::new(Vec::new(), op).absorb_provenance(&fields);
        for hit in &fields {
            let hop = self.network.expand_one_hop(hit, relation)?;
            out = out.absorb(&hop);
        }
        debug!(%relation, ?max_hops, inputs = fields.len(), found = out.len(), "neighbor search");
        Ok(out)
    }

    pub fn schema_similar_to(&self, input: impl Into<Input>) -> Result<Drs> {
        self.neighbor_search(input, Relation::SchemaSim, None)
    }

    pub fn content_similar_to(&self, input: impl Into<Input>) -> Result<Drs> {
        self.neighbor_search(input, Relation::ContentSim, None)
    }

    pub fn pkfk_of(&self, input: impl Into<Input>) -> Result<Drs> {
        self.neighbor_search(input, Relation::Pkfk, None)
    }

    // ---- transitive closure API ----

    /// Everything reachable from `input` within `max_hops` hops along `primitive`.
    ///
    /// Each round re-expands the whole accumulated set, not just the newest
    /// fringe. With `max_hops == 0` the result is empty and carries only the
    /// input's lineage.
    pub fn traverse(&self, input: impl Into<Input>, primitive: Relation, max_hops: usize) -> Result<Drs> {
        let start = self.make_drs(input)?;
        if start.mode() == Mode::Table {
            return Err(Error::InvalidArgument("traverse does not support table-mode input".into()));
        }

        let mut reached = Drs::empty().absorb_provenance(&start);
        if max_hops == 0 {
            return Ok(reached);
        }
        let mut fringe = start;
        for _ in 0..max_hops {
            for hit in &fringe {
                let hop = self.network.expand_one_hop(hit, primitive)?;
                reached = reached.absorb(&hop);
            }
            fringe = reached.clone();
        }
        debug!(%primitive, max_hops, found = reached.len(), "traverse");
        Ok(reached.retag(Operation::new(OperationKind::Traverse, vec![OpParam::Relation(primitive), OpParam::Hops(max_hops)])))
    }

    /// Paths along `primitive` between every element of `a` and every element
    /// of `b` (`a` itself when `b` is absent), each at most `max_hops` long.
    pub fn paths(&self, primitive: Relation, a: impl Into<Input>, b: Option<Input>, max_hops: usize) -> Result<Drs> {
        let a = self.make_drs(a)?;
        let b = match b {
            Some(b) => self.make_drs(b)?,
            None => a.clone(),
        };
        a.ensure_same_mode(&b)?;

        let mut found = Drs::with_mode(Vec::new(), Operation::none(), a.mode())
            .absorb_provenance(&a)
            .absorb_provenance(&b);
        // an explicit `b` equal to `a` asks for self-paths like an absent one
        let distinct = b != a;
        if distinct && shares_element(&a, &b) {
            warn!(left = a.len(), right = b.len(), "distinct operands share an element; skipping path search");
            return Ok(found);
        }

        for h1 in &a {
            for h2 in &b {
                let path = match a.mode() {
                    Mode::Fields => self.network.find_path_at_field_level(h1, h2, primitive, max_hops)?,
                    Mode::Table => self.network.find_path_at_table_level(h1, h2, primitive, self, max_hops)?,
                };
                found = found.absorb(&path);
            }
        }
        debug!(%primitive, max_hops, pairs = a.len() * b.len(), found = found.len(), "paths");
        Ok(found.retag(Operation::new(OperationKind::Path, vec![OpParam::Relation(primitive), OpParam::Hops(max_hops)])))
    }

    // ---- combiner API ----

    pub fn intersection(&self, a: impl Into<Input>, b: impl Into<Input>) -> Result<Drs> {
        let a = self.make_drs(a)?;
        let b = self.make_drs(b)?;
        let out = a.intersection(&b)?;
        debug!(left = a.len(), right = b.len(), found = out.len(), "intersection");
        Ok(out)
    }

    pub fn union(&self, a: impl Into<Input>, b: impl Into<Input>) -> Result<Drs> {
        let a = self.make_drs(a)?;
        let b = self.make_drs(b)?;
        let out = a.union(&b)?;
        debug!(left = a.len(), right = b.len(), found = out.len(), "union");
        Ok(out)
    }

    /// Elements of `a` that are not in `b`.
    pub fn difference(&self, a: impl Into<Input>, b: impl Into<Input>) -> Result<Drs> {
        let a = self.make_drs(a)?;
        let b = self.make_drs(b)?;
        let out = a.difference(&b)?;
        debug!(left = a.len(), right = b.len(), found = out.len(), "difference");
        Ok(out)
    }
}

impl<G, S> FieldResolver for Algebra<G, S>
where
    G: GraphFacade,
    S: StoreFacade,
{
    fn fields_of(&self, table: &Hit) -> Result<Drs> {
        let table = table.table_of();
        let members = self.members_of(&table)?;
        Ok(Drs::new(members, Operation::new(OperationKind::Table, vec![OpParam::Hit(table)])))
    }

    fn neighbors_of(&self, fields: &Drs, relation: Relation) -> Result<Drs> {
        self.neighbor_search(fields, relation, None)
    }
}

fn scope_to_keyword_field(scope: Scope) -> Result<KeywordField> {
    match scope {
        Scope::Db => Err(Error::InvalidArgument("DB scope is not supported".into())),
        Scope::Source => Ok(KeywordField::Table),
        Scope::Field => Ok(KeywordField::Schema),
        Scope::Content => Ok(KeywordField::Text),
    }
}

/// Two different operands holding the same element make the whole path search
/// return nothing but lineage, whatever the other pairs would have found.
fn shares_element(a: &Drs, b: &Drs) -> bool {
    a.ids().any(|id| b.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lakeview_core::NodeTriple;

    #[test]
    fn scope_maps_to_store_fields() {
        assert_eq!(scope_to_keyword_field(Scope::Source).unwrap(), KeywordField::Table);
        assert_eq!(scope_to_keyword_field(Scope::Field).unwrap(), KeywordField::Schema);
        assert_eq!(scope_to_keyword_field(Scope::Content).unwrap(), KeywordField::Text);
        assert!(matches!(scope_to_keyword_field(Scope::Db), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn shared_element_detection() {
        let h = Hit::from_triple(&NodeTriple::new("d", "t", "c"), 0.0);
        let other = Hit::from_triple(&NodeTriple::new("d", "t", "x"), 0.0);
        let a = Drs::new([h.clone(), other], Operation::origin());
        let b = Drs::origin(h);
        assert!(shares_element(&a, &b));
        assert!(!shares_element(&a, &Drs::empty()));
    }
}
