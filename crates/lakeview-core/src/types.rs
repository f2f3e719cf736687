//! Domain types shared by the algebra engine and its facades.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use twox_hash::XxHash64;

use crate::error::Error;

const ID_SEPARATOR: u8 = 0x1f;

/// Stable identifier of a schema element (table or column).
///
/// Derived from `(database, source, field)` with [`NodeId::from_triple`];
/// table-level elements use an empty field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn from_triple(database: &str, source: &str, field: &str) -> Self {
        let mut hasher = XxHash64::with_seed(0);
        for part in [database, source, field] {
            hasher.write(part.as_bytes());
            hasher.write_u8(ID_SEPARATOR);
        }
        Self(hasher.finish())
    }

    pub fn table(database: &str, source: &str) -> Self {
        Self::from_triple(database, source, "")
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(NodeId)
            .map_err(|_| Error::InvalidArgument(format!("'{}' is not a node id", s)))
    }
}

impl From<u64> for NodeId {
    fn from(v: u64) -> Self {
        NodeId(v)
    }
}

/// `(database, source, field)` naming of a schema element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeTriple {
    pub database: String,
    pub source: String,
    pub field: String,
}

impl NodeTriple {
    pub fn new(database: impl Into<String>, source: impl Into<String>, field: impl Into<String>) -> Self {
        Self { database: database.into(), source: source.into(), field: field.into() }
    }

    pub fn id(&self) -> NodeId {
        NodeId::from_triple(&self.database, &self.source, &self.field)
    }
}

impl From<(&str, &str, &str)> for NodeTriple {
    fn from((database, source, field): (&str, &str, &str)) -> Self {
        Self::new(database, source, field)
    }
}

impl From<(String, String, String)> for NodeTriple {
    fn from((database, source, field): (String, String, String)) -> Self {
        Self { database, source, field }
    }
}

/// Identity record returned by the graph facade for a node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub database: String,
    pub source: String,
    pub field: String,
}

impl From<NodeInfo> for Hit {
    fn from(info: NodeInfo) -> Self {
        Hit::new(info.id, info.database, info.source, info.field, 0.0)
    }
}

/// A scored reference to one table or column.
///
/// Equality, hashing and ordering use `id` only; `score` is carried through
/// from whichever engine produced the hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    pub id: NodeId,
    pub database: String,
    pub source: String,
    pub field: String,
    pub score: f32,
}

impl Hit {
    pub fn new(
        id: NodeId,
        database: impl Into<String>,
        source: impl Into<String>,
        field: impl Into<String>,
        score: f32,
    ) -> Self {
        Self { id, database: database.into(), source: source.into(), field: field.into(), score }
    }

    pub fn from_triple(triple: &NodeTriple, score: f32) -> Self {
        Self::new(triple.id(), triple.database.clone(), triple.source.clone(), triple.field.clone(), score)
    }

    /// The table-level hit for `(database, source)`.
    pub fn table(database: impl Into<String>, source: impl Into<String>) -> Self {
        let database = database.into();
        let source = source.into();
        let id = NodeId::table(&database, &source);
        Self { id, database, source, field: String::new(), score: 0.0 }
    }

    pub fn is_table(&self) -> bool {
        self.field.is_empty()
    }

    /// The table this element belongs to (itself if already a table hit).
    pub fn table_of(&self) -> Hit {
        if self.is_table() {
            return self.clone();
        }
        Hit::table(self.database.clone(), self.source.clone())
    }

    pub fn triple(&self) -> NodeTriple {
        NodeTriple::new(self.database.clone(), self.source.clone(), self.field.clone())
    }
}

impl PartialEq for Hit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Hit {}

impl Hash for Hit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Hit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {}, {:.4})", self.id, self.database, self.source, self.field, self.score)
    }
}

/// Granularity at which a result set is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Fields,
    Table,
}

/// Typed edge predicate in the lake graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    Schema,
    SchemaSim,
    ContentSim,
    EntitySim,
    Pkfk,
    InclusionDependency,
    MeansSame,
    MeansDiff,
    Subclass,
    Superclass,
    Member,
    Container,
}

impl Relation {
    pub const ALL: [Relation; 12] = [
        Relation::Schema,
        Relation::SchemaSim,
        Relation::ContentSim,
        Relation::EntitySim,
        Relation::Pkfk,
        Relation::InclusionDependency,
        Relation::MeansSame,
        Relation::MeansDiff,
        Relation::Subclass,
        Relation::Superclass,
        Relation::Member,
        Relation::Container,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Relation::Schema => "SCHEMA",
            Relation::SchemaSim => "SCHEMA_SIM",
            Relation::ContentSim => "CONTENT_SIM",
            Relation::EntitySim => "ENTITY_SIM",
            Relation::Pkfk => "PKFK",
            Relation::InclusionDependency => "INCLUSION_DEPENDENCY",
            Relation::MeansSame => "MEANS_SAME",
            Relation::MeansDiff => "MEANS_DIFF",
            Relation::Subclass => "SUBCLASS",
            Relation::Superclass => "SUPERCLASS",
            Relation::Member => "MEMBER",
            Relation::Container => "CONTAINER",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Relation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Relation::ALL
            .iter()
            .copied()
            .find(|r| r.label() == wanted)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown relation '{}'", s)))
    }
}

/// Where a keyword lookup should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Db,
    Source,
    Field,
    Content,
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "db" => Ok(Scope::Db),
            "source" | "table" => Ok(Scope::Source),
            "field" | "column" => Ok(Scope::Field),
            "content" | "text" => Ok(Scope::Content),
            other => Err(Error::InvalidArgument(format!("unknown scope '{}'", other))),
        }
    }
}

/// Indexed field kinds of the keyword store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordField {
    /// Table (source) names.
    Table,
    /// Column names.
    Schema,
    /// Column values.
    Text,
}

/// Annotation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MdClass {
    Warning,
    Insight,
    Question,
}

impl MdClass {
    pub fn label(&self) -> &'static str {
        match self {
            MdClass::Warning => "warning",
            MdClass::Insight => "insight",
            MdClass::Question => "question",
        }
    }
}

impl fmt::Display for MdClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Relation between the two elements of a relational annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MdRelation {
    MeansSameAs,
    MeansDiffFrom,
    IsSubclassOf,
    IsSuperclassOf,
    IsMemberOf,
    IsContainerOf,
}

impl MdRelation {
    pub fn label(&self) -> &'static str {
        match self {
            MdRelation::MeansSameAs => "MEANS SAME AS",
            MdRelation::MeansDiffFrom => "MEANS DIFF FROM",
            MdRelation::IsSubclassOf => "IS SUBCLASS OF",
            MdRelation::IsSuperclassOf => "IS SUPERCLASS OF",
            MdRelation::IsMemberOf => "IS MEMBER OF",
            MdRelation::IsContainerOf => "CONTAINS",
        }
    }
}

impl fmt::Display for MdRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
