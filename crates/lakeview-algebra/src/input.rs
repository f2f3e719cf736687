//! Accepted input shapes of the public algebra operations.

use lakeview_core::{Drs, Hit, NodeId, NodeTriple};

/// Anything an operation can turn into a result set.
///
/// `Text` carries a node id in string form (as handed over by CLIs and
/// harnesses); any other text is rejected at normalization time.
#[derive(Debug, Clone, Default)]
pub enum Input {
    #[default]
    None,
    Node(NodeId),
    Text(String),
    Triple(NodeTriple),
    Hit(Hit),
    Drs(Drs),
}

impl From<NodeId> for Input {
    fn from(id: NodeId) -> Self {
        Input::Node(id)
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::Text(s.to_string())
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::Text(s)
    }
}

impl From<NodeTriple> for Input {
    fn from(t: NodeTriple) -> Self {
        Input::Triple(t)
    }
}

impl From<(&str, &str, &str)> for Input {
    fn from(t: (&str, &str, &str)) -> Self {
        Input::Triple(t.into())
    }
}

impl From<Hit> for Input {
    fn from(h: Hit) -> Self {
        Input::Hit(h)
    }
}

impl From<&Hit> for Input {
    fn from(h: &Hit) -> Self {
        Input::Hit(h.clone())
    }
}

impl From<Drs> for Input {
    fn from(d: Drs) -> Self {
        Input::Drs(d)
    }
}

impl From<&Drs> for Input {
    fn from(d: &Drs) -> Self {
        Input::Drs(d.clone())
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}
