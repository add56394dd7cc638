//! The resolved dependency catalog serialized into the rendered graph.
//!
//! Field names on the wire are camelCase (`dependsOn`,
//! `numberDependsOn`, ...) to match what the graph renderer consumes.
//! The catalog itself serializes as a self-describing array of node
//! records in discovery order.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Suffix appended to a referenced name to form its ghost node name.
///
/// Ghost names are a distinct namespace: `X` and `X?` may coexist in
/// one catalog as different nodes.
pub const GHOST_SUFFIX: &str = "?";

/// Wire text of the unknown fan-out sentinel.
const UNKNOWN_FANOUT: &str = "N/A";

/// Returns the ghost node name for a referenced name.
pub fn ghost_name(referenced: &str) -> String {
    format!("{referenced}{GHOST_SUFFIX}")
}

/// Out-degree of a catalog node.
///
/// Ghost nodes are never resolved further, so their own fan-out is not
/// a count; it serializes as the literal string `"N/A"`. Every other
/// node carries an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fanout {
    /// A computed out-edge count.
    Count(usize),
    /// The ghost sentinel; serializes as `"N/A"`.
    Unknown,
}

impl Default for Fanout {
    fn default() -> Self {
        Fanout::Count(0)
    }
}

impl Serialize for Fanout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fanout::Count(n) => serializer.serialize_u64(*n as u64),
            Fanout::Unknown => serializer.serialize_str(UNKNOWN_FANOUT),
        }
    }
}

impl<'de> Deserialize<'de> for Fanout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FanoutVisitor;

        impl Visitor<'_> for FanoutVisitor {
            type Value = Fanout;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "an integer count or the string \"{UNKNOWN_FANOUT}\"")
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Fanout, E> {
                usize::try_from(n)
                    .map(Fanout::Count)
                    .map_err(|_| E::custom("fan-out count out of range"))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Fanout, E> {
                if s == UNKNOWN_FANOUT {
                    Ok(Fanout::Unknown)
                } else {
                    Err(E::custom(format!("unexpected fan-out string {s:?}")))
                }
            }
        }

        deserializer.deserialize_any(FanoutVisitor)
    }
}

/// One node in the resolved dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogNode {
    /// Unique node name; ghost nodes carry the [`GHOST_SUFFIX`].
    pub name: String,

    /// Names of the nodes this node has an out-edge to. Insertion
    /// order, deduplicated by exact string match.
    pub depends_on: Vec<String>,

    /// Out-degree; always equal to `depends_on.len()` except for ghost
    /// nodes, which carry the sentinel.
    pub number_depends_on: Fanout,

    /// Raw referenced names, kept for display. May include names that
    /// were resolved into concrete implementer edges.
    pub depends_on_services: Vec<String>,

    /// In-degree, incremented exactly once per distinct predecessor
    /// edge.
    pub number_dependents: usize,

    /// Service names this node itself fulfills; display metadata only.
    pub dependents_services: Vec<String>,
}

impl CatalogNode {
    /// Creates an empty node: no edges, zero counts, empty service
    /// sets.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a ghost node for an unresolved referenced name.
    ///
    /// The node is named `{referenced}?`, its fan-out is the sentinel,
    /// and its fulfilled-service list is seeded with the referenced
    /// name itself.
    pub fn ghost(referenced: &str) -> Self {
        Self {
            name: ghost_name(referenced),
            number_depends_on: Fanout::Unknown,
            dependents_services: vec![referenced.to_string()],
            ..Self::default()
        }
    }

    /// Returns true if this node is a ghost.
    pub fn is_ghost(&self) -> bool {
        self.number_depends_on == Fanout::Unknown
    }
}

/// The resolved graph: catalog nodes keyed by name, in discovery order.
///
/// The name-keyed map gives the resolver O(1) fetch-or-create while the
/// serialized form stays an ordered array of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    nodes: IndexMap<String, CatalogNode>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the node named `name`, creating an empty one on first
    /// reference.
    pub fn ensure(&mut self, name: &str) -> &mut CatalogNode {
        self.nodes
            .entry(name.to_string())
            .or_insert_with(|| CatalogNode::new(name))
    }

    /// Fetches the ghost node for `referenced`, creating it on first
    /// reference.
    pub fn ensure_ghost(&mut self, referenced: &str) -> &mut CatalogNode {
        self.nodes
            .entry(ghost_name(referenced))
            .or_insert_with(|| CatalogNode::ghost(referenced))
    }

    /// Looks up a node by exact name.
    pub fn get(&self, name: &str) -> Option<&CatalogNode> {
        self.nodes.get(name)
    }

    /// Looks up a node by exact name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut CatalogNode> {
        self.nodes.get_mut(name)
    }

    /// Returns true if a node with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Iterates nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &CatalogNode> {
        self.nodes.values()
    }

    /// Number of nodes in the catalog.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the catalog has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Serialize for Catalog {
    /// Serializes as an array of node records in discovery order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.nodes.len()))?;
        for node in self.nodes.values() {
            seq.serialize_element(node)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    /// Deserializes from an array of node records, re-keying by name.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of catalog nodes")
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<Catalog, A::Error> {
                let mut catalog = Catalog::new();
                while let Some(node) = seq.next_element::<CatalogNode>()? {
                    if catalog.nodes.insert(node.name.clone(), node).is_some() {
                        return Err(de::Error::custom(
                            "duplicate catalog node name",
                        ));
                    }
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_seq(CatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::collection::vec;
    use proptest::prelude::*;

    use super::*;
    use crate::testutil::arb_qualified;

    #[test]
    fn fanout_count_serializes_as_integer() {
        let json = serde_json::to_string(&Fanout::Count(3)).expect("serialize");
        assert_eq!(json, "3");
    }

    #[test]
    fn fanout_unknown_serializes_as_sentinel() {
        let json = serde_json::to_string(&Fanout::Unknown).expect("serialize");
        assert_eq!(json, "\"N/A\"");
    }

    #[test]
    fn fanout_deserializes_both_forms() {
        assert_eq!(
            serde_json::from_str::<Fanout>("7").expect("count"),
            Fanout::Count(7)
        );
        assert_eq!(
            serde_json::from_str::<Fanout>("\"N/A\"").expect("sentinel"),
            Fanout::Unknown
        );
        assert!(serde_json::from_str::<Fanout>("\"seven\"").is_err());
    }

    #[test]
    fn node_wire_fields_are_camel_case() {
        let mut node = CatalogNode::new("org.onlab.Comp1");
        node.depends_on.push("org.onlab.Comp2".to_string());
        node.number_depends_on = Fanout::Count(1);
        node.number_dependents = 2;

        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["name"], "org.onlab.Comp1");
        assert_eq!(json["dependsOn"][0], "org.onlab.Comp2");
        assert_eq!(json["numberDependsOn"], 1);
        assert_eq!(json["numberDependents"], 2);
        assert!(json["dependsOnServices"].is_array());
        assert!(json["dependentsServices"].is_array());
    }

    #[test]
    fn ghost_node_shape() {
        let ghost = CatalogNode::ghost("org.onlab.IfaceZ");
        assert_eq!(ghost.name, "org.onlab.IfaceZ?");
        assert!(ghost.is_ghost());
        assert_eq!(ghost.number_dependents, 0);
        assert_eq!(ghost.dependents_services, vec!["org.onlab.IfaceZ"]);

        let json = serde_json::to_value(&ghost).expect("serialize");
        assert_eq!(json["numberDependsOn"], "N/A");
    }

    #[test]
    fn ghost_and_plain_names_coexist() {
        let mut catalog = Catalog::new();
        catalog.ensure("org.onlab.Iface");
        catalog.ensure_ghost("org.onlab.Iface");
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("org.onlab.Iface"));
        assert!(catalog.contains("org.onlab.Iface?"));
    }

    #[test]
    fn ensure_is_idempotent() {
        let mut catalog = Catalog::new();
        catalog.ensure("a.B").number_dependents = 4;
        catalog.ensure("a.B");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a.B").expect("node").number_dependents, 4);
    }

    #[test]
    fn serializes_in_discovery_order() {
        let mut catalog = Catalog::new();
        catalog.ensure("z.Last");
        catalog.ensure("a.First");
        let json = serde_json::to_string(&catalog).expect("serialize");
        let z = json.find("z.Last").expect("z.Last present");
        let a = json.find("a.First").expect("a.First present");
        assert!(z < a, "discovery order must be preserved");
    }

    #[test]
    fn duplicate_names_rejected_on_deserialize() {
        let json = r#"[
            {"name": "a.B", "dependsOn": [], "numberDependsOn": 0,
             "dependsOnServices": [], "numberDependents": 0,
             "dependentsServices": []},
            {"name": "a.B", "dependsOn": [], "numberDependsOn": 0,
             "dependsOnServices": [], "numberDependents": 0,
             "dependentsServices": []}
        ]"#;
        assert!(serde_json::from_str::<Catalog>(json).is_err());
    }

    prop_compose! {
        fn arb_node()
            (
                name in arb_qualified(),
                depends_on in vec(arb_qualified(), 0..4),
                depends_on_services in vec(arb_qualified(), 0..4),
                number_dependents in 0..20usize,
                dependents_services in vec(arb_qualified(), 0..4),
                ghost in any::<bool>(),
            )
        -> CatalogNode {
            CatalogNode {
                number_depends_on: if ghost {
                    Fanout::Unknown
                } else {
                    Fanout::Count(depends_on.len())
                },
                name,
                depends_on,
                depends_on_services,
                number_dependents,
                dependents_services,
            }
        }
    }

    proptest! {
        /// The emitted catalog must survive a JSON roundtrip with node
        /// order intact; the renderer relies on the array form.
        #[test]
        fn catalog_roundtrip(nodes in vec(arb_node(), 0..6)) {
            let mut catalog = Catalog::new();
            for node in nodes {
                // Duplicate generated names collapse, mirroring
                // fetch-or-create.
                catalog.nodes.insert(node.name.clone(), node);
            }
            let json = serde_json::to_string(&catalog).expect("serialize");
            let parsed: Catalog =
                serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(parsed, catalog);
        }
    }
}
