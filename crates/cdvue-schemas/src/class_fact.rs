//! Normalized per-class facts produced by extraction.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Everything the indexing and resolution stages need to know about one
/// non-abstract class.
///
/// Facts are created once during extraction, are immutable afterwards,
/// and are discarded once the indexes are built. Sets are `BTreeSet` so
/// that repeated runs over the same sources produce identical facts in
/// identical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFact {
    /// Fully-qualified class name, the unique key for this fact.
    pub qualified_name: String,

    /// True if the class carries the `Component` marker annotation.
    pub is_component: bool,

    /// True if the class carries the `Service` marker annotation.
    pub is_service: bool,

    /// True if the declaration is an interface.
    pub is_interface: bool,

    /// Explicit override name for the service contract this class
    /// fulfills. `None` means "use the implemented-interface names".
    /// A tag equal to the class's own qualified or short name is
    /// suppressed to `None` at extraction time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tag: Option<String>,

    /// Interfaces this class implements, including those inherited from
    /// service-marked ancestors (and their resolved service tags).
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub implemented_interfaces: BTreeSet<String>,

    /// Declared types of reference-marked fields, including those
    /// inherited from component-marked ancestors.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub referenced_names: BTreeSet<String>,
}
