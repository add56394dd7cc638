//! The two derived indexes (plus the reverse-service view) built from
//! the fact stream.

use std::collections::{BTreeMap, BTreeSet};

use cdvue_schemas::ClassFact;
use tracing::debug;

/// Service and reference indexes over one run's facts.
///
/// Rebuilt fully on every run; ordered maps keep iteration, and
/// therefore catalog discovery order, stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyIndexes {
    /// Service name to the components that implement it. A name is a
    /// key iff at least one component declares an implemented interface
    /// or service tag equal to it.
    pub service_to_components: BTreeMap<String, BTreeSet<String>>,

    /// Component name to the names it references. A key exists iff the
    /// component has at least one reference-tagged field, directly or
    /// inherited.
    pub component_to_references: BTreeMap<String, BTreeSet<String>>,

    /// Component name to the service names it fulfills (implemented
    /// interfaces plus its own tag); the reverse-edge display view.
    pub component_to_services: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyIndexes {
    /// Builds all three indexes from the fact list. Order of the input
    /// is irrelevant; each fact is processed exactly once.
    pub fn build(facts: &[ClassFact]) -> Self {
        let mut indexes = Self::default();
        for fact in facts {
            indexes.populate(fact);
        }
        debug!(
            services = indexes.service_to_components.len(),
            components = indexes.component_to_references.len(),
            "indexes built"
        );
        indexes
    }

    fn populate(&mut self, fact: &ClassFact) {
        if fact.is_component && !fact.referenced_names.is_empty() {
            self.component_to_references.insert(
                fact.qualified_name.clone(),
                fact.referenced_names.clone(),
            );
        }

        // Only classes acting as both component and service register as
        // implementers; a service-only class fulfills no contract here.
        if fact.is_component && fact.is_service {
            let mut services = fact.implemented_interfaces.clone();
            if let Some(tag) = &fact.service_tag {
                services.insert(tag.clone());
            }
            for service in &services {
                self.service_to_components
                    .entry(service.clone())
                    .or_default()
                    .insert(fact.qualified_name.clone());
            }
            self.component_to_services
                .insert(fact.qualified_name.clone(), services);
        }
    }
}
