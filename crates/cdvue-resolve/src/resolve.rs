//! Catalog resolution: turning the indexes into the node/edge graph.

use cdvue_schemas::{ghost_name, Catalog, Fanout};
use tracing::debug;

use crate::index::DependencyIndexes;

/// Resolves the indexes into the final catalog.
///
/// For every component with references, each referenced name is looked
/// up in the service index. Known implementers become edges to their
/// catalog nodes (deduplicated, self-loops suppressed); unresolved
/// names become edges to ghost nodes. Nodes are created on first
/// reference and mutated in place as further edges are discovered, so
/// in-degrees count each distinct predecessor edge exactly once.
pub fn resolve_catalog(indexes: &DependencyIndexes) -> Catalog {
    let mut catalog = Catalog::new();

    for (component, references) in &indexes.component_to_references {
        {
            let node = catalog.ensure(component);
            node.depends_on_services = references.iter().cloned().collect();
            if let Some(services) =
                indexes.component_to_services.get(component)
            {
                node.dependents_services =
                    services.iter().cloned().collect();
            }
        }

        // Out-edges accumulate locally and are written back once all
        // references are processed; `contains` checks against this
        // accumulator are the dedup-by-exact-string contract.
        let mut depends_on: Vec<String> = Vec::new();

        for reference in references {
            let implementers = indexes
                .service_to_components
                .get(reference)
                .filter(|implementers| !implementers.is_empty());

            match implementers {
                None => {
                    let ghost = ghost_name(reference);
                    if !depends_on.contains(&ghost) {
                        catalog.ensure_ghost(reference).number_dependents += 1;
                        debug!(
                            component = %component,
                            reference = %reference,
                            "unresolved reference, ghost edge"
                        );
                        depends_on.push(ghost);
                    }
                }
                Some(implementers) => {
                    for implementer in implementers {
                        if implementer == component
                            || depends_on.contains(implementer)
                        {
                            continue;
                        }
                        catalog.ensure(implementer).number_dependents += 1;
                        depends_on.push(implementer.clone());
                    }
                }
            }
        }

        let node = catalog.get_mut(component).expect("component node exists");
        node.number_depends_on = Fanout::Count(depends_on.len());
        node.depends_on = depends_on;
    }

    debug!(nodes = catalog.len(), "catalog resolved");
    catalog
}
