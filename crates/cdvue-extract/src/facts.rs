//! ClassFact extraction: one normalized fact per non-abstract class.
//!
//! This stage turns raw class descriptors into the facts the indexes
//! are built from: marker flags, the resolved service tag, implemented
//! interfaces, and reference-field types, with inherited fields and
//! interfaces propagated up the ancestor chain.
//!
//! Ancestor propagation truncates at the first ancestor that lacks the
//! relevant marker (or is unknown to the provider); it never skips an
//! unmarked ancestor to continue further up.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use cdvue_schemas::{ClassDescriptor, ClassFact};
use tracing::{debug, warn};

/// Marker annotation names recognized bare or under the SCR namespace.
const COMPONENT_MARKER: &str = "Component";
const SERVICE_MARKER: &str = "Service";
const REFERENCE_MARKER: &str = "Reference";

/// Length of the trailing suffix stripped from a raw annotation value.
///
/// Class-literal values arrive as source text (`FooService.class`); the
/// contract is to remove exactly the final 6 characters, whatever the
/// value is.
const TAG_SUFFIX_LEN: usize = 6;

/// A per-class extraction failure. Caught at the class boundary so one
/// malformed class does not abort the run.
#[derive(Debug)]
pub(crate) enum FactError {
    /// An annotation value is too short to carry the suffix the tag
    /// strip removes.
    MalformedTagValue { class: String, value: String },
}

impl fmt::Display for FactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactError::MalformedTagValue { class, value } => write!(
                f,
                "malformed annotation value {value:?} on class {class}"
            ),
        }
    }
}

/// Extracts one fact per non-abstract class.
///
/// Classes whose extraction fails are logged and omitted; everything
/// else proceeds.
pub fn extract_facts(classes: &[ClassDescriptor]) -> Vec<ClassFact> {
    // Ancestors are resolved by qualified name through this map rather
    // than a linked object graph.
    let by_name: HashMap<&str, &ClassDescriptor> = classes
        .iter()
        .map(|class| (class.qualified_name.as_str(), class))
        .collect();

    classes
        .iter()
        .filter(|class| !class.is_abstract)
        .filter_map(|class| match build_fact(class, &by_name) {
            Ok(fact) => Some(fact),
            Err(e) => {
                warn!(
                    class = %class.qualified_name,
                    error = %e,
                    "skipping class"
                );
                None
            }
        })
        .collect()
}

fn build_fact(
    class: &ClassDescriptor,
    by_name: &HashMap<&str, &ClassDescriptor>,
) -> Result<ClassFact, FactError> {
    let is_component = has_marker(class, COMPONENT_MARKER);
    let is_service = has_marker(class, SERVICE_MARKER);

    debug!(
        class = %class.qualified_name,
        annotations = class.annotations.len(),
        fields = class.fields.len(),
        component = is_component,
        service = is_service,
        "processing class"
    );

    let mut implemented_interfaces: BTreeSet<String> =
        class.interfaces.iter().cloned().collect();
    let mut referenced_names = BTreeSet::new();

    // Reference fields only matter on classes carrying a marker; plain
    // classes keep an empty set even if they happen to annotate fields.
    if is_component || is_service {
        for field in &class.fields {
            if field.has_marker(REFERENCE_MARKER) {
                debug!(
                    class = %class.qualified_name,
                    field_type = %field.type_name,
                    "reference field"
                );
                referenced_names.insert(field.type_name.clone());
            }
        }
    }

    if is_component {
        referenced_names.extend(inherited_references(class, by_name));
    }
    if is_service {
        implemented_interfaces.extend(inherited_interfaces(class, by_name)?);
    }

    Ok(ClassFact {
        qualified_name: class.qualified_name.clone(),
        is_component,
        is_service,
        is_interface: class.is_interface,
        service_tag: resolve_service_tag(class)?,
        implemented_interfaces,
        referenced_names,
    })
}

fn has_marker(class: &ClassDescriptor, marker: &str) -> bool {
    class.annotations.iter().any(|a| a.names_marker(marker))
}

/// Walks the ancestor chain collecting reference-field types, stopping
/// at the first ancestor without the component marker.
fn inherited_references(
    class: &ClassDescriptor,
    by_name: &HashMap<&str, &ClassDescriptor>,
) -> BTreeSet<String> {
    let mut collected = BTreeSet::new();
    let mut next = class.superclass.as_deref();
    while let Some(name) = next {
        let Some(ancestor) = by_name.get(name) else {
            break;
        };
        if !has_marker(ancestor, COMPONENT_MARKER) {
            break;
        }
        for field in &ancestor.fields {
            if field.has_marker(REFERENCE_MARKER) {
                collected.insert(field.type_name.clone());
            }
        }
        next = ancestor.superclass.as_deref();
    }
    collected
}

/// Walks the ancestor chain collecting implemented interfaces and each
/// ancestor's own resolved service tag, stopping at the first ancestor
/// without the service marker.
fn inherited_interfaces(
    class: &ClassDescriptor,
    by_name: &HashMap<&str, &ClassDescriptor>,
) -> Result<BTreeSet<String>, FactError> {
    let mut collected = BTreeSet::new();
    let mut next = class.superclass.as_deref();
    while let Some(name) = next {
        let Some(ancestor) = by_name.get(name) else {
            break;
        };
        if !has_marker(ancestor, SERVICE_MARKER) {
            break;
        }
        collected.extend(ancestor.interfaces.iter().cloned());
        if let Some(tag) = resolve_service_tag(ancestor)? {
            collected.insert(tag);
        }
        next = ancestor.superclass.as_deref();
    }
    Ok(collected)
}

/// Resolves the explicit service tag for a class.
///
/// The first annotation in declaration order carrying a `value`
/// property wins. The raw value loses its final [`TAG_SUFFIX_LEN`]
/// characters; a tag equal to the class's own qualified or short name
/// is suppressed.
fn resolve_service_tag(
    class: &ClassDescriptor,
) -> Result<Option<String>, FactError> {
    let Some(raw) = class.annotations.iter().find_map(|a| a.value()) else {
        return Ok(None);
    };
    let stripped = raw
        .len()
        .checked_sub(TAG_SUFFIX_LEN)
        .and_then(|end| raw.get(..end))
        .ok_or_else(|| FactError::MalformedTagValue {
            class: class.qualified_name.clone(),
            value: raw.to_string(),
        })?;
    if stripped == class.qualified_name || stripped == class.short_name {
        return Ok(None);
    }
    Ok(Some(stripped.to_string()))
}
