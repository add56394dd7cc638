//! Source-model descriptors consumed from the SourceModel Provider.
//!
//! These types are the scanner's view of one parsed class: its
//! annotations, fields, implemented interfaces, and superclass. They
//! carry no resolution logic; the extractor turns them into
//! [`ClassFact`](crate::ClassFact) records.
//!
//! The superclass is stored as a qualified *name*, not a nested
//! descriptor. Ancestor chains are resolved through a name-keyed lookup
//! at extraction time, so descriptors never form an object graph.

use serde::{Deserialize, Serialize};

/// Namespace prefix under which the marker annotations are recognized
/// in fully-qualified form.
pub const SCR_NAMESPACE: &str = "org.apache.felix.scr.annotations.";

/// One class (or interface, or enum) as parsed from a source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Fully-qualified name, globally unique within one scan.
    pub qualified_name: String,

    /// Simple name without the package prefix.
    pub short_name: String,

    /// True for `interface` declarations.
    pub is_interface: bool,

    /// True for classes carrying the `abstract` modifier. Abstract
    /// classes produce no fact of their own but still participate in
    /// ancestor walks.
    pub is_abstract: bool,

    /// Annotations declared on the type itself, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationUse>,

    /// Declared fields, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,

    /// Qualified names of the interfaces this type declares it
    /// implements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    /// Qualified name of the superclass, or `None` at the root of the
    /// hierarchy (or when the class extends nothing explicitly).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
}

/// A single annotation use, e.g. `@Component` or
/// `@Service(value = FooService.class)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationUse {
    /// Annotation name as written in source; may be simple
    /// (`Component`) or fully qualified.
    pub name: String,

    /// Named properties in declaration order. A bare single argument
    /// (`@Service(FooService.class)`) is normalized to the implicit
    /// `value` property. Values are raw source text: class literals
    /// keep their `.class` suffix.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<(String, String)>,
}

impl AnnotationUse {
    /// Creates an annotation use without properties.
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Returns true if this annotation names `marker`, either bare or
    /// fully qualified under [`SCR_NAMESPACE`].
    pub fn names_marker(&self, marker: &str) -> bool {
        self.name == marker
            || (self.name.len() == SCR_NAMESPACE.len() + marker.len()
                && self.name.starts_with(SCR_NAMESPACE)
                && self.name.ends_with(marker))
    }

    /// Returns the raw text of the `value` property, if present.
    pub fn value(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|(key, _)| key == "value")
            .map(|(_, text)| text.as_str())
    }
}

/// One declared field with its annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Qualified name of the field's declared type.
    pub type_name: String,

    /// Annotations on the field, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationUse>,
}

impl FieldDescriptor {
    /// Returns true if any annotation on this field names `marker`.
    pub fn has_marker(&self, marker: &str) -> bool {
        self.annotations.iter().any(|a| a.names_marker(marker))
    }
}
