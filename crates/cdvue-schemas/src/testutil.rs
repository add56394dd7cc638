//! Shared proptest strategies for schema tests.

use proptest::prelude::*;

/// Strategy for generating simple Java-like type names.
pub fn arb_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,11}"
}

/// Strategy for generating qualified names (e.g. `org.pkg.TypeName`).
pub fn arb_qualified() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9]{0,7}", arb_name())
        .prop_map(|(pkg, name)| format!("org.{pkg}.{name}"))
}
