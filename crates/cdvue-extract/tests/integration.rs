//! End-to-end extraction tests over a real source tree fixture.

use std::collections::BTreeSet;

use cdvue_schemas::ClassFact;

fn demo_facts() -> Vec<ClassFact> {
    cdvue_extract::scan_facts("tests/fixtures/demo")
        .expect("fixture tree should scan")
}

fn fact<'a>(facts: &'a [ClassFact], name: &str) -> &'a ClassFact {
    facts
        .iter()
        .find(|f| f.qualified_name == format!("org.onlab.demo.{name}"))
        .unwrap_or_else(|| panic!("missing fact for {name}"))
}

#[test]
fn scans_all_non_abstract_classes() {
    let facts = demo_facts();
    let names: BTreeSet<_> = facts
        .iter()
        .map(|f| f.qualified_name.as_str())
        .collect();
    assert!(names.contains("org.onlab.demo.Comp1"));
    assert!(names.contains("org.onlab.demo.IfaceA"));
    assert!(
        !names.contains("org.onlab.demo.AbstractMonitor"),
        "abstract classes must not produce facts"
    );
}

#[test]
fn component_with_reference_field() {
    let facts = demo_facts();
    let comp1 = fact(&facts, "Comp1");
    assert!(comp1.is_component);
    assert!(!comp1.is_service);
    assert_eq!(
        comp1.referenced_names,
        BTreeSet::from(["org.onlab.demo.IfaceA".to_string()]),
        "only the @Reference field counts, not the int counter"
    );
}

#[test]
fn component_service_with_implemented_interface() {
    let facts = demo_facts();
    let comp2 = fact(&facts, "Comp2");
    assert!(comp2.is_component && comp2.is_service);
    assert_eq!(
        comp2.implemented_interfaces,
        BTreeSet::from(["org.onlab.demo.IfaceA".to_string()])
    );
    assert_eq!(comp2.service_tag, None);
}

#[test]
fn interfaces_are_plain_facts() {
    let facts = demo_facts();
    let iface = fact(&facts, "IfaceA");
    assert!(iface.is_interface);
    assert!(!iface.is_component && !iface.is_service);
    assert!(iface.referenced_names.is_empty());
}

#[test]
fn references_inherited_from_marked_abstract_ancestor() {
    let facts = demo_facts();
    let comp4 = fact(&facts, "Comp4");
    assert_eq!(
        comp4.referenced_names,
        BTreeSet::from(["org.onlab.demo.IfaceA".to_string()]),
        "Comp4 inherits AbstractMonitor's @Reference field"
    );
}
