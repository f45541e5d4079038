//! Inheritance closures: transitive extends/implements relations computed
//! by the document processor's fifth pass.

use std::collections::BTreeSet;

use dox::dox::testing;

fn names(set: &BTreeSet<String>) -> Vec<&str> {
    set.iter().map(|s| s.as_str()).collect()
}

#[test]
fn test_concept_extends_closure() {
    let (doc, diags) = testing::process(
        "@concept A1\n@brief A1.\n@signature concept A1;\n\
         @concept A2\n@brief A2.\n@signature concept A2;\n\
         @concept B\n@extends A1\n@extends A2\n@brief B.\n@signature concept B;\n\
         @concept C\n@extends B\n@brief C.\n@signature concept C;\n",
    );
    assert_eq!(diags.error_count(), 0);

    let a1 = doc.by_name("A1").unwrap().as_concept().unwrap();
    assert_eq!(names(&a1.all_extending), vec!["B", "C"]);
    assert!(a1.all_extended.is_empty());

    let c = doc.by_name("C").unwrap().as_concept().unwrap();
    assert_eq!(names(&c.all_extended), vec!["A1", "A2", "B"]);
    assert!(c.all_extending.is_empty());
}

#[test]
fn test_class_implements_closure() {
    let (doc, _) = testing::process(
        "@concept A1\n@brief A1.\n@signature concept A1;\n\
         @concept A2\n@brief A2.\n@signature concept A2;\n\
         @concept B\n@extends A1\n@extends A2\n@brief B.\n@signature concept B;\n\
         @class X\n@implements B\n@brief X.\n@signature class X;\n",
    );

    let x = doc.by_name("X").unwrap().as_class().unwrap();
    assert_eq!(names(&x.all_implemented), vec!["A1", "A2", "B"]);

    let b = doc.by_name("B").unwrap().as_concept().unwrap();
    assert!(b.all_implementing.contains("X"));
    // The final pass propagates the implementer into extended concepts too.
    let a1 = doc.by_name("A1").unwrap().as_concept().unwrap();
    assert!(a1.all_implementing.contains("X"));
}

#[test]
fn test_subclasses_inherit_the_interface_contract() {
    let (doc, _) = testing::process(
        "@concept C\n@brief C.\n@signature concept C;\n\
         @class Base\n@implements C\n@brief Base.\n@signature class Base;\n\
         @class Derived\n@extends Base\n@brief D.\n@signature class Derived;\n",
    );
    let c = doc.by_name("C").unwrap().as_concept().unwrap();
    assert!(c.all_implementing.contains("Base"));
    assert!(c.all_implementing.contains("Derived"));
    let derived = doc.by_name("Derived").unwrap().as_class().unwrap();
    assert!(derived.all_implemented.contains("C"));
}

#[test]
fn test_class_extends_cycle_terminates() {
    let (doc, _) = testing::process(
        "@class A\n@extends B\n@brief A.\n@signature class A;\n\
         @class B\n@extends A\n@brief B.\n@signature class B;\n",
    );
    let a = doc.by_name("A").unwrap().as_class().unwrap();
    assert_eq!(names(&a.all_extended), vec!["A", "B"]);
}

#[test]
fn test_unknown_extends_target_warns_but_continues() {
    let (doc, diags) = testing::process(
        "@class A\n@extends Ghost\n@brief A.\n@signature class A;\n",
    );
    let a = doc.by_name("A").unwrap().as_class().unwrap();
    assert!(a.all_extended.contains("Ghost"));
    assert!(diags.warning_count() >= 1);
}

#[test]
fn test_end_to_end_scenario() {
    // The whole pipeline on the smallest two-entry document.
    let (doc, _) = testing::process("@class A\n@brief Brief A\n@class B\n@extends A\n");
    let a = doc.by_name("A").unwrap().as_class().unwrap();
    assert_eq!(names(&a.all_extending), vec!["B"]);
    let b = doc.by_name("B").unwrap().as_class().unwrap();
    assert_eq!(names(&b.all_extended), vec!["A"]);
}
