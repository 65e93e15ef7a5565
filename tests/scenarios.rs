//! Concrete scenarios S1-S7 from spec.md §8, run against the public
//! `analyze` entry point.

use tonto_lint::analyze;
use tonto_lint::ast::Declaration;

#[test]
fn s1_minimal_happy_path() {
    let result = analyze("package P  kind Person");
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.ast.package.as_deref(), Some("P"));
    assert_eq!(result.ast.declarations.len(), 1);
    match &result.ast.declarations[0] {
        Declaration::Class { stereotype, name, body, .. } => {
            assert_eq!(stereotype, "kind");
            assert_eq!(name, "Person");
            assert!(body.is_none());
        }
        other => panic!("expected Class, got {other:?}"),
    }
}

#[test]
fn s2_cardinality_parse() {
    let result = analyze("kind A { x: number[1..*] }");
    assert!(result.diagnostics.is_empty());
    let Declaration::Class { body, .. } = &result.ast.declarations[0] else {
        panic!("expected Class");
    };
    let attribute = &body.as_ref().unwrap().attributes[0];
    assert_eq!(attribute.name, "x");
    use tonto_lint::ast::{Bound, TypeRef};
    assert_eq!(attribute.type_ref, TypeRef::Native("number".to_string()));
    let cardinality = attribute.cardinality.unwrap();
    assert_eq!(cardinality.lower, Bound::Finite(1));
    assert_eq!(cardinality.upper, Bound::Infinite);
}

#[test]
fn s3_dangling_reference() {
    let result = analyze("subkind Child specializes Parent");
    let errors: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.message.contains("Parent"))
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("specializes undefined class"));
    assert_eq!(errors[0].position.line, 1);
}

#[test]
fn s4_rigid_over_anti_rigid() {
    let result = analyze("kind K\nrole R specializes K\nsubkind S specializes R");
    let rigidity_errors: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.message.contains("cannot specialize anti-rigid"))
        .collect();
    assert_eq!(rigidity_errors.len(), 1);
    assert!(rigidity_errors[0].message.contains('S'));
    assert!(rigidity_errors[0].message.contains('R'));
}

#[test]
fn s5_phase_pattern_missing_genset() {
    let result = analyze("kind K\nphase Young specializes K\nphase Old specializes K");
    let phase_errors: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.message.contains("no genset is defined") && d.message.contains("MANDATORY"))
        .collect();
    assert_eq!(phase_errors.len(), 1);
}

#[test]
fn s6_suggester_on_misspelled_stereotype() {
    let result = analyze("kinnd Person");
    let syntax_errors: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.suggestion.as_deref().is_some_and(|s| s.contains("kind")))
        .collect();
    assert!(!syntax_errors.is_empty(), "expected a suggestion mentioning 'kind'");
    assert_eq!(syntax_errors[0].position.line, 1);
}

#[test]
fn s7_lexical_recovery() {
    let result = analyze("kind $Foo  kind Bar");
    let lexical_errors: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.message.contains('$'))
        .collect();
    assert_eq!(lexical_errors.len(), 1);
    assert!(result
        .ast
        .declarations
        .iter()
        .any(|d| matches!(d, Declaration::Class { name, .. } if name == "Bar")));
}
