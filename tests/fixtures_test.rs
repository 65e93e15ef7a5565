//! Drives `analyze` over a small hand-written `.tonto` fixture exercising a
//! genset, a relator, and an external relation together.

use tonto_lint::analyze;

#[test]
fn university_fixture_is_clean() {
    let source = include_str!("fixtures/university.tonto");
    let result = analyze(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        result.diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
    assert_eq!(result.ast.package.as_deref(), Some("University"));
    assert_eq!(result.symbols.relations.len(), 1);
}
