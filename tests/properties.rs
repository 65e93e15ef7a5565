//! Invariants I1-I7 from spec.md §8, exercised over a handful of inputs
//! rather than as generated property tests (matching the teacher's plain
//! `assert!`/`assert_eq!` style; no `proptest` dependency).

use tonto_lint::ast::Declaration;
use tonto_lint::diagnostics::has_errors;
use tonto_lint::lexer::lex;
use tonto_lint::parser::parse;
use tonto_lint::{analyze, diagnostics::Diagnostic, diagnostics::Position, diagnostics::Severity, diagnostics::Stage};

const SAMPLES: &[&str] = &[
    "",
    "   \n\t\n",
    "// just a comment\n",
    "package P\nkind Person { name: string }",
    "kind K\nphase Young specializes K\nphase Old specializes K",
    "subkind Child specializes Parent",
    "kind $Foo  kind Bar",
    "datatype AddressDataType { street: string }",
];

#[test]
fn i1_positions_non_decreasing() {
    for &sample in SAMPLES {
        let (tokens, _) = lex(sample);
        let mut last_offset = 0u32;
        for token in &tokens {
            assert!(token.byte_offset >= last_offset, "offsets regressed in {sample:?}");
            last_offset = token.byte_offset;
        }
    }
}

#[test]
fn i2_line_and_column_are_well_formed() {
    for &sample in SAMPLES {
        let (tokens, _) = lex(sample);
        for token in &tokens {
            assert!(token.line >= 1);
            assert!(token.column >= 1);
            let prefix = &sample[..token.byte_offset as usize];
            let expected_line = 1 + prefix.matches('\n').count() as u32;
            assert_eq!(token.line, expected_line, "line mismatch in {sample:?} at {token:?}");
        }
    }
}

#[test]
fn i3_lexer_terminates_and_tokens_are_substrings() {
    for &sample in SAMPLES {
        let (tokens, _) = lex(sample);
        for token in &tokens {
            let start = token.byte_offset as usize;
            let end = start + token.lexeme.len();
            assert_eq!(&sample[start..end], token.lexeme, "lexeme mismatch in {sample:?}");
        }
    }
}

#[test]
fn i4_parser_always_produces_a_root() {
    for &sample in SAMPLES {
        let (tokens, _) = lex(sample);
        let (ontology, _) = parse(&tokens);
        let _ = ontology.declarations.len();
    }

    let (tokens, _) = lex("}}}} nonsense {{{{ @@@");
    let (ontology, diagnostics) = parse(&tokens);
    let _ = ontology;
    assert!(!diagnostics.is_empty());
}

#[test]
fn i5_symbol_table_keys_are_distinct() {
    let result = analyze("kind Person\nkind Person");
    let duplicate_errors: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.message.contains("duplicate class"))
        .collect();
    assert_eq!(duplicate_errors.len(), 1);
    let count = result.symbols.classes_in_order().filter(|c| c.name == "Person").count();
    assert_eq!(count, 1);
}

#[test]
fn i6_has_errors_matches_severity() {
    let only_warnings = vec![Diagnostic::warning(Stage::Semantic, Position::new(1, 1), "w")];
    assert!(!has_errors(&only_warnings));

    let with_error = vec![
        Diagnostic::warning(Stage::Semantic, Position::new(1, 1), "w"),
        Diagnostic::error(Stage::Semantic, Position::new(2, 1), "e"),
    ];
    assert!(has_errors(&with_error));
    assert!(with_error.iter().any(|d| d.severity == Severity::Error));
}

#[test]
fn i7_analyze_is_deterministic() {
    for &sample in SAMPLES {
        let first = analyze(sample);
        let second = analyze(sample);
        let render = |ds: &[Diagnostic]| ds.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(render(&first.diagnostics), render(&second.diagnostics), "mismatch for {sample:?}");
    }
}

#[test]
fn boundary_empty_and_whitespace_only_sources() {
    for sample in ["", "   \n\t\n", "// comment\n/* block */\n"] {
        let result = analyze(sample);
        assert!(result.ast.declarations.is_empty());
        assert!(result.ast.package.is_none());
        assert!(result.diagnostics.is_empty());
    }
}

#[test]
fn boundary_single_declaration_no_package() {
    let result = analyze("kind Person");
    assert!(result.ast.package.is_none());
    assert_eq!(result.ast.declarations.len(), 1);
    assert!(matches!(result.ast.declarations[0], Declaration::Class { .. }));
}
