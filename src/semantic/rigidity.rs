//! Reference resolution and the rigidity-hierarchy check (spec.md §4.3 Pass 2).

use std::collections::HashSet;

use crate::diagnostics::{Diagnostic, Stage};

use super::symbols::SymbolTable;
use super::taxonomy;

/// Checks that every `specializes`, genset `general`/`specifics`, external
/// relation `domain`/`image`, and internal relation `image` resolves to a
/// declared class.
pub fn resolve_references(table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for class in table.classes_in_order() {
        for parent in &class.specializes {
            if !table.has_class(parent) {
                diagnostics.push(Diagnostic::error(
                    Stage::Semantic,
                    class.position,
                    format!("specializes undefined class '{parent}'"),
                ));
            }
        }

        if let Some(body) = &class.body {
            for relation in &body.relations {
                if !table.has_class(&relation.image_name) {
                    diagnostics.push(Diagnostic::error(
                        Stage::Semantic,
                        relation.position,
                        format!(
                            "relation '@{}' references undefined class '{}'",
                            relation.stereotype, relation.image_name
                        ),
                    ));
                }
            }
        }
    }

    for genset in &table.gensets {
        if !table.has_class(&genset.general) {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                genset.position,
                format!("genset '{}' has undefined general '{}'", genset.name, genset.general),
            ));
        }
        for specific in &genset.specifics {
            if !table.has_class(specific) {
                diagnostics.push(Diagnostic::error(
                    Stage::Semantic,
                    genset.position,
                    format!("genset '{}' has undefined specific '{specific}'", genset.name),
                ));
            }
        }
    }

    for relation in &table.relations {
        if !table.has_class(&relation.domain) {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                relation.position,
                format!("relation '@{}' has undefined domain '{}'", relation.stereotype, relation.domain),
            ));
        }
        if !table.has_class(&relation.image) {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                relation.position,
                format!("relation '@{}' has undefined image '{}'", relation.stereotype, relation.image),
            ));
        }
    }

    diagnostics
}

/// For every rigid class, walks all transitive `specializes` ancestors; if
/// any is anti-rigid, emits one error for the offending (rigid) class.
/// Cycle-safe: each class is visited at most once per traversal.
pub fn check_rigidity_hierarchy(table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for class in table.classes_in_order() {
        if !taxonomy::is_rigid(&class.stereotype) {
            continue;
        }

        let mut visited = HashSet::new();
        let mut frontier: Vec<&str> = class.specializes.iter().map(String::as_str).collect();

        while let Some(ancestor_name) = frontier.pop() {
            if !visited.insert(ancestor_name.to_string()) {
                continue;
            }
            let Some(ancestor) = table.class(ancestor_name) else {
                continue;
            };
            if taxonomy::is_anti_rigid(&ancestor.stereotype) {
                diagnostics.push(Diagnostic::error(
                    Stage::Semantic,
                    class.position,
                    format!(
                        "rigid universal '{}' ({}) cannot specialize anti-rigid universal '{}' ({})",
                        class.name, class.stereotype, ancestor.name, ancestor.stereotype
                    ),
                ));
                break;
            }
            frontier.extend(ancestor.specializes.iter().map(String::as_str));
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;

    fn table_for(source: &str) -> SymbolTable {
        let (tokens, _) = lex(source);
        let (ontology, _) = parse(&tokens);
        let (table, _) = super::super::symbols::build(&ontology);
        table
    }

    #[test]
    fn dangling_specializes_is_reported() {
        let table = table_for("subkind Child specializes Parent");
        let diagnostics = resolve_references(&table);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Parent"));
    }

    #[test]
    fn rigid_over_anti_rigid_is_reported_once() {
        let table = table_for("kind K\nrole R specializes K\nsubkind S specializes R");
        let diagnostics = check_rigidity_hierarchy(&table);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("S"));
        assert!(diagnostics[0].message.contains("R"));
    }

    #[test]
    fn rigidity_check_tolerates_cycles() {
        let table = table_for("subkind A specializes B\nsubkind B specializes A");
        let diagnostics = check_rigidity_hierarchy(&table);
        assert!(diagnostics.is_empty());
    }
}
