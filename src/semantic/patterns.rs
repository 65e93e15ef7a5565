//! Pass 3: the six UFO pattern rules plus genset homogeneity (spec.md §4.3).
//!
//! Reference existence (specializes targets, genset members, relation
//! images) is already enforced by [`super::rigidity::resolve_references`];
//! these rules only add the pattern-specific checks spec.md lists for each
//! one, to avoid emitting the same dangling-reference diagnostic twice.

use crate::ast::{GensetRestriction, Relation};
use crate::diagnostics::{Diagnostic, Stage};

use super::symbols::{ClassEntry, GensetEntry, SymbolTable};
use super::taxonomy;

pub fn check_all(table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    diagnostics.extend(check_subkind_pattern(table));
    diagnostics.extend(check_role_pattern(table));
    diagnostics.extend(check_phase_pattern(table));
    diagnostics.extend(check_relator_pattern(table));
    diagnostics.extend(check_mode_pattern(table));
    diagnostics.extend(check_role_mixin_pattern(table));
    diagnostics.extend(check_genset_homogeneity(table));
    diagnostics
}

fn children_of<'a>(table: &'a SymbolTable, parent: &str, stereotype: &str) -> Vec<&'a ClassEntry> {
    table
        .classes_in_order()
        .filter(|c| c.stereotype == stereotype && c.specializes.iter().any(|s| s == parent))
        .collect()
}

fn gensets_with_general<'a>(table: &'a SymbolTable, general: &str) -> Vec<&'a GensetEntry> {
    table.gensets.iter().filter(|g| g.general == general).collect()
}

fn missing_specifics(genset: &GensetEntry, children: &[&ClassEntry]) -> Vec<String> {
    children
        .iter()
        .map(|c| c.name.clone())
        .filter(|name| !genset.specifics.contains(name))
        .collect()
}

fn has_restriction(genset: &GensetEntry, restriction: GensetRestriction) -> bool {
    genset.restrictions.contains(&restriction)
}

/// Rule P1.
fn check_subkind_pattern(table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for kind in table.classes_in_order().filter(|c| c.stereotype == "kind") {
        let children = children_of(table, &kind.name, "subkind");
        if children.len() < 2 {
            continue;
        }
        let gensets = gensets_with_general(table, &kind.name);
        if gensets.is_empty() {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                kind.position,
                format!("kind '{}' has {} subkinds but no genset is defined", kind.name, children.len()),
            ));
            continue;
        }
        if !gensets.iter().any(|g| has_restriction(g, GensetRestriction::Disjoint)) {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                kind.position,
                format!("genset(s) for kind '{}' subkinds must include 'disjoint'", kind.name),
            ));
        }
        for genset in &gensets {
            let missing = missing_specifics(genset, &children);
            if !missing.is_empty() {
                diagnostics.push(Diagnostic::warning(
                    Stage::Semantic,
                    genset.position,
                    format!(
                        "genset '{}' is missing subkind(s) of '{}': {}",
                        genset.name,
                        kind.name,
                        missing.join(", ")
                    ),
                ));
            }
        }
    }
    diagnostics
}

/// Rule P2.
fn check_role_pattern(table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for kind in table.classes_in_order().filter(|c| c.stereotype == "kind") {
        let children = children_of(table, &kind.name, "role");
        if children.len() < 2 {
            continue;
        }
        let gensets = gensets_with_general(table, &kind.name);
        if gensets.is_empty() {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                kind.position,
                format!("kind '{}' has {} roles but no genset is defined", kind.name, children.len()),
            ));
            continue;
        }
        for genset in &gensets {
            if has_restriction(genset, GensetRestriction::Disjoint) {
                diagnostics.push(Diagnostic::error(
                    Stage::Semantic,
                    genset.position,
                    format!("genset '{}' for kind '{}' roles must not be 'disjoint'", genset.name, kind.name),
                ));
            }
            let missing = missing_specifics(genset, &children);
            if !missing.is_empty() {
                diagnostics.push(Diagnostic::warning(
                    Stage::Semantic,
                    genset.position,
                    format!(
                        "genset '{}' is missing role(s) of '{}': {}",
                        genset.name,
                        kind.name,
                        missing.join(", ")
                    ),
                ));
            }
        }
    }
    diagnostics
}

/// Rule P3.
fn check_phase_pattern(table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for kind in table.classes_in_order().filter(|c| c.stereotype == "kind") {
        let children = children_of(table, &kind.name, "phase");
        if children.len() == 1 {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                kind.position,
                format!(
                    "kind '{}' has a single phase '{}'; phases come in families of \u{2265}2",
                    kind.name, children[0].name
                ),
            ));
            continue;
        }
        if children.len() < 2 {
            continue;
        }

        let names = children
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let gensets = gensets_with_general(table, &kind.name);
        if gensets.is_empty() {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                kind.position,
                format!(
                    "kind '{}' has phases {} but no genset is defined; disjoint is MANDATORY",
                    kind.name, names
                ),
            ));
            continue;
        }
        if !gensets.iter().any(|g| has_restriction(g, GensetRestriction::Disjoint)) {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                kind.position,
                format!("genset(s) for kind '{}' phases must include 'disjoint'; disjoint is MANDATORY", kind.name),
            ));
        }
        for genset in &gensets {
            let missing = missing_specifics(genset, &children);
            if !missing.is_empty() {
                diagnostics.push(Diagnostic::warning(
                    Stage::Semantic,
                    genset.position,
                    format!(
                        "genset '{}' is missing phase(s) of '{}': {}",
                        genset.name,
                        kind.name,
                        missing.join(", ")
                    ),
                ));
            }
        }
    }
    diagnostics
}

fn internal_relations_with_stereotype<'a>(
    class: &'a ClassEntry,
    stereotype: &str,
) -> Vec<&'a Relation> {
    class
        .body
        .as_ref()
        .map(|body| {
            body.relations
                .iter()
                .filter(|r| r.stereotype == stereotype)
                .collect()
        })
        .unwrap_or_default()
}

/// Rule P4.
fn check_relator_pattern(table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for relator in table.classes_in_order().filter(|c| c.stereotype == "relator") {
        let mediations = internal_relations_with_stereotype(relator, "mediation");
        if mediations.len() < 2 {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                relator.position,
                format!(
                    "relator '{}' must mediate at least two roles via 'mediation' relations",
                    relator.name
                ),
            ));
            continue;
        }

        let mediated: Vec<&str> = mediations.iter().map(|r| r.image_name.as_str()).collect();
        let connected = table.relations.iter().any(|r| {
            r.stereotype == "material" && mediated.contains(&r.domain.as_str()) && mediated.contains(&r.image.as_str())
        });
        if !connected {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                relator.position,
                format!(
                    "relator '{}' mediates {} but no 'material' relation connects them",
                    relator.name,
                    mediated.join(", ")
                ),
            ));
        }
    }
    diagnostics
}

/// Rule P5.
fn check_mode_pattern(table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for class in table
        .classes_in_order()
        .filter(|c| matches!(c.stereotype.as_str(), "mode" | "intrinsicMode" | "extrinsicMode"))
    {
        if internal_relations_with_stereotype(class, "characterization").is_empty() {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                class.position,
                format!("'{}' ({}) requires a 'characterization' relation", class.name, class.stereotype),
            ));
        }
        if class.stereotype == "extrinsicMode"
            && internal_relations_with_stereotype(class, "externalDependence").is_empty()
        {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                class.position,
                format!("extrinsicMode '{}' requires an 'externalDependence' relation", class.name),
            ));
        }
    }
    diagnostics
}

/// Rule P6.
fn check_role_mixin_pattern(table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for mixin in table.classes_in_order().filter(|c| c.stereotype == "roleMixin") {
        let roles = children_of(table, &mixin.name, "role");
        if roles.len() < 2 {
            diagnostics.push(Diagnostic::warning(
                Stage::Semantic,
                mixin.position,
                format!("roleMixin '{}' has fewer than two specializing roles", mixin.name),
            ));
        }
        if roles.is_empty() {
            continue;
        }

        let gensets = gensets_with_general(table, &mixin.name);
        if gensets.is_empty() {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                mixin.position,
                format!("roleMixin '{}' requires a genset with general = '{}'", mixin.name, mixin.name),
            ));
        }
        for genset in &gensets {
            if !has_restriction(genset, GensetRestriction::Disjoint) {
                diagnostics.push(Diagnostic::error(
                    Stage::Semantic,
                    genset.position,
                    format!("genset '{}' for roleMixin '{}' must include 'disjoint'", genset.name, mixin.name),
                ));
            }
            if !has_restriction(genset, GensetRestriction::Complete) {
                diagnostics.push(Diagnostic::warning(
                    Stage::Semantic,
                    genset.position,
                    format!("genset '{}' for roleMixin '{}' should include 'complete'", genset.name, mixin.name),
                ));
            }
        }

        let distinct_kinds: std::collections::HashSet<&str> = roles
            .iter()
            .flat_map(|role| role.specializes.iter())
            .filter(|name| name.as_str() != mixin.name)
            .filter_map(|name| table.class(name))
            .filter(|c| c.stereotype == "kind")
            .map(|c| c.name.as_str())
            .collect();
        if distinct_kinds.len() < 2 {
            diagnostics.push(Diagnostic::warning(
                Stage::Semantic,
                mixin.position,
                format!(
                    "roles specializing roleMixin '{}' should collectively specialize at least two kinds",
                    mixin.name
                ),
            ));
        }
    }
    diagnostics
}

/// Rule P7.
fn check_genset_homogeneity(table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for genset in &table.gensets {
        let stereotypes: Vec<&str> = genset
            .specifics
            .iter()
            .filter_map(|name| table.class(name))
            .map(|c| c.stereotype.as_str())
            .collect();

        let has_rigid_sortal = stereotypes.iter().any(|s| matches!(*s, "subkind" | "category"));
        let has_anti_rigid_sortal = stereotypes
            .iter()
            .any(|s| matches!(*s, "role" | "phase" | "historicalRole"));
        if has_rigid_sortal && has_anti_rigid_sortal {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                genset.position,
                format!("genset '{}' mixes rigid and anti-rigid sortals", genset.name),
            ));
        }

        let has_role_family = stereotypes.iter().any(|s| matches!(*s, "role" | "historicalRole"));
        let has_phase = stereotypes.iter().any(|s| *s == "phase");
        if has_role_family && has_phase {
            diagnostics.push(Diagnostic::error(
                Stage::Semantic,
                genset.position,
                format!("genset '{}' mixes role/historicalRole specifics with phase specifics", genset.name),
            ));
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;
    use crate::semantic::symbols;

    fn table_for(source: &str) -> SymbolTable {
        let (tokens, _) = lex(source);
        let (ontology, _) = parse(&tokens);
        let (table, _) = symbols::build(&ontology);
        table
    }

    #[test]
    fn phase_pattern_flags_missing_genset() {
        let table = table_for("kind K\nphase Young specializes K\nphase Old specializes K");
        let diagnostics = check_phase_pattern(&table);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("no genset is defined"));
        assert!(diagnostics[0].message.contains("MANDATORY"));
    }

    #[test]
    fn phase_pattern_flags_lone_phase() {
        let table = table_for("kind K\nphase Young specializes K");
        let diagnostics = check_phase_pattern(&table);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("single phase"));
    }

    #[test]
    fn subkind_pattern_requires_disjoint_genset() {
        let table = table_for(
            "kind K\nsubkind A specializes K\nsubkind B specializes K\ngenset G { general K specifics A, B }",
        );
        let diagnostics = check_subkind_pattern(&table);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("disjoint"));
    }

    #[test]
    fn subkind_pattern_satisfied() {
        let table = table_for(
            "kind K\nsubkind A specializes K\nsubkind B specializes K\ndisjoint genset G { general K specifics A, B }",
        );
        let diagnostics = check_subkind_pattern(&table);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn genset_homogeneity_flags_mixed_rigidity() {
        let table = table_for(
            "kind K\nsubkind A specializes K\nrole B specializes K\ngenset G { general K specifics A, B }",
        );
        let diagnostics = check_genset_homogeneity(&table);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("mixes rigid and anti-rigid"));
    }
}
