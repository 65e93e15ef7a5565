//! Plain-text summary table and diagnostic rendering (spec.md §6.4-§6.5).

use std::fmt::Write as _;

use crate::ast::{Bound, Cardinality, Connector, ConnectorShape, Ontology, TypeRef};
use crate::diagnostics::{Diagnostic, Severity};
use crate::semantic::SymbolTable;

fn render_bound(bound: Bound) -> String {
    match bound {
        Bound::Finite(n) => n.to_string(),
        Bound::Infinite => "*".to_string(),
    }
}

fn render_cardinality(cardinality: Cardinality) -> String {
    if cardinality.lower == cardinality.upper {
        format!("[{}]", render_bound(cardinality.lower))
    } else {
        format!("[{}..{}]", render_bound(cardinality.lower), render_bound(cardinality.upper))
    }
}

fn render_type_ref(type_ref: &TypeRef) -> &str {
    match type_ref {
        TypeRef::Native(name) | TypeRef::UserType(name) | TypeRef::Named(name) => name,
    }
}

fn render_connector(connector: &Connector) -> String {
    let arrow = match connector.shape {
        ConnectorShape::Association => "--",
        ConnectorShape::AggregationForward => "<>--",
        ConnectorShape::AggregationReverse => "--<>",
        ConnectorShape::CompositionForward => "<o>--",
        ConnectorShape::CompositionReverse => "--<o>",
    };
    match &connector.label {
        Some(label) => format!("{arrow} {label}"),
        None => arrow.to_string(),
    }
}

/// Renders the summary table spec.md §6.4 requires: package, imports,
/// classes, datatypes, enums, gensets, external relations, each section
/// followed by a counts line, in this fixed order.
pub fn render_summary(ontology: &Ontology, symbols: &SymbolTable) -> String {
    let mut out = String::new();

    writeln!(out, "Package: {}", ontology.package.as_deref().unwrap_or("(none)")).unwrap();
    writeln!(out, "Imports ({}): {}", ontology.imports.len(), ontology.imports.join(", ")).unwrap();

    let classes: Vec<_> = symbols.classes_in_order().collect();
    writeln!(out, "Classes ({}):", classes.len()).unwrap();
    for class in &classes {
        let category = class
            .category
            .as_ref()
            .map(|c| format!(" of {c}"))
            .unwrap_or_default();
        let specializes = if class.specializes.is_empty() {
            String::new()
        } else {
            format!(" specializes {}", class.specializes.join(", "))
        };
        writeln!(out, "  {} {}{}{}", class.stereotype, class.name, category, specializes).unwrap();

        if let Some(body) = &class.body {
            for attribute in &body.attributes {
                let cardinality = attribute
                    .cardinality
                    .map(render_cardinality)
                    .unwrap_or_default();
                writeln!(out, "    {}: {}{cardinality}", attribute.name, render_type_ref(&attribute.type_ref)).unwrap();
            }
            for relation in &body.relations {
                writeln!(
                    out,
                    "    @{} {} {} {} {}",
                    relation.stereotype,
                    render_cardinality(relation.domain_card),
                    render_connector(&relation.connector),
                    render_cardinality(relation.image_card),
                    relation.image_name
                )
                .unwrap();
            }
        }
    }

    let mut datatypes: Vec<_> = symbols.datatypes.iter().cloned().collect();
    datatypes.sort();
    writeln!(out, "Datatypes ({}): {}", datatypes.len(), datatypes.join(", ")).unwrap();

    let enums: Vec<_> = symbols.enums_in_order().collect();
    writeln!(out, "Enums ({}):", enums.len()).unwrap();
    for (name, values) in &enums {
        writeln!(out, "  {}: {}", name, values.join(", ")).unwrap();
    }

    writeln!(out, "Gensets ({}):", symbols.gensets.len()).unwrap();
    for genset in &symbols.gensets {
        let restrictions: Vec<&str> = genset
            .restrictions
            .iter()
            .map(|r| match r {
                crate::ast::GensetRestriction::Disjoint => "disjoint",
                crate::ast::GensetRestriction::Complete => "complete",
                crate::ast::GensetRestriction::Incomplete => "incomplete",
                crate::ast::GensetRestriction::Overlapping => "overlapping",
            })
            .collect();
        writeln!(
            out,
            "  {} [{}] general={} specifics={}",
            genset.name,
            restrictions.join(", "),
            genset.general,
            genset.specifics.join(", ")
        )
        .unwrap();
    }

    writeln!(out, "External relations ({}):", symbols.relations.len()).unwrap();
    for relation in &symbols.relations {
        writeln!(
            out,
            "  @{} {} {} {} {} {}",
            relation.stereotype,
            relation.domain,
            render_cardinality(relation.domain_card),
            render_connector(&relation.connector),
            render_cardinality(relation.image_card),
            relation.image
        )
        .unwrap();
    }

    out
}

/// Renders diagnostics grouped by severity (errors first), source-position
/// order within each group (spec.md §6.5). Colors errors red and warnings
/// yellow when `colorize` is set.
pub fn render_diagnostics(diagnostics: &[Diagnostic], colorize: bool) -> String {
    let mut out = String::new();
    for severity in [Severity::Error, Severity::Warning] {
        let mut group: Vec<&Diagnostic> = diagnostics.iter().filter(|d| d.severity == severity).collect();
        group.sort_by_key(|d| d.position);
        for diagnostic in group {
            let rendered = diagnostic.to_string();
            if colorize {
                use colored::Colorize;
                let line = if severity == Severity::Error {
                    rendered.red().to_string()
                } else {
                    rendered.yellow().to_string()
                };
                writeln!(out, "{line}").unwrap();
            } else {
                writeln!(out, "{rendered}").unwrap();
            }
        }
    }
    out
}
