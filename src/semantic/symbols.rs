//! Insertion-ordered symbol table (spec.md §3, §9 "Symbol table ordering").
//!
//! Classes are stored as parallel `Vec<Identifier>` (insertion order) plus a
//! `HashMap<Identifier, usize>` index, so pattern checks and diagnostics
//! iterate classes in source-declaration order (spec invariant I5, and the
//! determinism requirement in spec.md §4.3 "outer loop in class-table
//! insertion order").

use std::collections::{HashMap, HashSet};

use crate::ast::{Cardinality, ClassBody, Connector, Declaration, GensetRestriction, Identifier, Ontology};
use crate::diagnostics::{Diagnostic, Position, Stage};

use super::taxonomy;

#[derive(Debug, Clone)]
pub struct ClassEntry {
    pub name: Identifier,
    pub stereotype: Identifier,
    pub category: Option<Identifier>,
    pub specializes: Vec<Identifier>,
    pub body: Option<ClassBody>,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct GensetEntry {
    pub name: Identifier,
    pub restrictions: Vec<GensetRestriction>,
    pub general: Identifier,
    pub specifics: Vec<Identifier>,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct ExternalRelationEntry {
    pub stereotype: Identifier,
    pub domain: Identifier,
    pub domain_card: Cardinality,
    pub image: Identifier,
    pub image_card: Cardinality,
    pub connector: Connector,
    pub position: Position,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    class_order: Vec<Identifier>,
    classes: HashMap<Identifier, ClassEntry>,
    pub gensets: Vec<GensetEntry>,
    pub relations: Vec<ExternalRelationEntry>,
    pub datatypes: HashSet<Identifier>,
    enum_order: Vec<Identifier>,
    enums: HashMap<Identifier, Vec<Identifier>>,
}

impl SymbolTable {
    pub fn classes_in_order(&self) -> impl Iterator<Item = &ClassEntry> {
        self.class_order.iter().map(move |name| &self.classes[name])
    }

    pub fn class(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn enum_values(&self, name: &str) -> Option<&[Identifier]> {
        self.enums.get(name).map(Vec::as_slice)
    }

    pub fn enums_in_order(&self) -> impl Iterator<Item = (&Identifier, &Vec<Identifier>)> {
        self.enum_order.iter().map(move |name| (name, &self.enums[name]))
    }

    fn insert_class(&mut self, entry: ClassEntry) {
        self.class_order.push(entry.name.clone());
        self.classes.insert(entry.name.clone(), entry);
    }
}

/// Pass 1 (spec.md §4.3): walk declarations in order, rejecting duplicate
/// class names, flagging `kind` classes that specialize, and flagging
/// non-ultimate sortals that don't.
pub fn build(ontology: &Ontology) -> (SymbolTable, Vec<Diagnostic>) {
    let mut table = SymbolTable::default();
    let mut diagnostics = Vec::new();

    for declaration in &ontology.declarations {
        match declaration {
            Declaration::Class {
                stereotype,
                name,
                category,
                specializes,
                body,
                position,
            } => {
                if table.has_class(name) {
                    diagnostics.push(Diagnostic::error(
                        Stage::Semantic,
                        *position,
                        format!("duplicate class '{name}'"),
                    ));
                    continue;
                }

                if stereotype == "kind" && !specializes.is_empty() {
                    diagnostics.push(Diagnostic::error(
                        Stage::Semantic,
                        *position,
                        format!("kind '{name}' cannot specialize another class; kinds are top-level"),
                    ));
                }

                if taxonomy::is_non_ultimate_sortal(stereotype) && specializes.is_empty() {
                    diagnostics.push(Diagnostic::error(
                        Stage::Semantic,
                        *position,
                        format!(
                            "'{name}' ({stereotype}) must specialize an ultimate sortal; it has no 'specializes' clause"
                        ),
                    ));
                }

                table.insert_class(ClassEntry {
                    name: name.clone(),
                    stereotype: stereotype.clone(),
                    category: category.clone(),
                    specializes: specializes.clone(),
                    body: body.clone(),
                    position: *position,
                });
            }
            Declaration::Datatype { name, .. } => {
                table.datatypes.insert(name.clone());
            }
            Declaration::Enum { name, values, .. } => {
                table.enum_order.push(name.clone());
                table.enums.insert(name.clone(), values.clone());
            }
            Declaration::Genset {
                name,
                restrictions,
                general,
                specifics,
                position,
            } => {
                table.gensets.push(GensetEntry {
                    name: name.clone(),
                    restrictions: restrictions.clone(),
                    general: general.clone(),
                    specifics: specifics.clone(),
                    position: *position,
                });
            }
            Declaration::ExternalRelation {
                stereotype,
                domain,
                domain_card,
                image,
                image_card,
                connector,
                position,
            } => {
                table.relations.push(ExternalRelationEntry {
                    stereotype: stereotype.clone(),
                    domain: domain.clone(),
                    domain_card: *domain_card,
                    image: image.clone(),
                    image_card: *image_card,
                    connector: connector.clone(),
                    position: *position,
                });
            }
            Declaration::Error { .. } => {}
        }
    }

    (table, diagnostics)
}
