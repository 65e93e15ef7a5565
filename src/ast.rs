//! The Tonto abstract syntax tree.
//!
//! A sum-typed `Declaration` replaces the original dictionary-with-a-`type`-
//! string shape (spec.md §9 "Sum-typed AST"): each variant carries only its
//! own fields and every accessor below is total. Every node carries a
//! [`Position`] so every later semantic diagnostic can cite one (spec.md §9
//! "Position plumbing").

use crate::diagnostics::Position;

pub type Identifier = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ontology {
    pub package: Option<Identifier>,
    pub imports: Vec<Identifier>,
    pub declarations: Vec<Declaration>,
}

impl Ontology {
    pub fn empty() -> Self {
        Self {
            package: None,
            imports: Vec::new(),
            declarations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bound {
    Finite(u32),
    Infinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    pub lower: Bound,
    pub upper: Bound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorShape {
    Association,
    AggregationForward,
    AggregationReverse,
    CompositionForward,
    CompositionReverse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub label: Option<Identifier>,
    pub shape: ConnectorShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GensetRestriction {
    Disjoint,
    Complete,
    Incomplete,
    Overlapping,
}

/// Either a native type, a user-defined datatype, or a class name;
/// resolved during the semantic analyzer's reference pass (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Native(String),
    UserType(Identifier),
    Named(Identifier),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttribute {
    Ordered,
    Const,
    Derived,
    Subsets,
    Redefines,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: Identifier,
    pub type_ref: TypeRef,
    pub cardinality: Option<Cardinality>,
    pub meta_attributes: Vec<MetaAttribute>,
    pub position: Position,
}

/// An internal relation: `domain` is implicit, the enclosing class
/// (spec.md §9, Open Question "internal-relation domain").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub stereotype: Identifier,
    pub domain_card: Cardinality,
    pub connector: Connector,
    pub image_card: Cardinality,
    pub image_name: Identifier,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBody {
    pub attributes: Vec<Attribute>,
    pub relations: Vec<Relation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Class {
        stereotype: Identifier,
        name: Identifier,
        category: Option<Identifier>,
        specializes: Vec<Identifier>,
        body: Option<ClassBody>,
        position: Position,
    },
    Datatype {
        name: Identifier,
        attributes: Vec<Attribute>,
        position: Position,
    },
    Enum {
        name: Identifier,
        values: Vec<Identifier>,
        position: Position,
    },
    Genset {
        name: Identifier,
        restrictions: Vec<GensetRestriction>,
        general: Identifier,
        specifics: Vec<Identifier>,
        position: Position,
    },
    ExternalRelation {
        stereotype: Identifier,
        domain: Identifier,
        domain_card: Cardinality,
        image: Identifier,
        image_card: Cardinality,
        connector: Connector,
        position: Position,
    },
    /// A recovery placeholder: the parser emitted a syntactic diagnostic and
    /// skipped to the next synchronization point rather than producing a
    /// well-formed declaration (spec.md §4.2 "possibly with holes").
    Error { position: Position },
}

impl Declaration {
    pub fn position(&self) -> Position {
        match self {
            Declaration::Class { position, .. }
            | Declaration::Datatype { position, .. }
            | Declaration::Enum { position, .. }
            | Declaration::Genset { position, .. }
            | Declaration::ExternalRelation { position, .. }
            | Declaration::Error { position } => *position,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Class { name, .. }
            | Declaration::Datatype { name, .. }
            | Declaration::Enum { name, .. }
            | Declaration::Genset { name, .. } => Some(name),
            Declaration::ExternalRelation { .. } | Declaration::Error { .. } => None,
        }
    }
}
