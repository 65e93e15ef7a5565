//! Recursive-descent parser for the Tonto grammar (spec.md §4.2).
//!
//! Never aborts on a malformed declaration: a syntax error is recorded as a
//! [`Diagnostic`] and the parser resynchronizes on the next declaration
//! keyword or `}`, emitting [`Declaration::Error`] in its place so the rest
//! of the file still gets parsed (spec.md §4.2 "error recovery").

pub mod suggest;

use crate::ast::*;
use crate::diagnostics::{Diagnostic, Position, Stage};
use crate::lexer::{Keyword, Token, TokenKind};

struct ParseState<'a> {
    tokens: &'a [Token],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ParseState<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn check_at(&self, offset: usize, kind: TokenKind) -> bool {
        self.peek_at(offset).is_some_and(|t| t.kind == kind)
    }

    fn current_position(&self) -> Position {
        match self.peek() {
            Some(token) => token.position(),
            None => self
                .tokens
                .last()
                .map(|t| t.position())
                .unwrap_or(Position::start()),
        }
    }

    fn error(&mut self, message: impl Into<String>) -> Position {
        let position = self.current_position();
        let message = message.into();
        let diagnostic = match self.peek() {
            Some(token) => match suggest::suggest(&token.lexeme) {
                Some(s) => {
                    Diagnostic::error(Stage::Syntactic, position, message).with_suggestion(s)
                }
                None => Diagnostic::error(Stage::Syntactic, position, message),
            },
            None => Diagnostic::error(Stage::Syntactic, position, message),
        };
        self.diagnostics.push(diagnostic);
        position
    }

    /// Consumes a token of `kind`, or records a syntax error and returns `None`.
    fn expect(&mut self, kind: TokenKind, what: &str) -> Option<&'a Token> {
        if self.check(kind) {
            self.advance()
        } else {
            match self.peek() {
                Some(token) => {
                    self.error(format!(
                        "expected {what}, found '{}'",
                        token.lexeme
                    ));
                }
                None => {
                    self.error(format!("expected {what}, found end of input"));
                }
            }
            None
        }
    }

    fn expect_identifier(&mut self) -> Option<Identifier> {
        self.expect(TokenKind::Identifier, "an identifier")
            .map(|t| t.lexeme.clone())
    }

    fn is_declaration_start(&self) -> bool {
        matches!(
            self.peek().map(|t| t.kind),
            Some(TokenKind::ClassStereotype)
                | Some(TokenKind::At)
                | Some(TokenKind::Keyword(Keyword::Datatype))
                | Some(TokenKind::Keyword(Keyword::Enum))
                | Some(TokenKind::Keyword(Keyword::Genset))
                | Some(TokenKind::Keyword(Keyword::Disjoint))
                | Some(TokenKind::Keyword(Keyword::Complete))
                | Some(TokenKind::Keyword(Keyword::Incomplete))
                | Some(TokenKind::Keyword(Keyword::Overlapping))
        )
    }

    /// Skips tokens until a recognized declaration start, a `}`, or EOF. A
    /// leading `}` is always consumed first — at declaration nesting there is
    /// no enclosing opener left to match it against, so leaving it in place
    /// would make recovery loop without consuming anything.
    fn synchronize(&mut self) {
        if self.check(TokenKind::RBrace) {
            self.advance();
        }
        while self.peek().is_some() {
            if self.is_declaration_start() || self.check(TokenKind::RBrace) {
                return;
            }
            self.advance();
        }
    }
}

/// Parses a token stream into an [`Ontology`], together with any syntactic
/// diagnostics. Always returns a root ontology, possibly containing
/// [`Declaration::Error`] placeholders (spec invariant I4).
pub fn parse(tokens: &[Token]) -> (Ontology, Vec<Diagnostic>) {
    let mut state = ParseState::new(tokens);
    let mut ontology = Ontology::empty();

    if state.check(TokenKind::Keyword(Keyword::Package)) {
        state.advance();
        if let Some(name) = state.expect_identifier() {
            ontology.package = Some(name);
        }
    }

    while state.check(TokenKind::Keyword(Keyword::Import)) {
        state.advance();
        if let Some(name) = state.expect_identifier() {
            ontology.imports.push(name);
        }
    }

    while state.peek().is_some() {
        ontology.declarations.push(parse_declaration(&mut state));
    }

    (ontology, state.diagnostics)
}

fn parse_declaration(state: &mut ParseState) -> Declaration {
    match state.peek().map(|t| t.kind) {
        Some(TokenKind::ClassStereotype) => parse_class(state),
        Some(TokenKind::At) => parse_external_relation(state),
        Some(TokenKind::Keyword(Keyword::Datatype)) => parse_datatype(state),
        Some(TokenKind::Keyword(Keyword::Enum)) => parse_enum(state),
        Some(TokenKind::Keyword(Keyword::Genset))
        | Some(TokenKind::Keyword(Keyword::Disjoint))
        | Some(TokenKind::Keyword(Keyword::Complete))
        | Some(TokenKind::Keyword(Keyword::Incomplete))
        | Some(TokenKind::Keyword(Keyword::Overlapping)) => parse_genset(state),
        _ => {
            let position = state.error("expected a declaration");
            state.synchronize();
            Declaration::Error { position }
        }
    }
}

fn parse_class(state: &mut ParseState) -> Declaration {
    let position = state.current_position();
    let stereotype = state
        .advance()
        .map(|t| crate::lexer::canonical_stereotype(&t.lexeme))
        .expect("checked by caller");

    let Some(name) = state.expect_identifier() else {
        state.synchronize();
        return Declaration::Error { position };
    };

    let mut category = None;
    if state.check(TokenKind::Keyword(Keyword::Of)) {
        state.advance();
        category = state.expect_identifier();
    }

    let mut specializes = Vec::new();
    if state.check(TokenKind::Keyword(Keyword::Specializes)) {
        state.advance();
        specializes = parse_ident_list(state);
    }

    let body = if state.check(TokenKind::LBrace) {
        Some(parse_class_body(state))
    } else {
        None
    };

    Declaration::Class {
        stereotype,
        name,
        category,
        specializes,
        body,
        position,
    }
}

fn parse_class_body(state: &mut ParseState) -> ClassBody {
    state.advance(); // '{'
    let mut attributes = Vec::new();
    let mut relations = Vec::new();

    while !state.check(TokenKind::RBrace) && state.peek().is_some() {
        match state.peek().map(|t| t.kind) {
            Some(TokenKind::At) => relations.push(parse_internal_relation(state)),
            Some(TokenKind::Identifier) => attributes.push(parse_attribute(state)),
            _ => {
                state.error("expected an attribute or a relation");
                state.advance();
            }
        }
    }

    state.expect(TokenKind::RBrace, "'}'");

    ClassBody {
        attributes,
        relations,
    }
}

fn parse_attribute(state: &mut ParseState) -> Attribute {
    let position = state.current_position();
    let name = state.advance().map(|t| t.lexeme.clone()).unwrap_or_default();
    state.expect(TokenKind::Colon, "':'");
    let type_ref = parse_type_ref(state);

    let cardinality = if state.check(TokenKind::LBracket) {
        Some(parse_cardinality(state))
    } else {
        None
    };

    let meta_attributes = if state.check(TokenKind::LBrace) {
        parse_meta_attributes(state)
    } else {
        Vec::new()
    };

    Attribute {
        name,
        type_ref,
        cardinality,
        meta_attributes,
        position,
    }
}

fn parse_type_ref(state: &mut ParseState) -> TypeRef {
    match state.peek().map(|t| t.kind) {
        Some(TokenKind::NativeType) => {
            TypeRef::Native(state.advance().unwrap().lexeme.clone())
        }
        Some(TokenKind::UserType) => {
            TypeRef::UserType(state.advance().unwrap().lexeme.clone())
        }
        Some(TokenKind::Identifier) => TypeRef::Named(state.advance().unwrap().lexeme.clone()),
        _ => {
            state.error("expected a type");
            TypeRef::Named(String::new())
        }
    }
}

fn parse_meta_attributes(state: &mut ParseState) -> Vec<MetaAttribute> {
    state.advance(); // '{'
    let mut result = Vec::new();
    loop {
        match state.peek().map(|t| t.kind) {
            Some(TokenKind::MetaAttribute) => {
                let lexeme = state.advance().unwrap().lexeme.clone();
                result.push(match lexeme.as_str() {
                    "ordered" => MetaAttribute::Ordered,
                    "const" => MetaAttribute::Const,
                    "derived" => MetaAttribute::Derived,
                    "subsets" => MetaAttribute::Subsets,
                    "redefines" => MetaAttribute::Redefines,
                    _ => unreachable!("classified as MetaAttribute by the lexer"),
                });
            }
            _ => break,
        }
        if state.check(TokenKind::Comma) {
            state.advance();
        } else {
            break;
        }
    }
    state.expect(TokenKind::RBrace, "'}'");
    result
}

fn parse_cardinality(state: &mut ParseState) -> Cardinality {
    state.advance(); // '['
    let lower = parse_bound(state);
    let upper = if state.check(TokenKind::Range) {
        state.advance();
        parse_bound(state)
    } else {
        lower
    };
    state.expect(TokenKind::RBracket, "']'");
    Cardinality { lower, upper }
}

fn parse_bound(state: &mut ParseState) -> Bound {
    match state.peek().map(|t| t.kind) {
        Some(TokenKind::Number) => {
            let lexeme = &state.advance().unwrap().lexeme;
            Bound::Finite(lexeme.parse().unwrap_or(0))
        }
        Some(TokenKind::Star) => {
            state.advance();
            Bound::Infinite
        }
        _ => {
            state.error("expected a number or '*'");
            Bound::Finite(0)
        }
    }
}

/// Parses the connector grammar: a bare `conn_start`/`conn_end`/`--`, or one
/// of those carrying an interior label (spec.md §4.2 `connector` production).
fn parse_connector(state: &mut ParseState) -> Connector {
    match state.peek().map(|t| t.kind) {
        Some(TokenKind::Aggregation) | Some(TokenKind::Composition) => {
            let forward_shape = if state.check(TokenKind::Aggregation) {
                ConnectorShape::AggregationForward
            } else {
                ConnectorShape::CompositionForward
            };
            state.advance();
            if state.check(TokenKind::Identifier) && state.check_at(1, TokenKind::DoubleDash) {
                let label = state.advance().unwrap().lexeme.clone();
                state.advance();
                Connector {
                    label: Some(label),
                    shape: forward_shape,
                }
            } else {
                Connector {
                    label: None,
                    shape: forward_shape,
                }
            }
        }
        Some(TokenKind::AggregationInverse) | Some(TokenKind::CompositionInverse) => {
            let shape = if state.check(TokenKind::AggregationInverse) {
                ConnectorShape::AggregationReverse
            } else {
                ConnectorShape::CompositionReverse
            };
            state.advance();
            Connector { label: None, shape }
        }
        Some(TokenKind::DoubleDash) => {
            state.advance();
            let has_label = state.check(TokenKind::Identifier)
                && (state.check_at(1, TokenKind::AggregationInverse)
                    || state.check_at(1, TokenKind::CompositionInverse)
                    || state.check_at(1, TokenKind::DoubleDash));
            if has_label {
                let label = state.advance().unwrap().lexeme.clone();
                let shape = match state.peek().map(|t| t.kind) {
                    Some(TokenKind::AggregationInverse) => ConnectorShape::AggregationReverse,
                    Some(TokenKind::CompositionInverse) => ConnectorShape::CompositionReverse,
                    _ => ConnectorShape::Association,
                };
                state.advance();
                Connector {
                    label: Some(label),
                    shape,
                }
            } else {
                Connector {
                    label: None,
                    shape: ConnectorShape::Association,
                }
            }
        }
        _ => {
            state.error("expected a connector");
            Connector {
                label: None,
                shape: ConnectorShape::Association,
            }
        }
    }
}

fn parse_internal_relation(state: &mut ParseState) -> Relation {
    let position = state.current_position();
    state.advance(); // '@'
    let stereotype = state
        .expect(TokenKind::RelationStereotype, "a relation stereotype")
        .map(|t| t.lexeme.clone())
        .unwrap_or_default();
    let domain_card = parse_cardinality(state);
    let connector = parse_connector(state);
    let image_card = parse_cardinality(state);
    let image_name = state.expect_identifier().unwrap_or_default();

    Relation {
        stereotype,
        domain_card,
        connector,
        image_card,
        image_name,
        position,
    }
}

fn parse_external_relation(state: &mut ParseState) -> Declaration {
    let position = state.current_position();
    state.advance(); // '@'
    let stereotype = state
        .expect(TokenKind::RelationStereotype, "a relation stereotype")
        .map(|t| t.lexeme.clone())
        .unwrap_or_default();
    state.expect(TokenKind::Keyword(Keyword::Relation), "'relation'");
    let domain = state.expect_identifier().unwrap_or_default();
    let domain_card = parse_cardinality(state);
    let connector = parse_connector(state);
    let image_card = parse_cardinality(state);
    let image = state.expect_identifier().unwrap_or_default();

    Declaration::ExternalRelation {
        stereotype,
        domain,
        domain_card,
        image,
        image_card,
        connector,
        position,
    }
}

fn parse_datatype(state: &mut ParseState) -> Declaration {
    let position = state.current_position();
    state.advance(); // 'datatype'
    let Some(name) = state
        .expect(TokenKind::UserType, "a user-defined datatype name")
        .map(|t| t.lexeme.clone())
    else {
        state.synchronize();
        return Declaration::Error { position };
    };
    state.expect(TokenKind::LBrace, "'{'");
    let mut attributes = Vec::new();
    while state.check(TokenKind::Identifier) {
        attributes.push(parse_attribute(state));
    }
    state.expect(TokenKind::RBrace, "'}'");

    Declaration::Datatype {
        name,
        attributes,
        position,
    }
}

fn parse_enum(state: &mut ParseState) -> Declaration {
    let position = state.current_position();
    state.advance(); // 'enum'
    let Some(name) = state.expect_identifier() else {
        state.synchronize();
        return Declaration::Error { position };
    };
    state.expect(TokenKind::LBrace, "'{'");
    let values = parse_ident_list(state);
    state.expect(TokenKind::RBrace, "'}'");

    Declaration::Enum {
        name,
        values,
        position,
    }
}

fn parse_genset(state: &mut ParseState) -> Declaration {
    let position = state.current_position();
    let mut restrictions = Vec::new();
    loop {
        let restriction = match state.peek().map(|t| t.kind) {
            Some(TokenKind::Keyword(Keyword::Disjoint)) => GensetRestriction::Disjoint,
            Some(TokenKind::Keyword(Keyword::Complete)) => GensetRestriction::Complete,
            Some(TokenKind::Keyword(Keyword::Incomplete)) => GensetRestriction::Incomplete,
            Some(TokenKind::Keyword(Keyword::Overlapping)) => GensetRestriction::Overlapping,
            _ => break,
        };
        state.advance();
        restrictions.push(restriction);
    }

    if state.expect(TokenKind::Keyword(Keyword::Genset), "'genset'").is_none() {
        state.synchronize();
        return Declaration::Error { position };
    }
    let Some(name) = state.expect_identifier() else {
        state.synchronize();
        return Declaration::Error { position };
    };

    let (general, specifics) = if state.check(TokenKind::LBrace) {
        state.advance();
        state.expect(TokenKind::Keyword(Keyword::General), "'general'");
        let general = state.expect_identifier().unwrap_or_default();
        state.expect(TokenKind::Keyword(Keyword::Specifics), "'specifics'");
        let specifics = parse_ident_list(state);
        state.expect(TokenKind::RBrace, "'}'");
        (general, specifics)
    } else if state.check(TokenKind::Keyword(Keyword::Where)) {
        state.advance();
        let specifics = parse_ident_list(state);
        state.expect(TokenKind::Keyword(Keyword::Specializes), "'specializes'");
        let general = state.expect_identifier().unwrap_or_default();
        (general, specifics)
    } else {
        state.error("expected '{' or 'where'");
        (String::new(), Vec::new())
    };

    Declaration::Genset {
        name,
        restrictions,
        general,
        specifics,
        position,
    }
}

fn parse_ident_list(state: &mut ParseState) -> Vec<Identifier> {
    let mut result = Vec::new();
    let Some(first) = state.expect_identifier() else {
        return result;
    };
    result.push(first);
    while state.check(TokenKind::Comma) {
        state.advance();
        if let Some(name) = state.expect_identifier() {
            result.push(name);
        } else {
            break;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn parse_source(source: &str) -> (Ontology, Vec<Diagnostic>) {
        let (tokens, lex_diagnostics) = lex(source);
        assert!(lex_diagnostics.is_empty(), "unexpected lexical errors: {lex_diagnostics:?}");
        parse(&tokens)
    }

    #[test]
    fn parses_package_and_empty_kind() {
        let (ontology, diagnostics) = parse_source("package Example\nkind Person {}");
        assert!(diagnostics.is_empty());
        assert_eq!(ontology.package.as_deref(), Some("Example"));
        assert_eq!(ontology.declarations.len(), 1);
        match &ontology.declarations[0] {
            Declaration::Class { name, body, .. } => {
                assert_eq!(name, "Person");
                assert!(body.as_ref().unwrap().attributes.is_empty());
            }
            other => panic!("expected Class, got {other:?}"),
        }
    }

    #[test]
    fn parses_attribute_with_cardinality_and_meta() {
        let (ontology, diagnostics) =
            parse_source("kind Person { names: string[1..*] {ordered} }");
        assert!(diagnostics.is_empty());
        let Declaration::Class { body, .. } = &ontology.declarations[0] else {
            panic!("expected Class");
        };
        let attr = &body.as_ref().unwrap().attributes[0];
        assert_eq!(attr.name, "names");
        assert_eq!(attr.cardinality.unwrap().upper, Bound::Infinite);
        assert_eq!(attr.meta_attributes, vec![MetaAttribute::Ordered]);
    }

    #[test]
    fn parses_specializes_list() {
        let (ontology, diagnostics) =
            parse_source("kind Person\nsubkind Student specializes Person, Employee {}");
        assert!(diagnostics.is_empty());
        let Declaration::Class { specializes, .. } = &ontology.declarations[1] else {
            panic!("expected Class");
        };
        assert_eq!(specializes, &vec!["Person".to_string(), "Employee".to_string()]);
    }

    #[test]
    fn parses_internal_relation_with_labeled_connector() {
        let (ontology, diagnostics) = parse_source(
            "kind Person { @mediation [1] <>-- marriage -- [2] Marriage }",
        );
        assert!(diagnostics.is_empty());
        let Declaration::Class { body, .. } = &ontology.declarations[0] else {
            panic!("expected Class");
        };
        let relation = &body.as_ref().unwrap().relations[0];
        assert_eq!(relation.connector.label.as_deref(), Some("marriage"));
        assert_eq!(relation.connector.shape, ConnectorShape::AggregationForward);
        assert_eq!(relation.image_name, "Marriage");
    }

    #[test]
    fn parses_external_relation() {
        let (ontology, diagnostics) =
            parse_source("@material relation Enrollment [1] -- [1..*] Course");
        assert!(diagnostics.is_empty());
        match &ontology.declarations[0] {
            Declaration::ExternalRelation { domain, image, .. } => {
                assert_eq!(domain, "Enrollment");
                assert_eq!(image, "Course");
            }
            other => panic!("expected ExternalRelation, got {other:?}"),
        }
    }

    #[test]
    fn parses_genset_brace_form() {
        let (ontology, diagnostics) = parse_source(
            "disjoint complete genset PersonGender { general Person specifics Man, Woman }",
        );
        assert!(diagnostics.is_empty());
        match &ontology.declarations[0] {
            Declaration::Genset {
                restrictions,
                general,
                specifics,
                ..
            } => {
                assert_eq!(
                    restrictions,
                    &vec![GensetRestriction::Disjoint, GensetRestriction::Complete]
                );
                assert_eq!(general, "Person");
                assert_eq!(specifics, &vec!["Man".to_string(), "Woman".to_string()]);
            }
            other => panic!("expected Genset, got {other:?}"),
        }
    }

    #[test]
    fn parses_genset_where_form() {
        let (ontology, diagnostics) =
            parse_source("genset PersonGender where Man, Woman specializes Person");
        assert!(diagnostics.is_empty());
        match &ontology.declarations[0] {
            Declaration::Genset {
                general, specifics, ..
            } => {
                assert_eq!(general, "Person");
                assert_eq!(specifics, &vec!["Man".to_string(), "Woman".to_string()]);
            }
            other => panic!("expected Genset, got {other:?}"),
        }
    }

    #[test]
    fn parses_datatype_and_enum() {
        let (ontology, diagnostics) = parse_source(
            "datatype AddressDataType { street: string }\nenum Color { Red, Green, Blue }",
        );
        assert!(diagnostics.is_empty());
        assert!(matches!(ontology.declarations[0], Declaration::Datatype { .. }));
        assert!(matches!(ontology.declarations[1], Declaration::Enum { .. }));
    }

    #[test]
    fn recovers_from_malformed_declaration() {
        let (ontology, diagnostics) = parse_source("relation\nkind Person {}");
        assert!(!diagnostics.is_empty());
        assert!(ontology
            .declarations
            .iter()
            .any(|d| matches!(d, Declaration::Error { .. })));
        assert!(ontology
            .declarations
            .iter()
            .any(|d| matches!(d, Declaration::Class { name, .. } if name == "Person")));
    }

    #[test]
    fn always_produces_a_root_ontology() {
        let (ontology, _) = parse_source("");
        assert!(ontology.declarations.is_empty());
    }
}
