//! Lexical analysis for Tonto source text.
//!
//! The lexer never aborts: illegal input produces a diagnostic and the
//! offending run is skipped up to the next whitespace boundary (spec.md
//! §4.1). It never emits an error *token* — callers only ever see well
//! formed tokens plus a side list of diagnostics.

mod tables;

pub use tables::vocabulary;

use crate::diagnostics::{Diagnostic, Position, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Package,
    Import,
    Genset,
    Disjoint,
    Complete,
    Incomplete,
    Overlapping,
    General,
    Specifics,
    Where,
    Specializes,
    Datatype,
    Enum,
    Of,
    Relation,
    FunctionalComplexes,
}

impl Keyword {
    fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "package" => Keyword::Package,
            "import" => Keyword::Import,
            "genset" => Keyword::Genset,
            "disjoint" => Keyword::Disjoint,
            "complete" => Keyword::Complete,
            "incomplete" => Keyword::Incomplete,
            "overlapping" => Keyword::Overlapping,
            "general" => Keyword::General,
            "specifics" => Keyword::Specifics,
            "where" => Keyword::Where,
            "specializes" => Keyword::Specializes,
            "datatype" => Keyword::Datatype,
            "enum" => Keyword::Enum,
            "of" => Keyword::Of,
            "relation" => Keyword::Relation,
            "functional-complexes" => Keyword::FunctionalComplexes,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    ClassStereotype,
    RelationStereotype,
    NativeType,
    MetaAttribute,
    UserType,
    Identifier,
    Number,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Range,
    Star,
    At,
    Aggregation,
    AggregationInverse,
    Composition,
    CompositionInverse,
    DoubleDash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
    pub byte_offset: u32,
}

impl Token {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Maps legacy hyphenated stereotype spellings onto the canonical camelCase
/// name the semantic analyzer's taxonomy tables expect (spec.md §6.1).
pub fn canonical_stereotype(lexeme: &str) -> String {
    tables::LEGACY_HYPHENATED_CLASS_STEREOTYPES
        .iter()
        .find(|(legacy, _)| *legacy == lexeme)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| lexeme.to_string())
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    byte_offset: u32,
    line: u32,
    column: u32,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            byte_offset: 0,
            line: 1,
            column: 1,
            diagnostics: Vec::new(),
        }
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        self.pos += 1;
        self.byte_offset += c.len_utf8() as u32;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn make_token(&self, kind: TokenKind, lexeme: String, start: Position, start_offset: u32) -> Token {
        Token {
            kind,
            lexeme,
            line: start.line,
            column: start.column,
            byte_offset: start_offset,
        }
    }

    fn run(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let Some(c) = self.peek_at(0) else {
                break;
            };
            match c {
                'A'..='Z' | 'a'..='z' | '_' => {
                    if let Some(token) = self.lex_word() {
                        tokens.push(token);
                    }
                }
                '0'..='9' => tokens.push(self.lex_number()),
                '<' | '-' => {
                    if let Some(token) = self.lex_connector() {
                        tokens.push(token);
                    }
                }
                '.' | '(' | ')' | '[' | ']' | '{' | '}' | ',' | ':' | '*' | '@' => {
                    tokens.push(self.lex_structural())
                }
                _ => self.lex_error(),
            }
        }
        (tokens, self.diagnostics)
    }

    /// Skips whitespace and comments. Comments never produce tokens but do
    /// advance the line counter (spec.md §4.1 family 4).
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek_at(0), self.peek_at(1)) {
                (Some(' '), _) | (Some('\t'), _) | (Some('\n'), _) | (Some('\r'), _) => {
                    self.advance();
                }
                (Some('/'), Some('/')) => {
                    self.advance();
                    self.advance();
                    while !matches!(self.peek_at(0), Some('\n') | None) {
                        self.advance();
                    }
                }
                (Some('/'), Some('*')) => {
                    self.advance();
                    self.advance();
                    loop {
                        match (self.peek_at(0), self.peek_at(1)) {
                            (Some('*'), Some('/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            (Some(_), _) => {
                                self.advance();
                            }
                            (None, _) => break,
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_word(&mut self) -> Option<Token> {
        let start = self.here();
        let start_offset = self.byte_offset;
        let mut lexeme = String::new();
        while let Some(c) = self.peek_at(0) {
            if c.is_alphanumeric() || c == '_' {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        // Hyphenated extension: [A-Za-z][A-Za-z0-9]*(-[A-Za-z0-9]+)+
        let mut hyphenated = false;
        while self.peek_at(0) == Some('-')
            && self
                .peek_at(1)
                .is_some_and(|c| c.is_alphanumeric())
        {
            hyphenated = true;
            lexeme.push('-');
            self.advance();
            while let Some(c) = self.peek_at(0) {
                if c.is_alphanumeric() {
                    lexeme.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        if hyphenated {
            return self.classify_hyphenated(lexeme, start, start_offset);
        }
        Some(self.classify_word(lexeme, start, start_offset))
    }

    fn classify_hyphenated(&mut self, lexeme: String, start: Position, start_offset: u32) -> Option<Token> {
        if lexeme == "functional-complexes" {
            return Some(self.make_token(
                TokenKind::Keyword(Keyword::FunctionalComplexes),
                lexeme,
                start,
                start_offset,
            ));
        }
        if tables::LEGACY_HYPHENATED_CLASS_STEREOTYPES
            .iter()
            .any(|(legacy, _)| *legacy == lexeme)
        {
            return Some(self.make_token(TokenKind::ClassStereotype, lexeme, start, start_offset));
        }
        self.diagnostics.push(Diagnostic::error(
            Stage::Lexical,
            start,
            format!("illegal hyphenated identifier '{lexeme}'"),
        ));
        None
    }

    fn classify_word(&mut self, lexeme: String, start: Position, start_offset: u32) -> Token {
        let kind = if tables::is_user_type(&lexeme) {
            TokenKind::UserType
        } else if let Some(keyword) = Keyword::from_word(&lexeme) {
            TokenKind::Keyword(keyword)
        } else if tables::is_class_stereotype(&lexeme) {
            TokenKind::ClassStereotype
        } else if tables::is_relation_stereotype(&lexeme) {
            TokenKind::RelationStereotype
        } else if tables::is_native_type(&lexeme) {
            TokenKind::NativeType
        } else if tables::is_meta_attribute(&lexeme) {
            TokenKind::MetaAttribute
        } else {
            TokenKind::Identifier
        };
        self.make_token(kind, lexeme, start, start_offset)
    }

    fn lex_number(&mut self) -> Token {
        let start = self.here();
        let start_offset = self.byte_offset;
        let mut lexeme = String::new();
        while let Some(c) = self.peek_at(0) {
            if c.is_ascii_digit() {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        self.make_token(TokenKind::Number, lexeme, start, start_offset)
    }

    fn lex_structural(&mut self) -> Token {
        let start = self.here();
        let start_offset = self.byte_offset;
        let c = self.advance().expect("checked by caller");
        if c == '.' {
            if self.peek_at(0) == Some('.') {
                self.advance();
                return self.make_token(TokenKind::Range, "..".into(), start, start_offset);
            }
            return self.make_token(TokenKind::Dot, ".".into(), start, start_offset);
        }
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '*' => TokenKind::Star,
            '@' => TokenKind::At,
            other => unreachable!("unexpected structural symbol '{other}'"),
        };
        self.make_token(kind, c.to_string(), start, start_offset)
    }

    /// Greedy connector matching: `<o>--` before `<>--`, both before `--`,
    /// `--<o>`/`--<>` before bare `--` (spec.md §4.1 "Greedy-match rule").
    fn lex_connector(&mut self) -> Option<Token> {
        let start = self.here();
        let start_offset = self.byte_offset;
        match self.peek_at(0) {
            Some('<') => {
                if self.peek_at(1) == Some('>') && self.peek_at(2) == Some('-') && self.peek_at(3) == Some('-') {
                    for _ in 0..4 {
                        self.advance();
                    }
                    return Some(self.make_token(TokenKind::Aggregation, "<>--".into(), start, start_offset));
                }
                if self.peek_at(1) == Some('o')
                    && self.peek_at(2) == Some('>')
                    && self.peek_at(3) == Some('-')
                    && self.peek_at(4) == Some('-')
                {
                    for _ in 0..5 {
                        self.advance();
                    }
                    return Some(self.make_token(TokenKind::Composition, "<o>--".into(), start, start_offset));
                }
                self.advance();
                self.diagnostics.push(Diagnostic::error(
                    Stage::Lexical,
                    start,
                    "illegal character '<'",
                ));
                None
            }
            Some('-') if self.peek_at(1) == Some('-') => {
                if self.peek_at(2) == Some('<') {
                    if self.peek_at(3) == Some('>') {
                        for _ in 0..4 {
                            self.advance();
                        }
                        return Some(self.make_token(
                            TokenKind::AggregationInverse,
                            "--<>".into(),
                            start,
                            start_offset,
                        ));
                    }
                    if self.peek_at(3) == Some('o') && self.peek_at(4) == Some('>') {
                        for _ in 0..5 {
                            self.advance();
                        }
                        return Some(self.make_token(
                            TokenKind::CompositionInverse,
                            "--<o>".into(),
                            start,
                            start_offset,
                        ));
                    }
                }
                self.advance();
                self.advance();
                Some(self.make_token(TokenKind::DoubleDash, "--".into(), start, start_offset))
            }
            Some('-') => {
                self.advance();
                self.diagnostics.push(Diagnostic::error(
                    Stage::Lexical,
                    start,
                    "illegal character '-'",
                ));
                None
            }
            _ => unreachable!("lex_connector called on non-connector start"),
        }
    }

    /// Any character not covered by the families above: record a diagnostic
    /// and resynchronize on the next whitespace run (spec.md §4.1 family 7).
    fn lex_error(&mut self) {
        let start = self.here();
        let mut lexeme = String::new();
        while let Some(c) = self.peek_at(0) {
            if c.is_whitespace() {
                break;
            }
            lexeme.push(c);
            self.advance();
        }
        if lexeme.is_empty() {
            // Defensive: always consume at least one character to guarantee termination.
            if let Some(c) = self.advance() {
                lexeme.push(c);
            }
        }
        self.diagnostics.push(Diagnostic::error(
            Stage::Lexical,
            start,
            format!("illegal character '{lexeme}'"),
        ));
    }
}

/// Tokenizes `source`, returning tokens in source order and any lexical
/// diagnostics. Illegal hyphenated identifiers are recorded as diagnostics
/// and never appear in the returned token stream (spec.md invariant: the
/// lexer never emits an ERROR token downstream).
pub fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(source).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_package_and_kind() {
        let (tokens, diagnostics) = lex("package P  kind Person");
        assert!(diagnostics.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::Package),
                TokenKind::Identifier,
                TokenKind::ClassStereotype,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn greedy_connector_match() {
        let (tokens, diagnostics) = lex("<o>-- --<o> <>-- --<> --");
        assert!(diagnostics.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Composition,
                TokenKind::CompositionInverse,
                TokenKind::Aggregation,
                TokenKind::AggregationInverse,
                TokenKind::DoubleDash,
            ]
        );
    }

    #[test]
    fn range_before_dot() {
        let (tokens, _) = lex("[1..*]");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LBracket,
                TokenKind::Number,
                TokenKind::Range,
                TokenKind::Star,
                TokenKind::RBracket,
            ]
        );
    }

    #[test]
    fn recovers_after_illegal_character() {
        let (tokens, diagnostics) = lex("kind $Foo  kind Bar");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position, Position::new(1, 6));
        let identifiers: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(identifiers, vec!["Bar"]);
    }

    #[test]
    fn block_comment_advances_lines() {
        let (tokens, diagnostics) = lex("kind /* a\nb\nc */ A");
        assert!(diagnostics.is_empty());
        assert_eq!(tokens.last().unwrap().line, 3);
    }

    #[test]
    fn user_type_suffix() {
        let (tokens, _) = lex("datatype AddressDataType {}");
        assert_eq!(tokens[1].kind, TokenKind::UserType);
    }

    #[test]
    fn legacy_hyphenated_stereotype() {
        let (tokens, diagnostics) = lex("intrinsic-mode Color");
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::ClassStereotype);
        assert_eq!(canonical_stereotype(&tokens[0].lexeme), "intrinsicMode");
    }

    #[test]
    fn unknown_hyphenated_form_is_lexical_error() {
        let (tokens, diagnostics) = lex("pseudo-stereo Foo");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(tokens[0].lexeme, "Foo");
    }

    #[test]
    fn empty_source_has_no_tokens() {
        let (tokens, diagnostics) = lex("");
        assert!(tokens.is_empty());
        assert!(diagnostics.is_empty());
    }
}
