//! Static analysis pipeline for the Tonto ontology modeling language:
//! lexer → parser → semantic analyzer, wired together by [`analyze`].

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod semantic;

use ast::Ontology;
use diagnostics::Diagnostic;
use semantic::SymbolTable;

/// Result of a full `analyze(source)` call: the AST, the resolved symbol
/// table, and the union of every stage's diagnostics (spec.md §7).
pub struct AnalysisResult {
    pub ast: Ontology,
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisResult {
    pub fn has_errors(&self) -> bool {
        diagnostics::has_errors(&self.diagnostics)
    }
}

/// Runs the full pipeline over `source`: lex, parse, then run the three
/// semantic passes. Never panics and never aborts early; every stage runs to
/// completion and contributes its diagnostics (spec.md §5, §7).
pub fn analyze(source: &str) -> AnalysisResult {
    log::debug!("analyze: lexing {} bytes", source.len());
    let (tokens, mut diagnostics) = lexer::lex(source);

    log::debug!("analyze: parsing {} tokens", tokens.len());
    let (ast, parse_diagnostics) = parser::parse(&tokens);
    diagnostics.extend(parse_diagnostics);

    log::debug!("analyze: running semantic analysis");
    let semantic_result = semantic::analyze(&ast);
    diagnostics.extend(semantic_result.diagnostics);

    AnalysisResult {
        ast,
        symbols: semantic_result.symbols,
        diagnostics,
    }
}
