//! Semantic analysis: symbol collection, reference/rigidity checks, and
//! pattern validation, run in that order (spec.md §4.3).

mod patterns;
mod rigidity;
pub mod symbols;
mod taxonomy;

use crate::ast::Ontology;
use crate::diagnostics::Diagnostic;

pub use symbols::SymbolTable;

pub struct SemanticResult {
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn analyze(ontology: &Ontology) -> SemanticResult {
    log::debug!("semantic: pass 1 (symbol collection)");
    let (symbols, mut diagnostics) = symbols::build(ontology);

    log::debug!("semantic: pass 2 (reference resolution + rigidity)");
    diagnostics.extend(rigidity::resolve_references(&symbols));
    diagnostics.extend(rigidity::check_rigidity_hierarchy(&symbols));

    log::debug!("semantic: pass 3 (pattern validation)");
    diagnostics.extend(patterns::check_all(&symbols));

    SemanticResult { symbols, diagnostics }
}
