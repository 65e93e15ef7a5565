//! Diagnostics shared by all three pipeline stages.
//!
//! A [`Diagnostic`] never aborts a stage: every stage keeps collecting them
//! into a `Vec` and runs to completion over its full input (spec.md §7).

use std::fmt::{self, Display};

/// A 1-based source position. `column` counts from the last newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub const fn start() -> Self {
        Self::new(1, 1)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Lexical,
    Syntactic,
    Semantic,
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexical => f.write_str("Lexical"),
            Stage::Syntactic => f.write_str("Syntactic"),
            Stage::Semantic => f.write_str("Semantic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    pub position: Position,
    pub message: String,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(stage: Stage, position: Position, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            stage,
            position,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn warning(stage: Stage, position: Position, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            stage,
            position,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// `I6`: `has_errors(diagnostics) == (any d in diagnostics has severity Error)`.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} - {}] {}",
            self.stage, self.position, self.message
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  suggestion: {suggestion}")?;
        }
        Ok(())
    }
}
