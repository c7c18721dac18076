use miette::{Diagnostic as MietteDiagnostic, SourceSpan};
use thiserror::Error;

use crate::span::Span;

#[derive(Error, Debug, MietteDiagnostic)]
pub enum ClairError {
    #[error("Lex Error: {message}")]
    #[diagnostic(code(clair::lexer::error))]
    LexError {
        message: String,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("Parse Error: {message}")]
    #[diagnostic(code(clair::parser::error))]
    ParseError {
        message: String,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("Runtime Error: {message}")]
    #[diagnostic(code(clair::interpreter::error))]
    RuntimeError {
        message: String,
        #[label("{message}")]
        span: SourceSpan,
    },
}

impl ClairError {
    pub fn new_lex(message: String, span: Span) -> Self {
        ClairError::LexError {
            message,
            span: span.into(),
        }
    }

    pub fn new_parse(message: String, span: Span) -> Self {
        ClairError::ParseError {
            message,
            span: span.into(),
        }
    }

    pub fn new_runtime(message: String, span: Span) -> Self {
        ClairError::RuntimeError {
            message,
            span: span.into(),
        }
    }
}

/// Pipeline stage a diagnostic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Runtime,
}

/// Position-tagged diagnostic record surfaced to callers of the pipeline.
/// Recoverable lex errors, parse errors, and runtime errors all land here;
/// only fatal lex errors abort a run outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(stage: Stage, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            stage,
            message: message.into(),
            span,
        }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }

    /// Rendering form, for miette reports in the driver.
    pub fn to_error(&self) -> ClairError {
        match self.stage {
            Stage::Lex => ClairError::new_lex(self.message.clone(), self.span),
            Stage::Parse => ClairError::new_parse(self.message.clone(), self.span),
            Stage::Runtime => ClairError::new_runtime(self.message.clone(), self.span),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}, column {}: {}",
            self.line(),
            self.column(),
            self.message
        )
    }
}
