//! clair: lexer, recursive-descent parser, and tree-walking interpreter
//! for a French-keyword algorithmic pseudocode language.
//!
//! The pipeline is source text → [`lexer::Lexer`] → [`parser::Parser`] →
//! AST → [`interpreter::Interpreter`]. Lexical and syntax errors decide
//! whether a usable AST exists; runtime errors are advisory and never
//! stop a run.

pub mod ast;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;
pub mod value;

use std::io::Write;

pub use crate::error::{ClairError, Diagnostic, Stage};

use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Result of a whole pipeline run.
///
/// `parsed` reports whether a usable AST was produced (no syntax
/// diagnostics). Interpretation only happens when it is true;
/// recoverable lexical and runtime diagnostics land in `diagnostics`
/// without flipping it.
#[derive(Debug)]
pub struct RunOutcome {
    pub parsed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.parsed && self.diagnostics.is_empty()
    }
}

/// Lex, parse, and interpret `source`, sending `ecrire` output to `out`.
///
/// `Err` is reserved for fatal lexical errors (unterminated string or
/// character literal); everything else is reported through the outcome's
/// diagnostics.
pub fn run(source: &str, out: impl Write) -> Result<RunOutcome, ClairError> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    let mut diagnostics = parser.take_diagnostics();

    if let Some(fatal) = parser.take_fatal() {
        return Err(fatal);
    }

    let Some(program) = program else {
        return Ok(RunOutcome {
            parsed: false,
            diagnostics,
        });
    };

    // Recoverable lexical diagnostics (skipped characters, out-of-range
    // literals) leave the AST intact; only syntax errors block the run.
    if diagnostics.iter().any(|d| d.stage == Stage::Parse) {
        return Ok(RunOutcome {
            parsed: false,
            diagnostics,
        });
    }

    let mut interpreter = Interpreter::with_output(out);
    interpreter.run(&program);
    diagnostics.extend(interpreter.take_diagnostics());

    Ok(RunOutcome {
        parsed: true,
        diagnostics,
    })
}
