use std::io;
use std::process::ExitCode;
use std::{env, fs};

use miette::Report;

use clair::lexer::Lexer;
use clair::parser::Parser;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let mut show_ast = false;
    let mut filename = None;
    for arg in &args[1..] {
        if arg == "--ast" {
            show_ast = true;
        } else {
            filename = Some(arg.clone());
        }
    }

    let Some(filename) = filename else {
        eprintln!("usage: clair [--ast] <file>");
        return ExitCode::FAILURE;
    };

    let contents = match fs::read_to_string(&filename) {
        Ok(contents) => contents,
        Err(err) => {
            eprintln!("cannot read {}: {}", filename, err);
            return ExitCode::FAILURE;
        }
    };

    if show_ast {
        return dump_ast(&contents);
    }

    match clair::run(&contents, io::stdout()) {
        Ok(outcome) => {
            for diagnostic in &outcome.diagnostics {
                let report =
                    Report::new(diagnostic.to_error()).with_source_code(contents.clone());
                eprintln!("{:?}", report);
            }
            if outcome.success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(fatal) => {
            let report = Report::new(fatal).with_source_code(contents.clone());
            eprintln!("{:?}", report);
            ExitCode::FAILURE
        }
    }
}

fn dump_ast(contents: &str) -> ExitCode {
    let mut parser = Parser::new(Lexer::new(contents));
    let program = parser.parse_program();

    for diagnostic in parser.take_diagnostics() {
        let report = Report::new(diagnostic.to_error()).with_source_code(contents.to_owned());
        eprintln!("{:?}", report);
    }
    if let Some(fatal) = parser.take_fatal() {
        let report = Report::new(fatal).with_source_code(contents.to_owned());
        eprintln!("{:?}", report);
        return ExitCode::FAILURE;
    }

    match program {
        Some(program) => {
            print!("{}", program.dump());
            ExitCode::SUCCESS
        }
        None => ExitCode::FAILURE,
    }
}
