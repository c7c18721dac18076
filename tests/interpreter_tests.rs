use clair::environment::Environment;
use clair::error::Diagnostic;
use clair::interpreter::Interpreter;
use clair::lexer::Lexer;
use clair::parser::Parser;

struct Outcome {
    output: String,
    diagnostics: Vec<Diagnostic>,
    globals: Environment,
}

fn run(src: &str) -> Outcome {
    let mut parser = Parser::new(Lexer::new(src));
    let program = parser.parse_program().expect("program should parse");
    let parse_diagnostics = parser.take_diagnostics();
    assert!(
        parse_diagnostics.is_empty(),
        "unexpected parse diagnostics: {:?}",
        parse_diagnostics
    );

    let mut interpreter = Interpreter::with_output(Vec::new());
    interpreter.run(&program);
    let diagnostics = interpreter.take_diagnostics();
    let globals = interpreter.globals().clone();
    let output = String::from_utf8(interpreter.into_output()).expect("utf-8 output");
    Outcome {
        output,
        diagnostics,
        globals,
    }
}

fn run_clean(src: &str) -> Outcome {
    let outcome = run(src);
    assert!(
        outcome.diagnostics.is_empty(),
        "unexpected runtime diagnostics: {:?}",
        outcome.diagnostics
    );
    outcome
}

impl Outcome {
    fn global_int(&self, name: &str) -> i64 {
        self.globals
            .get(name)
            .unwrap_or_else(|| panic!("'{}' should be bound", name))
            .as_int()
    }
}

#[test]
fn arithmetic_follows_precedence() {
    let outcome = run_clean("entier x <- 2 + 3 * 4;\nentier y <- (2 + 3) * 4;");
    assert_eq!(outcome.global_int("x"), 14);
    assert_eq!(outcome.global_int("y"), 20);
}

#[test]
fn division_and_modulo() {
    let outcome = run_clean("entier a <- 7 / 2;\nentier b <- 7 mod 2;\nentier c <- 7 div 2;");
    assert_eq!(outcome.global_int("a"), 3);
    assert_eq!(outcome.global_int("b"), 1);
    assert_eq!(outcome.global_int("c"), 3);
}

#[test]
fn division_by_zero_reports_and_continues() {
    let outcome = run("entier x <- 10 / 0;\nentier y <- 3;");
    assert_eq!(outcome.global_int("x"), 0);
    assert_eq!(outcome.global_int("y"), 3);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert!(outcome.diagnostics[0].message.contains("division by zero"));
}

#[test]
fn comparisons_yield_zero_or_one() {
    let outcome = run_clean("entier a <- 2 < 3;\nentier b <- 2 = 3;\nentier c <- 2 != 3;");
    assert_eq!(outcome.global_int("a"), 1);
    assert_eq!(outcome.global_int("b"), 0);
    assert_eq!(outcome.global_int("c"), 1);
}

#[test]
fn logical_operators_over_booleans() {
    let outcome =
        run_clean("entier a <- vrai et faux;\nentier b <- vrai ou faux;\nentier c <- non 7;");
    assert_eq!(outcome.global_int("a"), 0);
    assert_eq!(outcome.global_int("b"), 1);
    assert_eq!(outcome.global_int("c"), 0);
}

#[test]
fn logical_operators_do_not_short_circuit() {
    // The right operand is evaluated even when the left already decides.
    let outcome = run("entier a <- 0 et inconnu;");
    assert_eq!(outcome.global_int("a"), 0);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert!(outcome.diagnostics[0]
        .message
        .contains("undefined variable 'inconnu'"));
}

#[test]
fn strings_coerce_to_their_length() {
    let outcome = run_clean("entier n <- \"abc\" + 1;");
    assert_eq!(outcome.global_int("n"), 4);
}

#[test]
fn characters_coerce_to_their_code_point() {
    let outcome = run_clean("entier n <- 'A' + 0;");
    assert_eq!(outcome.global_int("n"), 65);
}

#[test]
fn declaration_without_initializer_defaults_to_zero() {
    let outcome = run_clean("entier x;");
    assert_eq!(outcome.global_int("x"), 0);
}

#[test]
fn if_picks_the_right_branch() {
    let outcome = run_clean(
        "entier x <- 0;\nsi 2 < 3 alors x <- 1; sinon x <- 2; finsi\n\
         entier y <- 0;\nsi 3 < 2 alors y <- 1; sinon y <- 2; finsi",
    );
    assert_eq!(outcome.global_int("x"), 1);
    assert_eq!(outcome.global_int("y"), 2);
}

#[test]
fn redeclaration_in_a_block_shadows_the_outer_binding() {
    let outcome = run_clean("entier x <- 1;\nsi vrai alors entier x <- 2; finsi");
    assert_eq!(outcome.global_int("x"), 1);
}

#[test]
fn assignment_in_a_block_reaches_the_outer_binding() {
    let outcome = run_clean("entier x <- 1;\nsi vrai alors x <- 5; finsi");
    assert_eq!(outcome.global_int("x"), 5);
}

#[test]
fn while_loop_accumulates() {
    let outcome = run_clean(
        "entier somme <- 0;\nentier i <- 1;\n\
         tantque i <= 5 faire somme <- somme + i; i <- i + 1; finfaire",
    );
    assert_eq!(outcome.global_int("somme"), 15);
}

#[test]
fn for_loop_runs_up_to_the_inclusive_bound() {
    let outcome = run_clean(
        "entier x <- 0;\npour x <- 1 5 haut faire\n  ecrire(\"boucle\");\nfinfaire",
    );
    assert_eq!(outcome.output, "boucle\n".repeat(5));
    // The loop runs until the counter passes the bound.
    assert_eq!(outcome.global_int("x"), 6);
}

#[test]
fn for_loop_counts_down() {
    let outcome = run_clean("entier n <- 0;\npour n <- 5 1 bas faire\n  ecrire(n);\nfinfaire");
    assert_eq!(outcome.output, "5\n4\n3\n2\n1\n");
    assert_eq!(outcome.global_int("n"), 0);
}

#[test]
fn for_loop_starting_past_its_bound_never_runs() {
    let outcome = run_clean("entier i <- 0;\npour i <- 10 5 haut faire\n  ecrire(i);\nfinfaire");
    assert_eq!(outcome.output, "");
}

#[test]
fn for_loop_bound_may_be_any_expression() {
    let outcome = run_clean(
        "entier borne <- 3;\npour i <- 1 borne haut faire\n  ecrire(i);\nfinfaire",
    );
    assert_eq!(outcome.output, "1\n2\n3\n");
}

#[test]
fn function_call_returns_a_value() {
    let outcome = run_clean(
        "debfonc entier somme(entier a, entier b)\n  retourner a + b;\nfinfonc\n\
         entier resultat <- somme(2, 3);",
    );
    assert_eq!(outcome.global_int("resultat"), 5);
}

#[test]
fn function_without_return_yields_zero() {
    let outcome = run_clean(
        "debfonc vide rien()\n  ecrire(\"appel\");\nfinfonc\nentier resultat <- rien();",
    );
    assert_eq!(outcome.global_int("resultat"), 0);
    assert_eq!(outcome.output, "appel\n");
}

#[test]
fn return_unwinds_through_nested_loops() {
    let outcome = run_clean(
        "debfonc entier cherche()\n\
         pour i <- 1 10 haut faire\n\
           si i = 3 alors retourner i; finsi\n\
         finfaire\n\
         retourner 0;\n\
         finfonc\n\
         entier x <- cherche();",
    );
    assert_eq!(outcome.global_int("x"), 3);
}

#[test]
fn top_level_return_stops_execution() {
    let outcome = run_clean("entier x <- 1;\nretourner;\nx <- 2;");
    assert_eq!(outcome.global_int("x"), 1);
}

#[test]
fn functions_resolve_free_names_against_globals() {
    let outcome = run_clean(
        "entier g <- 7;\n\
         debfonc entier lit()\n  retourner g;\nfinfonc\n\
         entier x <- lit();",
    );
    assert_eq!(outcome.global_int("x"), 7);
}

#[test]
fn data_result_parameter_writes_back() {
    let outcome = run_clean(
        "debfonc vide incr(dr entier n)\n  n <- n + 1;\nfinfonc\n\
         entier x <- 5;\nincr(x);",
    );
    assert_eq!(outcome.global_int("x"), 6);
}

#[test]
fn result_parameter_ignores_the_incoming_value() {
    let outcome = run_clean(
        "debfonc vide copie(r entier sortie)\n  sortie <- sortie + 1;\nfinfonc\n\
         entier x <- 10;\ncopie(x);",
    );
    // `r` binds to 0 on entry, so the callee computes 0 + 1.
    assert_eq!(outcome.global_int("x"), 1);
}

#[test]
fn data_parameter_does_not_write_back() {
    let outcome = run_clean(
        "debfonc vide touche(entier n)\n  n <- n + 1;\nfinfonc\n\
         entier x <- 5;\ntouche(x);",
    );
    assert_eq!(outcome.global_int("x"), 5);
}

#[test]
fn arity_mismatch_is_reported() {
    let outcome = run(
        "debfonc entier f(entier a)\n  retourner a;\nfinfonc\n\
         entier x <- f(1, 2);\nentier y <- 3;",
    );
    assert_eq!(outcome.global_int("x"), 0);
    assert_eq!(outcome.global_int("y"), 3);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert!(outcome.diagnostics[0].message.contains("expects 1 argument"));
}

#[test]
fn undefined_function_is_reported_and_execution_continues() {
    let outcome = run("entier x <- fantome();\nentier y <- 2;");
    assert_eq!(outcome.global_int("x"), 0);
    assert_eq!(outcome.global_int("y"), 2);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert!(outcome.diagnostics[0]
        .message
        .contains("undefined function 'fantome'"));
}

#[test]
fn undefined_variable_yields_zero() {
    let outcome = run("entier x <- inconnu + 1;");
    assert_eq!(outcome.global_int("x"), 1);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!((outcome.diagnostics[0].line(), outcome.diagnostics[0].column()), (1, 13));
}

#[test]
fn ecrire_prints_one_value_per_line() {
    let outcome = run_clean("ecrire(1 + 2);\necrire(\"salut\");\necrire(vrai);");
    assert_eq!(outcome.output, "3\nsalut\nvrai\n");
}

#[test]
fn array_access_is_reported_as_unsupported() {
    let outcome = run("entier x <- t[0];");
    assert_eq!(outcome.global_int("x"), 0);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert!(outcome.diagnostics[0].message.contains("array access"));
}

mod pipeline {
    use std::io;

    #[test]
    fn run_reports_success_and_writes_output() {
        let mut out = Vec::new();
        let outcome = clair::run("ecrire(\"ok\");", &mut out).expect("no fatal error");
        assert!(outcome.success());
        assert_eq!(out, b"ok\n");
    }

    #[test]
    fn counting_loop_program_terminates_and_prints() {
        let src = "entier x <- 0;\npour x <- 1 5 haut faire\n  ecrire(\"boucle\");\nfinfaire\n";
        let mut out = Vec::new();
        let outcome = clair::run(src, &mut out).expect("no fatal error");
        assert!(outcome.success());
        assert_eq!(out, "boucle\n".repeat(5).into_bytes());
    }

    #[test]
    fn recoverable_lex_diagnostics_do_not_block_interpretation() {
        let mut out = Vec::new();
        let outcome = clair::run("@ ecrire(\"ok\");", &mut out).expect("no fatal error");
        assert!(outcome.parsed);
        assert_eq!(out, b"ok\n");
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].stage, clair::Stage::Lex);
    }

    #[test]
    fn syntax_errors_skip_interpretation() {
        let mut out = Vec::new();
        let outcome = clair::run("ecrire(\"jamais\");\nsi alors finsi", &mut out)
            .expect("no fatal error");
        assert!(!outcome.parsed);
        assert!(!outcome.diagnostics.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn unterminated_string_is_fatal() {
        assert!(clair::run("ecrire(\"oops", io::sink()).is_err());
    }
}
