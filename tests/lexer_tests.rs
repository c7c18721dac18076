use clair::lexer::Lexer;
use clair::token::{Token, TokenKind};

fn lex_all(src: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token().expect("lexing should succeed");
        let eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if eof {
            break;
        }
    }
    tokens
}

fn lex_kinds(src: &str) -> Vec<TokenKind> {
    lex_all(src).into_iter().map(|t| t.kind).collect()
}

#[test]
fn tokenizes_variable_declaration() {
    assert_eq!(
        lex_kinds("entier x <- 42;"),
        vec![
            TokenKind::Entier,
            TokenKind::Identifier("x".to_string()),
            TokenKind::Assign,
            TokenKind::Number(42),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keyword_table_is_case_sensitive() {
    assert_eq!(
        lex_kinds("si Si sI"),
        vec![
            TokenKind::Si,
            TokenKind::Identifier("Si".to_string()),
            TokenKind::Identifier("sI".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn recognizes_passing_mode_markers() {
    assert_eq!(
        lex_kinds("d r dr drx"),
        vec![
            TokenKind::D,
            TokenKind::R,
            TokenKind::Dr,
            TokenKind::Identifier("drx".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn greedy_two_character_operators() {
    assert_eq!(
        lex_kinds("<= <- < >= > != ! -> -"),
        vec![
            TokenKind::LessEqual,
            TokenKind::Assign,
            TokenKind::Less,
            TokenKind::GreaterEqual,
            TokenKind::Greater,
            TokenKind::BangEqual,
            TokenKind::Bang,
            TokenKind::Arrow,
            TokenKind::Minus,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn numbers_are_unsigned_digit_runs() {
    // The minus is a separate token; signs belong to the parser.
    assert_eq!(
        lex_kinds("-12"),
        vec![TokenKind::Minus, TokenKind::Number(12), TokenKind::Eof]
    );
}

#[test]
fn string_and_char_literals() {
    assert_eq!(
        lex_kinds("\"bonjour\" 'a'"),
        vec![
            TokenKind::Str("bonjour".to_string()),
            TokenKind::Char('a'),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn line_and_column_point_at_first_character_of_lexeme() {
    let tokens = lex_all("entier x\n  <- 42;");

    let entier = &tokens[0];
    assert_eq!((entier.span.line, entier.span.column), (1, 1));

    let x = &tokens[1];
    assert_eq!((x.span.line, x.span.column), (1, 8));

    let assign = &tokens[2];
    assert_eq!((assign.span.line, assign.span.column), (2, 3));

    let number = &tokens[3];
    assert_eq!((number.span.line, number.span.column), (2, 6));
}

#[test]
fn eof_is_permanent() {
    let mut lexer = Lexer::new("x");
    assert!(matches!(
        lexer.next_token().unwrap().kind,
        TokenKind::Identifier(_)
    ));
    for _ in 0..3 {
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}

#[test]
fn unterminated_string_is_fatal() {
    let mut lexer = Lexer::new("\"abc");
    let err = lexer.next_token().expect_err("should be fatal");
    assert!(err.to_string().contains("unterminated string"));
}

#[test]
fn malformed_character_literal_is_fatal() {
    let mut lexer = Lexer::new("'ab'");
    assert!(lexer.next_token().is_err());
}

#[test]
fn unrecognized_character_is_skipped_with_diagnostic() {
    let mut lexer = Lexer::new("x @ y");
    let mut kinds = Vec::new();
    loop {
        let token = lexer.next_token().expect("lexing should continue");
        let eof = token.kind == TokenKind::Eof;
        kinds.push(token.kind);
        if eof {
            break;
        }
    }

    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier("x".to_string()),
            TokenKind::Identifier("y".to_string()),
            TokenKind::Eof,
        ]
    );

    let diagnostics = lexer.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("unexpected character '@'"));
    assert_eq!((diagnostics[0].line(), diagnostics[0].column()), (1, 3));
}

#[test]
fn out_of_range_integer_yields_zero_with_diagnostic() {
    let mut lexer = Lexer::new("99999999999999999999");
    let token = lexer.next_token().expect("lexing should continue");
    assert_eq!(token.kind, TokenKind::Number(0));

    let diagnostics = lexer.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("out of range"));
}

#[test]
fn single_token_lexemes_round_trip() {
    for src in ["compteur", "1234", "\"texte\"", "'z'", "vrai", "<-"] {
        let first = lex_all(src);
        let relexed = lex_all(src);
        assert_eq!(first, relexed);
        // exactly one token before EOF
        assert_eq!(first.len(), 2, "lexeme {:?}", src);
    }
}

#[test]
fn lexes_end_to_end_loop_example() {
    let src = "entier x <- 0;\npour x <- 1 5 haut faire\n  ecrire(\"boucle\");\nfinfaire\n";
    assert_eq!(
        lex_kinds(src),
        vec![
            TokenKind::Entier,
            TokenKind::Identifier("x".to_string()),
            TokenKind::Assign,
            TokenKind::Number(0),
            TokenKind::Semicolon,
            TokenKind::Pour,
            TokenKind::Identifier("x".to_string()),
            TokenKind::Assign,
            TokenKind::Number(1),
            TokenKind::Number(5),
            TokenKind::Haut,
            TokenKind::Faire,
            TokenKind::Identifier("ecrire".to_string()),
            TokenKind::LParen,
            TokenKind::Str("boucle".to_string()),
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::Finfaire,
            TokenKind::Eof,
        ]
    );
}
