use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Identifier(String),
    Number(i64),
    Str(String),
    Char(char),

    // Structural keywords
    Debfonc,
    Finfonc,
    Faire,
    Finfaire,
    Si,
    Alors,
    Sinon,
    Finsi,
    Tantque,
    Pour,
    Haut,
    Bas,
    Retourner,
    Structure,
    Type,

    // Type keywords
    Vide,
    Chaine,
    Caractere,
    Entier,
    Reel,
    Booleen,

    // Literal keywords
    Vrai,
    Faux,
    Nil,

    // Word operators
    Et,
    Ou,
    Non,
    Div,
    Mod,

    // Parameter passing modes
    D,
    R,
    Dr,

    // Operators
    Assign, // <-
    Equal,  // = (equality, not assignment)
    BangEqual,
    Bang,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Arrow, // ->
    Plus,
    Minus,
    Star,
    Slash,

    // Delimiters
    Dot,
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,

    Eof,
}

/// Reserved-word table. Case-sensitive, exact match; anything else is a
/// plain identifier.
pub fn keyword_kind(ident: &str) -> Option<TokenKind> {
    let kind = match ident {
        "debfonc" => TokenKind::Debfonc,
        "finfonc" => TokenKind::Finfonc,
        "faire" => TokenKind::Faire,
        "finfaire" => TokenKind::Finfaire,
        "si" => TokenKind::Si,
        "alors" => TokenKind::Alors,
        "sinon" => TokenKind::Sinon,
        "finsi" => TokenKind::Finsi,
        "tantque" => TokenKind::Tantque,
        "pour" => TokenKind::Pour,
        "haut" => TokenKind::Haut,
        "bas" => TokenKind::Bas,
        "et" => TokenKind::Et,
        "ou" => TokenKind::Ou,
        "non" => TokenKind::Non,
        "div" => TokenKind::Div,
        "mod" => TokenKind::Mod,
        "retourner" => TokenKind::Retourner,
        "structure" => TokenKind::Structure,
        "type" => TokenKind::Type,
        "vide" => TokenKind::Vide,
        "chaine" => TokenKind::Chaine,
        "caractere" => TokenKind::Caractere,
        "entier" => TokenKind::Entier,
        "reel" => TokenKind::Reel,
        "booleen" => TokenKind::Booleen,
        "vrai" => TokenKind::Vrai,
        "faux" => TokenKind::Faux,
        "nil" => TokenKind::Nil,
        "d" => TokenKind::D,
        "r" => TokenKind::R,
        "dr" => TokenKind::Dr,
        _ => return None,
    };
    Some(kind)
}

impl TokenKind {
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Entier
                | TokenKind::Reel
                | TokenKind::Chaine
                | TokenKind::Caractere
                | TokenKind::Booleen
                | TokenKind::Vide
        )
    }

    pub fn is_passing_mode(&self) -> bool {
        matches!(self, TokenKind::D | TokenKind::R | TokenKind::Dr)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "{}", name),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Str(s) => write!(f, "\"{}\"", s),
            TokenKind::Char(c) => write!(f, "'{}'", c),
            TokenKind::Debfonc => write!(f, "debfonc"),
            TokenKind::Finfonc => write!(f, "finfonc"),
            TokenKind::Faire => write!(f, "faire"),
            TokenKind::Finfaire => write!(f, "finfaire"),
            TokenKind::Si => write!(f, "si"),
            TokenKind::Alors => write!(f, "alors"),
            TokenKind::Sinon => write!(f, "sinon"),
            TokenKind::Finsi => write!(f, "finsi"),
            TokenKind::Tantque => write!(f, "tantque"),
            TokenKind::Pour => write!(f, "pour"),
            TokenKind::Haut => write!(f, "haut"),
            TokenKind::Bas => write!(f, "bas"),
            TokenKind::Retourner => write!(f, "retourner"),
            TokenKind::Structure => write!(f, "structure"),
            TokenKind::Type => write!(f, "type"),
            TokenKind::Vide => write!(f, "vide"),
            TokenKind::Chaine => write!(f, "chaine"),
            TokenKind::Caractere => write!(f, "caractere"),
            TokenKind::Entier => write!(f, "entier"),
            TokenKind::Reel => write!(f, "reel"),
            TokenKind::Booleen => write!(f, "booleen"),
            TokenKind::Vrai => write!(f, "vrai"),
            TokenKind::Faux => write!(f, "faux"),
            TokenKind::Nil => write!(f, "nil"),
            TokenKind::Et => write!(f, "et"),
            TokenKind::Ou => write!(f, "ou"),
            TokenKind::Non => write!(f, "non"),
            TokenKind::Div => write!(f, "div"),
            TokenKind::Mod => write!(f, "mod"),
            TokenKind::D => write!(f, "d"),
            TokenKind::R => write!(f, "r"),
            TokenKind::Dr => write!(f, "dr"),
            TokenKind::Assign => write!(f, "<-"),
            TokenKind::Equal => write!(f, "="),
            TokenKind::BangEqual => write!(f, "!="),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Less => write!(f, "<"),
            TokenKind::LessEqual => write!(f, "<="),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::GreaterEqual => write!(f, ">="),
            TokenKind::Arrow => write!(f, "->"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}
