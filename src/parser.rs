use crate::ast::{
    Assignment, BinaryOperator, Block, Declaration, Direction, Expression, ExpressionKind,
    FunctionCall, FunctionDecl, Literal, Parameter, PassingMode, Program, Statement,
    StatementKind, TypeName, UnaryOperator, VariableDecl,
};
use crate::error::{ClairError, Diagnostic, Stage};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Recursive-descent parser over a pull-based lexer.
///
/// A failing production returns `None` and the failure propagates to the
/// enclosing construct; recovery happens only at the top-level declaration
/// loop, which skips one token and resumes. Partial subtrees built before
/// a failure are dropped on the way out.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    diagnostics: Vec<Diagnostic>,
    fatal: Option<ClairError>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let mut parser = Parser {
            lexer,
            current: Token::new(TokenKind::Eof, Span::default()),
            diagnostics: Vec::new(),
            fatal: None,
        };
        parser.advance();
        parser
    }

    /// Parses a whole program. Returns `None` only for fatal lexical
    /// errors (unterminated string/character literal); syntax errors are
    /// recorded as diagnostics and parsing continues with the next
    /// top-level declaration.
    pub fn parse_program(&mut self) -> Option<Program> {
        let mut declarations = Vec::new();

        while !self.at_eof() {
            match self.parse_declaration() {
                Some(decl) => declarations.push(decl),
                None => {
                    if self.fatal.is_some() {
                        break;
                    }
                    // Skip the offending token and try the next declaration.
                    self.advance();
                }
            }
        }

        if self.fatal.is_some() {
            return None;
        }
        Some(Program { declarations })
    }

    /// Syntax diagnostics plus any recoverable lexical diagnostics, in
    /// source order as far as interleaving allows.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        let mut all = self.lexer.take_diagnostics();
        all.append(&mut self.diagnostics);
        all
    }

    /// The fatal lexical error that aborted parsing, if any.
    pub fn take_fatal(&mut self) -> Option<ClairError> {
        self.fatal.take()
    }

    fn parse_declaration(&mut self) -> Option<Declaration> {
        if self.current.kind == TokenKind::Debfonc {
            return self.parse_function_declaration().map(Declaration::Function);
        }
        self.parse_statement().map(Declaration::Statement)
    }

    // debfonc <return-type> <name> ( [params] ) <block> finfonc
    fn parse_function_declaration(&mut self) -> Option<FunctionDecl> {
        let start = self.current.span;
        self.advance(); // debfonc

        let return_type = self.parse_type_name()?;
        let (name, _) = self.expect_identifier("expected function name")?;

        if !self.expect(TokenKind::LParen, "expected '(' after function name") {
            return None;
        }

        let params = self.parse_parameters()?;

        let body = self.parse_block()?;
        let end = self.current.span;
        if !self.expect(TokenKind::Finfonc, "expected 'finfonc' to close function") {
            return None;
        }

        Some(FunctionDecl {
            name,
            params,
            return_type,
            body,
            span: start.join(end),
        })
    }

    fn parse_parameters(&mut self) -> Option<Vec<Parameter>> {
        let mut params = Vec::new();

        if self.current.kind == TokenKind::RParen {
            self.advance();
            return Some(params);
        }

        loop {
            params.push(self.parse_parameter()?);
            if self.current.kind == TokenKind::Comma {
                self.advance();
                continue;
            }
            break;
        }

        if !self.expect(TokenKind::RParen, "expected ')' after parameters") {
            return None;
        }
        Some(params)
    }

    // [d|r|dr] <type> <name>
    fn parse_parameter(&mut self) -> Option<Parameter> {
        let start = self.current.span;

        let mode = match self.current.kind {
            TokenKind::D => {
                self.advance();
                PassingMode::Data
            }
            TokenKind::R => {
                self.advance();
                PassingMode::Result
            }
            TokenKind::Dr => {
                self.advance();
                PassingMode::DataResult
            }
            _ => PassingMode::Data,
        };

        let declared_type = self.parse_type_name()?;
        let (name, end) = self.expect_identifier("expected parameter name")?;

        Some(Parameter {
            name,
            declared_type,
            mode,
            span: start.join(end),
        })
    }

    fn parse_type_name(&mut self) -> Option<TypeName> {
        let ty = match self.current.kind {
            TokenKind::Entier => TypeName::Entier,
            TokenKind::Reel => TypeName::Reel,
            TokenKind::Chaine => TypeName::Chaine,
            TokenKind::Caractere => TypeName::Caractere,
            TokenKind::Booleen => TypeName::Booleen,
            TokenKind::Vide => TypeName::Vide,
            _ => {
                self.error_at_current("expected a type name");
                return None;
            }
        };
        self.advance();
        Some(ty)
    }

    // <type> <name> [<- expression] ;
    fn parse_variable_declaration(&mut self) -> Option<VariableDecl> {
        let start = self.current.span;
        let declared_type = self.parse_type_name()?;
        let (name, name_span) = self.expect_identifier("expected variable name")?;

        let initializer = if self.current.kind == TokenKind::Assign {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };

        let end = initializer.as_ref().map_or(name_span, |e| e.span);
        if !self.expect(TokenKind::Semicolon, "expected ';' after variable declaration") {
            return None;
        }

        Some(VariableDecl {
            name,
            declared_type,
            initializer,
            span: start.join(end),
        })
    }

    /// A block is a statement run ending at one of the closing keywords
    /// (`finfonc`, `finsi`, `sinon`, `finfaire`) or EOF. The terminator is
    /// left for the enclosing construct to consume.
    fn parse_block(&mut self) -> Option<Block> {
        let start = self.current.span;
        let mut statements = Vec::new();

        while !self.at_block_end() {
            statements.push(self.parse_statement()?);
        }

        let span = statements
            .last()
            .map_or(start, |s: &Statement| start.join(s.span));
        Some(Block { statements, span })
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        if self.current.kind.is_type_keyword() {
            let decl = self.parse_variable_declaration()?;
            let span = decl.span;
            return Some(Statement {
                kind: StatementKind::VariableDecl(decl),
                span,
            });
        }

        match self.current.kind {
            TokenKind::Si => self.parse_if_statement(),
            TokenKind::Tantque => self.parse_while_statement(),
            TokenKind::Pour => self.parse_for_statement(),
            TokenKind::Retourner => self.parse_return_statement(),
            TokenKind::Identifier(_) => self.parse_call_or_assignment(),
            _ => {
                self.error_at_current("expected a statement");
                None
            }
        }
    }

    // si <expr> alors <block> [sinon <block>] finsi
    fn parse_if_statement(&mut self) -> Option<Statement> {
        let start = self.current.span;
        self.advance(); // si

        let condition = self.parse_expression()?;
        if !self.expect(TokenKind::Alors, "expected 'alors' after condition") {
            return None;
        }

        let then_branch = self.parse_block()?;

        let else_branch = if self.current.kind == TokenKind::Sinon {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };

        let end = self.current.span;
        if !self.expect(TokenKind::Finsi, "expected 'finsi' to close 'si'") {
            return None;
        }

        Some(Statement {
            kind: StatementKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span: start.join(end),
        })
    }

    // tantque <expr> faire <block> finfaire
    fn parse_while_statement(&mut self) -> Option<Statement> {
        let start = self.current.span;
        self.advance(); // tantque

        let condition = self.parse_expression()?;
        if !self.expect(TokenKind::Faire, "expected 'faire' after condition") {
            return None;
        }

        let body = self.parse_block()?;
        let end = self.current.span;
        if !self.expect(TokenKind::Finfaire, "expected 'finfaire' to close 'tantque'") {
            return None;
        }

        Some(Statement {
            kind: StatementKind::While { condition, body },
            span: start.join(end),
        })
    }

    // pour <ident> <- <expr> <expr> (haut|bas) faire <block> finfaire
    //
    // The second expression is the inclusive bound; it directly follows
    // the initializer with no separating keyword.
    fn parse_for_statement(&mut self) -> Option<Statement> {
        let start = self.current.span;
        self.advance(); // pour

        let (name, name_span) = self.expect_identifier("expected loop variable after 'pour'")?;
        if !self.expect(TokenKind::Assign, "expected '<-' after loop variable") {
            return None;
        }

        let init_value = self.parse_expression()?;
        let init_span = name_span.join(init_value.span);
        let init = Assignment {
            target: Expression {
                kind: ExpressionKind::Variable(name),
                span: name_span,
            },
            value: init_value,
            span: init_span,
        };

        let bound = self.parse_expression()?;

        let direction = match self.current.kind {
            TokenKind::Haut => Direction::Ascending,
            TokenKind::Bas => Direction::Descending,
            _ => {
                self.error_at_current("expected 'haut' or 'bas' in 'pour' loop");
                return None;
            }
        };
        self.advance();

        if !self.expect(TokenKind::Faire, "expected 'faire' in 'pour' loop") {
            return None;
        }

        let body = self.parse_block()?;
        let end = self.current.span;
        if !self.expect(TokenKind::Finfaire, "expected 'finfaire' to close 'pour'") {
            return None;
        }

        Some(Statement {
            kind: StatementKind::For {
                init,
                bound,
                direction,
                body,
            },
            span: start.join(end),
        })
    }

    // retourner [<expr>] ;
    fn parse_return_statement(&mut self) -> Option<Statement> {
        let start = self.current.span;
        self.advance(); // retourner

        let value = if self.current.kind == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let end = self.current.span;
        if !self.expect(TokenKind::Semicolon, "expected ';' after 'retourner'") {
            return None;
        }

        Some(Statement {
            kind: StatementKind::Return { value },
            span: start.join(end),
        })
    }

    // Statements starting with an identifier: a call `f(...)` or an
    // assignment `x <- expr`. `<-` never nests inside expressions.
    fn parse_call_or_assignment(&mut self) -> Option<Statement> {
        let (name, name_span) = self.expect_identifier("expected identifier")?;

        if self.current.kind == TokenKind::LParen {
            let call = self.parse_function_call(name, name_span)?;
            let end = self.current.span;
            if !self.expect(TokenKind::Semicolon, "expected ';' after call") {
                return None;
            }
            let span = name_span.join(end);
            return Some(Statement {
                kind: StatementKind::Call(call),
                span,
            });
        }

        if !self.expect(TokenKind::Assign, "expected '<-' or '(' after identifier") {
            return None;
        }

        let value = self.parse_expression()?;
        let end = self.current.span;
        if !self.expect(TokenKind::Semicolon, "expected ';' after assignment") {
            return None;
        }

        let span = name_span.join(end);
        Some(Statement {
            kind: StatementKind::Assignment(Assignment {
                target: Expression {
                    kind: ExpressionKind::Variable(name),
                    span: name_span,
                },
                value,
                span,
            }),
            span,
        })
    }

    // Precedence ladder, lowest first. `et`/`ou` deliberately sit at the
    // factor/term tiers alongside `*` and `+`.
    fn parse_expression(&mut self) -> Option<Expression> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> Option<Expression> {
        let mut left = self.parse_comparison()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::Equal => BinaryOperator::Equal,
                TokenKind::BangEqual => BinaryOperator::NotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = binary(left, operator, right);
        }

        Some(left)
    }

    fn parse_comparison(&mut self) -> Option<Expression> {
        let mut left = self.parse_term()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::Less => BinaryOperator::Less,
                TokenKind::LessEqual => BinaryOperator::LessEqual,
                TokenKind::Greater => BinaryOperator::Greater,
                TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(left, operator, right);
        }

        Some(left)
    }

    fn parse_term(&mut self) -> Option<Expression> {
        let mut left = self.parse_factor()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::Plus => BinaryOperator::Plus,
                TokenKind::Minus => BinaryOperator::Minus,
                TokenKind::Ou => BinaryOperator::Ou,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = binary(left, operator, right);
        }

        Some(left)
    }

    fn parse_factor(&mut self) -> Option<Expression> {
        let mut left = self.parse_unary()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::Star => BinaryOperator::Star,
                TokenKind::Slash => BinaryOperator::Slash,
                TokenKind::Mod => BinaryOperator::Mod,
                TokenKind::Div => BinaryOperator::Div,
                TokenKind::Et => BinaryOperator::Et,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(left, operator, right);
        }

        Some(left)
    }

    fn parse_unary(&mut self) -> Option<Expression> {
        let operator = match self.current.kind {
            TokenKind::Minus => UnaryOperator::Neg,
            TokenKind::Non | TokenKind::Bang => UnaryOperator::Non,
            _ => return self.parse_postfix(),
        };

        let start = self.current.span;
        self.advance();
        let operand = self.parse_unary()?;
        let span = start.join(operand.span);
        Some(Expression {
            kind: ExpressionKind::Unary {
                operator,
                operand: Box::new(operand),
            },
            span,
        })
    }

    // Postfix `[index]` and `.field` on a primary. Parsed for the
    // array/struct surface; the evaluator does not support them yet.
    fn parse_postfix(&mut self) -> Option<Expression> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current.kind {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    let end = self.current.span;
                    if !self.expect(TokenKind::RBracket, "expected ']' after index") {
                        return None;
                    }
                    let span = expr.span.join(end);
                    expr = Expression {
                        kind: ExpressionKind::ArrayAccess {
                            array: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    };
                }
                TokenKind::Dot => {
                    self.advance();
                    let (field, end) = self.expect_identifier("expected field name after '.'")?;
                    let span = expr.span.join(end);
                    expr = Expression {
                        kind: ExpressionKind::StructAccess {
                            structure: Box::new(expr),
                            field,
                        },
                        span,
                    };
                }
                _ => break,
            }
        }

        Some(expr)
    }

    fn parse_primary(&mut self) -> Option<Expression> {
        let span = self.current.span;

        let kind = match &self.current.kind {
            TokenKind::Number(n) => ExpressionKind::Literal(Literal::Int(*n)),
            TokenKind::Str(s) => ExpressionKind::Literal(Literal::Str(s.clone())),
            TokenKind::Char(c) => ExpressionKind::Literal(Literal::Char(*c)),
            TokenKind::Vrai => ExpressionKind::Literal(Literal::Bool(true)),
            TokenKind::Faux => ExpressionKind::Literal(Literal::Bool(false)),
            // nil reads as the integer zero.
            TokenKind::Nil => ExpressionKind::Literal(Literal::Int(0)),
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                if self.current.kind == TokenKind::LParen {
                    let call = self.parse_function_call(name, span)?;
                    let span = call.span;
                    return Some(Expression {
                        kind: ExpressionKind::Call(call),
                        span,
                    });
                }
                return Some(Expression {
                    kind: ExpressionKind::Variable(name),
                    span,
                });
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                if !self.expect(TokenKind::RParen, "expected ')'") {
                    return None;
                }
                return Some(expr);
            }
            other => {
                let message = format!("unexpected token '{}' in expression", other);
                self.error_at_current(&message);
                return None;
            }
        };

        self.advance();
        Some(Expression { kind, span })
    }

    // <name> ( [expr {, expr}] ) — the name token is already consumed.
    fn parse_function_call(&mut self, name: String, name_span: Span) -> Option<FunctionCall> {
        if !self.expect(TokenKind::LParen, "expected '('") {
            return None;
        }

        let mut arguments = Vec::new();
        if self.current.kind != TokenKind::RParen {
            loop {
                arguments.push(self.parse_expression()?);
                if self.current.kind == TokenKind::Comma {
                    self.advance();
                    continue;
                }
                break;
            }
        }

        let end = self.current.span;
        if !self.expect(TokenKind::RParen, "expected ')' after arguments") {
            return None;
        }

        Some(FunctionCall {
            name,
            arguments,
            span: name_span.join(end),
        })
    }

    fn advance(&mut self) {
        if self.fatal.is_some() {
            self.current = Token::new(TokenKind::Eof, self.current.span);
            return;
        }
        match self.lexer.next_token() {
            Ok(token) => self.current = token,
            Err(err) => {
                // Fatal lexical error: no usable token stream past this
                // point, so parsing winds down through EOF.
                self.fatal = Some(err);
                self.current = Token::new(TokenKind::Eof, self.current.span);
            }
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.current.kind == kind {
            self.advance();
            true
        } else {
            self.error_at_current(message);
            false
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Option<(String, Span)> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            let span = self.current.span;
            self.advance();
            Some((name, span))
        } else {
            self.error_at_current(message);
            None
        }
    }

    fn error_at_current(&mut self, message: &str) {
        self.diagnostics
            .push(Diagnostic::new(Stage::Parse, message, self.current.span));
    }

    fn at_eof(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    fn at_block_end(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Finfonc
                | TokenKind::Finsi
                | TokenKind::Sinon
                | TokenKind::Finfaire
                | TokenKind::Eof
        )
    }
}

fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Expression {
    let span = left.span.join(right.span);
    Expression {
        kind: ExpressionKind::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        },
        span,
    }
}
