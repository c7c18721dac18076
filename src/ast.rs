use std::fmt;

use crate::span::Span;

/// Root node. Top-level items are function declarations and ordinary
/// statements (variable declarations included), executed in order by the
/// interpreter.
#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Declaration {
    Function(FunctionDecl),
    Statement(Statement),
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: TypeName,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Parameter {
    pub name: String,
    pub declared_type: TypeName,
    pub mode: PassingMode,
    pub span: Span,
}

/// `d` (copy-in, the default), `r` (copy-out), `dr` (copy-in/copy-out).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PassingMode {
    Data,
    Result,
    DataResult,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TypeName {
    Entier,
    Reel,
    Chaine,
    Caractere,
    Booleen,
    Vide,
}

#[derive(Debug, PartialEq, Clone)]
pub struct VariableDecl {
    pub name: String,
    pub declared_type: TypeName,
    pub initializer: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub enum StatementKind {
    VariableDecl(VariableDecl),
    Assignment(Assignment),
    If {
        condition: Expression,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    While {
        condition: Expression,
        body: Block,
    },
    For {
        init: Assignment,
        /// Inclusive loop bound; the loop runs while the counter has not
        /// passed it in the loop's direction.
        bound: Expression,
        direction: Direction,
        body: Block,
    },
    Return {
        value: Option<Expression>,
    },
    Call(FunctionCall),
}

/// `<-` is a statement, never an expression; `=` inside expressions is
/// equality. The target must resolve to a variable at run time.
#[derive(Debug, PartialEq, Clone)]
pub struct Assignment {
    pub target: Expression,
    pub value: Expression,
    pub span: Span,
}

/// Loop direction marker (`haut` counts up, `bas` counts down); fixes the
/// implicit ±1 step of a `pour` loop.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExpressionKind {
    Binary {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Call(FunctionCall),
    Variable(String),
    Literal(Literal),
    // Parsed but not evaluated; kept for the array/struct extensions.
    ArrayAccess {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    StructAccess {
        structure: Box<Expression>,
        field: String,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
    Bool(bool),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Star,
    Slash,
    Div,
    Mod,
    Et,
    Ou,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Neg,
    Non,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Star => "*",
            BinaryOperator::Slash => "/",
            BinaryOperator::Div => "div",
            BinaryOperator::Mod => "mod",
            BinaryOperator::Et => "et",
            BinaryOperator::Ou => "ou",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Neg => write!(f, "-"),
            UnaryOperator::Non => write!(f, "non"),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeName::Entier => "entier",
            TypeName::Reel => "reel",
            TypeName::Chaine => "chaine",
            TypeName::Caractere => "caractere",
            TypeName::Booleen => "booleen",
            TypeName::Vide => "vide",
        };
        write!(f, "{}", s)
    }
}

impl Program {
    /// Indented tree dump, a debugging aid for the driver's `--ast` flag.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        out.push_str("Program\n");
        for decl in &self.declarations {
            match decl {
                Declaration::Function(func) => dump_function(func, 1, &mut out),
                Declaration::Statement(stmt) => dump_statement(stmt, 1, &mut out),
            }
        }
        out
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn dump_function(func: &FunctionDecl, depth: usize, out: &mut String) {
    indent(depth, out);
    out.push_str(&format!(
        "FunctionDecl {} -> {}\n",
        func.name, func.return_type
    ));
    for param in &func.params {
        indent(depth + 1, out);
        out.push_str(&format!(
            "Parameter {} : {} ({:?})\n",
            param.name, param.declared_type, param.mode
        ));
    }
    dump_block(&func.body, depth + 1, out);
}

fn dump_variable_decl(var: &VariableDecl, depth: usize, out: &mut String) {
    indent(depth, out);
    out.push_str(&format!("VariableDecl {} : {}\n", var.name, var.declared_type));
    if let Some(init) = &var.initializer {
        dump_expression(init, depth + 1, out);
    }
}

fn dump_block(block: &Block, depth: usize, out: &mut String) {
    indent(depth, out);
    out.push_str("Block\n");
    for stmt in &block.statements {
        dump_statement(stmt, depth + 1, out);
    }
}

fn dump_statement(stmt: &Statement, depth: usize, out: &mut String) {
    match &stmt.kind {
        StatementKind::VariableDecl(var) => dump_variable_decl(var, depth, out),
        StatementKind::Assignment(assign) => {
            indent(depth, out);
            out.push_str("Assignment\n");
            dump_expression(&assign.target, depth + 1, out);
            dump_expression(&assign.value, depth + 1, out);
        }
        StatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            indent(depth, out);
            out.push_str("If\n");
            dump_expression(condition, depth + 1, out);
            dump_block(then_branch, depth + 1, out);
            if let Some(alt) = else_branch {
                dump_block(alt, depth + 1, out);
            }
        }
        StatementKind::While { condition, body } => {
            indent(depth, out);
            out.push_str("While\n");
            dump_expression(condition, depth + 1, out);
            dump_block(body, depth + 1, out);
        }
        StatementKind::For {
            init,
            bound,
            direction,
            body,
        } => {
            indent(depth, out);
            out.push_str(&format!("For ({:?})\n", direction));
            dump_expression(&init.target, depth + 1, out);
            dump_expression(&init.value, depth + 1, out);
            dump_expression(bound, depth + 1, out);
            dump_block(body, depth + 1, out);
        }
        StatementKind::Return { value } => {
            indent(depth, out);
            out.push_str("Return\n");
            if let Some(expr) = value {
                dump_expression(expr, depth + 1, out);
            }
        }
        StatementKind::Call(call) => dump_call(call, depth, out),
    }
}

fn dump_call(call: &FunctionCall, depth: usize, out: &mut String) {
    indent(depth, out);
    out.push_str(&format!("Call {}\n", call.name));
    for arg in &call.arguments {
        dump_expression(arg, depth + 1, out);
    }
}

fn dump_expression(expr: &Expression, depth: usize, out: &mut String) {
    match &expr.kind {
        ExpressionKind::Binary {
            left,
            operator,
            right,
        } => {
            indent(depth, out);
            out.push_str(&format!("Binary {}\n", operator));
            dump_expression(left, depth + 1, out);
            dump_expression(right, depth + 1, out);
        }
        ExpressionKind::Unary { operator, operand } => {
            indent(depth, out);
            out.push_str(&format!("Unary {}\n", operator));
            dump_expression(operand, depth + 1, out);
        }
        ExpressionKind::Call(call) => dump_call(call, depth, out),
        ExpressionKind::Variable(name) => {
            indent(depth, out);
            out.push_str(&format!("Variable {}\n", name));
        }
        ExpressionKind::Literal(lit) => {
            indent(depth, out);
            out.push_str(&format!("Literal {:?}\n", lit));
        }
        ExpressionKind::ArrayAccess { array, index } => {
            indent(depth, out);
            out.push_str("ArrayAccess\n");
            dump_expression(array, depth + 1, out);
            dump_expression(index, depth + 1, out);
        }
        ExpressionKind::StructAccess { structure, field } => {
            indent(depth, out);
            out.push_str(&format!("StructAccess .{}\n", field));
            dump_expression(structure, depth + 1, out);
        }
    }
}
