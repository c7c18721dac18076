use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use crate::ast::{
    Assignment, BinaryOperator, Block, Declaration, Direction, Expression, ExpressionKind,
    FunctionCall, FunctionDecl, Literal, PassingMode, Program, Statement, StatementKind,
    UnaryOperator,
};
use crate::environment::Environment;
use crate::error::{Diagnostic, Stage};
use crate::span::Span;
use crate::value::Value;

/// How control leaves a statement: either it ran to completion or a
/// `retourner` fired somewhere inside it. The `Returned` signal is
/// threaded through every block and loop, which stop executing further
/// statements as soon as they see it.
#[derive(Debug, Clone, PartialEq)]
enum Flow {
    Normal,
    Returned(Value),
}

/// Tree-walking evaluator.
///
/// Runtime faults (division by zero, unbound variables, bad assignment
/// targets, undefined functions) are advisory: each one is recorded as a
/// diagnostic, the offending expression yields 0, and the run continues.
/// `ecrire` output goes to the supplied sink.
pub struct Interpreter<W> {
    globals: Environment,
    functions: HashMap<String, Rc<FunctionDecl>>,
    diagnostics: Vec<Diagnostic>,
    out: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Interpreter::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W) -> Self {
        Interpreter {
            globals: Environment::new(),
            functions: HashMap::new(),
            diagnostics: Vec::new(),
            out,
        }
    }

    /// Executes the program's top-level items in order. A `retourner`
    /// reaching the top level stops execution of the remaining items.
    pub fn run(&mut self, program: &Program) {
        for decl in &program.declarations {
            match decl {
                Declaration::Function(func) => {
                    self.functions
                        .insert(func.name.clone(), Rc::new(func.clone()));
                }
                Declaration::Statement(stmt) => {
                    let env = self.globals.clone();
                    if let Flow::Returned(_) = self.exec_statement(stmt, &env) {
                        break;
                    }
                }
            }
        }
    }

    /// Runtime diagnostics accumulated so far, in execution order.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// The global (program-level) scope; useful for inspecting final
    /// variable values after a run.
    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn exec_statement(&mut self, stmt: &Statement, env: &Environment) -> Flow {
        match &stmt.kind {
            StatementKind::VariableDecl(decl) => {
                let value = match &decl.initializer {
                    Some(init) => self.eval_expression(init, env),
                    None => Value::Int(0),
                };
                // An explicit declaration always binds in the current
                // scope, shadowing any outer binding of the same name.
                env.define(decl.name.clone(), value);
                Flow::Normal
            }
            StatementKind::Assignment(assign) => {
                self.exec_assignment(assign, env);
                Flow::Normal
            }
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expression(condition, env).is_truthy() {
                    self.exec_block(then_branch, env)
                } else if let Some(alt) = else_branch {
                    self.exec_block(alt, env)
                } else {
                    Flow::Normal
                }
            }
            StatementKind::While { condition, body } => {
                while self.eval_expression(condition, env).is_truthy() {
                    if let Flow::Returned(value) = self.exec_block(body, env) {
                        return Flow::Returned(value);
                    }
                }
                Flow::Normal
            }
            StatementKind::For {
                init,
                bound,
                direction,
                body,
            } => self.exec_for(init, bound, *direction, body, env, stmt.span),
            StatementKind::Return { value } => {
                let result = match value {
                    Some(expr) => self.eval_expression(expr, env),
                    None => Value::Int(0),
                };
                Flow::Returned(result)
            }
            StatementKind::Call(call) => {
                self.eval_call(call, env);
                Flow::Normal
            }
        }
    }

    /// Runs a block in a fresh child scope; bindings introduced inside are
    /// discarded when the block finishes.
    fn exec_block(&mut self, block: &Block, env: &Environment) -> Flow {
        let child = Environment::new_enclosed(env.clone());
        for stmt in &block.statements {
            if let Flow::Returned(value) = self.exec_statement(stmt, &child) {
                return Flow::Returned(value);
            }
        }
        Flow::Normal
    }

    fn exec_assignment(&mut self, assign: &Assignment, env: &Environment) {
        let value = self.eval_expression(&assign.value, env);
        match &assign.target.kind {
            ExpressionKind::Variable(name) => env.set(name, value),
            _ => self.report("assignment target is not a variable", assign.target.span),
        }
    }

    // check against the inclusive bound -> execute body -> apply the
    // implicit ±1 step. The bound is re-evaluated every iteration.
    fn exec_for(
        &mut self,
        init: &Assignment,
        bound: &Expression,
        direction: Direction,
        body: &Block,
        env: &Environment,
        span: Span,
    ) -> Flow {
        let loop_env = Environment::new_enclosed(env.clone());
        self.exec_assignment(init, &loop_env);

        let ExpressionKind::Variable(loop_var) = &init.target.kind else {
            // The parser only builds variable targets here.
            self.report("loop variable is not a variable", init.target.span);
            return Flow::Normal;
        };

        loop {
            let Some(current) = loop_env.get(loop_var) else {
                self.report(format!("undefined variable '{}'", loop_var), span);
                break;
            };
            let current = current.as_int();
            let limit = self.eval_expression(bound, &loop_env).as_int();
            let in_range = match direction {
                Direction::Ascending => current <= limit,
                Direction::Descending => current >= limit,
            };
            if !in_range {
                break;
            }

            if let Flow::Returned(value) = self.exec_block(body, &loop_env) {
                return Flow::Returned(value);
            }

            let step = match direction {
                Direction::Ascending => 1,
                Direction::Descending => -1,
            };
            // The body may have reassigned the counter; step from its
            // latest value.
            let latest = loop_env.get(loop_var).map_or(current, |v| v.as_int());
            loop_env.set(loop_var, Value::Int(latest.wrapping_add(step)));
        }

        Flow::Normal
    }

    fn eval_expression(&mut self, expr: &Expression, env: &Environment) -> Value {
        match &expr.kind {
            ExpressionKind::Literal(lit) => match lit {
                Literal::Int(n) => Value::Int(*n),
                Literal::Float(x) => Value::Float(*x),
                Literal::Str(s) => Value::Str(s.clone()),
                Literal::Char(c) => Value::Char(*c),
                Literal::Bool(b) => Value::Bool(*b),
            },
            ExpressionKind::Variable(name) => match env.get(name) {
                Some(value) => value,
                None => {
                    self.report(format!("undefined variable '{}'", name), expr.span);
                    Value::Int(0)
                }
            },
            ExpressionKind::Unary { operator, operand } => {
                let value = self.eval_expression(operand, env).as_int();
                match operator {
                    UnaryOperator::Neg => Value::Int(-value),
                    UnaryOperator::Non => Value::Int(i64::from(value == 0)),
                }
            }
            ExpressionKind::Binary {
                left,
                operator,
                right,
            } => {
                // Left operand first, always; `et`/`ou` do not short-circuit.
                let lhs = self.eval_expression(left, env).as_int();
                let rhs = self.eval_expression(right, env).as_int();
                self.eval_binary(*operator, lhs, rhs, expr.span)
            }
            ExpressionKind::Call(call) => self.eval_call(call, env),
            ExpressionKind::ArrayAccess { .. } => {
                self.report("array access is not supported", expr.span);
                Value::Int(0)
            }
            ExpressionKind::StructAccess { .. } => {
                self.report("structure access is not supported", expr.span);
                Value::Int(0)
            }
        }
    }

    fn eval_binary(&mut self, operator: BinaryOperator, lhs: i64, rhs: i64, span: Span) -> Value {
        let result = match operator {
            BinaryOperator::Plus => lhs.wrapping_add(rhs),
            BinaryOperator::Minus => lhs.wrapping_sub(rhs),
            BinaryOperator::Star => lhs.wrapping_mul(rhs),
            BinaryOperator::Slash | BinaryOperator::Div => {
                if rhs == 0 {
                    self.report("division by zero", span);
                    0
                } else {
                    lhs / rhs
                }
            }
            BinaryOperator::Mod => {
                if rhs == 0 {
                    self.report("division by zero", span);
                    0
                } else {
                    lhs % rhs
                }
            }
            BinaryOperator::Et => i64::from(lhs != 0 && rhs != 0),
            BinaryOperator::Ou => i64::from(lhs != 0 || rhs != 0),
            BinaryOperator::Equal => i64::from(lhs == rhs),
            BinaryOperator::NotEqual => i64::from(lhs != rhs),
            BinaryOperator::Less => i64::from(lhs < rhs),
            BinaryOperator::LessEqual => i64::from(lhs <= rhs),
            BinaryOperator::Greater => i64::from(lhs > rhs),
            BinaryOperator::GreaterEqual => i64::from(lhs >= rhs),
        };
        Value::Int(result)
    }

    fn eval_call(&mut self, call: &FunctionCall, env: &Environment) -> Value {
        if call.name == "ecrire" {
            return self.call_ecrire(call, env);
        }

        let Some(func) = self.functions.get(&call.name).cloned() else {
            self.report(format!("call to undefined function '{}'", call.name), call.span);
            return Value::Int(0);
        };

        if call.arguments.len() != func.params.len() {
            self.report(
                format!(
                    "function '{}' expects {} argument(s), got {}",
                    call.name,
                    func.params.len(),
                    call.arguments.len()
                ),
                call.span,
            );
            return Value::Int(0);
        }

        // One fresh scope per call, chained to the globals; the language
        // has no closures.
        let call_env = Environment::new_enclosed(self.globals.clone());
        for (param, arg) in func.params.iter().zip(&call.arguments) {
            let value = match param.mode {
                PassingMode::Data | PassingMode::DataResult => self.eval_expression(arg, env),
                PassingMode::Result => Value::Int(0),
            };
            call_env.define(param.name.clone(), value);
        }

        let result = match self.exec_block(&func.body, &call_env) {
            Flow::Returned(value) => value,
            Flow::Normal => Value::Int(0),
        };

        // Copy-out for `r` and `dr` parameters: the callee's final value
        // lands back in the caller's argument variable.
        for (param, arg) in func.params.iter().zip(&call.arguments) {
            if !matches!(param.mode, PassingMode::Result | PassingMode::DataResult) {
                continue;
            }
            let Some(final_value) = call_env.get(&param.name) else {
                continue;
            };
            match &arg.kind {
                ExpressionKind::Variable(name) => env.set(name, final_value),
                _ => self.report(
                    format!(
                        "parameter '{}' of '{}' requires a variable argument",
                        param.name, call.name
                    ),
                    arg.span,
                ),
            }
        }

        result
    }

    fn call_ecrire(&mut self, call: &FunctionCall, env: &Environment) -> Value {
        if call.arguments.len() != 1 {
            self.report(
                format!("'ecrire' expects 1 argument, got {}", call.arguments.len()),
                call.span,
            );
            return Value::Int(0);
        }

        let value = self.eval_expression(&call.arguments[0], env);
        let _ = writeln!(self.out, "{}", value);
        Value::Int(0)
    }

    fn report(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::new(Stage::Runtime, message, span));
    }
}
