//! Core expression and statement evaluator.

use crate::builtins::Builtin;
use crate::config::EvalConfig;
use crate::consent::{AutoGrant, ConsentPolicy};
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::ops;
use crate::output::Output;
use crate::value::Value;
use std::collections::BTreeMap;
use std::rc::Rc;
use woke_types::ast::*;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Carry on with the next statement.
    Continue,
    /// `give back` was reached; unwind to the enclosing function call.
    Return(Value),
}

/// Walks a [`Program`] and executes it.
pub struct Evaluator {
    env: Environment,
    functions: BTreeMap<String, Rc<FunctionDecl>>,
    workers: Vec<String>,
    out: Output,
    consent: Box<dyn ConsentPolicy>,
    config: EvalConfig,
    /// Number of user function calls currently in progress.
    depth: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            env: Environment::new(),
            functions: BTreeMap::new(),
            workers: Vec::new(),
            out: Output::new(config.echo),
            consent: Box::new(AutoGrant),
            config,
            depth: 0,
        }
    }

    /// Replace the policy consulted by `only if okay` blocks.
    pub fn with_consent_policy(mut self, policy: impl ConsentPolicy + 'static) -> Self {
        self.consent = Box::new(policy);
        self
    }

    /// Every line printed so far.
    pub fn output(&self) -> &[String] {
        self.out.lines()
    }

    pub fn gratitude(&self) -> &[(String, String)] {
        self.env.gratitude()
    }

    /// Names of registered workers and side quests, in declaration order.
    pub fn workers(&self) -> &[String] {
        &self.workers
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program
    // ══════════════════════════════════════════════════════════════════════

    /// Register every item, then call `main` if there is one.
    ///
    /// Returns what `main` gives back, or `Unit` when the program has no
    /// `main`.
    pub fn run(&mut self, program: &Program) -> EvalResult<Value> {
        for item in &program.items {
            self.register_item(item)?;
        }

        match self.functions.get("main").cloned() {
            Some(main) => self.call_function(main, Vec::new()),
            None => {
                tracing::debug!("no main function; nothing to run");
                Ok(Value::Unit)
            }
        }
    }

    fn register_item(&mut self, item: &Item) -> EvalResult<()> {
        match item {
            Item::Function(decl) => {
                self.functions
                    .insert(decl.name.name.clone(), Rc::new(decl.clone()));
            }
            Item::Gratitude(block) => {
                for entry in &block.entries {
                    let contributor = unescape(&entry.contributor);
                    let contribution = unescape(&entry.contribution);
                    self.out
                        .emit(format!("Thanks to {contributor} for {contribution}"));
                    self.env.record_gratitude(&contributor, &contribution);
                }
            }
            Item::Worker(worker) => {
                let label = match worker.kind {
                    WorkerKind::Worker => "worker",
                    WorkerKind::SideQuest => "side quest",
                };
                self.out
                    .emit(format!("Registered {label}: {}", worker.name.name));
                self.workers.push(worker.name.name.clone());
            }
            Item::Const(decl) => {
                let value = self.eval_expr(&decl.value)?;
                self.env.define(&decl.name.name, value);
            }
        }
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::IntLit(n) => Ok(Value::Int(*n)),
            ExprKind::FloatLit(n) => Ok(Value::Float(*n)),
            ExprKind::StringLit(s) => Ok(Value::String(unescape(s))),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::Identifier(name) => self.eval_identifier(name),
            ExprKind::ArrayLit(elems) => {
                let items = elems
                    .iter()
                    .map(|e| self.eval_expr(e))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::Array(items))
            }
            ExprKind::Call { name, args } => self.eval_call(&name.name, args),
            ExprKind::Binary { left, op, right } => {
                let lv = self.eval_expr(left)?;
                let rv = self.eval_expr(right)?;
                ops::binary(*op, lv, rv)
            }
            ExprKind::Unary { op, operand } => {
                let val = self.eval_expr(operand)?;
                ops::unary(*op, val)
            }
            ExprKind::Measured { value, unit } => {
                Ok(self.eval_expr(value)?.measured(unit.name.as_str()))
            }
            ExprKind::Thanks(who) => Ok(Value::Thanks(unescape(who))),
        }
    }

    fn eval_identifier(&self, name: &str) -> EvalResult<Value> {
        if let Some(value) = self.env.get(name) {
            return Ok(value.clone());
        }
        match self.functions.get(name) {
            Some(decl) => Ok(Value::Function(Rc::clone(decl))),
            None => Err(EvalError::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }

    /// Builtins win, then a variable holding a function, then a declared
    /// function.
    fn eval_call(&mut self, name: &str, args: &[Expr]) -> EvalResult<Value> {
        let args = args
            .iter()
            .map(|a| self.eval_expr(a))
            .collect::<EvalResult<Vec<_>>>()?;

        if let Some(builtin) = Builtin::from_name(name) {
            return builtin.call(args, &mut self.out);
        }
        if let Some(Value::Function(decl)) = self.env.get(name) {
            let decl = Rc::clone(decl);
            return self.call_function(decl, args);
        }
        match self.functions.get(name).cloned() {
            Some(decl) => self.call_function(decl, args),
            None => Err(EvalError::UndefinedFunction {
                name: name.to_string(),
            }),
        }
    }

    /// Invoke a user function.
    ///
    /// The callee's scope sits directly on top of the caller's, so the
    /// caller's bindings stay visible inside the body.
    pub fn call_function(&mut self, decl: Rc<FunctionDecl>, args: Vec<Value>) -> EvalResult<Value> {
        let name = decl.name.name.as_str();
        if args.len() != decl.params.len() {
            return Err(EvalError::ArityMismatch {
                name: name.to_string(),
                expected: decl.params.len(),
                got: args.len(),
            });
        }
        if self.depth >= self.config.max_call_depth {
            return Err(EvalError::StackOverflow {
                limit: self.config.max_call_depth,
            });
        }

        tracing::debug!(function = name, depth = self.depth, "call");
        self.env.push_scope();
        self.depth += 1;
        let result = self.run_body(&decl, args);
        self.depth -= 1;
        self.env.pop_scope();

        let value = result?;
        if let Some(goodbye) = &decl.goodbye {
            self.out.emit(format!("[{name}] {}", unescape(goodbye)));
        }
        Ok(value)
    }

    fn run_body(&mut self, decl: &FunctionDecl, args: Vec<Value>) -> EvalResult<Value> {
        for (param, arg) in decl.params.iter().zip(args) {
            self.env.define(&param.name.name, arg);
        }
        if let Some(hello) = &decl.hello {
            self.out
                .emit(format!("[{}] {}", decl.name.name, unescape(hello)));
        }
        match self.exec_stmts(&decl.body.stmts)? {
            Flow::Return(value) => Ok(value),
            Flow::Continue => Ok(Value::Unit),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statement execution
    // ══════════════════════════════════════════════════════════════════════

    /// Run statements in the current scope, stopping at the first `give back`.
    pub fn exec_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Continue)
    }

    /// Run a block in a fresh child scope. The scope is popped on every path.
    fn exec_scoped(&mut self, block: &Block) -> EvalResult<Flow> {
        self.env.push_scope();
        let flow = self.exec_stmts(&block.stmts);
        self.env.pop_scope();
        flow
    }

    pub fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match &stmt.kind {
            StmtKind::Remember { name, value, unit } => {
                let mut val = self.eval_expr(value)?;
                if let Some(unit) = unit {
                    val = val.measured(unit.name.as_str());
                }
                self.env.define(&name.name, val);
                Ok(Flow::Continue)
            }
            StmtKind::Assign { name, value } => {
                let val = self.eval_expr(value)?;
                if !self.env.set(&name.name, val) {
                    return Err(EvalError::UndefinedVariable {
                        name: name.name.clone(),
                    });
                }
                Ok(Flow::Continue)
            }
            StmtKind::GiveBack(expr) => Ok(Flow::Return(self.eval_expr(expr)?)),
            StmtKind::When {
                condition,
                then_block,
                otherwise_block,
            } => {
                if self.eval_expr(condition)?.is_truthy() {
                    self.exec_scoped(then_block)
                } else if let Some(otherwise) = otherwise_block {
                    self.exec_scoped(otherwise)
                } else {
                    Ok(Flow::Continue)
                }
            }
            StmtKind::Repeat { count, body } => {
                let times = ops::repeat_count(&self.eval_expr(count)?)?;
                for _ in 0..times.max(0) {
                    if let Flow::Return(value) = self.exec_stmts(&body.stmts)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Continue)
            }
            StmtKind::Attempt { body, reassurance } => match self.exec_scoped(body) {
                Ok(flow) => Ok(flow),
                Err(err) => {
                    tracing::debug!(error = %err, "attempt swallowed error");
                    self.out.emit(unescape(reassurance));
                    Ok(Flow::Continue)
                }
            },
            StmtKind::Consent { permission, body } => {
                let permission = unescape(permission);
                if self.check_consent(&permission) {
                    self.exec_scoped(body)
                } else {
                    Err(EvalError::ConsentDenied { permission })
                }
            }
            StmtKind::Complain(message) => Err(EvalError::Complaint {
                message: unescape(message),
            }),
            StmtKind::Emote { tag, stmt } => {
                let rendered = self.render_emote(tag)?;
                self.out.emit(rendered);
                self.exec_stmt(stmt)
            }
            StmtKind::Spawn(name) => {
                self.out.emit(format!("Spawning worker: {}", name.name));
                Ok(Flow::Continue)
            }
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Answer from the scope chain, or ask the policy and remember the
    /// decision in the current scope.
    fn check_consent(&mut self, permission: &str) -> bool {
        if let Some(granted) = self.env.consent(permission) {
            return granted;
        }
        let granted = self.consent.decide(permission);
        tracing::debug!(permission, granted, "consent decided");
        self.env.record_consent(permission, granted);
        let verdict = if granted { "granted" } else { "denied" };
        self.out.emit(format!("Consent {verdict}: {permission}"));
        granted
    }

    fn render_emote(&mut self, tag: &EmoteTag) -> EvalResult<String> {
        if tag.params.is_empty() {
            return Ok(format!("@{}", tag.name.name));
        }
        let mut params = Vec::with_capacity(tag.params.len());
        for param in &tag.params {
            let value = self.eval_expr(&param.value)?;
            params.push(format!("{}={value}", param.name.name));
        }
        Ok(format!("@{}({})", tag.name.name, params.join(", ")))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret `\n`, `\t`, `\r`, `\"` and `\\`. Other escapes are left as
/// written.
fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
