//! AST node types for the Simple language.
//!
//! Expressions and statements are separate closed enums. Children are
//! boxed and exclusively owned by their parent, so a program is always a
//! tree. Equality and hashing are structural over the whole subtree.
//!
//! The big-step evaluator only reads nodes. The small-step machine owns its
//! program and rewrites it by value, moving untouched subtrees into the
//! result instead of copying them.
//!
//! Long programs are right-nested `Sequence` chains (see [`Stmt::block`]).
//! `Clone`, `Drop` and `Display` for [`Stmt`] walk that right spine in a
//! loop, so their native stack use does not grow with program length.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Value;

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    // ── Values ──
    /// `42`
    Number(i64),
    /// `true` / `false`
    Boolean(bool),

    // ── Lookup ──
    /// `x`
    Variable(String),

    // ── Operators ──
    /// `left + right`
    Add(Box<Expr>, Box<Expr>),
    /// `left * right`
    Multiply(Box<Expr>, Box<Expr>),
    /// `left < right`
    LessThan(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn number(n: i64) -> Self {
        Expr::Number(n)
    }

    pub fn boolean(b: bool) -> Self {
        Expr::Boolean(b)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Expr::Add(Box::new(left), Box::new(right))
    }

    pub fn multiply(left: Expr, right: Expr) -> Self {
        Expr::Multiply(Box::new(left), Box::new(right))
    }

    pub fn less_than(left: Expr, right: Expr) -> Self {
        Expr::LessThan(Box::new(left), Box::new(right))
    }

    /// Whether a rewrite rule applies. Only `Number` and `Boolean` are terminal.
    pub fn is_reducible(&self) -> bool {
        !matches!(self, Expr::Number(_) | Expr::Boolean(_))
    }

    /// The value of a terminal expression, or `None` if it is still reducible.
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Expr::Number(n) => Some(Value::Number(*n)),
            Expr::Boolean(b) => Some(Value::Boolean(*b)),
            _ => None,
        }
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::Number(n)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Boolean(b)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement node.
#[derive(Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stmt {
    /// The terminal statement.
    #[default]
    DoNothing,
    /// `name = expr`
    Assign(String, Expr),
    /// `if (condition) { consequence } else { alternative }`
    If(Expr, Box<Stmt>, Box<Stmt>),
    /// `first; second`
    Sequence(Box<Stmt>, Box<Stmt>),
    /// `while (condition) { body }`
    While(Expr, Box<Stmt>),
}

impl Stmt {
    pub fn assign(name: impl Into<String>, expr: Expr) -> Self {
        Stmt::Assign(name.into(), expr)
    }

    pub fn if_else(condition: Expr, consequence: Stmt, alternative: Stmt) -> Self {
        Stmt::If(condition, Box::new(consequence), Box::new(alternative))
    }

    pub fn sequence(first: Stmt, second: Stmt) -> Self {
        Stmt::Sequence(Box::new(first), Box::new(second))
    }

    pub fn while_loop(condition: Expr, body: Stmt) -> Self {
        Stmt::While(condition, Box::new(body))
    }

    /// Chain statements into right-nested sequences. An empty list is `DoNothing`.
    pub fn block(stmts: impl IntoIterator<Item = Stmt>) -> Self {
        let mut stmts: Vec<Stmt> = stmts.into_iter().collect();
        let Some(mut acc) = stmts.pop() else {
            return Stmt::DoNothing;
        };
        while let Some(prev) = stmts.pop() {
            acc = Stmt::sequence(prev, acc);
        }
        acc
    }

    /// `DoNothing` is the only terminal statement.
    pub fn is_reducible(&self) -> bool {
        !matches!(self, Stmt::DoNothing)
    }
}

impl Clone for Stmt {
    fn clone(&self) -> Self {
        let mut spine = Vec::new();
        let mut cur = self;
        let last = loop {
            match cur {
                Stmt::Sequence(first, second) => {
                    spine.push(first);
                    cur = &**second;
                }
                Stmt::DoNothing => break Stmt::DoNothing,
                Stmt::Assign(name, expr) => break Stmt::Assign(name.clone(), expr.clone()),
                Stmt::If(cond, cons, alt) => {
                    break Stmt::If(cond.clone(), cons.clone(), alt.clone())
                }
                Stmt::While(cond, body) => break Stmt::While(cond.clone(), body.clone()),
            }
        };
        spine
            .into_iter()
            .rev()
            .fold(last, |rest, first| Stmt::Sequence(first.clone(), Box::new(rest)))
    }
}

impl Drop for Stmt {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut stmt) = pending.pop() {
            detach_children(&mut stmt, &mut pending);
        }
    }
}

/// Move every compound child of `stmt` into `pending`, leaving `DoNothing`
/// behind. Leaf children stay put and drop with their parent.
fn detach_children(stmt: &mut Stmt, pending: &mut Vec<Stmt>) {
    let mut detach = |child: &mut Box<Stmt>| {
        if matches!(**child, Stmt::If(..) | Stmt::Sequence(..) | Stmt::While(..)) {
            pending.push(std::mem::take(&mut **child));
        }
    };
    match stmt {
        Stmt::If(_, cons, alt) => {
            detach(cons);
            detach(alt);
        }
        Stmt::Sequence(first, second) => {
            detach(first);
            detach(second);
        }
        Stmt::While(_, body) => detach(body),
        Stmt::DoNothing | Stmt::Assign(..) => {}
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Rendering
// ══════════════════════════════════════════════════════════════════════════════

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Boolean(b) => write!(f, "{b}"),
            Expr::Variable(name) => write!(f, "{name}"),
            Expr::Add(l, r) => write!(f, "{l} + {r}"),
            Expr::Multiply(l, r) => write!(f, "{l} * {r}"),
            Expr::LessThan(l, r) => write!(f, "{l} < {r}"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::DoNothing => write!(f, "do-nothing"),
            Stmt::Assign(name, expr) => write!(f, "{name} = {expr}"),
            Stmt::If(cond, cons, alt) => {
                write!(f, "if ({cond}) {{ {cons} }} else {{ {alt} }}")
            }
            Stmt::Sequence(first, second) => {
                write!(f, "{first}")?;
                let mut rest = &**second;
                while let Stmt::Sequence(first, second) = rest {
                    write!(f, "; {first}")?;
                    rest = &**second;
                }
                write!(f, "; {rest}")
            }
            Stmt::While(cond, body) => write!(f, "while ({cond}) {{ {body} }}"),
        }
    }
}
