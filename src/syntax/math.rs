//! Arithmetic sub-terms used by `X is <expr>` goals.

use std::fmt;

use super::{Renaming, Var};

/// Additive operator of a [`MathExpr`]. `NoOp` means the expression is just its
/// left operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprOp {
    Add,
    Subtract,
    NoOp,
}

impl ExprOp {
    /// Numeric code used by the raw format.
    pub fn code(self) -> u8 {
        match self {
            ExprOp::Add => 0,
            ExprOp::Subtract => 1,
            ExprOp::NoOp => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ExprOp::Add),
            1 => Some(ExprOp::Subtract),
            2 => Some(ExprOp::NoOp),
            _ => None,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            ExprOp::Add => "+",
            ExprOp::Subtract => "-",
            ExprOp::NoOp => "",
        }
    }
}

/// Multiplicative operator of a [`Mult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultOp {
    Multiply,
    Divide,
    NoOp,
}

impl MultOp {
    pub fn code(self) -> u8 {
        match self {
            MultOp::Multiply => 0,
            MultOp::Divide => 1,
            MultOp::NoOp => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MultOp::Multiply),
            1 => Some(MultOp::Divide),
            2 => Some(MultOp::NoOp),
            _ => None,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            MultOp::Multiply => "*",
            MultOp::Divide => "/",
            MultOp::NoOp => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Factor {
    Number(f64),
    Var(Var),
    Expr(Box<MathExpr>),
}

impl Factor {
    fn collect_variables(&self, out: &mut Vec<Var>) {
        match self {
            Factor::Number(_) => {}
            Factor::Var(v) => {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
            Factor::Expr(e) => e.collect_variables(out),
        }
    }

    pub fn rename_with(&self, renaming: &mut Renaming) -> Factor {
        match self {
            Factor::Number(n) => Factor::Number(*n),
            Factor::Var(v) => Factor::Var(renaming.rename(v)),
            Factor::Expr(e) => Factor::Expr(Box::new(e.rename_with(renaming))),
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factor::Number(n) => write!(f, "{:?}", n),
            Factor::Var(v) => write!(f, "{}", v),
            Factor::Expr(e) => write!(f, "{}", e),
        }
    }
}

/// `lhs [op rhs]` over factors.
#[derive(Debug, Clone, PartialEq)]
pub struct Mult {
    pub lhs: Factor,
    pub op: MultOp,
    pub rhs: Option<Factor>,
}

impl Mult {
    pub fn new(lhs: Factor, op: MultOp, rhs: Factor) -> Self {
        Mult {
            lhs,
            op,
            rhs: Some(rhs),
        }
    }

    pub fn single(lhs: Factor) -> Self {
        Mult {
            lhs,
            op: MultOp::NoOp,
            rhs: None,
        }
    }

    fn collect_variables(&self, out: &mut Vec<Var>) {
        self.lhs.collect_variables(out);
        if let Some(rhs) = &self.rhs {
            rhs.collect_variables(out);
        }
    }

    pub fn rename_with(&self, renaming: &mut Renaming) -> Mult {
        Mult {
            lhs: self.lhs.rename_with(renaming),
            op: self.op,
            rhs: self.rhs.as_ref().map(|r| r.rename_with(renaming)),
        }
    }
}

impl fmt::Display for Mult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.op, &self.rhs) {
            (MultOp::NoOp, _) | (_, None) => write!(f, "{}", self.lhs),
            (op, Some(rhs)) => write!(f, "({} {} {})", self.lhs, op.symbol(), rhs),
        }
    }
}

/// `lhs [op rhs]` over products.
#[derive(Debug, Clone, PartialEq)]
pub struct MathExpr {
    pub lhs: Mult,
    pub op: ExprOp,
    pub rhs: Option<Mult>,
}

impl MathExpr {
    pub fn new(lhs: Mult, op: ExprOp, rhs: Mult) -> Self {
        MathExpr {
            lhs,
            op,
            rhs: Some(rhs),
        }
    }

    pub fn single(lhs: Mult) -> Self {
        MathExpr {
            lhs,
            op: ExprOp::NoOp,
            rhs: None,
        }
    }

    pub fn number(n: f64) -> Self {
        MathExpr::single(Mult::single(Factor::Number(n)))
    }

    pub fn variables(&self) -> Vec<Var> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<Var>) {
        self.lhs.collect_variables(out);
        if let Some(rhs) = &self.rhs {
            rhs.collect_variables(out);
        }
    }

    pub fn rename_with(&self, renaming: &mut Renaming) -> MathExpr {
        MathExpr {
            lhs: self.lhs.rename_with(renaming),
            op: self.op,
            rhs: self.rhs.as_ref().map(|r| r.rename_with(renaming)),
        }
    }
}

impl fmt::Display for MathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.op, &self.rhs) {
            (ExprOp::NoOp, _) | (_, None) => write!(f, "{}", self.lhs),
            (op, Some(rhs)) => write!(f, "({} {} {})", self.lhs, op.symbol(), rhs),
        }
    }
}

/// `Var is MathExpr`.
#[derive(Debug, Clone, PartialEq)]
pub struct MathAssignment {
    pub lhs: Var,
    pub rhs: MathExpr,
}

impl MathAssignment {
    pub fn new(lhs: Var, rhs: MathExpr) -> Self {
        MathAssignment { lhs, rhs }
    }

    /// The assigned variable followed by the variables of the expression.
    pub fn variables(&self) -> Vec<Var> {
        let mut out = vec![self.lhs.clone()];
        self.rhs.collect_variables(&mut out);
        out
    }

    pub fn rename_with(&self, renaming: &mut Renaming) -> MathAssignment {
        MathAssignment {
            lhs: renaming.rename(&self.lhs),
            rhs: self.rhs.rename_with(renaming),
        }
    }
}

impl fmt::Display for MathAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is {}", self.lhs, self.rhs)
    }
}
