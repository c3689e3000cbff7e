//! Evaluation of arithmetic expressions against a substitution.

use thiserror::Error;

use crate::syntax::{ExprOp, Factor, MathExpr, Mult, MultOp, Term, Var};
use crate::unify::Bindings;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("variable {0} is unbound")]
    UnboundVariable(String),
    #[error("variable {name} is bound to non-numeric value {value}")]
    NonNumericVariable { name: String, value: String },
    #[error("operator {0:?} has no right operand")]
    UnknownMathExprOp(ExprOp),
    #[error("operator {0:?} has no right operand")]
    UnknownMultOp(MultOp),
}

/// Evaluate `expr`, reading variables from `subst`.
///
/// Division by zero follows IEEE semantics and yields an infinity or NaN.
pub fn evaluate(expr: &MathExpr, subst: &Bindings) -> Result<f64, MathError> {
    let lhs = evaluate_mult(&expr.lhs, subst)?;
    match (expr.op, &expr.rhs) {
        (ExprOp::NoOp, _) => Ok(lhs),
        (ExprOp::Add, Some(rhs)) => Ok(lhs + evaluate_mult(rhs, subst)?),
        (ExprOp::Subtract, Some(rhs)) => Ok(lhs - evaluate_mult(rhs, subst)?),
        (op, None) => Err(MathError::UnknownMathExprOp(op)),
    }
}

fn evaluate_mult(mult: &Mult, subst: &Bindings) -> Result<f64, MathError> {
    let lhs = evaluate_factor(&mult.lhs, subst)?;
    match (mult.op, &mult.rhs) {
        (MultOp::NoOp, _) => Ok(lhs),
        (MultOp::Multiply, Some(rhs)) => Ok(lhs * evaluate_factor(rhs, subst)?),
        (MultOp::Divide, Some(rhs)) => Ok(lhs / evaluate_factor(rhs, subst)?),
        (op, None) => Err(MathError::UnknownMultOp(op)),
    }
}

fn evaluate_factor(factor: &Factor, subst: &Bindings) -> Result<f64, MathError> {
    match factor {
        Factor::Number(n) => Ok(*n),
        Factor::Expr(expr) => evaluate(expr, subst),
        Factor::Var(var) => lookup_number(var, subst),
    }
}

fn lookup_number(var: &Var, subst: &Bindings) -> Result<f64, MathError> {
    match subst.dereference(&Term::Var(var.clone())) {
        Term::Number(n) => Ok(n),
        Term::Var(_) => Err(MathError::UnboundVariable(var.name().to_string())),
        other => Err(MathError::NonNumericVariable {
            name: var.name().to_string(),
            value: other.to_string(),
        }),
    }
}
