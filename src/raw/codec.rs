//! JSON shape of compiled statements and conversion to and from the AST.

use serde::{Deserialize, Serialize};

use super::RawError;
use crate::syntax::{
    ExprOp, Fact, Factor, Goal, MathAssignment, MathExpr, Mult, MultOp, Query, Rule, Statement,
    Term, Var,
};

/// One node of the raw format, tagged by `"t"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub(crate) enum RawNode {
    #[serde(rename = "fact")]
    Fact {
        f: String,
        #[serde(default)]
        a: Vec<RawNode>,
    },
    #[serde(rename = "rule")]
    Rule { h: Box<RawNode>, b: Box<RawNode> },
    #[serde(rename = "query")]
    Query {
        #[serde(default)]
        b: Vec<RawNode>,
    },
    #[serde(rename = "var")]
    Var { v: String },
    #[serde(rename = "atom")]
    Atom { v: String },
    #[serde(rename = "str")]
    Str { v: String },
    #[serde(rename = "num")]
    Num { v: f64 },
    #[serde(rename = "ma")]
    MathAssignment { v: Box<RawNode>, e: Box<RawNode> },
    #[serde(rename = "me")]
    MathExpr {
        l: Box<RawNode>,
        o: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        r: Option<Box<RawNode>>,
    },
    #[serde(rename = "mu")]
    Mult {
        l: Box<RawNode>,
        o: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        r: Option<Box<RawNode>>,
    },
    #[serde(rename = "mf")]
    Factor {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        v: Option<Box<RawNode>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        n: Option<Box<RawNode>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        e: Option<Box<RawNode>>,
    },
}

impl RawNode {
    fn tag(&self) -> &'static str {
        match self {
            RawNode::Fact { .. } => "fact",
            RawNode::Rule { .. } => "rule",
            RawNode::Query { .. } => "query",
            RawNode::Var { .. } => "var",
            RawNode::Atom { .. } => "atom",
            RawNode::Str { .. } => "str",
            RawNode::Num { .. } => "num",
            RawNode::MathAssignment { .. } => "ma",
            RawNode::MathExpr { .. } => "me",
            RawNode::Mult { .. } => "mu",
            RawNode::Factor { .. } => "mf",
        }
    }
}

fn unexpected(expected: &'static str, found: &RawNode) -> RawError {
    RawError::UnexpectedNode {
        expected,
        found: found.tag(),
    }
}

// ---------------------------------------------------------------------------
// Encoding

pub(crate) fn encode_statement(statement: &Statement) -> RawNode {
    match statement {
        Statement::Fact(fact) => encode_fact(fact),
        Statement::Rule(rule) => RawNode::Rule {
            h: Box::new(encode_fact(&rule.head)),
            b: Box::new(encode_query(&rule.body)),
        },
        Statement::Query(query) => encode_query(query),
    }
}

fn encode_query(query: &Query) -> RawNode {
    RawNode::Query {
        b: query.goals.iter().map(encode_goal).collect(),
    }
}

fn encode_goal(goal: &Goal) -> RawNode {
    match goal {
        Goal::Fact(fact) => encode_fact(fact),
        Goal::Math(ma) => RawNode::MathAssignment {
            v: Box::new(encode_var(&ma.lhs)),
            e: Box::new(encode_expr(&ma.rhs)),
        },
    }
}

fn encode_fact(fact: &Fact) -> RawNode {
    RawNode::Fact {
        f: fact.functor.clone(),
        a: fact.args.iter().map(encode_term).collect(),
    }
}

fn encode_var(var: &Var) -> RawNode {
    RawNode::Var {
        v: var.name().to_string(),
    }
}

fn encode_term(term: &Term) -> RawNode {
    match term {
        Term::Var(v) => encode_var(v),
        Term::Atom(s) => RawNode::Atom { v: s.clone() },
        Term::Str(s) => RawNode::Str { v: s.clone() },
        Term::Number(n) => RawNode::Num { v: *n },
        Term::Fact(fact) => encode_fact(fact),
    }
}

fn encode_expr(expr: &MathExpr) -> RawNode {
    RawNode::MathExpr {
        l: Box::new(encode_mult(&expr.lhs)),
        o: expr.op.code(),
        r: expr.rhs.as_ref().map(|m| Box::new(encode_mult(m))),
    }
}

fn encode_mult(mult: &Mult) -> RawNode {
    RawNode::Mult {
        l: Box::new(encode_factor(&mult.lhs)),
        o: mult.op.code(),
        r: mult.rhs.as_ref().map(|f| Box::new(encode_factor(f))),
    }
}

fn encode_factor(factor: &Factor) -> RawNode {
    let (v, n, e) = match factor {
        Factor::Var(var) => (Some(Box::new(encode_var(var))), None, None),
        Factor::Number(x) => (None, Some(Box::new(RawNode::Num { v: *x })), None),
        Factor::Expr(expr) => (None, None, Some(Box::new(encode_expr(expr)))),
    };
    RawNode::Factor { v, n, e }
}

// ---------------------------------------------------------------------------
// Decoding

pub(crate) fn decode_statement(node: RawNode) -> Result<Statement, RawError> {
    match node {
        RawNode::Fact { .. } => Ok(Statement::Fact(decode_fact(node)?)),
        RawNode::Rule { h, b } => Ok(Statement::Rule(Rule::new(
            decode_fact(*h)?,
            decode_query(*b)?,
        ))),
        RawNode::Query { .. } => Ok(Statement::Query(decode_query(node)?)),
        other => Err(unexpected("statement", &other)),
    }
}

fn decode_query(node: RawNode) -> Result<Query, RawError> {
    match node {
        RawNode::Query { b } => Ok(Query::new(
            b.into_iter().map(decode_goal).collect::<Result<_, _>>()?,
        )),
        other => Err(unexpected("query", &other)),
    }
}

fn decode_goal(node: RawNode) -> Result<Goal, RawError> {
    match node {
        RawNode::Fact { .. } => Ok(Goal::Fact(decode_fact(node)?)),
        RawNode::MathAssignment { v, e } => Ok(Goal::Math(MathAssignment::new(
            decode_var(*v)?,
            decode_expr(*e)?,
        ))),
        other => Err(unexpected("goal", &other)),
    }
}

fn decode_fact(node: RawNode) -> Result<Fact, RawError> {
    match node {
        RawNode::Fact { f, a } => Ok(Fact::new(
            f,
            a.into_iter().map(decode_term).collect::<Result<_, _>>()?,
        )),
        other => Err(unexpected("fact", &other)),
    }
}

fn decode_var(node: RawNode) -> Result<Var, RawError> {
    match node {
        RawNode::Var { v } => Ok(Var::new(v)),
        other => Err(unexpected("var", &other)),
    }
}

fn decode_term(node: RawNode) -> Result<Term, RawError> {
    match node {
        RawNode::Var { v } => Ok(Term::var(v)),
        RawNode::Atom { v } => Ok(Term::Atom(v)),
        RawNode::Str { v } => Ok(Term::Str(v)),
        RawNode::Num { v } => Ok(Term::Number(v)),
        RawNode::Fact { .. } => Ok(Term::Fact(decode_fact(node)?)),
        other => Err(unexpected("term", &other)),
    }
}

fn decode_expr(node: RawNode) -> Result<MathExpr, RawError> {
    match node {
        RawNode::MathExpr { l, o, r } => Ok(MathExpr {
            lhs: decode_mult(*l)?,
            op: ExprOp::from_code(o).ok_or(RawError::UnknownExprOp(o))?,
            rhs: r.map(|m| decode_mult(*m)).transpose()?,
        }),
        other => Err(unexpected("me", &other)),
    }
}

fn decode_mult(node: RawNode) -> Result<Mult, RawError> {
    match node {
        RawNode::Mult { l, o, r } => Ok(Mult {
            lhs: decode_factor(*l)?,
            op: MultOp::from_code(o).ok_or(RawError::UnknownMultOp(o))?,
            rhs: r.map(|f| decode_factor(*f)).transpose()?,
        }),
        other => Err(unexpected("mu", &other)),
    }
}

fn decode_factor(node: RawNode) -> Result<Factor, RawError> {
    match node {
        RawNode::Factor { v: Some(v), .. } => Ok(Factor::Var(decode_var(*v)?)),
        RawNode::Factor { n: Some(n), .. } => match *n {
            RawNode::Num { v } => Ok(Factor::Number(v)),
            other => Err(unexpected("num", &other)),
        },
        RawNode::Factor { e: Some(e), .. } => Ok(Factor::Expr(Box::new(decode_expr(*e)?))),
        RawNode::Factor { .. } => Err(RawError::InvalidFactor),
        other => Err(unexpected("mf", &other)),
    }
}
