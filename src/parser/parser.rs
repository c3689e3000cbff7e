//! Recursive-descent parser for Horn-clause programs.

use thiserror::Error;

use super::ast::{Command, Directive};
use super::lexer::{LexError, Lexer, Token};
use crate::syntax::{
    ExprOp, Fact, Factor, Goal, MathAssignment, MathExpr, Mult, MultOp, Query, Rule, Statement,
    Term, Var,
};

/// Parse error with location information.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}

/// Parser state.
struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    line: usize,
    column: usize,
    /// Counter for `_` placeholders, each of which is a distinct variable.
    anonymous: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Parser {
            line: lexer.token_line,
            column: lexer.token_column,
            lexer,
            current,
            anonymous: 0,
        })
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let old = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        self.line = self.lexer.token_line;
        self.column = self.lexer.token_column;
        Ok(old)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.current == expected {
            self.advance()?;
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", expected, self.current)))
        }
    }

    fn eat(&mut self, token: &Token) -> Result<bool, ParseError> {
        if &self.current == token {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            line: self.line,
            column: self.column,
        }
    }

    fn variable(&mut self, name: String) -> Var {
        if name == "_" {
            let var = Var::new(format!("_G{}", self.anonymous));
            self.anonymous += 1;
            var
        } else {
            Var::new(name)
        }
    }
}

/// Parse program text into statements. Directives are rejected.
pub fn parse_file(source: &str) -> Result<Vec<Statement>, ParseError> {
    let mut parser = Parser::new(source)?;
    let mut statements = Vec::new();

    while parser.current != Token::Eof {
        if parser.current == Token::Colon {
            return Err(parser.error("directives are only allowed in the shell".to_string()));
        }
        statements.push(parse_statement(&mut parser)?);
    }

    Ok(statements)
}

/// Parse a single query, with or without the leading `?-`.
pub fn parse_query(source: &str) -> Result<Query, ParseError> {
    let mut parser = Parser::new(source)?;
    parser.eat(&Token::Query)?;
    let goals = parse_goals(&mut parser)?;
    parser.eat(&Token::Dot)?;
    if parser.current != Token::Eof {
        return Err(parser.error(format!("unexpected {:?} after query", parser.current)));
    }
    Ok(Query::new(goals))
}

/// Parse shell input: statements and directives.
pub fn parse_commands(source: &str) -> Result<Vec<Command>, ParseError> {
    let mut parser = Parser::new(source)?;
    let mut commands = Vec::new();

    while parser.current != Token::Eof {
        let command = if parser.current == Token::Colon {
            Command::Directive(parse_directive(&mut parser)?)
        } else {
            Command::Statement(parse_statement(&mut parser)?)
        };
        commands.push(command);
    }

    Ok(commands)
}

fn parse_directive(parser: &mut Parser) -> Result<Directive, ParseError> {
    parser.expect(Token::Colon)?;

    let name = match &parser.current {
        Token::Identifier(name) => name.clone(),
        _ => return Err(parser.error("expected directive name after ':'".to_string())),
    };
    parser.advance()?;

    match name.as_str() {
        "load" => match parser.advance()? {
            Token::StringLit(path) => Ok(Directive::Load(path)),
            _ => Err(parser.error("expected string literal after :load".to_string())),
        },
        "set" => {
            let key = match parser.advance()? {
                Token::Identifier(key) => key,
                _ => return Err(parser.error("expected setting name after :set".to_string())),
            };
            let value = match parser.advance()? {
                Token::Identifier(v) | Token::StringLit(v) => v,
                Token::Number(n) => n.to_string(),
                _ => {
                    return Err(
                        parser.error("expected setting value after setting name".to_string())
                    )
                }
            };
            Ok(Directive::Set { key, value })
        }
        "next" => Ok(Directive::Next),
        "quit" => Ok(Directive::Quit),
        _ => Err(parser.error(format!("unknown directive: {}", name))),
    }
}

fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    if parser.eat(&Token::Query)? {
        let goals = parse_goals(parser)?;
        parser.eat(&Token::Dot)?;
        return Ok(Statement::Query(Query::new(goals)));
    }

    let head = parse_fact(parser)?;
    if parser.eat(&Token::Neck)? {
        let body = parse_goals(parser)?;
        parser.expect(Token::Dot)?;
        return Ok(Statement::Rule(Rule::new(head, Query::new(body))));
    }
    parser.expect(Token::Dot)?;
    Ok(Statement::Fact(head))
}

fn parse_goals(parser: &mut Parser) -> Result<Vec<Goal>, ParseError> {
    let mut goals = vec![parse_goal(parser)?];
    while parser.eat(&Token::Comma)? {
        goals.push(parse_goal(parser)?);
    }
    Ok(goals)
}

fn parse_goal(parser: &mut Parser) -> Result<Goal, ParseError> {
    let lhs = parse_arg(parser)?;

    if let Term::Var(var) = &lhs {
        if matches!(&parser.current, Token::Identifier(kw) if kw == "is") {
            parser.advance()?;
            let expr = parse_expr(parser)?;
            return Ok(Goal::Math(MathAssignment::new(var.clone(), expr)));
        }
    }

    if parser.eat(&Token::Equals)? {
        let rhs = parse_arg(parser)?;
        return Ok(Goal::Fact(Fact::new("=", vec![lhs, rhs])));
    }

    term_to_fact(lhs).map(Goal::Fact).ok_or_else(|| parser.error("expected a goal".to_string()))
}

/// Facts and bare atoms can stand as goals and heads.
fn term_to_fact(term: Term) -> Option<Fact> {
    match term {
        Term::Fact(fact) => Some(fact),
        Term::Atom(name) => Some(Fact::new(name, Vec::new())),
        _ => None,
    }
}

fn parse_fact(parser: &mut Parser) -> Result<Fact, ParseError> {
    let term = parse_arg(parser)?;
    term_to_fact(term).ok_or_else(|| parser.error("expected a fact".to_string()))
}

fn parse_arg(parser: &mut Parser) -> Result<Term, ParseError> {
    match parser.advance()? {
        Token::Variable(name) => Ok(Term::Var(parser.variable(name))),
        Token::Number(n) => Ok(Term::Number(n)),
        Token::Minus => match parser.advance()? {
            Token::Number(n) => Ok(Term::Number(-n)),
            _ => Err(parser.error("expected number after '-'".to_string())),
        },
        Token::Identifier(name) => parse_compound(parser, name, Term::Atom),
        Token::StringLit(text) => parse_compound(parser, text, Term::Str),
        Token::LBracket => parse_list(parser),
        other => Err(parser.error(format!("expected term, found {:?}", other))),
    }
}

/// `name(args...)` if an argument list follows, otherwise `plain(name)`.
fn parse_compound(
    parser: &mut Parser,
    name: String,
    plain: fn(String) -> Term,
) -> Result<Term, ParseError> {
    if !parser.eat(&Token::LParen)? {
        return Ok(plain(name));
    }
    let mut args = Vec::new();
    if !parser.eat(&Token::RParen)? {
        args.push(parse_arg(parser)?);
        while parser.eat(&Token::Comma)? {
            args.push(parse_arg(parser)?);
        }
        parser.expect(Token::RParen)?;
    }
    Ok(Term::fact(name, args))
}

fn parse_list(parser: &mut Parser) -> Result<Term, ParseError> {
    if parser.eat(&Token::RBracket)? {
        return Ok(Term::empty_list());
    }
    let mut items = vec![parse_arg(parser)?];
    while parser.eat(&Token::Comma)? {
        items.push(parse_arg(parser)?);
    }
    let tail = if parser.eat(&Token::Pipe)? {
        Some(parse_arg(parser)?)
    } else {
        None
    };
    parser.expect(Token::RBracket)?;
    Ok(Term::list(items, tail))
}

/// `mult (("+" | "-") mult)*`, grouping to the left.
fn parse_expr(parser: &mut Parser) -> Result<MathExpr, ParseError> {
    let mut expr = MathExpr::single(parse_mult(parser)?);
    loop {
        let op = match parser.current {
            Token::Plus => ExprOp::Add,
            Token::Minus => ExprOp::Subtract,
            _ => break,
        };
        parser.advance()?;
        let rhs = parse_mult(parser)?;
        expr = if expr.rhs.is_none() {
            MathExpr::new(expr.lhs, op, rhs)
        } else {
            MathExpr::new(Mult::single(Factor::Expr(Box::new(expr))), op, rhs)
        };
    }
    Ok(expr)
}

fn parse_mult(parser: &mut Parser) -> Result<Mult, ParseError> {
    let mut mult = Mult::single(parse_factor(parser)?);
    loop {
        let op = match parser.current {
            Token::Star => MultOp::Multiply,
            Token::Slash => MultOp::Divide,
            _ => break,
        };
        parser.advance()?;
        let rhs = parse_factor(parser)?;
        mult = if mult.rhs.is_none() {
            Mult::new(mult.lhs, op, rhs)
        } else {
            let nested = MathExpr::single(mult);
            Mult::new(Factor::Expr(Box::new(nested)), op, rhs)
        };
    }
    Ok(mult)
}

fn parse_factor(parser: &mut Parser) -> Result<Factor, ParseError> {
    match parser.advance()? {
        Token::Number(n) => Ok(Factor::Number(n)),
        Token::Minus => match parser.advance()? {
            Token::Number(n) => Ok(Factor::Number(-n)),
            _ => Err(parser.error("expected number after '-'".to_string())),
        },
        Token::Variable(name) => Ok(Factor::Var(parser.variable(name))),
        Token::LParen => {
            let expr = parse_expr(parser)?;
            parser.expect(Token::RParen)?;
            Ok(Factor::Expr(Box::new(expr)))
        }
        other => Err(parser.error(format!("expected number, variable or '(', found {:?}", other))),
    }
}
