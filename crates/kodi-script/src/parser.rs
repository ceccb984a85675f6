//! Parser for KodiScript source code.
//!
//! Transforms a token stream from the lexer into an Abstract Syntax Tree.
//! Uses chumsky parser combinators; only the first error is reported.

use chumsky::{input::ValueInput, prelude::*};

use crate::ast::{
    BinaryOp, Expr, ForLoop, IfStmt, Literal, Program, Stmt, UnaryOp, WhileLoop,
};
use crate::error::{LineIndex, SyntaxError};
use crate::lexer::{Token, TokenStream};

/// Span type used throughout the parser.
pub type Span = SimpleSpan;

type ParserError<'tokens> = extra::Err<Rich<'tokens, Token, Span>>;

/// Parse a token stream into a program.
pub fn parse(stream: TokenStream) -> Result<Program, SyntaxError> {
    let TokenStream { tokens, index } = stream;

    // Convert tokens to (Token, SimpleSpan) pairs
    let tokens: Vec<(Token, Span)> = tokens
        .into_iter()
        .map(|spanned| (spanned.token, (spanned.span.start..spanned.span.end).into()))
        .collect();

    // End-of-input span
    let end = index.source().len();
    let end_span: Span = (end..end).into();

    let result = program_parser().parse(tokens.as_slice().map(end_span, |(t, s)| (t, s)));

    result.into_result().map_err(|errs| match errs.first() {
        Some(err) => syntax_error(err, &index),
        None => SyntaxError::new("Parse failed"),
    })
}

/// Parse a source string directly (lex + parse).
pub fn parse_source(source: &str) -> Result<Program, SyntaxError> {
    parse(crate::lexer::tokenize(source)?)
}

fn syntax_error(err: &Rich<'_, Token, Span>, index: &LineIndex) -> SyntaxError {
    let message = match err.found() {
        Some(token) => format!("Unexpected token '{token}'"),
        None => "Unexpected end of input".to_string(),
    };
    let span = err.span();
    SyntaxError::at(message, span.start..span.end, index)
}

// ═══════════════════════════════════════════════════════════════════════════
// Parser Combinators - generic over input type
// ═══════════════════════════════════════════════════════════════════════════

/// Top-level program parser.
fn program_parser<'tokens, I>() -> impl Parser<'tokens, I, Program, ParserError<'tokens>>
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    statement_parser()
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|statements| Program { statements })
}

/// Statement parser - dispatches based on leading token.
fn statement_parser<'tokens, I>() -> impl Parser<'tokens, I, Stmt, ParserError<'tokens>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    recursive(|stmt| {
        let expr = expr_parser(stmt.clone());
        let terminator = just(Token::Semi).repeated();

        let let_stmt = just(Token::Let)
            .ignore_then(ident_parser())
            .then_ignore(just(Token::Assign))
            .then(expr.clone())
            .map(|(name, value)| Stmt::Let { name, value })
            .labelled("let statement");

        let return_stmt = just(Token::Return)
            .ignore_then(expr.clone().or_not())
            .map(Stmt::Return)
            .labelled("return statement");

        // `target = value` or a bare expression; targets are not checked here
        let expr_stmt = expr
            .clone()
            .then(just(Token::Assign).ignore_then(expr.clone()).or_not())
            .map(|(target, value)| match value {
                Some(value) => Stmt::Assign { target, value },
                None => Stmt::Expr(target),
            });

        choice((
            let_stmt,
            if_parser(stmt.clone(), expr.clone()).map(Stmt::If),
            for_parser(stmt.clone(), expr.clone()).map(Stmt::For),
            while_parser(stmt, expr.clone()).map(Stmt::While),
            return_stmt,
            expr_stmt,
        ))
        .boxed()
        .then_ignore(terminator)
    })
}

/// `{ stmt* }`
fn block_parser<'tokens, I, S>(
    stmt: S,
) -> impl Parser<'tokens, I, Vec<Stmt>, ParserError<'tokens>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    S: Parser<'tokens, I, Stmt, ParserError<'tokens>> + Clone,
{
    stmt.repeated()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .labelled("block")
}

/// `( expr )`
fn condition_parser<'tokens, I, E>(
    expr: E,
) -> impl Parser<'tokens, I, Expr, ParserError<'tokens>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    E: Parser<'tokens, I, Expr, ParserError<'tokens>> + Clone,
{
    expr.delimited_by(just(Token::LParen), just(Token::RParen))
        .labelled("condition")
}

/// If statement: `if (cond) { ... } else if (cond) { ... } else { ... }`
fn if_parser<'tokens, I, S, E>(
    stmt: S,
    expr: E,
) -> impl Parser<'tokens, I, IfStmt, ParserError<'tokens>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    S: Parser<'tokens, I, Stmt, ParserError<'tokens>> + Clone + 'tokens,
    E: Parser<'tokens, I, Expr, ParserError<'tokens>> + Clone + 'tokens,
{
    recursive(|if_stmt| {
        let else_branch = just(Token::Else).ignore_then(choice((
            if_stmt.map(|nested| vec![Stmt::If(nested)]),
            block_parser(stmt.clone()),
        )));

        just(Token::If)
            .ignore_then(condition_parser(expr.clone()))
            .then(block_parser(stmt.clone()))
            .then(else_branch.or_not())
            .map(|((condition, then_branch), else_branch)| IfStmt {
                condition,
                then_branch,
                else_branch,
            })
            .labelled("if statement")
    })
    .boxed()
}

/// For loop: `for (item in items) { ... }`
fn for_parser<'tokens, I, S, E>(
    stmt: S,
    expr: E,
) -> impl Parser<'tokens, I, ForLoop, ParserError<'tokens>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    S: Parser<'tokens, I, Stmt, ParserError<'tokens>> + Clone + 'tokens,
    E: Parser<'tokens, I, Expr, ParserError<'tokens>> + Clone + 'tokens,
{
    let header = ident_parser()
        .then_ignore(just(Token::In))
        .then(expr)
        .delimited_by(just(Token::LParen), just(Token::RParen));

    just(Token::For)
        .ignore_then(header)
        .then(block_parser(stmt))
        .map(|((variable, iterable), body)| ForLoop {
            variable,
            iterable,
            body,
        })
        .labelled("for loop")
        .boxed()
}

/// While loop: `while (cond) { ... }`
fn while_parser<'tokens, I, S, E>(
    stmt: S,
    expr: E,
) -> impl Parser<'tokens, I, WhileLoop, ParserError<'tokens>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    S: Parser<'tokens, I, Stmt, ParserError<'tokens>> + Clone + 'tokens,
    E: Parser<'tokens, I, Expr, ParserError<'tokens>> + Clone + 'tokens,
{
    just(Token::While)
        .ignore_then(condition_parser(expr))
        .then(block_parser(stmt))
        .map(|(condition, body)| WhileLoop { condition, body })
        .labelled("while loop")
        .boxed()
}

/// Postfix operations applied left to right after a primary expression.
enum Postfix {
    Call(Vec<Expr>),
    Member { property: String, optional: bool },
    Index(Expr),
}

fn binary(left: Expr, (op, right): (BinaryOp, Expr)) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

/// Expression parser.
///
/// Grammar, loosest binding first:
///   ternary    = coalesce [ "?" expr ":" expr ]
///   coalesce   = or { ("??" | "?:") or }
///   or         = and { ("||" | "or") and }
///   and        = equality { ("&&" | "and") equality }
///   equality   = comparison { ("==" | "!=") comparison }
///   comparison = sum { ("<" | "<=" | ">" | ">=") sum }
///   sum        = product { ("+" | "-") product }
///   product    = unary { ("*" | "/" | "%") unary }
///   unary      = { "!" | "not" | "-" } postfix
///   postfix    = primary { call | "." ident | "?." ident | "[" expr "]" }
///
/// Takes the statement parser so that function literals can carry a body.
fn expr_parser<'tokens, I, S>(
    stmt: S,
) -> impl Parser<'tokens, I, Expr, ParserError<'tokens>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    S: Parser<'tokens, I, Stmt, ParserError<'tokens>> + Clone + 'tokens,
{
    recursive(move |expr| {
        let primary = primary_parser(stmt.clone(), expr.clone());

        let args = expr
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LParen), just(Token::RParen));

        let postfix_op = choice((
            args.map(Postfix::Call),
            just(Token::Dot)
                .ignore_then(ident_parser())
                .map(|property| Postfix::Member {
                    property,
                    optional: false,
                }),
            just(Token::QuestionDot)
                .ignore_then(ident_parser())
                .map(|property| Postfix::Member {
                    property,
                    optional: true,
                }),
            expr.clone()
                .delimited_by(just(Token::LBracket), just(Token::RBracket))
                .map(Postfix::Index),
        ));

        let postfix = primary
            .foldl(postfix_op.repeated(), |object, op| match op {
                Postfix::Call(args) => Expr::Call {
                    callee: Box::new(object),
                    args,
                },
                Postfix::Member { property, optional } => Expr::Member {
                    object: Box::new(object),
                    property,
                    optional,
                },
                Postfix::Index(index) => Expr::Index {
                    object: Box::new(object),
                    index: Box::new(index),
                },
            })
            .boxed();

        let unary_op = select! {
            Token::Bang => UnaryOp::Not,
            Token::Not => UnaryOp::Not,
            Token::Minus => UnaryOp::Neg,
        };

        let unary = unary_op
            .repeated()
            .collect::<Vec<_>>()
            .then(postfix)
            .map(|(ops, operand)| {
                ops.into_iter().rev().fold(operand, |operand, op| Expr::Unary {
                    op,
                    operand: Box::new(operand),
                })
            })
            .boxed();

        let product = unary
            .clone()
            .foldl(
                select! {
                    Token::Star => BinaryOp::Mul,
                    Token::Slash => BinaryOp::Div,
                    Token::Percent => BinaryOp::Mod,
                }
                .then(unary)
                .repeated(),
                binary,
            )
            .boxed();

        let sum = product
            .clone()
            .foldl(
                select! {
                    Token::Plus => BinaryOp::Add,
                    Token::Minus => BinaryOp::Sub,
                }
                .then(product)
                .repeated(),
                binary,
            )
            .boxed();

        let comparison = sum
            .clone()
            .foldl(
                select! {
                    Token::Lt => BinaryOp::Lt,
                    Token::LtEq => BinaryOp::LtEq,
                    Token::Gt => BinaryOp::Gt,
                    Token::GtEq => BinaryOp::GtEq,
                }
                .then(sum)
                .repeated(),
                binary,
            )
            .boxed();

        let equality = comparison
            .clone()
            .foldl(
                select! {
                    Token::EqEq => BinaryOp::Eq,
                    Token::NotEq => BinaryOp::NotEq,
                }
                .then(comparison)
                .repeated(),
                binary,
            )
            .boxed();

        let and = equality
            .clone()
            .foldl(
                select! {
                    Token::AmpAmp => BinaryOp::And,
                    Token::And => BinaryOp::And,
                }
                .then(equality)
                .repeated(),
                binary,
            )
            .boxed();

        let or = and
            .clone()
            .foldl(
                select! {
                    Token::PipePipe => BinaryOp::Or,
                    Token::Or => BinaryOp::Or,
                }
                .then(and)
                .repeated(),
                binary,
            )
            .boxed();

        let coalesce = or
            .clone()
            .foldl(
                select! {
                    Token::QuestionQuestion => BinaryOp::Coalesce,
                    Token::Elvis => BinaryOp::Elvis,
                }
                .then(or)
                .repeated(),
                binary,
            )
            .boxed();

        coalesce
            .then(
                just(Token::Question)
                    .ignore_then(expr.clone())
                    .then_ignore(just(Token::Colon))
                    .then(expr)
                    .or_not(),
            )
            .map(|(condition, branches)| match branches {
                Some((then_value, else_value)) => Expr::Ternary {
                    condition: Box::new(condition),
                    then_value: Box::new(then_value),
                    else_value: Box::new(else_value),
                },
                None => condition,
            })
            .labelled("expression")
    })
    .boxed()
}

/// Primary expression: literal, identifier, array, object, function literal,
/// or a parenthesised expression.
fn primary_parser<'tokens, I, S, E>(
    stmt: S,
    expr: E,
) -> impl Parser<'tokens, I, Expr, ParserError<'tokens>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    S: Parser<'tokens, I, Stmt, ParserError<'tokens>> + Clone + 'tokens,
    E: Parser<'tokens, I, Expr, ParserError<'tokens>> + Clone + 'tokens,
{
    let array = expr
        .clone()
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBracket), just(Token::RBracket))
        .map(Expr::Array)
        .labelled("array");

    let key = ident_parser().or(select! { Token::Str(s) => s });
    let object = key
        .then_ignore(just(Token::Colon))
        .then(expr.clone())
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .map(Expr::Object)
        .labelled("object");

    let params = ident_parser()
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LParen), just(Token::RParen));

    let function = just(Token::Fn)
        .ignore_then(params)
        .then(block_parser(stmt))
        .map(|(params, body)| Expr::Function { params, body })
        .labelled("function");

    choice((
        literal_parser().map(Expr::Literal),
        ident_parser().map(Expr::Ident),
        function,
        array,
        object,
        expr.delimited_by(just(Token::LParen), just(Token::RParen)),
    ))
    .boxed()
}

/// Literal values.
fn literal_parser<'tokens, I>() -> impl Parser<'tokens, I, Literal, ParserError<'tokens>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    select! {
        Token::Null => Literal::Null,
        Token::True => Literal::Bool(true),
        Token::False => Literal::Bool(false),
        Token::Int(n) => Literal::Int(n),
        Token::Float(x) => Literal::Float(x),
        Token::Str(s) => Literal::String(s),
    }
    .labelled("literal")
}

/// Identifier.
fn ident_parser<'tokens, I>() -> impl Parser<'tokens, I, String, ParserError<'tokens>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    select! {
        Token::Ident(name) => name,
    }
    .labelled("identifier")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Program {
        parse_source(source).expect("parse should succeed")
    }

    fn single_stmt(source: &str) -> Stmt {
        let program = parse_ok(source);
        assert_eq!(program.statements.len(), 1, "expected one statement in {source:?}");
        program.statements.into_iter().next().expect("one statement")
    }

    fn single_expr(source: &str) -> Expr {
        match single_stmt(source) {
            Stmt::Expr(e) => e,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn parse_empty() {
        assert!(parse_ok("").statements.is_empty());
        assert!(parse_ok("// nothing here\n").statements.is_empty());
    }

    #[test]
    fn parse_let() {
        match single_stmt("let x = 1") {
            Stmt::Let { name, value } => {
                assert_eq!(name, "x");
                assert_eq!(value, Expr::Literal(Literal::Int(1)));
            }
            other => panic!("expected let, got {:?}", other),
        }
    }

    #[test]
    fn statements_split_across_lines_and_semicolons() {
        let program = parse_ok("let a = 1\nlet b = 2; print(a, b);");
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn parse_assignment_to_member() {
        match single_stmt("user.name = \"Ann\"") {
            Stmt::Assign { target, .. } => {
                assert!(matches!(target, Expr::Member { .. }));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn parse_if_else_if_else() {
        let stmt = single_stmt("if (a) { print(1) } else if (b) { print(2) } else { print(3) }");
        let Stmt::If(outer) = stmt else {
            panic!("expected if, got {:?}", stmt);
        };
        let else_branch = outer.else_branch.expect("else branch");
        assert_eq!(else_branch.len(), 1);
        match &else_branch[0] {
            Stmt::If(inner) => assert!(inner.else_branch.is_some()),
            other => panic!("expected nested if, got {:?}", other),
        }
    }

    #[test]
    fn parse_for_in() {
        match single_stmt("for (item in items) { print(item) }") {
            Stmt::For(f) => {
                assert_eq!(f.variable, "item");
                assert_eq!(f.iterable, Expr::Ident("items".into()));
                assert_eq!(f.body.len(), 1);
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn parse_while() {
        assert!(matches!(single_stmt("while (n > 0) { n = n - 1 }"), Stmt::While(_)));
    }

    #[test]
    fn parse_function_literal() {
        match single_stmt("let add = fn(a, b) {\n  return a + b\n}") {
            Stmt::Let {
                value: Expr::Function { params, body },
                ..
            } => {
                assert_eq!(params, vec!["a".to_string(), "b".to_string()]);
                assert!(matches!(body[0], Stmt::Return(Some(_))));
            }
            other => panic!("expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn bare_return() {
        assert_eq!(single_stmt("return"), Stmt::Return(None));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        match single_expr("1 + 2 * 3") {
            Expr::Binary {
                op: BinaryOp::Add,
                right,
                ..
            } => assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. })),
            other => panic!("expected addition at the root, got {:?}", other),
        }
    }

    #[test]
    fn word_and_symbol_logic_operators_agree() {
        assert_eq!(single_expr("a and b or c"), single_expr("a && b || c"));
        assert_eq!(single_expr("not a"), single_expr("!a"));
    }

    #[test]
    fn null_safety_chain() {
        match single_expr("user?.address?.city ?? \"unknown\"") {
            Expr::Binary {
                left,
                op: BinaryOp::Coalesce,
                ..
            } => match *left {
                Expr::Member {
                    property, optional, ..
                } => {
                    assert_eq!(property, "city");
                    assert!(optional);
                }
                other => panic!("expected member access, got {:?}", other),
            },
            other => panic!("expected coalesce, got {:?}", other),
        }
    }

    #[test]
    fn elvis_operator() {
        assert!(matches!(
            single_expr("name ?: \"anon\""),
            Expr::Binary {
                op: BinaryOp::Elvis,
                ..
            }
        ));
    }

    #[test]
    fn ternary() {
        assert!(matches!(single_expr("a > 1 ? \"big\" : \"small\""), Expr::Ternary { .. }));
    }

    #[test]
    fn calls_members_and_indexes_chain() {
        match single_expr("items[0].name.upper()") {
            Expr::Call { callee, args } => {
                assert!(args.is_empty());
                assert!(matches!(*callee, Expr::Member { .. }));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn object_and_array_literals() {
        match single_stmt("let o = { name: \"x\", \"tags\": [1, 2,], }") {
            Stmt::Let {
                value: Expr::Object(entries),
                ..
            } => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[1].0, "tags");
                assert!(matches!(&entries[1].1, Expr::Array(items) if items.len() == 2));
            }
            other => panic!("expected object literal, got {:?}", other),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Errors
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn error_unexpected_end_of_input() {
        let err = parse_source("let x = (1 + ").unwrap_err();
        assert_eq!(err.message, "Unexpected end of input");
        assert!(err.to_string().contains("at line 1"));
    }

    #[test]
    fn error_unexpected_token_has_position() {
        let err = parse_source("let x = 1\nlet = 2").unwrap_err();
        assert_eq!(err.message, "Unexpected token '='");
        assert_eq!(err.position, Some((2, 5)));
        assert_eq!(err.to_string(), "Unexpected token '=' at line 2, column 5");
    }

    #[test]
    fn error_unclosed_block() {
        let err = parse_source("if (a) {\n  print(a)\n").unwrap_err();
        assert_eq!(err.message, "Unexpected end of input");
    }

    #[test]
    fn lexer_errors_pass_through() {
        let err = parse_source("let s = 'open").unwrap_err();
        assert_eq!(err.message, "Unterminated string literal");
    }
}
