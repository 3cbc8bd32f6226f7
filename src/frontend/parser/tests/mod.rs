//! Parser unit tests

use crate::frontend::lexer::{tokenize, TokenKind};
use crate::frontend::parser::{parse, parse_expression, ParseError};
use crate::frontend::parser::ast::*;

fn expr(source: &str) -> Node {
    let tokens = tokenize(source).unwrap();
    parse_expression(&tokens).unwrap()
}

fn program(source: &str) -> Program {
    let tokens = tokenize(source).unwrap();
    parse(&tokens).unwrap()
}

fn parse_err(source: &str) -> ParseError {
    let tokens = tokenize(source).unwrap();
    parse(&tokens).unwrap_err()
}

#[test]
fn test_binary_precedence() {
    // a + b * c  =>  a + (b * c)
    match expr("a + b * c").kind {
        NodeKind::Binary { op: BinOp::Add, right, .. } => {
            assert!(matches!(right.kind, NodeKind::Binary { op: BinOp::Mul, .. }));
        }
        other => panic!("Expected addition, got {:?}", other),
    }
}

#[test]
fn test_binary_left_associative() {
    // a - b - c  =>  (a - b) - c
    match expr("a - b - c").kind {
        NodeKind::Binary { op: BinOp::Sub, left, right } => {
            assert!(matches!(left.kind, NodeKind::Binary { op: BinOp::Sub, .. }));
            assert_eq!(right.as_identifier(), Some("c"));
        }
        other => panic!("Expected subtraction, got {:?}", other),
    }
}

#[test]
fn test_parentheses_group() {
    match expr("(a + b) * c").kind {
        NodeKind::Binary { op: BinOp::Mul, left, .. } => {
            assert!(matches!(left.kind, NodeKind::Binary { op: BinOp::Add, .. }));
        }
        other => panic!("Expected multiplication, got {:?}", other),
    }
}

#[test]
fn test_logical_and_comparison() {
    match expr("x > 0 && y < 1 || z").kind {
        NodeKind::Binary { op: BinOp::Or, left, .. } => {
            assert!(matches!(left.kind, NodeKind::Binary { op: BinOp::And, .. }));
        }
        other => panic!("Expected ||, got {:?}", other),
    }
}

#[test]
fn test_unary_and_update() {
    match expr("-x").kind {
        NodeKind::Unary { op: UnaryOp::Neg, argument } => {
            assert_eq!(argument.as_identifier(), Some("x"));
        }
        other => panic!("Expected negation, got {:?}", other),
    }
    assert!(matches!(
        expr("i++").kind,
        NodeKind::Update { op: UpdateOp::Increment, prefix: false, .. }
    ));
    assert!(matches!(
        expr("--i").kind,
        NodeKind::Update { op: UpdateOp::Decrement, prefix: true, .. }
    ));
}

#[test]
fn test_conditional_expression() {
    match expr("a ? b : c ? d : e").kind {
        NodeKind::Conditional { alternate, .. } => {
            assert!(matches!(alternate.kind, NodeKind::Conditional { .. }));
        }
        other => panic!("Expected conditional, got {:?}", other),
    }
}

#[test]
fn test_assignment_right_associative() {
    match expr("a = b += 2").kind {
        NodeKind::Assignment { op: AssignOp::Assign, value, .. } => {
            assert!(matches!(value.kind, NodeKind::Assignment { op: AssignOp::Add, .. }));
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
}

#[test]
fn test_invalid_assignment_target() {
    let tokens = tokenize("a + b = c").unwrap();
    assert!(parse_expression(&tokens).is_err());
    let tokens = tokenize("1 = c").unwrap();
    assert!(matches!(
        parse_expression(&tokens),
        Err(ParseError::InvalidAssignmentTarget { .. })
    ));
}

#[test]
fn test_call_member_array_object() {
    assert!(matches!(expr("f(1, x)").kind, NodeKind::Call { ref args, .. } if args.len() == 2));
    assert!(matches!(expr("a.b").kind, NodeKind::Member { computed: false, .. }));
    assert!(matches!(expr("a[0]").kind, NodeKind::Member { computed: true, .. }));
    assert!(matches!(expr("['x', 'y']").kind, NodeKind::Array(ref items) if items.len() == 2));
    match expr("{ f, g: 1 }").kind {
        NodeKind::Object(props) => {
            assert_eq!(props.len(), 2);
            assert_eq!(props[0].key, "f");
            assert_eq!(props[0].value.as_identifier(), Some("f"));
        }
        other => panic!("Expected object, got {:?}", other),
    }
}

#[test]
fn test_literal_raw_preserved() {
    match expr("'hi'").kind {
        NodeKind::Literal(lit) => assert_eq!(lit.raw(), "'hi'"),
        other => panic!("Expected literal, got {:?}", other),
    }
    match expr("1.50").kind {
        NodeKind::Literal(lit) => assert_eq!(lit.raw(), "1.50"),
        other => panic!("Expected literal, got {:?}", other),
    }
}

#[test]
fn test_function_declaration() {
    let prog = program("function f(x, y) { return x + y; }");
    let func = prog.find_function("f").unwrap();
    assert_eq!(func.params, vec!["x".to_string(), "y".to_string()]);
    assert_eq!(func.body.len(), 1);
    assert!(matches!(func.body[0].kind, NodeKind::Return(Some(_))));
}

#[test]
fn test_if_else_statement() {
    let prog = program("function f(x, y) { if (x > 0) { return y; } else { return -y; } }");
    let func = prog.find_function("f").unwrap();
    match &func.body[0].kind {
        NodeKind::If { consequent, alternate, .. } => {
            assert!(matches!(consequent.kind, NodeKind::Block(_)));
            assert!(alternate.is_some());
        }
        other => panic!("Expected if, got {:?}", other),
    }
}

#[test]
fn test_var_declarations() {
    let prog = program("function f() { var a = 1, b; let c; }");
    let func = prog.find_function("f").unwrap();
    match &func.body[0].kind {
        NodeKind::VarDeclList { kind: DeclKind::Var, declarations } => {
            assert_eq!(declarations.len(), 2);
            assert!(matches!(&declarations[1].kind, NodeKind::VarDecl { init: None, .. }));
        }
        other => panic!("Expected var list, got {:?}", other),
    }
    assert!(matches!(
        func.body[1].kind,
        NodeKind::VarDeclList { kind: DeclKind::Let, .. }
    ));
}

#[test]
fn test_for_statement() {
    let prog = program("function f(n) { for (var i = 0; i < n; i++) { s = s + i; } }");
    let func = prog.find_function("f").unwrap();
    match &func.body[0].kind {
        NodeKind::For { init, test, update, body } => {
            assert!(init.is_some() && test.is_some() && update.is_some());
            assert!(matches!(body.kind, NodeKind::Block(_)));
        }
        other => panic!("Expected for, got {:?}", other),
    }
}

#[test]
fn test_for_with_empty_clauses() {
    let prog = program("function f() { for (;;) { x++; } }");
    let func = prog.find_function("f").unwrap();
    assert!(matches!(
        func.body[0].kind,
        NodeKind::For { init: None, test: None, update: None, .. }
    ));
}

#[test]
fn test_return_without_argument() {
    let prog = program("function f() { return; }");
    let func = prog.find_function("f").unwrap();
    assert!(matches!(func.body[0].kind, NodeKind::Return(None)));
}

#[test]
fn test_module_level_statements() {
    let prog = program(
        "function f(x, y) { return x + y; }\n\
         f.specialize = true;\n\
         f.staticVars = ['x'];\n\
         module.exports = { f };",
    );
    assert_eq!(prog.body.len(), 4);
    assert_eq!(prog.functions().count(), 1);
}

#[test]
fn test_unclosed_block() {
    match parse_err("function f() { return 1;") {
        ParseError::ExpectedToken { expected, .. } => assert_eq!(expected, TokenKind::RBrace),
        other => panic!("Expected missing brace, got {:?}", other),
    }
}

#[test]
fn test_function_expression_rejected() {
    assert!(matches!(
        parse_err("var g = function () {};"),
        ParseError::Unsupported { .. }
    ));
}

#[test]
fn test_for_in_rejected() {
    assert!(matches!(
        parse_err("function f(o) { for (k of o) {} }"),
        ParseError::Unsupported { .. }
    ));
}

#[test]
fn test_spans_cover_statement() {
    let prog = program("function f() {\n  return 1;\n}");
    let func = prog.find_function("f").unwrap();
    assert_eq!(func.span.start.line, 1);
    assert_eq!(func.body[0].span.start.line, 2);
}
