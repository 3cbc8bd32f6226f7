//! Property tests over generated subject functions

use genext::backends::emitter::build;
use genext::frontend::{parse_program, Node, NodeKind};
use genext::middle::bta::{analyze_function, visit_identifiers};
use genext::middle::specialize::GenStmt;
use genext::util::config::SpecializeConfig;
use genext::{BindingContext, GenextConfig, StaticArgs, StaticParams};
use proptest::prelude::*;
use serde_json::json;

const LOCALS: [&str; 3] = ["a", "b", "c"];

fn operand_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("x".to_string()),
        Just("y".to_string()),
        Just("a".to_string()),
        Just("b".to_string()),
        Just("c".to_string()),
        (0u8..20).prop_map(|n| n.to_string()),
    ]
}

fn expr_strategy() -> impl Strategy<Value = String> {
    let op = prop_oneof![Just("+"), Just("-"), Just("*"), Just(">"), Just("==")];
    (operand_strategy(), op, operand_strategy()).prop_map(|(l, op, r)| format!("{} {} {}", l, op, r))
}

fn local_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(LOCALS[0]), Just(LOCALS[1]), Just(LOCALS[2])]
}

fn stmt_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (local_strategy(), expr_strategy()).prop_map(|(v, e)| format!("{} = {};", v, e)),
        (local_strategy(), expr_strategy()).prop_map(|(v, e)| format!("{} += {};", v, e)),
        local_strategy().prop_map(|v| format!("{}++;", v)),
        expr_strategy().prop_map(|e| format!("return {};", e)),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        let branch = (
            expr_strategy(),
            prop::collection::vec(inner.clone(), 0..4),
            prop::collection::vec(inner.clone(), 0..4),
        )
            .prop_map(|(test, then_branch, else_branch)| {
                format!(
                    "if ({}) {{ {} }} else {{ {} }}",
                    test,
                    then_branch.join(" "),
                    else_branch.join(" ")
                )
            });
        let block = prop::collection::vec(inner, 0..4)
            .prop_map(|stmts| format!("{{ {} }}", stmts.join(" ")));
        prop_oneof![branch, block]
    })
}

/// `function f(x, y)` with every local declared up front
fn function_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(stmt_strategy(), 1..8).prop_map(|stmts| {
        format!(
            "function f(x, y) {{ var a = 0; var b = x; var c = 1; {} }}",
            stmts.join(" ")
        )
    })
}

fn loop_function_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (local_strategy(), operand_strategy()).prop_map(|(v, o)| format!("{} = {};", v, o)),
        1..8,
    )
    .prop_map(|body| {
        format!(
            "function f(x, y) {{ var a = 0; var b = 0; var c = 0; for (var i = 0; i < x; i++) {{ {} }} return a; }}",
            body.join(" ")
        )
    })
}

fn analyzed(
    source: &str,
    statics: &[&str],
) -> (genext::frontend::Function, BindingContext) {
    let program = parse_program(source).unwrap();
    let func = program.functions().next().unwrap().clone();
    let params: StaticParams = statics.iter().copied().collect();
    let ctx = analyze_function(&func, &params, &SpecializeConfig::default()).unwrap();
    (func, ctx)
}

/// Every name the generator reads must be Static
fn check_generator_reads(
    stmts: &[GenStmt],
    ctx: &BindingContext,
) -> Result<(), TestCaseError> {
    for stmt in stmts {
        match stmt {
            GenStmt::Emit(template) => {
                for hole in template.holes() {
                    prop_assert!(ctx.is_hole(hole), "hole `{}` is not a static parameter", hole);
                }
            }
            GenStmt::Bind(node) => {
                let mut dynamic = Vec::new();
                for expr in statement_exprs(node) {
                    visit_identifiers(expr, &mut |name| {
                        if !ctx.is_static(name) {
                            dynamic.push(name.to_string());
                        }
                    });
                }
                prop_assert!(dynamic.is_empty(), "generator statement reads {:?}", dynamic);
            }
            GenStmt::Branch {
                test,
                then_branch,
                else_branch,
            } => {
                let mut dynamic = Vec::new();
                visit_identifiers(test, &mut |name| {
                    if !ctx.is_static(name) {
                        dynamic.push(name.to_string());
                    }
                });
                prop_assert!(dynamic.is_empty(), "generator test reads {:?}", dynamic);
                check_generator_reads(then_branch, ctx)?;
                check_generator_reads(else_branch, ctx)?;
            }
        }
    }
    Ok(())
}

/// Expressions evaluated by a generation-time statement
fn statement_exprs(node: &Node) -> Vec<&Node> {
    match &node.kind {
        NodeKind::VarDeclList { declarations, .. } => declarations
            .iter()
            .filter_map(|decl| match &decl.kind {
                NodeKind::VarDecl { init, .. } => init.as_deref(),
                _ => None,
            })
            .collect(),
        NodeKind::ExpressionStatement(expr) => vec![&**expr],
        _ => Vec::new(),
    }
}

fn contains_generator_work(stmts: &[GenStmt]) -> bool {
    stmts.iter().any(|stmt| match stmt {
        GenStmt::Emit(template) => template.holes().next().is_some(),
        GenStmt::Bind(_) | GenStmt::Branch { .. } => true,
    })
}

proptest! {
    #[test]
    fn prop_binding_safety(source in function_strategy(), x in -20i32..20) {
        let (func, ctx) = analyzed(&source, &["x"]);
        let params: StaticParams = ["x"].into_iter().collect();
        let ext = build(&func, &params, &GenextConfig::default()).unwrap();
        check_generator_reads(ext.body(), &ctx)?;

        // the generator never touches a dynamic value, so it always runs
        let args: StaticArgs = [("x", json!(x))].into_iter().collect();
        prop_assert!(ext.instantiate(&args).is_ok());
    }

    #[test]
    fn prop_no_statics_is_identity(source in function_strategy()) {
        let (func, ctx) = analyzed(&source, &[]);
        prop_assert!(ctx.tags().all(|(name, time)| time.is_dynamic() || LOCALS.contains(&name)));

        let ext = build(&func, &StaticParams::new(), &GenextConfig::default()).unwrap();
        prop_assert!(!contains_generator_work(ext.body()));

        // instantiating prints the emitted residual lines unchanged
        let text = ext.instantiate(&StaticArgs::new()).unwrap();
        let residual: Vec<String> = ext
            .body()
            .iter()
            .flat_map(|s| s.templates())
            .map(|t| t.to_string())
            .collect();
        let printed: Vec<&str> = text.lines().collect();
        prop_assert_eq!(printed.len(), residual.len() + 2);
        prop_assert_eq!(printed[0], "function f_special (x, y) {");
        for (line, expected) in printed[1..].iter().zip(&residual) {
            prop_assert_eq!(*line, expected.as_str());
        }
    }

    #[test]
    fn prop_static_test_is_eliminated(
        x in -50i32..50,
        n in -50i32..50,
        op in prop_oneof![Just("<"), Just(">"), Just("<="), Just(">="), Just("=="), Just("!=")],
    ) {
        let source = format!(
            "function f(x, y) {{ if (x {} {}) {{ return y; }} else {{ return -y; }} }}",
            op, n
        );
        let (func, _) = analyzed(&source, &["x"]);
        let params: StaticParams = ["x"].into_iter().collect();
        let ext = build(&func, &params, &GenextConfig::default()).unwrap();
        let args: StaticArgs = [("x", json!(x))].into_iter().collect();
        let text = ext.instantiate(&args).unwrap();

        let taken = match op {
            "<" => x < n,
            ">" => x > n,
            "<=" => x <= n,
            ">=" => x >= n,
            "==" => x == n,
            _ => x != n,
        };
        let expected = if taken { "    return y ;" } else { "    return -y ;" };
        prop_assert!(!text.contains("if ("));
        prop_assert_eq!(text.lines().collect::<Vec<_>>(), vec!["function f_special (y) {", expected, "}"]);
    }

    #[test]
    fn prop_loop_fixpoint_terminates(source in loop_function_strategy()) {
        let (_, ctx) = analyzed(&source, &["x"]);
        let stats = ctx.stats();
        prop_assert_eq!(stats.loops.len(), 1);
        for lp in &stats.loops {
            prop_assert!(lp.changing_sweeps <= lp.variables);
        }
        prop_assert!(stats.sweeps <= 2 * ctx.tags().count() + 2);
    }
}
