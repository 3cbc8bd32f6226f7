//! Specialization metadata discovery
//!
//! A function opts in with module-level property assignments:
//!
//! ```javascript
//! function power(x, n) { ... }
//! power.specialize = true;
//! power.staticVars = ['n'];
//! ```
//!
//! `staticVars` may also be a single string, optionally comma separated.

use crate::frontend::parser::ast::{Literal, Node, NodeKind, Program};
use crate::middle::StaticParams;
use crate::util::span::Span;
use indexmap::IndexMap;
use tracing::{debug, warn};

/// A function flagged for specialization
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub static_params: StaticParams,
    /// Location of the `specialize = true` statement
    pub span: Span,
}

#[derive(Default)]
struct Flags {
    specialize: Option<(bool, Span)>,
    static_vars: Option<StaticParams>,
}

/// Collect the flagged functions, in order of their `specialize` flag
pub fn discover(program: &Program) -> Vec<Candidate> {
    let mut flags: IndexMap<String, Flags> = IndexMap::new();
    // order in which `specialize = true` was first seen
    let mut order: Vec<String> = Vec::new();

    for node in &program.body {
        let Some((object, property, value)) = property_assignment(node) else {
            continue;
        };

        match property {
            "specialize" => {
                let on = matches!(value.kind, NodeKind::Literal(Literal::Bool(true)));
                let entry = flags.entry(object.to_string()).or_default();
                entry.specialize = Some((on, node.span));
                if on && !order.iter().any(|n| n == object) {
                    order.push(object.to_string());
                }
            }
            "staticVars" => match static_names(value) {
                Some(params) => {
                    flags.entry(object.to_string()).or_default().static_vars = Some(params);
                }
                None => warn!(
                    "Ignoring {}.staticVars at {}: expected a string or an array of strings",
                    object, node.span
                ),
            },
            _ => {}
        }
    }

    let candidates: Vec<Candidate> = order
        .into_iter()
        .filter_map(|name| {
            let entry = flags.shift_remove(&name)?;
            let (on, span) = entry.specialize?;
            if !on {
                // flag was switched back off later in the file
                return None;
            }
            Some(Candidate {
                static_params: entry.static_vars.unwrap_or_default(),
                name,
                span,
            })
        })
        .collect();

    debug!("Discovered {} specialization candidates", candidates.len());
    candidates
}

/// Match `object.property = value;` at statement level
fn property_assignment(node: &Node) -> Option<(&str, &str, &Node)> {
    let NodeKind::ExpressionStatement(expr) = &node.kind else {
        return None;
    };
    let NodeKind::Assignment { target, value, .. } = &expr.kind else {
        return None;
    };
    let NodeKind::Member {
        object,
        property,
        computed,
    } = &target.kind
    else {
        return None;
    };

    let object = object.as_identifier()?;
    let property = if *computed {
        match &property.kind {
            NodeKind::Literal(Literal::String { value, .. }) => value.as_str(),
            _ => return None,
        }
    } else {
        property.as_identifier()?
    };
    Some((object, property, value))
}

fn static_names(value: &Node) -> Option<StaticParams> {
    match &value.kind {
        NodeKind::Literal(Literal::String { value, .. }) => Some(
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        NodeKind::Array(items) => items
            .iter()
            .map(|item| match &item.kind {
                NodeKind::Literal(Literal::String { value, .. }) => Some(value.trim().to_string()),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_program;

    fn names(params: &StaticParams) -> Vec<&str> {
        params.iter().collect()
    }

    #[test]
    fn test_discover_array_form() {
        let program = parse_program(
            "function f(x, y) { return x + y; }\n\
             f.specialize = true;\n\
             f.staticVars = ['x'];",
        )
        .unwrap();
        let found = discover(&program);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "f");
        assert_eq!(names(&found[0].static_params), vec!["x"]);
    }

    #[test]
    fn test_discover_string_form() {
        let program = parse_program(
            "function g(a, b, c) { return a; }\n\
             g.staticVars = 'a, c';\n\
             g.specialize = true;",
        )
        .unwrap();
        let found = discover(&program);
        assert_eq!(names(&found[0].static_params), vec!["a", "c"]);
    }

    #[test]
    fn test_unflagged_and_disabled_functions_skipped() {
        let program = parse_program(
            "function f(x) { return x; }\n\
             function g(x) { return x; }\n\
             f.staticVars = ['x'];\n\
             g.specialize = true;\n\
             g.specialize = false;",
        )
        .unwrap();
        assert!(discover(&program).is_empty());
    }

    #[test]
    fn test_order_follows_flags() {
        let program = parse_program(
            "b.specialize = true;\n\
             a.specialize = true;\n\
             b.specialize = true;",
        )
        .unwrap();
        let found: Vec<String> = discover(&program).into_iter().map(|c| c.name).collect();
        assert_eq!(found, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_missing_static_vars_is_empty_list() {
        let program = parse_program("h.specialize = true;").unwrap();
        let found = discover(&program);
        assert!(found[0].static_params.is_empty());
    }

    #[test]
    fn test_computed_property_form() {
        let program = parse_program(
            "f['specialize'] = true;\n\
             f['staticVars'] = ['y'];",
        )
        .unwrap();
        let found = discover(&program);
        assert_eq!(names(&found[0].static_params), vec!["y"]);
    }

    #[test]
    fn test_bad_static_vars_ignored() {
        let program = parse_program(
            "f.specialize = true;\n\
             f.staticVars = [1, 2];",
        )
        .unwrap();
        let found = discover(&program);
        assert!(found[0].static_params.is_empty());
    }
}
