//! Binding-time analysis
//!
//! Classifies every variable of a function body as Static (known once the
//! static parameters are supplied) or Dynamic (known only when the
//! specialized function runs).
//!
//! The analysis is a forward fixpoint over a tag map:
//!
//! 1. Static parameters are Static; the function's other parameters are
//!    Dynamic; every other bound name starts Static.
//! 2. `x = e` joins tag(x) with the tags of the free identifiers of `e`.
//! 3. After an `if`, names assigned on only one branch are Dynamic. Under a
//!    test that stays in the residual program, every name assigned in either
//!    branch is Dynamic.
//! 4. A `for` body is swept until its tags stop changing.
//! 5. The whole body is swept until nothing changes.
//!
//! Tags only ever move from Static to Dynamic, so both fixpoints terminate.

pub mod params;

pub use params::StaticParams;

use crate::frontend::parser::ast::{AssignOp, Function, Node, NodeKind};
use crate::middle::error::{SpecializeError, SpecializeResult};
use crate::util::config::SpecializeConfig;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use tracing::{debug, warn};

/// Binding time of a variable or expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingTime {
    Static,
    Dynamic,
}

impl BindingTime {
    /// Least upper bound; Dynamic dominates
    #[inline]
    pub fn join(
        self,
        other: BindingTime,
    ) -> BindingTime {
        match (self, other) {
            (BindingTime::Static, BindingTime::Static) => BindingTime::Static,
            _ => BindingTime::Dynamic,
        }
    }

    #[inline]
    pub fn is_static(self) -> bool {
        self == BindingTime::Static
    }

    #[inline]
    pub fn is_dynamic(self) -> bool {
        self == BindingTime::Dynamic
    }
}

impl fmt::Display for BindingTime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            BindingTime::Static => write!(f, "static"),
            BindingTime::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Per-loop fixpoint statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Distinct variables bound or referenced by the loop
    pub variables: usize,
    /// Body sweeps that changed at least one tag (worst over all visits)
    pub changing_sweeps: usize,
}

/// Fixpoint statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Whole-body sweeps, including the final stable one
    pub sweeps: usize,
    /// One entry per `for` statement, in source order
    pub loops: Vec<LoopStats>,
}

/// Result of the analysis; read-only once built
#[derive(Debug, Clone)]
pub struct BindingContext {
    function: Option<String>,
    tags: IndexMap<String, BindingTime>,
    static_params: StaticParams,
    /// Static names whose value flows from a static parameter
    input_dependent: IndexSet<String>,
    /// Static locals the generator must track to decide its branches
    mirrored: IndexSet<String>,
    eliminate_static_branches: bool,
    stats: AnalysisStats,
}

impl BindingContext {
    /// Tag of `name`; unknown names are Dynamic
    pub fn tag(
        &self,
        name: &str,
    ) -> BindingTime {
        self.tags.get(name).copied().unwrap_or(BindingTime::Dynamic)
    }

    pub fn is_static(
        &self,
        name: &str,
    ) -> bool {
        self.tag(name).is_static()
    }

    pub fn is_static_param(
        &self,
        name: &str,
    ) -> bool {
        self.static_params.contains(name)
    }

    /// A static parameter that kept its Static tag; read through a placeholder
    pub fn is_hole(
        &self,
        name: &str,
    ) -> bool {
        self.is_static_param(name) && self.is_static(name)
    }

    /// Static parameters that ended up Dynamic, in declaration order
    ///
    /// The specialized function declares these itself, initialized from
    /// their generation-time value.
    pub fn lifted_params(&self) -> Vec<&str> {
        self.static_params
            .iter()
            .filter(|p| !self.is_static(p))
            .collect()
    }

    pub fn is_input_dependent(
        &self,
        name: &str,
    ) -> bool {
        self.input_dependent.contains(name)
    }

    /// Whether bindings of `name` are replayed in the generator
    pub fn is_mirrored(
        &self,
        name: &str,
    ) -> bool {
        self.mirrored.contains(name)
    }

    /// Join over the free identifiers of `expr`
    pub fn expr_time(
        &self,
        expr: &Node,
    ) -> BindingTime {
        let mut time = BindingTime::Static;
        visit_identifiers(expr, &mut |name| time = time.join(self.tag(name)));
        time
    }

    pub fn mentions_input_dependent(
        &self,
        expr: &Node,
    ) -> bool {
        let mut found = false;
        visit_identifiers(expr, &mut |name| found |= self.is_input_dependent(name));
        found
    }

    /// Whether the generator decides this `if` test itself
    pub fn is_reducible(
        &self,
        test: &Node,
    ) -> bool {
        self.eliminate_static_branches
            && self.expr_time(test).is_static()
            && self.mentions_input_dependent(test)
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn static_params(&self) -> &StaticParams {
        &self.static_params
    }

    /// All tagged names, in first-seen order
    pub fn tags(&self) -> impl Iterator<Item = (&str, BindingTime)> {
        self.tags.iter().map(|(name, time)| (name.as_str(), *time))
    }

    pub fn stats(&self) -> &AnalysisStats {
        &self.stats
    }
}

/// Analyze a bare statement list; unbound names are Dynamic
pub fn analyze(
    body: &[Node],
    static_params: &StaticParams,
) -> SpecializeResult<BindingContext> {
    Analyzer::new(static_params, None, &[], true).run(body)
}

/// Analyze a function body, seeding its non-static parameters as Dynamic
pub fn analyze_function(
    func: &Function,
    static_params: &StaticParams,
    config: &SpecializeConfig,
) -> SpecializeResult<BindingContext> {
    let dynamic = static_params.remaining(&func.params);
    Analyzer::new(
        static_params,
        Some(func.name.as_str()),
        &dynamic,
        config.eliminate_static_branches,
    )
    .run(&func.body)
}

struct Analyzer<'a> {
    function: Option<&'a str>,
    static_params: &'a StaticParams,
    dynamic_params: &'a [&'a str],

    // collected by the validating scan
    bound: IndexSet<&'a str>,
    referenced: IndexSet<&'a str>,
    forced_dynamic: IndexSet<&'a str>,

    ctx: BindingContext,
    changed: bool,
    tag_changes: usize,
    loops: IndexMap<*const Node, LoopStats>,
}

impl<'a> Analyzer<'a> {
    fn new(
        static_params: &'a StaticParams,
        function: Option<&'a str>,
        dynamic_params: &'a [&'a str],
        eliminate_static_branches: bool,
    ) -> Self {
        Self {
            function,
            static_params,
            dynamic_params,
            bound: IndexSet::new(),
            referenced: IndexSet::new(),
            forced_dynamic: IndexSet::new(),
            ctx: BindingContext {
                function: function.map(str::to_string),
                tags: IndexMap::new(),
                static_params: static_params.clone(),
                input_dependent: IndexSet::new(),
                mirrored: IndexSet::new(),
                eliminate_static_branches,
                stats: AnalysisStats::default(),
            },
            changed: false,
            tag_changes: 0,
            loops: IndexMap::new(),
        }
    }

    fn run(
        mut self,
        body: &'a [Node],
    ) -> SpecializeResult<BindingContext> {
        for stmt in body {
            self.scan_stmt(stmt)?;
        }
        self.seed();

        // every change is one Static→Dynamic step or one new input-dependent
        // name, so this bound is never reached
        let limit = 2 * self.ctx.tags.len() + 2;
        loop {
            self.changed = false;
            for stmt in body {
                self.sweep_stmt(stmt);
            }
            self.ctx.stats.sweeps += 1;
            if !self.changed {
                break;
            }
            if self.ctx.stats.sweeps >= limit {
                warn!("Binding-time analysis did not settle after {} sweeps", limit);
                break;
            }
        }

        self.ctx.stats.loops = self.loops.values().copied().collect();
        self.ctx.mirrored = mirrored_names(&self.ctx, body);

        debug!(
            "BTA{}: {} names, {} sweeps, {} mirrored",
            self.function.map(|f| format!(" for {}", f)).unwrap_or_default(),
            self.ctx.tags.len(),
            self.ctx.stats.sweeps,
            self.ctx.mirrored.len()
        );
        Ok(self.ctx)
    }

    fn unsupported(
        &self,
        node: &Node,
    ) -> SpecializeError {
        SpecializeError::UnsupportedNodeKind {
            kind: node.kind.name(),
            function: self.function.map(str::to_string),
            span: node.span,
        }
    }

    // ---- validating scan ----

    fn scan_stmt(
        &mut self,
        node: &'a Node,
    ) -> SpecializeResult<()> {
        match &node.kind {
            NodeKind::Block(stmts) => {
                for stmt in stmts {
                    self.scan_stmt(stmt)?;
                }
                Ok(())
            }
            NodeKind::VarDeclList { declarations, .. } => {
                for decl in declarations {
                    self.scan_decl(decl, false)?;
                }
                Ok(())
            }
            NodeKind::VarDecl { .. } => self.scan_decl(node, false),
            NodeKind::ExpressionStatement(expr) => self.scan_effect(expr, false),
            NodeKind::Return(argument) => match argument {
                Some(argument) => self.scan_expr(argument),
                None => Ok(()),
            },
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.scan_expr(test)?;
                self.scan_stmt(consequent)?;
                match alternate {
                    Some(alternate) => self.scan_stmt(alternate),
                    None => Ok(()),
                }
            }
            NodeKind::For {
                init,
                test,
                update,
                body,
            } => {
                if let Some(init) = init {
                    match &init.kind {
                        NodeKind::VarDeclList { declarations, .. } => {
                            for decl in declarations {
                                self.scan_decl(decl, true)?;
                            }
                        }
                        _ => self.scan_effect(init, true)?,
                    }
                }
                if let Some(test) = test {
                    self.scan_expr(test)?;
                }
                if let Some(update) = update {
                    self.scan_effect(update, true)?;
                }
                self.scan_stmt(body)
            }
            _ => Err(self.unsupported(node)),
        }
    }

    fn scan_decl(
        &mut self,
        decl: &'a Node,
        header: bool,
    ) -> SpecializeResult<()> {
        let NodeKind::VarDecl { name, init } = &decl.kind else {
            return Err(self.unsupported(decl));
        };
        self.bind_name(name, header);
        match init {
            Some(init) => self.scan_expr(init),
            None => Ok(()),
        }
    }

    /// Assignment or update in statement position
    fn scan_effect(
        &mut self,
        expr: &'a Node,
        header: bool,
    ) -> SpecializeResult<()> {
        match &expr.kind {
            NodeKind::Assignment { target, value, .. } => {
                let name = self.target_name(target)?;
                self.bind_name(name, header);
                self.scan_expr(value)
            }
            NodeKind::Update { argument, .. } => {
                let name = self.target_name(argument)?;
                self.bind_name(name, header);
                self.referenced.insert(name);
                Ok(())
            }
            _ => Err(self.unsupported(expr)),
        }
    }

    fn scan_expr(
        &mut self,
        expr: &'a Node,
    ) -> SpecializeResult<()> {
        match &expr.kind {
            NodeKind::Literal(_) => Ok(()),
            NodeKind::Identifier(name) => {
                self.referenced.insert(name);
                Ok(())
            }
            NodeKind::Binary { left, right, .. } => {
                self.scan_expr(left)?;
                self.scan_expr(right)
            }
            NodeKind::Unary { argument, .. } => self.scan_expr(argument),
            NodeKind::Update { argument, .. } => {
                // the residual program performs this write at a point the
                // generator does not track
                let name = self.target_name(argument)?;
                self.referenced.insert(name);
                self.bound.insert(name);
                self.forced_dynamic.insert(name);
                Ok(())
            }
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.scan_expr(test)?;
                self.scan_expr(consequent)?;
                self.scan_expr(alternate)
            }
            _ => Err(self.unsupported(expr)),
        }
    }

    fn target_name(
        &self,
        target: &'a Node,
    ) -> SpecializeResult<&'a str> {
        target
            .as_identifier()
            .ok_or_else(|| self.unsupported(target))
    }

    fn bind_name(
        &mut self,
        name: &'a str,
        header: bool,
    ) {
        self.bound.insert(name);
        if header {
            // the loop header is not part of the residual program
            self.forced_dynamic.insert(name);
        }
    }

    fn seed(&mut self) {
        for param in self.static_params.iter() {
            self.ctx.tags.insert(param.to_string(), BindingTime::Static);
            self.ctx.input_dependent.insert(param.to_string());
        }
        for param in self.dynamic_params {
            self.ctx
                .tags
                .entry(param.to_string())
                .or_insert(BindingTime::Dynamic);
        }
        for name in &self.bound {
            self.ctx
                .tags
                .entry(name.to_string())
                .or_insert(BindingTime::Static);
        }
        for name in &self.referenced {
            self.ctx
                .tags
                .entry(name.to_string())
                .or_insert(BindingTime::Dynamic);
        }
        for name in &self.forced_dynamic {
            self.ctx.tags.insert(name.to_string(), BindingTime::Dynamic);
        }
    }

    // ---- fixpoint sweeps ----

    fn sweep_stmt(
        &mut self,
        node: &Node,
    ) {
        match &node.kind {
            NodeKind::Block(stmts) => {
                for stmt in stmts {
                    self.sweep_stmt(stmt);
                }
            }
            NodeKind::VarDeclList { declarations, .. } => {
                for decl in declarations {
                    self.sweep_stmt(decl);
                }
            }
            NodeKind::VarDecl {
                name,
                init: Some(init),
            } => self.assign(name, init, false),
            NodeKind::ExpressionStatement(expr) => {
                if let NodeKind::Assignment { target, op, value } = &expr.kind {
                    if let Some(name) = target.as_identifier() {
                        self.assign(name, value, *op != AssignOp::Assign);
                    }
                }
            }
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                let decided = self.ctx.is_reducible(test);
                let then_names = assigned_names(consequent);
                let else_names = alternate
                    .as_deref()
                    .map(assigned_names)
                    .unwrap_or_default();

                self.sweep_stmt(consequent);
                if let Some(alternate) = alternate {
                    self.sweep_stmt(alternate);
                }

                if decided {
                    for name in then_names.symmetric_difference(&else_names) {
                        self.set_dynamic(name);
                    }
                    // which value a name holds now depends on the test
                    for name in then_names.intersection(&else_names) {
                        self.mark_input_dependent(name);
                    }
                } else {
                    for name in then_names.union(&else_names) {
                        self.set_dynamic(name);
                    }
                }
            }
            NodeKind::For { body, .. } => self.sweep_loop(node, body),
            _ => {}
        }
    }

    fn sweep_loop(
        &mut self,
        node: &Node,
        body: &Node,
    ) {
        let k = loop_variables(node);
        let mut changing = 0;
        for _ in 0..=k {
            let before = self.tag_changes;
            self.sweep_stmt(body);
            if self.tag_changes == before {
                break;
            }
            changing += 1;
        }

        let entry = self.loops.entry(node as *const Node).or_default();
        entry.variables = k;
        entry.changing_sweeps = entry.changing_sweeps.max(changing);
    }

    fn assign(
        &mut self,
        name: &str,
        value: &Node,
        compound: bool,
    ) {
        let mut time = self.ctx.expr_time(value);
        if compound {
            time = time.join(self.ctx.tag(name));
        }
        if time.is_dynamic() {
            self.set_dynamic(name);
        }
        if self.ctx.mentions_input_dependent(value) {
            self.mark_input_dependent(name);
        }
    }

    fn set_dynamic(
        &mut self,
        name: &str,
    ) {
        if self.ctx.tag(name).is_static() {
            self.ctx.tags.insert(name.to_string(), BindingTime::Dynamic);
            self.changed = true;
            self.tag_changes += 1;
        }
    }

    fn mark_input_dependent(
        &mut self,
        name: &str,
    ) {
        if self.ctx.input_dependent.insert(name.to_string()) {
            self.changed = true;
        }
    }
}

/// Call `f` for every identifier read by `expr`
pub fn visit_identifiers(
    expr: &Node,
    f: &mut dyn FnMut(&str),
) {
    match &expr.kind {
        NodeKind::Identifier(name) => f(name),
        NodeKind::Binary { left, right, .. } => {
            visit_identifiers(left, f);
            visit_identifiers(right, f);
        }
        NodeKind::Unary { argument, .. } | NodeKind::Update { argument, .. } => {
            visit_identifiers(argument, f)
        }
        NodeKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            visit_identifiers(test, f);
            visit_identifiers(consequent, f);
            visit_identifiers(alternate, f);
        }
        NodeKind::Assignment { target, value, .. } => {
            visit_identifiers(target, f);
            visit_identifiers(value, f);
        }
        _ => {}
    }
}

/// Names declared, assigned or updated anywhere under `node`
pub fn assigned_names(node: &Node) -> IndexSet<String> {
    fn collect(
        node: &Node,
        out: &mut IndexSet<String>,
    ) {
        match &node.kind {
            NodeKind::Block(stmts) => stmts.iter().for_each(|s| collect(s, out)),
            NodeKind::VarDeclList { declarations, .. } => {
                declarations.iter().for_each(|d| collect(d, out))
            }
            NodeKind::VarDecl { name, .. } => {
                out.insert(name.clone());
            }
            NodeKind::ExpressionStatement(expr) => collect(expr, out),
            NodeKind::Assignment { target, .. } | NodeKind::Update { argument: target, .. } => {
                if let Some(name) = target.as_identifier() {
                    out.insert(name.to_string());
                }
            }
            NodeKind::If {
                consequent,
                alternate,
                ..
            } => {
                collect(consequent, out);
                if let Some(alternate) = alternate {
                    collect(alternate, out);
                }
            }
            NodeKind::For {
                init, update, body, ..
            } => {
                for clause in [init, update].into_iter().flatten() {
                    collect(clause, out);
                }
                collect(body, out);
            }
            _ => {}
        }
    }

    let mut out = IndexSet::new();
    collect(node, &mut out);
    out
}

/// Distinct variables a loop binds or reads
fn loop_variables(node: &Node) -> usize {
    fn collect(
        node: &Node,
        out: &mut IndexSet<String>,
    ) {
        match &node.kind {
            NodeKind::Block(stmts) => stmts.iter().for_each(|s| collect(s, out)),
            NodeKind::VarDeclList { declarations, .. } => {
                declarations.iter().for_each(|d| collect(d, out))
            }
            NodeKind::VarDecl { name, init } => {
                out.insert(name.clone());
                if let Some(init) = init {
                    collect(init, out);
                }
            }
            NodeKind::ExpressionStatement(expr) => collect(expr, out),
            NodeKind::Return(Some(expr)) => collect(expr, out),
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                collect(test, out);
                collect(consequent, out);
                if let Some(alternate) = alternate {
                    collect(alternate, out);
                }
            }
            NodeKind::For {
                init,
                test,
                update,
                body,
            } => {
                for clause in [init, test, update].into_iter().flatten() {
                    collect(clause, out);
                }
                collect(body, out);
            }
            _ => visit_identifiers(node, &mut |name| {
                out.insert(name.to_string());
            }),
        }
    }

    let mut out = IndexSet::new();
    collect(node, &mut out);
    out.len()
}

/// Static locals the generator has to replay: everything a reducible test
/// reads, closed over the definitions of those names
fn mirrored_names(
    ctx: &BindingContext,
    body: &[Node],
) -> IndexSet<String> {
    fn collect(
        ctx: &BindingContext,
        node: &Node,
        seeds: &mut IndexSet<String>,
        deps: &mut IndexMap<String, IndexSet<String>>,
    ) {
        match &node.kind {
            NodeKind::Block(stmts) => stmts.iter().for_each(|s| collect(ctx, s, seeds, deps)),
            NodeKind::VarDeclList { declarations, .. } => declarations
                .iter()
                .for_each(|d| collect(ctx, d, seeds, deps)),
            NodeKind::VarDecl { name, init } => depend(deps, name, init.as_deref(), false),
            NodeKind::ExpressionStatement(expr) => match &expr.kind {
                NodeKind::Assignment { target, op, value } => {
                    if let Some(name) = target.as_identifier() {
                        depend(deps, name, Some(value), *op != AssignOp::Assign);
                    }
                }
                NodeKind::Update { argument, .. } => {
                    if let Some(name) = argument.as_identifier() {
                        depend(deps, name, None, true);
                    }
                }
                _ => {}
            },
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                if ctx.is_reducible(test) {
                    visit_identifiers(test, &mut |n| {
                        seeds.insert(n.to_string());
                    });
                }
                collect(ctx, consequent, seeds, deps);
                if let Some(alternate) = alternate {
                    collect(ctx, alternate, seeds, deps);
                }
            }
            NodeKind::For { body, .. } => collect(ctx, body, seeds, deps),
            _ => {}
        }
    }

    fn depend(
        deps: &mut IndexMap<String, IndexSet<String>>,
        name: &str,
        expr: Option<&Node>,
        reads_self: bool,
    ) {
        let entry = deps.entry(name.to_string()).or_default();
        if reads_self {
            entry.insert(name.to_string());
        }
        if let Some(expr) = expr {
            visit_identifiers(expr, &mut |n| {
                entry.insert(n.to_string());
            });
        }
    }

    let mut seeds = IndexSet::new();
    let mut deps = IndexMap::new();
    for stmt in body {
        collect(ctx, stmt, &mut seeds, &mut deps);
    }
    // holes are filled from generator state, so their definitions run there too
    for name in ctx.static_params.iter() {
        if ctx.is_hole(name) {
            seeds.insert(name.to_string());
        }
    }

    let mut mirrored = IndexSet::new();
    let mut work: Vec<String> = seeds.into_iter().collect();
    while let Some(name) = work.pop() {
        if !ctx.is_static(&name) || !mirrored.insert(name.clone()) {
            continue;
        }
        if let Some(reads) = deps.get(&name) {
            work.extend(reads.iter().cloned());
        }
    }

    // static parameters live in the generator already
    mirrored.retain(|name| !ctx.is_static_param(name));
    mirrored
}
