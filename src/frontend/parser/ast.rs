//! Abstract Syntax Tree types
//!
//! One `Node` type covers statements and expressions, ESTree style. The
//! specializer only reads it.

use crate::util::span::Span;
use std::fmt;

/// Syntax tree node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    /// Create a new node
    #[inline]
    pub fn new(
        kind: NodeKind,
        span: Span,
    ) -> Self {
        Self { kind, span }
    }

    /// Create a node without source location
    #[inline]
    pub fn synthetic(kind: NodeKind) -> Self {
        Self {
            kind,
            span: Span::dummy(),
        }
    }

    /// Identifier name, if this node is one
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// Node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // ---- expressions ----
    Literal(Literal),
    Identifier(String),
    Binary {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        argument: Box<Node>,
    },
    Update {
        op: UpdateOp,
        argument: Box<Node>,
        prefix: bool,
    },
    Conditional {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    Assignment {
        target: Box<Node>,
        op: AssignOp,
        value: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    Member {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    Array(Vec<Node>),
    Object(Vec<Property>),

    // ---- statements ----
    Block(Vec<Node>),
    ExpressionStatement(Box<Node>),
    /// A single declarator `name = init`
    VarDecl {
        name: String,
        init: Option<Box<Node>>,
    },
    VarDeclList {
        kind: DeclKind,
        declarations: Vec<Node>,
    },
    If {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    For {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    While {
        test: Box<Node>,
        body: Box<Node>,
    },
    Return(Option<Box<Node>>),
    Break,
    Continue,
    Throw(Box<Node>),
    Function(Function),
    Empty,
}

impl NodeKind {
    /// ESTree name of the node kind, used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Literal(_) => "Literal",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::Binary { op, .. } if op.is_logical() => "LogicalExpression",
            NodeKind::Binary { .. } => "BinaryExpression",
            NodeKind::Unary { .. } => "UnaryExpression",
            NodeKind::Update { .. } => "UpdateExpression",
            NodeKind::Conditional { .. } => "ConditionalExpression",
            NodeKind::Assignment { .. } => "AssignmentExpression",
            NodeKind::Call { .. } => "CallExpression",
            NodeKind::Member { .. } => "MemberExpression",
            NodeKind::Array(_) => "ArrayExpression",
            NodeKind::Object(_) => "ObjectExpression",
            NodeKind::Block(_) => "BlockStatement",
            NodeKind::ExpressionStatement(_) => "ExpressionStatement",
            NodeKind::VarDecl { .. } => "VariableDeclarator",
            NodeKind::VarDeclList { .. } => "VariableDeclaration",
            NodeKind::If { .. } => "IfStatement",
            NodeKind::For { .. } => "ForStatement",
            NodeKind::While { .. } => "WhileStatement",
            NodeKind::Return(_) => "ReturnStatement",
            NodeKind::Break => "BreakStatement",
            NodeKind::Continue => "ContinueStatement",
            NodeKind::Throw(_) => "ThrowStatement",
            NodeKind::Function(_) => "FunctionDeclaration",
            NodeKind::Empty => "EmptyStatement",
        }
    }
}

/// Literal value; `raw` keeps the source spelling for residual output
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number { value: f64, raw: String },
    String { value: String, raw: String },
    Bool(bool),
    Null,
}

impl Literal {
    /// Build a number literal with a canonical spelling
    pub fn number(value: f64) -> Self {
        Literal::Number {
            value,
            raw: crate::middle::const_eval::format_number(value),
        }
    }

    /// Build a double-quoted string literal
    pub fn string(value: &str) -> Self {
        Literal::String {
            value: value.to_string(),
            raw: serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value)),
        }
    }

    /// Source text of the literal
    pub fn raw(&self) -> &str {
        match self {
            Literal::Number { raw, .. } | Literal::String { raw, .. } => raw,
            Literal::Bool(true) => "true",
            Literal::Bool(false) => "false",
            Literal::Null => "null",
        }
    }
}

/// Object literal property
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Node,
}

/// Function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Node>,
    pub span: Span,
}

/// Parsed source file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Node>,
}

impl Program {
    /// Top-level function declarations, in source order
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.body.iter().filter_map(|node| match &node.kind {
            NodeKind::Function(func) => Some(func),
            _ => None,
        })
    }

    /// Find a top-level function by name
    pub fn find_function(
        &self,
        name: &str,
    ) -> Option<&Function> {
        self.functions().find(|f| f.name == name)
    }
}

/// Declaration keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Var => "var",
            DeclKind::Let => "let",
            DeclKind::Const => "const",
        }
    }
}

/// Binary operators (logical `&&`/`||` included)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::StrictEq => "===",
            BinOp::StrictNe => "!==",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::UShr => ">>>",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// JavaScript precedence level; larger binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            BinOp::Or => 4,
            BinOp::And => 5,
            BinOp::BitOr => 6,
            BinOp::BitXor => 7,
            BinOp::BitAnd => 8,
            BinOp::Eq | BinOp::Ne | BinOp::StrictEq | BinOp::StrictNe => 9,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 10,
            BinOp::Shl | BinOp::Shr | BinOp::UShr => 11,
            BinOp::Add | BinOp::Sub => 12,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 13,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
        }
    }

    /// Keyword operators need a space before their operand
    pub fn is_keyword(&self) -> bool {
        matches!(self, UnaryOp::Typeof | UnaryOp::Void)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `++` / `--`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

impl fmt::Display for UpdateOp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
        }
    }

    /// The binary operator a compound assignment applies, `None` for `=`
    pub fn binary(&self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinOp::Add),
            AssignOp::Sub => Some(BinOp::Sub),
            AssignOp::Mul => Some(BinOp::Mul),
            AssignOp::Div => Some(BinOp::Div),
            AssignOp::Mod => Some(BinOp::Mod),
            AssignOp::Shl => Some(BinOp::Shl),
            AssignOp::Shr => Some(BinOp::Shr),
            AssignOp::UShr => Some(BinOp::UShr),
            AssignOp::BitAnd => Some(BinOp::BitAnd),
            AssignOp::BitOr => Some(BinOp::BitOr),
            AssignOp::BitXor => Some(BinOp::BitXor),
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
