//! 生成期求值引擎
//!
//! 在生成期执行静态计算：分支测试、静态绑定镜像语句，以及生成扩展的实例化。
//! 支持：
//! - 算术、位运算、移位
//! - 宽松/严格相等与关系比较
//! - 短路逻辑运算（返回操作数本身）
//! - 一元运算、条件表达式
//! - 自增自减与复合赋值
//! - 递归深度限制

use super::value::Value;
use crate::frontend::parser::ast::{
    BinOp, DeclKind, Node, NodeKind, UnaryOp, UpdateOp,
};
use crate::middle::error::EvalError;
use std::cmp::Ordering;
use std::collections::HashMap;

/// 求值环境
#[derive(Debug, Clone)]
pub struct ConstEvalEnv {
    /// 变量绑定
    variables: HashMap<String, Value>,
    /// 最大递归深度
    max_depth: usize,
}

impl ConstEvalEnv {
    /// 创建新的求值环境
    pub fn new() -> Self {
        ConstEvalEnv {
            variables: HashMap::new(),
            max_depth: 1000,
        }
    }

    /// 添加变量绑定
    pub fn bind(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) {
        self.variables.insert(name.into(), value);
    }

    /// 获取变量值
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.variables.contains_key(name)
    }
}

impl Default for ConstEvalEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// 生成期求值器
#[derive(Debug, Default)]
pub struct ConstEvaluator {
    env: ConstEvalEnv,
}

impl ConstEvaluator {
    pub fn new() -> Self {
        ConstEvaluator {
            env: ConstEvalEnv::new(),
        }
    }

    /// 使用已有环境创建求值器
    pub fn with_env(env: ConstEvalEnv) -> Self {
        ConstEvaluator { env }
    }

    pub fn env(&self) -> &ConstEvalEnv {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut ConstEvalEnv {
        &mut self.env
    }

    /// 求值表达式
    pub fn evaluate(
        &mut self,
        expr: &Node,
    ) -> Result<Value, EvalError> {
        self.evaluate_with_depth(expr, 0)
    }

    /// 执行一条生成期语句（声明、赋值、自增自减、块）
    pub fn execute(
        &mut self,
        stmt: &Node,
    ) -> Result<(), EvalError> {
        match &stmt.kind {
            NodeKind::Block(stmts) => {
                for s in stmts {
                    self.execute(s)?;
                }
                Ok(())
            }
            NodeKind::VarDeclList { kind, declarations } => {
                for decl in declarations {
                    self.declare(*kind, decl)?;
                }
                Ok(())
            }
            NodeKind::VarDecl { .. } => self.declare(DeclKind::Var, stmt),
            NodeKind::ExpressionStatement(expr) => self.evaluate(expr).map(|_| ()),
            NodeKind::Empty => Ok(()),
            other => Err(EvalError::UnsupportedNode {
                kind: other.name(),
                span: stmt.span,
            }),
        }
    }

    fn declare(
        &mut self,
        kind: DeclKind,
        decl: &Node,
    ) -> Result<(), EvalError> {
        let NodeKind::VarDecl { name, init } = &decl.kind else {
            return Err(EvalError::UnsupportedNode {
                kind: decl.kind.name(),
                span: decl.span,
            });
        };
        match init {
            Some(init) => {
                let value = self.evaluate(init)?;
                self.env.bind(name.clone(), value);
            }
            // `var x;` keeps an existing binding
            None if kind == DeclKind::Var && self.env.contains(name) => {}
            None => self.env.bind(name.clone(), Value::Undefined),
        }
        Ok(())
    }

    /// 带深度的求值（内部使用）
    fn evaluate_with_depth(
        &mut self,
        expr: &Node,
        depth: usize,
    ) -> Result<Value, EvalError> {
        if depth > self.env.max_depth {
            return Err(EvalError::RecursionTooDeep {
                depth,
                max_depth: self.env.max_depth,
            });
        }

        match &expr.kind {
            NodeKind::Literal(literal) => Ok(Value::from_literal(literal)),
            NodeKind::Identifier(name) => self.lookup(name, expr),
            NodeKind::Binary { op, left, right } => {
                let left_val = self.evaluate_with_depth(left, depth + 1)?;
                // 短路：返回操作数本身
                match op {
                    BinOp::And if !left_val.to_boolean() => return Ok(left_val),
                    BinOp::Or if left_val.to_boolean() => return Ok(left_val),
                    BinOp::And | BinOp::Or => return self.evaluate_with_depth(right, depth + 1),
                    _ => {}
                }
                let right_val = self.evaluate_with_depth(right, depth + 1)?;
                Ok(evaluate_binop(*op, &left_val, &right_val))
            }
            NodeKind::Unary { op, argument } => {
                let val = self.evaluate_with_depth(argument, depth + 1)?;
                Ok(evaluate_unop(*op, &val))
            }
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.evaluate_with_depth(test, depth + 1)?.to_boolean() {
                    self.evaluate_with_depth(consequent, depth + 1)
                } else {
                    self.evaluate_with_depth(alternate, depth + 1)
                }
            }
            NodeKind::Update {
                op,
                argument,
                prefix,
            } => {
                let name = self.target_name(argument)?;
                let old = self.lookup(name, argument)?.to_number();
                let new = match op {
                    UpdateOp::Increment => old + 1.0,
                    UpdateOp::Decrement => old - 1.0,
                };
                self.env.bind(name, Value::Number(new));
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            NodeKind::Assignment { target, op, value } => {
                let name = self.target_name(target)?;
                let rhs = self.evaluate_with_depth(value, depth + 1)?;
                let result = match op.binary() {
                    None => rhs,
                    Some(bin) => {
                        let current = self.lookup(name, target)?;
                        evaluate_binop(bin, &current, &rhs)
                    }
                };
                self.env.bind(name, result.clone());
                Ok(result)
            }
            other => Err(EvalError::UnsupportedNode {
                kind: other.name(),
                span: expr.span,
            }),
        }
    }

    fn target_name<'n>(
        &self,
        target: &'n Node,
    ) -> Result<&'n str, EvalError> {
        target
            .as_identifier()
            .ok_or(EvalError::InvalidAssignmentTarget { span: target.span })
    }

    fn lookup(
        &self,
        name: &str,
        node: &Node,
    ) -> Result<Value, EvalError> {
        if let Some(value) = self.env.get(name) {
            return Ok(value.clone());
        }
        match name {
            "undefined" => Ok(Value::Undefined),
            "NaN" => Ok(Value::Number(f64::NAN)),
            "Infinity" => Ok(Value::Number(f64::INFINITY)),
            _ => Err(EvalError::UnboundVariable {
                name: name.to_string(),
                span: node.span,
            }),
        }
    }
}

/// 求值二元运算（不含短路逻辑）
pub fn evaluate_binop(
    op: BinOp,
    left: &Value,
    right: &Value,
) -> Value {
    match op {
        // 算术运算
        BinOp::Add => match (left, right) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Value::String(format!("{}{}", left, right))
            }
            _ => Value::Number(left.to_number() + right.to_number()),
        },
        BinOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinOp::Mod => Value::Number(left.to_number() % right.to_number()),
        // 比较运算
        BinOp::Eq => Value::Bool(left.loose_equals(right)),
        BinOp::Ne => Value::Bool(!left.loose_equals(right)),
        BinOp::StrictEq => Value::Bool(left.strict_equals(right)),
        BinOp::StrictNe => Value::Bool(!left.strict_equals(right)),
        BinOp::Lt => Value::Bool(left.compare(right) == Some(Ordering::Less)),
        BinOp::Gt => Value::Bool(left.compare(right) == Some(Ordering::Greater)),
        BinOp::Le => Value::Bool(matches!(
            left.compare(right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinOp::Ge => Value::Bool(matches!(
            left.compare(right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        // 位运算
        BinOp::BitAnd => Value::Number((left.to_int32() & right.to_int32()) as f64),
        BinOp::BitOr => Value::Number((left.to_int32() | right.to_int32()) as f64),
        BinOp::BitXor => Value::Number((left.to_int32() ^ right.to_int32()) as f64),
        BinOp::Shl => {
            Value::Number(left.to_int32().wrapping_shl(right.to_uint32() & 31) as f64)
        }
        BinOp::Shr => {
            Value::Number(left.to_int32().wrapping_shr(right.to_uint32() & 31) as f64)
        }
        BinOp::UShr => {
            Value::Number(left.to_uint32().wrapping_shr(right.to_uint32() & 31) as f64)
        }
        // 逻辑运算（已求值的两侧）
        BinOp::And => {
            if left.to_boolean() {
                right.clone()
            } else {
                left.clone()
            }
        }
        BinOp::Or => {
            if left.to_boolean() {
                left.clone()
            } else {
                right.clone()
            }
        }
    }
}

/// 求值一元运算
pub fn evaluate_unop(
    op: UnaryOp,
    val: &Value,
) -> Value {
    match op {
        UnaryOp::Neg => Value::Number(-val.to_number()),
        UnaryOp::Plus => Value::Number(val.to_number()),
        UnaryOp::Not => Value::Bool(!val.to_boolean()),
        UnaryOp::BitNot => Value::Number(!val.to_int32() as f64),
        UnaryOp::Typeof => Value::String(val.type_name().to_string()),
        UnaryOp::Void => Value::Undefined,
    }
}
