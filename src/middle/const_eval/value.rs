//! 生成期值模型
//!
//! JavaScript 原始值及其类型转换（ToNumber / ToString / ToBoolean）。

use super::format_number;
use crate::frontend::lexer::literals::hex_value;
use crate::frontend::parser::ast::Literal;
use crate::middle::error::EvalError;
use std::cmp::Ordering;
use std::fmt;

/// A JavaScript primitive value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Number { value, .. } => Value::Number(*value),
            Literal::String { value, .. } => Value::String(value.clone()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }

    /// Convert a static argument; arrays and objects are rejected
    pub fn from_json(
        name: &str,
        json: &serde_json::Value,
    ) -> Result<Self, EvalError> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => Ok(Value::Number(n.as_f64().unwrap_or(f64::NAN))),
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            serde_json::Value::Array(_) => Err(EvalError::InvalidStaticValue {
                name: name.to_string(),
                found: "array",
            }),
            serde_json::Value::Object(_) => Err(EvalError::InvalidStaticValue {
                name: name.to_string(),
                found: "object",
            }),
        }
    }

    /// `typeof` result
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
        }
    }

    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
        }
    }

    /// ToInt32
    pub fn to_int32(&self) -> i32 {
        self.to_uint32() as i32
    }

    /// ToUint32
    pub fn to_uint32(&self) -> u32 {
        let n = self.to_number();
        if !n.is_finite() {
            return 0;
        }
        n.trunc().rem_euclid(4_294_967_296.0) as u32
    }

    /// Source literal for the value, as spliced by a json-interpolated hole
    pub fn to_literal_text(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) if *n == 0.0 && n.is_sign_negative() => "-0".to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => {
                serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
            }
        }
    }

    /// Strict equality (`===`)
    pub fn strict_equals(
        &self,
        other: &Value,
    ) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            _ => self == other,
        }
    }

    /// Loose equality (`==`)
    pub fn loose_equals(
        &self,
        other: &Value,
    ) -> bool {
        match (self, other) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
            (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
                self.to_number() == other.to_number()
            }
            (Value::Bool(_), _) => Value::Number(self.to_number()).loose_equals(other),
            (_, Value::Bool(_)) => self.loose_equals(&Value::Number(other.to_number())),
            _ => self.strict_equals(other),
        }
    }

    /// Abstract relational comparison; `None` when either side is NaN
    pub fn compare(
        &self,
        other: &Value,
    ) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }
}

impl fmt::Display for Value {
    /// ToString
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
        }
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"));
    if let Some(digits) = hex {
        return hex_value(digits).unwrap_or(f64::NAN);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // Rust also accepts "inf" and "nan", JavaScript does not
    let numeric = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}
