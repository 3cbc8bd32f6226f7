//! 生成期求值模块
//!
//! 生成扩展在拿到静态参数值后运行的那一层：JavaScript 原始值语义、
//! 表达式求值与静态绑定语句执行。

pub mod evaluator;
pub mod value;

#[cfg(test)]
mod tests;

pub use evaluator::{evaluate_binop, evaluate_unop, ConstEvalEnv, ConstEvaluator};
pub use value::Value;

/// Number::toString, the way JavaScript spells a number
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }

    // shortest round-trip digits, e.g. "1.2345e-7"
    let sci = format!("{:e}", n);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let k = digits.len() as i32;
    let point = exponent + 1;

    if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let sign = if point - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, (point - 1).abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, (point - 1).abs())
        }
    }
}
