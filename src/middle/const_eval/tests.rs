//! 生成期求值测试

mod format_tests {
    use super::super::format_number;

    #[test]
    fn test_integers_and_fractions() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(123.456), "123.456");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_exponent_thresholds() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1.5e-10), "1.5e-10");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }
}

mod value_tests {
    use super::super::Value;

    #[test]
    fn test_to_number() {
        assert_eq!(Value::String(" 12 ".into()).to_number(), 12.0);
        assert_eq!(Value::String("".into()).to_number(), 0.0);
        assert_eq!(Value::String("0x1f".into()).to_number(), 31.0);
        assert_eq!(Value::String("0x10000000000000000".into()).to_number(), 18_446_744_073_709_551_616.0);
        assert!(Value::String("0x".into()).to_number().is_nan());
        assert!(Value::String("inf".into()).to_number().is_nan());
        assert!(Value::Undefined.to_number().is_nan());
        assert_eq!(Value::Null.to_number(), 0.0);
        assert_eq!(Value::Bool(true).to_number(), 1.0);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Number(0.0).to_boolean());
        assert!(!Value::Number(f64::NAN).to_boolean());
        assert!(!Value::String(String::new()).to_boolean());
        assert!(Value::String("0".into()).to_boolean());
        assert!(!Value::Null.to_boolean());
    }

    #[test]
    fn test_equality() {
        assert!(Value::Null.loose_equals(&Value::Undefined));
        assert!(!Value::Null.strict_equals(&Value::Undefined));
        assert!(Value::String("1".into()).loose_equals(&Value::Number(1.0)));
        assert!(Value::Bool(true).loose_equals(&Value::Number(1.0)));
        assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
        assert!(!Value::Null.loose_equals(&Value::Number(0.0)));
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(Value::String("a\"b".into()).to_literal_text(), r#""a\"b""#);
        assert_eq!(Value::Number(3.0).to_literal_text(), "3");
        assert_eq!(Value::Number(-2.5).to_literal_text(), "-2.5");
        assert_eq!(Value::Number(f64::NAN).to_literal_text(), "NaN");
        assert_eq!(Value::Number(f64::INFINITY).to_literal_text(), "Infinity");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_literal_text(), "-Infinity");
        assert_eq!(Value::Number(-0.0).to_literal_text(), "-0");
        assert_eq!(Value::Number(0.0).to_literal_text(), "0");
        assert_eq!(Value::Null.to_literal_text(), "null");
    }

    #[test]
    fn test_from_json_rejects_containers() {
        let json = serde_json::json!([1, 2]);
        assert!(Value::from_json("xs", &json).is_err());
        let json = serde_json::json!(2.5);
        assert_eq!(Value::from_json("x", &json), Ok(Value::Number(2.5)));
    }
}

mod evaluator_tests {
    use super::super::{ConstEvaluator, Value};
    use crate::frontend::parse_program;
    use crate::frontend::parser::parse_expression;
    use crate::frontend::lexer::tokenize;
    use crate::middle::error::EvalError;

    fn eval(
        evaluator: &mut ConstEvaluator,
        source: &str,
    ) -> Result<Value, EvalError> {
        let tokens = tokenize(source).unwrap();
        let expr = parse_expression(&tokens).unwrap();
        evaluator.evaluate(&expr)
    }

    #[test]
    fn test_basic_arithmetic() {
        let mut evaluator = ConstEvaluator::new();
        assert_eq!(eval(&mut evaluator, "10 + 20 * 2"), Ok(Value::Number(50.0)));
        assert_eq!(eval(&mut evaluator, "7 % 3"), Ok(Value::Number(1.0)));
        assert_eq!(eval(&mut evaluator, "1 / 0"), Ok(Value::Number(f64::INFINITY)));
    }

    #[test]
    fn test_string_concatenation() {
        let mut evaluator = ConstEvaluator::new();
        assert_eq!(
            eval(&mut evaluator, "'a' + 1 + 2"),
            Ok(Value::String("a12".into()))
        );
        assert_eq!(
            eval(&mut evaluator, "1 + 2 + 'a'"),
            Ok(Value::String("3a".into()))
        );
    }

    #[test]
    fn test_bitwise_and_shifts() {
        let mut evaluator = ConstEvaluator::new();
        assert_eq!(eval(&mut evaluator, "5 & 3"), Ok(Value::Number(1.0)));
        assert_eq!(eval(&mut evaluator, "1 << 33"), Ok(Value::Number(2.0)));
        assert_eq!(eval(&mut evaluator, "-1 >>> 28"), Ok(Value::Number(15.0)));
        assert_eq!(eval(&mut evaluator, "-8 >> 1"), Ok(Value::Number(-4.0)));
        assert_eq!(eval(&mut evaluator, "~5"), Ok(Value::Number(-6.0)));
    }

    #[test]
    fn test_logical_returns_operands() {
        let mut evaluator = ConstEvaluator::new();
        assert_eq!(eval(&mut evaluator, "0 || 'x'"), Ok(Value::String("x".into())));
        assert_eq!(eval(&mut evaluator, "0 && missing"), Ok(Value::Number(0.0)));
    }

    #[test]
    fn test_comparisons() {
        let mut evaluator = ConstEvaluator::new();
        assert_eq!(eval(&mut evaluator, "'b' > 'a'"), Ok(Value::Bool(true)));
        assert_eq!(eval(&mut evaluator, "'10' < 9"), Ok(Value::Bool(false)));
        assert_eq!(eval(&mut evaluator, "NaN <= NaN"), Ok(Value::Bool(false)));
        assert_eq!(eval(&mut evaluator, "typeof null"), Ok(Value::String("object".into())));
    }

    #[test]
    fn test_environment_and_updates() {
        let mut evaluator = ConstEvaluator::new();
        evaluator.env_mut().bind("x", Value::Number(5.0));
        assert_eq!(eval(&mut evaluator, "x++"), Ok(Value::Number(5.0)));
        assert_eq!(eval(&mut evaluator, "++x"), Ok(Value::Number(7.0)));
        assert_eq!(eval(&mut evaluator, "x *= 2"), Ok(Value::Number(14.0)));
        assert_eq!(evaluator.env().get("x"), Some(&Value::Number(14.0)));
    }

    #[test]
    fn test_unbound_variable() {
        let mut evaluator = ConstEvaluator::new();
        let err = eval(&mut evaluator, "y + 1").unwrap_err();
        assert!(matches!(err, EvalError::UnboundVariable { ref name, .. } if name == "y"));
    }

    #[test]
    fn test_execute_declarations() {
        let program = parse_program("var a = 2, b; let c = a * 3; var a;").unwrap();
        let mut evaluator = ConstEvaluator::new();
        for stmt in &program.body {
            evaluator.execute(stmt).unwrap();
        }
        assert_eq!(evaluator.env().get("a"), Some(&Value::Number(2.0)));
        assert_eq!(evaluator.env().get("b"), Some(&Value::Undefined));
        assert_eq!(evaluator.env().get("c"), Some(&Value::Number(6.0)));
    }

    #[test]
    fn test_calls_are_rejected() {
        let mut evaluator = ConstEvaluator::new();
        evaluator.env_mut().bind("f", Value::Null);
        let err = eval(&mut evaluator, "f(1)").unwrap_err();
        assert!(matches!(
            err,
            EvalError::UnsupportedNode {
                kind: "CallExpression",
                ..
            }
        ));
    }
}
