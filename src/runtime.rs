use tracing::trace;

use crate::error::Error;
use crate::token::{Postfix, Token};

fn parse_number(digits: &str) -> Result<i64, Error> {
    digits.parse().map_err(|_| Error::NumberOutOfRange(digits.to_string()))
}

/// Evaluates a postfix sequence with a value stack. An empty sequence
/// evaluates to 0.
pub fn evaluate(postfix: &Postfix) -> Result<i64, Error> {
    let mut stack: Vec<i64> = Vec::with_capacity(postfix.len());

    for token in postfix {
        match token {
            Token::Number(digits) => {
                stack.push(parse_number(digits.as_str())?)
            },
            Token::Operator(op) => {
                // Right-hand operand is on top.
                let b = stack.pop().ok_or(Error::MalformedExpression)?;
                let a = stack.pop().ok_or(Error::MalformedExpression)?;
                let value = op.apply(a, b)?;
                trace!(a, b, op = %op.symbol(), value, "apply");
                stack.push(value);
            },
        }
    }

    match stack.len() {
        0 => Ok(0),
        1 => Ok(stack[0]),
        _ => Err(Error::MalformedExpression),
    }
}

#[cfg(test)]
fn eval(input: &str) -> Result<i64, Error> {
    evaluate(&crate::read::convert(input)?)
}

#[cfg(test)]
fn eval_postfix(input: &str) -> Result<i64, Error> {
    evaluate(&input.parse()?)
}

#[test]
fn test_empty() {
    assert_eq!(evaluate(&Postfix::new()).unwrap(), 0);
}

#[test]
fn test_scenarios() {
    assert_eq!(eval("2 + 4").unwrap(), 6);
    assert_eq!(eval("3 + 4 * 2").unwrap(), 11);
    assert_eq!(eval("(445+(354*95463))").unwrap(), 33794347);
    assert_eq!(eval("4 ^ 3").unwrap(), 64);
    assert_eq!(eval("3 + 4 * 2 / ( 1 - 5 ) ^ 2 ^ 3").unwrap(), 3);
    assert_eq!(eval("( 1 - 5 ) ^ 2").unwrap(), 16);
}

#[test]
fn test_operand_order() {
    assert_eq!(eval_postfix("10 4 -").unwrap(), 6);
    assert_eq!(eval_postfix("10 4 /").unwrap(), 2);
    assert_eq!(eval_postfix("2 10 ^").unwrap(), 1024);
}

#[test]
fn test_division_truncates_toward_zero() {
    assert_eq!(eval("7 / 2").unwrap(), 3);
    assert_eq!(eval("(1 - 8) / 2").unwrap(), -3);
    assert_eq!(eval("7 / (0 - 2)").unwrap(), -3);
}

#[test]
fn test_precedence_property() {
    let ops = ['^', '*', '/', '+', '-'];
    let (a, b, c) = (7, 3, 2);
    for x in ops.iter() {
        for y in ops.iter() {
            let px = crate::operator::Operator::from_symbol(*x).unwrap();
            let py = crate::operator::Operator::from_symbol(*y).unwrap();
            if px.precedence() <= py.precedence() {
                continue;
            }
            let flat = format!("{} {} {} {} {}", a, x, b, y, c);
            let grouped = format!("({} {} {}) {} {}", a, x, b, y, c);
            assert_eq!(eval(&flat).unwrap(), eval(&grouped).unwrap(),
                "{} vs {}", flat, grouped);
        }
    }
}

#[test]
fn test_right_associativity_property() {
    assert_eq!(eval("2 ^ 3 ^ 2").unwrap(), eval("2 ^ (3 ^ 2)").unwrap());
    assert_eq!(eval("2 ^ 3 ^ 2").unwrap(), 512);
    assert_eq!(eval("(2 ^ 3) ^ 2").unwrap(), 64);
}

#[test]
fn test_redundant_parentheses() {
    for expr in &["2 + 4", "3 + 4 * 2 / ( 1 - 5 ) ^ 2 ^ 3", "4 ^ 3", "17"] {
        let wrapped = format!("(({}))", expr);
        let plain = crate::read::convert(expr).unwrap();
        assert_eq!(crate::read::convert(&wrapped).unwrap(), plain);
        assert_eq!(eval(&wrapped).unwrap(), eval(expr).unwrap());
    }
}

#[test]
fn test_deterministic() {
    let expr = "3 + 4 * 2 / ( 1 - 5 ) ^ 2 ^ 3";
    let first = crate::read::convert(expr).unwrap();
    for _ in 0..10 {
        assert_eq!(crate::read::convert(expr).unwrap(), first);
        assert_eq!(evaluate(&first).unwrap(), 3);
    }
}

#[test]
fn test_too_few_operands() {
    assert!(matches!(eval("1 +").unwrap_err(), Error::MalformedExpression));
    assert!(matches!(eval("* 2").unwrap_err(), Error::MalformedExpression));
    assert!(matches!(eval_postfix("+").unwrap_err(),
        Error::MalformedExpression));
}

#[test]
fn test_too_many_operands() {
    assert!(matches!(eval("1 2").unwrap_err(), Error::MalformedExpression));
    assert!(matches!(eval("(1)(2)").unwrap_err(), Error::MalformedExpression));
}

#[test]
fn test_division_by_zero() {
    assert!(matches!(eval("5 / (3 - 3)").unwrap_err(), Error::DivisionByZero));
}

#[test]
fn test_negative_exponent() {
    assert!(matches!(eval("2 ^ (1 - 2)").unwrap_err(),
        Error::NegativeExponent));
}

#[test]
fn test_overflow() {
    assert!(matches!(eval("9223372036854775807 + 1").unwrap_err(),
        Error::Overflow));
    assert!(matches!(eval("3037000500 * 3037000500").unwrap_err(),
        Error::Overflow));
}

#[test]
fn test_number_out_of_range() {
    match eval("99999999999999999999 + 1").unwrap_err() {
        Error::NumberOutOfRange(digits) => {
            assert_eq!(digits, "99999999999999999999")
        },
        err => panic!("unexpected error {:?}", err),
    }
}
