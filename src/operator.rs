use std::collections::HashMap;

use num::traits::{CheckedAdd, CheckedMul, CheckedSub};
use num::Integer;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Pow,
    Mul,
    Div,
    Add,
    Sub,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug)]
pub struct OperatorInfo {
    pub operator: Operator,
    pub precedence: u8,
    pub associativity: Associativity,
}

lazy_static! {
    static ref OPERATORS: HashMap<char, OperatorInfo> = hashmap! {
        '^' => OperatorInfo {
            operator: Operator::Pow,
            precedence: 4,
            associativity: Associativity::Right,
        },
        '*' => OperatorInfo {
            operator: Operator::Mul,
            precedence: 3,
            associativity: Associativity::Left,
        },
        '/' => OperatorInfo {
            operator: Operator::Div,
            precedence: 3,
            associativity: Associativity::Left,
        },
        '+' => OperatorInfo {
            operator: Operator::Add,
            precedence: 2,
            associativity: Associativity::Left,
        },
        '-' => OperatorInfo {
            operator: Operator::Sub,
            precedence: 2,
            associativity: Associativity::Left,
        },
    };
}

impl Operator {
    pub fn from_symbol(c: char) -> Option<Operator> {
        OPERATORS.get(&c).map(|info| info.operator)
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Pow => '^',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Add => '+',
            Operator::Sub => '-',
        }
    }

    // Every variant has an entry, see test_table_covers_all_operators.
    fn info(self) -> &'static OperatorInfo {
        &OPERATORS[&self.symbol()]
    }

    pub fn precedence(self) -> u8 {
        self.info().precedence
    }

    pub fn associativity(self) -> Associativity {
        self.info().associativity
    }

    /// Whether `self`, sitting on top of the operator stack, has to be moved
    /// to the output before `incoming` is pushed.
    pub fn should_yield_to(self, incoming: Operator) -> bool {
        match self.associativity() {
            Associativity::Left => self.precedence() >= incoming.precedence(),
            Associativity::Right => self.precedence() > incoming.precedence(),
        }
    }

    /// Computes `a OP b`.
    pub fn apply(self, a: i64, b: i64) -> Result<i64, Error> {
        match self {
            Operator::Add => CheckedAdd::checked_add(&a, &b)
                .ok_or(Error::Overflow),
            Operator::Sub => CheckedSub::checked_sub(&a, &b)
                .ok_or(Error::Overflow),
            Operator::Mul => CheckedMul::checked_mul(&a, &b)
                .ok_or(Error::Overflow),
            Operator::Div => {
                if b == 0 {
                    return Err(Error::DivisionByZero);
                }
                // Truncates toward zero; only i64::MIN / -1 can fail here.
                a.checked_div(b).ok_or(Error::Overflow)
            },
            Operator::Pow => {
                if b < 0 {
                    return Err(Error::NegativeExponent);
                }
                pow(a, b)
            },
        }
    }
}

/// Exponentiation by squaring.
pub fn pow(x: i64, n: i64) -> Result<i64, Error> {
    if n == 0 {
        return Ok(1);
    }
    if n == 1 {
        return Ok(x);
    }
    let square = CheckedMul::checked_mul(&x, &x).ok_or(Error::Overflow)?;
    if n.is_even() {
        pow(square, n / 2)
    } else {
        CheckedMul::checked_mul(&x, &pow(square, (n - 1) / 2)?)
            .ok_or(Error::Overflow)
    }
}

#[test]
fn test_table_covers_all_operators() {
    for op in &[Operator::Pow, Operator::Mul, Operator::Div, Operator::Add,
        Operator::Sub] {
        assert_eq!(Operator::from_symbol(op.symbol()), Some(*op));
    }
    assert_eq!(OPERATORS.len(), 5);
}

#[test]
fn test_precedence() {
    assert_eq!(Operator::Pow.precedence(), 4);
    assert_eq!(Operator::Mul.precedence(), 3);
    assert_eq!(Operator::Div.precedence(), 3);
    assert_eq!(Operator::Add.precedence(), 2);
    assert_eq!(Operator::Sub.precedence(), 2);
}

#[test]
fn test_only_pow_is_right_associative() {
    assert_eq!(Operator::Pow.associativity(), Associativity::Right);
    for c in "*/+-".chars() {
        let op = Operator::from_symbol(c).unwrap();
        assert_eq!(op.associativity(), Associativity::Left);
    }
}

#[test]
fn test_not_an_operator() {
    assert_eq!(Operator::from_symbol('('), None);
    assert_eq!(Operator::from_symbol('%'), None);
    assert_eq!(Operator::from_symbol('7'), None);
}

#[test]
fn test_should_yield_to() {
    assert!(Operator::Sub.should_yield_to(Operator::Add));
    assert!(Operator::Mul.should_yield_to(Operator::Add));
    assert!(!Operator::Add.should_yield_to(Operator::Mul));
    assert!(!Operator::Pow.should_yield_to(Operator::Pow));
    assert!(Operator::Pow.should_yield_to(Operator::Div));
}

#[test]
fn test_pow() {
    assert_eq!(pow(4, 3).unwrap(), 64);
    assert_eq!(pow(-4, 0).unwrap(), 1);
    assert_eq!(pow(0, 0).unwrap(), 1);
    assert_eq!(pow(-2, 5).unwrap(), -32);
    assert_eq!(pow(2, 62).unwrap(), 1 << 62);
    assert_eq!(pow(3, 39).unwrap(), 4052555153018976267);
    assert_eq!(pow(1i64 << 40, 1).unwrap(), 1 << 40);
}

#[test]
fn test_pow_overflow() {
    assert!(matches!(pow(2, 63).unwrap_err(), Error::Overflow));
    assert!(matches!(pow(10, 19).unwrap_err(), Error::Overflow));
}

#[test]
fn test_apply() {
    assert_eq!(Operator::Add.apply(2, 4).unwrap(), 6);
    assert_eq!(Operator::Sub.apply(1, 5).unwrap(), -4);
    assert_eq!(Operator::Mul.apply(354, 95463).unwrap(), 33793902);
    assert_eq!(Operator::Div.apply(8, 3).unwrap(), 2);
    assert_eq!(Operator::Div.apply(-7, 2).unwrap(), -3);
    assert_eq!(Operator::Pow.apply(-4, 2).unwrap(), 16);
}

#[test]
fn test_apply_errors() {
    assert!(matches!(Operator::Div.apply(1, 0).unwrap_err(),
        Error::DivisionByZero));
    assert!(matches!(Operator::Div.apply(i64::MIN, -1).unwrap_err(),
        Error::Overflow));
    assert!(matches!(Operator::Pow.apply(2, -1).unwrap_err(),
        Error::NegativeExponent));
    assert!(matches!(Operator::Add.apply(i64::MAX, 1).unwrap_err(),
        Error::Overflow));
    assert!(matches!(Operator::Sub.apply(i64::MIN, 1).unwrap_err(),
        Error::Overflow));
}
