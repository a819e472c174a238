use std::fmt;
use std::slice;
use std::str::FromStr;

use nom::character::complete::{anychar, digit1, multispace0};
use nom::branch::alt;
use nom::combinator::{all_consuming, map_opt};
use nom::multi::many0;
use nom::sequence::{preceded, terminated};
use nom::IResult;

use crate::error::Error;
use crate::operator::Operator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Operator,
}

/// A non-empty run of ASCII digits, the text of a `Number` token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Digits(String);

impl Digits {
    pub fn new<S: Into<String>>(text: S) -> Option<Digits> {
        let text = text.into();
        if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            Some(Digits(text))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One entry of a postfix sequence. A `Number` keeps its decimal text and is
/// only converted to an integer when evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Number(Digits),
    Operator(Operator),
}

impl Token {
    pub fn number<S: Into<String>>(text: S) -> Option<Token> {
        Digits::new(text).map(Token::Number)
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Number(_) => TokenKind::Number,
            Token::Operator(_) => TokenKind::Operator,
        }
    }

    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(digits) => f.write_str(digits.as_str()),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
        }
    }
}

/// The output queue: tokens in postfix order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Postfix(Vec<Token>);

impl Postfix {
    pub fn new() -> Postfix {
        Postfix(Vec::new())
    }

    pub fn push(&mut self, token: Token) {
        self.0.push(token);
    }

    pub fn iter(&self) -> slice::Iter<'_, Token> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a Postfix {
    type Item = &'a Token;
    type IntoIter = slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens = self.iter();
        if let Some(first) = tokens.next() {
            write!(f, "{}", first)?;
            for token in tokens {
                write!(f, " {}", token)?;
            }
        }
        Ok(())
    }
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        map_opt(digit1, Token::number),
        map_opt(anychar, |c| Operator::from_symbol(c).map(Token::Operator)),
    ))(input)
}

fn tokens(input: &str) -> IResult<&str, Vec<Token>> {
    all_consuming(terminated(many0(preceded(multispace0, token)),
        multispace0))(input)
}

/// Reads postfix text such as `3 4 2 * +`, the format `Display` produces.
impl FromStr for Postfix {
    type Err = Error;

    fn from_str(input: &str) -> Result<Postfix, Error> {
        match tokens(input) {
            Ok((_, tokens)) => Ok(Postfix(tokens)),
            Err(_) => Err(Error::InvalidPostfix(input.trim_end().to_string())),
        }
    }
}

#[test]
fn test_token_text() {
    assert_eq!(Token::number("95463").unwrap().text(), "95463");
    assert_eq!(Token::Operator(Operator::Pow).text(), "^");
    assert_eq!(Token::number("0").unwrap().kind(), TokenKind::Number);
    assert_eq!(Token::Operator(Operator::Sub).kind(), TokenKind::Operator);
}

#[test]
fn test_number_needs_digits() {
    assert!(Token::number("").is_none());
    assert!(Token::number("12a").is_none());
    assert!(Token::number(" 1").is_none());
    assert!(Digits::new("-3").is_none());
    assert_eq!(Digits::new("007").unwrap().as_str(), "007");
}

#[test]
fn test_postfix_display() {
    let mut postfix = Postfix::new();
    assert_eq!(postfix.to_string(), "");
    postfix.push(Token::number("2").unwrap());
    postfix.push(Token::number("4").unwrap());
    postfix.push(Token::Operator(Operator::Add));
    assert_eq!(postfix.to_string(), "2 4 +");
    assert_eq!(postfix.len(), 3);
    postfix.clear();
    assert!(postfix.is_empty());
}

#[test]
fn test_parse_postfix() {
    let postfix: Postfix = "3 4 2 * 1 5 - 2 3 ^ ^ / +".parse().unwrap();
    assert_eq!(postfix.len(), 13);
    assert_eq!(postfix.iter().nth(3), Some(&Token::Operator(Operator::Mul)));
    assert_eq!(postfix.to_string(), "3 4 2 * 1 5 - 2 3 ^ ^ / +");
}

#[test]
fn test_parse_postfix_loose_spacing() {
    let postfix: Postfix = "  445\t354 95463*+\n".parse().unwrap();
    assert_eq!(postfix.to_string(), "445 354 95463 * +");
}

#[test]
fn test_parse_postfix_empty() {
    assert!("".parse::<Postfix>().unwrap().is_empty());
    assert!(" \n".parse::<Postfix>().unwrap().is_empty());
}

#[test]
fn test_parse_postfix_invalid() {
    let err = "1 2 % +\n".parse::<Postfix>().unwrap_err();
    assert_eq!(err.to_string(), "invalid postfix expression: \"1 2 % +\"");
    assert!("( 1 2 + )".parse::<Postfix>().is_err());
}
