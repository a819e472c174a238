use crate::operator::Operator;

/// What a single input character means to the converter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Digit(char),
    Operator(Operator),
    LeftParen,
    RightParen,
    Newline,
    Whitespace,
    Invalid(char),
}

pub fn classify(c: char) -> CharClass {
    if c.is_ascii_digit() {
        return CharClass::Digit(c);
    }
    if let Some(op) = Operator::from_symbol(c) {
        return CharClass::Operator(op);
    }
    match c {
        '(' => CharClass::LeftParen,
        ')' => CharClass::RightParen,
        '\n' => CharClass::Newline,
        c if c.is_whitespace() => CharClass::Whitespace,
        c => CharClass::Invalid(c),
    }
}

/// Converter state between two characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    // Digits of a number seen so far; never empty.
    Accumulating(String),
    // An error ended the expression early; skip to the newline.
    Discarding,
    // A newline finished the expression; the next character starts over.
    Complete,
}

impl Default for State {
    fn default() -> State {
        State::Idle
    }
}

#[test]
fn test_classify_digits() {
    for c in "0123456789".chars() {
        assert_eq!(classify(c), CharClass::Digit(c));
    }
}

#[test]
fn test_classify_symbols() {
    assert_eq!(classify('^'), CharClass::Operator(Operator::Pow));
    assert_eq!(classify('-'), CharClass::Operator(Operator::Sub));
    assert_eq!(classify('('), CharClass::LeftParen);
    assert_eq!(classify(')'), CharClass::RightParen);
}

#[test]
fn test_classify_space() {
    assert_eq!(classify('\n'), CharClass::Newline);
    assert_eq!(classify(' '), CharClass::Whitespace);
    assert_eq!(classify('\t'), CharClass::Whitespace);
    assert_eq!(classify('\r'), CharClass::Whitespace);
}

#[test]
fn test_classify_invalid() {
    assert_eq!(classify('x'), CharClass::Invalid('x'));
    assert_eq!(classify('.'), CharClass::Invalid('.'));
    // Non-ASCII digits are not numbers here.
    assert_eq!(classify('٣'), CharClass::Invalid('٣'));
}
