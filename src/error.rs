use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("invalid character {character:?} at column {column}")]
    InvalidCharacter { character: char, column: usize },
    #[error("malformed expression")]
    MalformedExpression,
    #[error("division by zero")]
    DivisionByZero,
    #[error("negative exponent")]
    NegativeExponent,
    #[error("integer overflow")]
    Overflow,
    #[error("number out of range: {0}")]
    NumberOutOfRange(String),
    #[error("invalid postfix expression: {0:?}")]
    InvalidPostfix(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[test]
fn test_invalid_character_message() {
    let err = Error::InvalidCharacter { character: 'x', column: 3 };
    assert_eq!(err.to_string(), "invalid character 'x' at column 3");
}
