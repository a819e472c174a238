mod lexer;

use std::mem;

use tracing::{debug, trace};

use crate::error::Error;
use crate::operator::Operator;
use crate::token::{Postfix, Token};
use self::lexer::{classify, CharClass, State};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StackEntry {
    Operator(Operator),
    LeftParen,
}

/// Shunting-yard converter from infix characters to a postfix queue.
///
/// Characters are fed one at a time through `consume`; a newline finishes
/// the expression, after which `take` hands over the result and leaves the
/// converter ready for the next expression.
#[derive(Debug, Default)]
pub struct Converter {
    state: State,
    stack: Vec<StackEntry>,
    output: Postfix,
    // First error seen in the current expression.
    error: Option<Error>,
    column: usize,
}

impl Converter {
    pub fn new() -> Self {
        Converter::default()
    }

    /// Advances by one character. Returns true once a newline has completed
    /// the expression. A result that was never taken is dropped when the
    /// next expression starts.
    pub fn consume(&mut self, c: char) -> bool {
        if self.state == State::Complete {
            debug!("discarding untaken result");
            self.reset();
        }
        self.column += 1;
        let class = classify(c);
        trace!(?class, state = ?self.state, "consume");

        if self.state == State::Discarding {
            if class == CharClass::Newline {
                self.state = State::Complete;
                return true;
            }
            return false;
        }

        match class {
            CharClass::Digit(d) => self.push_digit(d),
            CharClass::Operator(op) => {
                self.flush_number();
                self.handle_operator(op);
            },
            CharClass::LeftParen => {
                self.flush_number();
                self.stack.push(StackEntry::LeftParen);
            },
            CharClass::RightParen => {
                self.flush_number();
                self.close_paren();
            },
            CharClass::Newline => {
                self.finalize();
                self.state = State::Complete;
                return true;
            },
            CharClass::Whitespace => self.flush_number(),
            CharClass::Invalid(character) => {
                self.flush_number();
                debug!(?character, column = self.column, "invalid character");
                self.record(Error::InvalidCharacter {
                    character,
                    column: self.column,
                });
            },
        }
        false
    }

    /// Moves everything still pending into the output queue.
    pub fn finalize(&mut self) {
        if self.state == State::Discarding || self.state == State::Complete {
            return;
        }
        self.flush_number();
        while let Some(entry) = self.stack.pop() {
            match entry {
                StackEntry::Operator(op) => {
                    self.output.push(Token::Operator(op))
                },
                StackEntry::LeftParen => {
                    self.abort(Error::UnbalancedParentheses);
                    return;
                },
            }
        }
    }

    /// Hands over the finished postfix queue, or the first error the
    /// expression ran into, and resets for the next expression.
    pub fn take(&mut self) -> Result<Postfix, Error> {
        let output = mem::take(&mut self.output);
        let error = self.error.take();
        self.reset();
        match error {
            Some(err) => Err(err),
            None => Ok(output),
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.stack.clear();
        self.output.clear();
        self.error = None;
        self.column = 0;
    }

    fn push_digit(&mut self, d: char) {
        match self.state {
            State::Accumulating(ref mut digits) => digits.push(d),
            _ => self.state = State::Accumulating(d.to_string()),
        }
    }

    fn flush_number(&mut self) {
        if let State::Accumulating(digits) = mem::take(&mut self.state) {
            // Only push_digit fills the accumulator, so this always holds.
            if let Some(token) = Token::number(digits) {
                self.output.push(token);
            }
        }
    }

    fn handle_operator(&mut self, incoming: Operator) {
        while let Some(&StackEntry::Operator(top)) = self.stack.last() {
            if !top.should_yield_to(incoming) {
                break;
            }
            self.stack.pop();
            self.output.push(Token::Operator(top));
        }
        self.stack.push(StackEntry::Operator(incoming));
    }

    fn close_paren(&mut self) {
        loop {
            match self.stack.pop() {
                Some(StackEntry::Operator(op)) => {
                    self.output.push(Token::Operator(op))
                },
                Some(StackEntry::LeftParen) => return,
                None => {
                    self.abort(Error::UnbalancedParentheses);
                    return;
                },
            }
        }
    }

    fn record(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn abort(&mut self, err: Error) {
        debug!(%err, column = self.column, "abandoning expression");
        self.record(err);
        self.state = State::Discarding;
        self.stack.clear();
    }
}

/// Converts a whole line; a missing trailing newline is implied.
pub fn convert(input: &str) -> Result<Postfix, Error> {
    let mut converter = Converter::new();
    let mut done = false;
    for c in input.chars() {
        done = converter.consume(c);
        if done {
            break;
        }
    }
    if !done {
        converter.finalize();
    }
    converter.take()
}

#[cfg(test)]
fn rpn(input: &str) -> String {
    convert(input).unwrap().to_string()
}

#[test]
fn test_convert_scenarios() {
    assert_eq!(rpn(""), "");
    assert_eq!(rpn("2 + 4"), "2 4 +");
    assert_eq!(rpn("3 + 4 * 2"), "3 4 2 * +");
    assert_eq!(rpn("(445+(354*95463))"), "445 354 95463 * +");
    assert_eq!(rpn("4 ^ 3"), "4 3 ^");
    assert_eq!(rpn("3 + 4 * 2 / ( 1 - 5 ) ^ 2 ^ 3"),
        "3 4 2 * 1 5 - 2 3 ^ ^ / +");
    assert_eq!(rpn("( 1 - 5 ) ^ 2"), "1 5 - 2 ^");
}

#[test]
fn test_left_associative() {
    assert_eq!(rpn("1 - 2 - 3"), "1 2 - 3 -");
    assert_eq!(rpn("8 / 4 * 2"), "8 4 / 2 *");
}

#[test]
fn test_right_associative() {
    assert_eq!(rpn("2^3^2"), "2 3 2 ^ ^");
}

#[test]
fn test_multi_digit_numbers() {
    assert_eq!(rpn("12345+067"), "12345 067 +");
    assert_eq!(rpn("  42  "), "42");
}

#[test]
fn test_consume_reports_completion() {
    let mut converter = Converter::new();
    for c in "1 + 2".chars() {
        assert!(!converter.consume(c));
    }
    assert!(converter.consume('\n'));
    assert_eq!(converter.take().unwrap().to_string(), "1 2 +");
}

#[test]
fn test_state_is_reset_between_expressions() {
    let mut converter = Converter::new();
    for c in "(1 + 2\n".chars() {
        converter.consume(c);
    }
    assert!(converter.take().is_err());
    for c in "3 * 4\n".chars() {
        converter.consume(c);
    }
    assert_eq!(converter.take().unwrap().to_string(), "3 4 *");
}

#[test]
fn test_unmatched_close_paren() {
    let err = convert("1 + 2)").unwrap_err();
    assert!(matches!(err, Error::UnbalancedParentheses));
}

#[test]
fn test_unclosed_open_paren() {
    let err = convert("(1 + 2").unwrap_err();
    assert!(matches!(err, Error::UnbalancedParentheses));
}

#[test]
fn test_close_paren_discards_rest_of_line() {
    let mut converter = Converter::new();
    let mut done = false;
    for c in ") 1 + x 2\n".chars() {
        done = converter.consume(c);
    }
    assert!(done);
    // The 'x' after the abort is never looked at.
    assert!(matches!(converter.take().unwrap_err(),
        Error::UnbalancedParentheses));
}

#[test]
fn test_invalid_character() {
    match convert("1 + a * 2").unwrap_err() {
        Error::InvalidCharacter { character, column } => {
            assert_eq!(character, 'a');
            assert_eq!(column, 5);
        },
        err => panic!("unexpected error {:?}", err),
    }
}

#[test]
fn test_invalid_character_keeps_first_error() {
    match convert("1 $ 2 )").unwrap_err() {
        Error::InvalidCharacter { character, .. } => assert_eq!(character, '$'),
        err => panic!("unexpected error {:?}", err),
    }
}

#[test]
fn test_number_split_by_space() {
    assert_eq!(rpn("1 2"), "1 2");
}

#[test]
fn test_untaken_result_is_dropped() {
    let mut converter = Converter::new();
    for c in "1\n".chars() {
        converter.consume(c);
    }
    assert!(!converter.consume('2'));
    assert!(converter.consume('\n'));
    assert_eq!(converter.take().unwrap().to_string(), "2");
}

#[test]
fn test_untaken_error_is_dropped() {
    let mut converter = Converter::new();
    for c in ")\n(3 + 4) * 2\n".chars() {
        converter.consume(c);
    }
    assert_eq!(converter.take().unwrap().to_string(), "3 4 + 2 *");
}

#[test]
fn test_finalize_after_newline_is_a_no_op() {
    let mut converter = Converter::new();
    for c in "2 ^ 3\n".chars() {
        converter.consume(c);
    }
    converter.finalize();
    assert_eq!(converter.take().unwrap().to_string(), "2 3 ^");
}
