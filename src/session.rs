use std::fmt;
use std::io::{BufRead, Write};

use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::read::Converter;
use crate::runtime::evaluate;
use crate::token::Postfix;

/// A finished expression: its postfix form and its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub postfix: Postfix,
    pub value: i64,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rpn: {} = {}", self.postfix, self.value)
    }
}

/// One evaluator session. Sessions share nothing, so independent callers
/// each need their own.
#[derive(Debug, Default)]
pub struct Session {
    converter: Converter,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Feeds one character; true once a newline completed the expression.
    /// Feeding on past a completed expression drops it unevaluated.
    pub fn feed(&mut self, c: char) -> bool {
        self.converter.consume(c)
    }

    /// Converts and evaluates what was fed since the last result. An
    /// expression that was never terminated by a newline is finalized
    /// first.
    pub fn result(&mut self) -> Result<Evaluation, Error> {
        self.converter.finalize();
        let postfix = self.converter.take()?;
        let value = evaluate(&postfix)?;
        Ok(Evaluation { postfix, value })
    }
}

/// Read-eval-print loop over an arbitrary character stream.
pub struct Repl<R, W> {
    input: R,
    output: W,
    session: Session,
    prompt: String,
    echo_rpn: bool,
    postfix_input: bool,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W, config: &Config) -> Self {
        Repl {
            input,
            output,
            session: Session::new(),
            prompt: config.prompt.clone(),
            echo_rpn: !config.no_rpn,
            postfix_input: config.postfix,
        }
    }

    /// Runs until the input is exhausted. Bad expressions are reported and
    /// skipped; only stream errors end the loop early.
    ///
    /// Blank lines print nothing and just prompt again instead of echoing
    /// `rpn:  = 0`; `evaluate` itself still maps an empty queue to 0.
    pub fn run(&mut self) -> Result<(), Error> {
        let mut buf = Vec::new();
        loop {
            write!(self.output, "{}", self.prompt)?;
            self.output.flush()?;

            buf.clear();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                debug!("end of input");
                return Ok(());
            }
            // Undecodable bytes turn into U+FFFD and get reported as invalid
            // characters.
            let line = String::from_utf8_lossy(&buf);
            if line.trim().is_empty() {
                continue;
            }

            let outcome = if self.postfix_input {
                line.parse::<Postfix>().and_then(|postfix| {
                    let value = evaluate(&postfix)?;
                    Ok(Evaluation { postfix, value })
                })
            } else {
                self.evaluate_line(&line)
            };
            self.report(outcome)?;
        }
    }

    fn evaluate_line(&mut self, line: &str) -> Result<Evaluation, Error> {
        for c in line.chars() {
            if self.session.feed(c) {
                break;
            }
        }
        self.session.result()
    }

    fn report(&mut self, outcome: Result<Evaluation, Error>) ->
        Result<(), Error> {

        match outcome {
            Ok(evaluation) => {
                debug!(postfix = %evaluation.postfix, value = evaluation.value,
                    "evaluated");
                if self.echo_rpn && !self.postfix_input {
                    writeln!(self.output, "{}", evaluation)?;
                } else {
                    writeln!(self.output, "= {}", evaluation.value)?;
                }
            },
            Err(err) => {
                debug!(%err, "expression rejected");
                writeln!(self.output, "error: {}", err)?;
            },
        }
        Ok(())
    }
}

#[cfg(test)]
fn run_repl(input: &str, args: &[&str]) -> String {
    use clap::Parser;

    let mut argv = vec!["shunt"];
    argv.extend_from_slice(args);
    let config = Config::try_parse_from(argv).unwrap();
    let mut output = Vec::new();
    Repl::new(std::io::Cursor::new(input), &mut output, &config)
        .run()
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_session_feed_and_result() {
    let mut session = Session::new();
    let mut done = false;
    for c in "3 + 4 * 2\n".chars() {
        done = session.feed(c);
    }
    assert!(done);
    let evaluation = session.result().unwrap();
    assert_eq!(evaluation.postfix.to_string(), "3 4 2 * +");
    assert_eq!(evaluation.value, 11);
    assert_eq!(evaluation.to_string(), "rpn: 3 4 2 * + = 11");
}

#[test]
fn test_session_result_without_newline() {
    let mut session = Session::new();
    for c in "4 ^ 3".chars() {
        assert!(!session.feed(c));
    }
    assert_eq!(session.result().unwrap().value, 64);
}

#[test]
fn test_session_recovers_after_error() {
    let mut session = Session::new();
    for c in "5 / 0\n".chars() {
        session.feed(c);
    }
    assert!(matches!(session.result().unwrap_err(), Error::DivisionByZero));
    for c in "2 + 4\n".chars() {
        session.feed(c);
    }
    assert_eq!(session.result().unwrap().value, 6);
}

#[test]
fn test_session_drops_untaken_result() {
    let mut session = Session::new();
    for c in "1\n".chars() {
        session.feed(c);
    }
    for c in "2\n".chars() {
        session.feed(c);
    }
    let evaluation = session.result().unwrap();
    assert_eq!(evaluation.to_string(), "rpn: 2 = 2");
}

#[test]
fn test_session_unterminated_after_untaken_result() {
    let mut session = Session::new();
    for c in "7 * 6\n5 - ".chars() {
        session.feed(c);
    }
    for c in "3".chars() {
        session.feed(c);
    }
    assert_eq!(session.result().unwrap().value, 2);
}

#[test]
fn test_repl_transcript() {
    let output = run_repl("2 + 4\n3 + 4 * 2\n(445+(354*95463))\n", &[]);
    assert_eq!(output, "> rpn: 2 4 + = 6\n\
        > rpn: 3 4 2 * + = 11\n\
        > rpn: 445 354 95463 * + = 33794347\n\
        > ");
}

#[test]
fn test_repl_errors_do_not_stop_the_loop() {
    let output = run_repl("1 + 2)\n(1\n1 ? 1\n4 ^ 3\n", &[]);
    assert_eq!(output, "> error: unbalanced parentheses\n\
        > error: unbalanced parentheses\n\
        > error: invalid character '?' at column 3\n\
        > rpn: 4 3 ^ = 64\n\
        > ");
}

#[test]
fn test_repl_blank_lines_and_trailing_line() {
    let output = run_repl("\n   \n( 1 - 5 ) ^ 2", &[]);
    assert_eq!(output, "> > > rpn: 1 5 - 2 ^ = 16\n> ");
}

#[test]
fn test_repl_crlf_input() {
    let output = run_repl("2 + 4\r\n", &["--no-rpn", "--prompt", ""]);
    assert_eq!(output, "= 6\n");
}

#[test]
fn test_repl_invalid_utf8() {
    let mut output = Vec::new();
    let config = {
        use clap::Parser;
        Config::try_parse_from(&["shunt", "--prompt", ""]).unwrap()
    };
    let input: &[u8] = b"1 + \xff\n7\n";
    Repl::new(input, &mut output, &config).run().unwrap();
    assert_eq!(String::from_utf8(output).unwrap(),
        "error: invalid character '\u{fffd}' at column 5\nrpn: 7 = 7\n");
}

#[test]
fn test_repl_postfix_input() {
    let output = run_repl("3 4 2 * 1 5 - 2 3 ^ ^ / +\n1 +\nx\n",
        &["--postfix", "--prompt", "rpn> "]);
    assert_eq!(output, "rpn> = 3\n\
        rpn> error: malformed expression\n\
        rpn> error: invalid postfix expression: \"x\"\n\
        rpn> ");
}
