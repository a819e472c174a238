use clap::Parser;
use tracing::Level;

#[derive(Parser, Debug)]
#[clap(name = "shunt")]
#[clap(
    about = "Reads infix integer expressions, one per line, and prints their \
        postfix form and value.",
    version,
    author
)]
pub struct Config {
    #[clap(long, default_value = "> ", help = "Prompt printed before each \
        expression")]
    pub prompt: String,

    #[clap(name = "no-rpn", long = "no-rpn", help = "Print only the value, \
        without the postfix form")]
    pub no_rpn: bool,

    #[clap(long, help = "Read postfix (RPN) expressions instead of infix")]
    pub postfix: bool,

    #[clap(name = "debug", short, long, help = "Enable debug logging")]
    pub debug: bool,
}

impl Config {
    pub fn log_level(&self) -> Level {
        if self.debug {
            Level::DEBUG
        } else {
            Level::WARN
        }
    }
}

#[test]
fn test_defaults() {
    let config = Config::try_parse_from(&["shunt"]).unwrap();
    assert_eq!(config.prompt, "> ");
    assert!(!config.no_rpn);
    assert!(!config.postfix);
    assert_eq!(config.log_level(), Level::WARN);
}

#[test]
fn test_flags() {
    let config = Config::try_parse_from(&["shunt", "-d", "--no-rpn",
        "--postfix", "--prompt", "calc: "]).unwrap();
    assert_eq!(config.prompt, "calc: ");
    assert!(config.no_rpn);
    assert!(config.postfix);
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_unknown_flag() {
    assert!(Config::try_parse_from(&["shunt", "--float"]).is_err());
}
