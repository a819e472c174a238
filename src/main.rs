use std::io;
use std::process;

use clap::Parser;
use tracing::error;

use shunt::config::Config;
use shunt::Repl;

fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut repl = Repl::new(stdin.lock(), stdout.lock(), &config);
    if let Err(err) = repl.run() {
        error!(%err, "input stream failed");
        process::exit(1);
    }
}
