//! Integer calculator built on the shunting-yard algorithm.
//!
//! Infix characters are fed to a [`read::Converter`], which produces a
//! [`token::Postfix`] queue; [`runtime::evaluate`] then reduces that queue to
//! a single `i64`. [`session::Session`] ties the two together for callers
//! that work one character at a time, and [`session::Repl`] runs the
//! interactive loop.

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate maplit;

pub mod config;
pub mod error;
pub mod operator;
pub mod read;
pub mod runtime;
pub mod session;
pub mod token;

pub use crate::error::Error;
pub use crate::session::{Evaluation, Repl, Session};
