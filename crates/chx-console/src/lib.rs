//! Line-oriented console front end for chx.

pub mod command;
pub mod error;
pub mod session;

pub use command::{Command, HELP, parse_command};
pub use error::ConsoleError;
pub use session::Session;
