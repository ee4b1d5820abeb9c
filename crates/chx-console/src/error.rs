//! Console errors.

use chx_engine::ConfigError;

/// Errors raised while reading or acting on console input.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Input that is neither a command nor a coordinate move.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command given without its argument.
    #[error("`{command}` needs an argument")]
    MissingArgument {
        /// The command missing its argument.
        command: &'static str,
    },

    /// A numeric argument that does not parse.
    #[error("`{command}`: `{value}` is not a number")]
    InvalidNumber {
        command: &'static str,
        value: String,
    },

    /// A well-formed move that is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// A setting the engine configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading input or writing output failed.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
