//! Console command parsing.

use chx_engine::{EvalStrategy, SearchStrategy};

use crate::error::ConsoleError;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `new` -- start a new game from the initial position.
    New,
    /// `go` -- the engine moves for the side to move.
    Go,
    /// `auto` -- the engine plays both sides until the game ends.
    Auto,
    /// `wd N` -- White's search depth.
    WhiteDepth(u32),
    /// `bd N` -- Black's search depth.
    BlackDepth(u32),
    /// `search <name>`
    Search(SearchStrategy),
    /// `eval <name>`
    Eval(EvalStrategy),
    /// `threads N`
    Threads(usize),
    /// `d` -- print the board.
    Display,
    /// `fen` -- print the position as FEN.
    Fen,
    /// `moves` -- list the legal moves.
    Moves,
    /// `help` -- list the commands.
    Help,
    /// `quit` or `exit`.
    Quit,
    /// A coordinate move such as `e2e4` or `e7e8q`.
    Play(String),
    /// Blank input.
    Empty,
}

/// Parse one line of console input.
pub fn parse_command(line: &str) -> Result<Command, ConsoleError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return Ok(Command::Empty);
    };
    let arg = tokens.get(1).copied();

    match head {
        "new" => Ok(Command::New),
        "go" => Ok(Command::Go),
        "auto" => Ok(Command::Auto),
        "wd" => Ok(Command::WhiteDepth(parse_number(arg, "wd")?)),
        "bd" => Ok(Command::BlackDepth(parse_number(arg, "bd")?)),
        "threads" => Ok(Command::Threads(parse_number(arg, "threads")?)),
        "search" => Ok(Command::Search(required(arg, "search")?.parse()?)),
        "eval" => Ok(Command::Eval(required(arg, "eval")?.parse()?)),
        "d" => Ok(Command::Display),
        "fen" => Ok(Command::Fen),
        "moves" => Ok(Command::Moves),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        text if looks_like_move(text) => Ok(Command::Play(text.to_string())),
        other => Err(ConsoleError::UnknownCommand(other.to_string())),
    }
}

fn required<'a>(arg: Option<&'a str>, command: &'static str) -> Result<&'a str, ConsoleError> {
    arg.ok_or(ConsoleError::MissingArgument { command })
}

fn parse_number<T: std::str::FromStr>(arg: Option<&str>, command: &'static str) -> Result<T, ConsoleError> {
    let value = required(arg, command)?;
    value.parse().map_err(|_| ConsoleError::InvalidNumber {
        command,
        value: value.to_string(),
    })
}

/// Command summary printed by `help`.
pub const HELP: &str = "\
new            start a new game
go             engine moves for the side to move
auto           engine plays both sides until the game ends
wd N, bd N     search depth for White / Black
search NAME    minimax, alphabeta or mtdf
eval NAME      simple or original
threads N      parallel worker slots (0 searches serially)
d              show the board
fen            show the position as FEN
moves          list the legal moves
e2e4, e7e8q    play a move in coordinate notation
help           show this list
quit, exit     leave";

/// Shape check only; legality is decided against the position.
fn looks_like_move(text: &str) -> bool {
    let b = text.as_bytes();
    let square = |file: u8, rank: u8| (b'a'..=b'h').contains(&file) && (b'1'..=b'8').contains(&rank);
    match b.len() {
        4 => square(b[0], b[1]) && square(b[2], b[3]),
        5 => square(b[0], b[1]) && square(b[2], b[3]) && b"nbrqNBRQ".contains(&b[4]),
        _ => false,
    }
}
