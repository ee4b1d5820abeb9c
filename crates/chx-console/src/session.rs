//! Synchronous console session: read a line, act on it, report.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use chx_core::{
    Color, GameStatus, Move, Position, format_coordinate_move, game_status, generate_legal_moves,
    parse_coordinate_move,
};
use chx_engine::{Engine, NoBook, OpeningBook};

use crate::command::{Command, HELP, parse_command};
use crate::error::ConsoleError;

/// Whether the loop keeps reading after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// A game between the console user and the engine.
pub struct Session {
    engine: Engine,
    book: Box<dyn OpeningBook>,
    position: Position,
    /// Moves played since `position` was set up.
    history: Vec<Move>,
    /// `history` starts at the initial position, so the book applies.
    from_initial: bool,
}

impl Session {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            book: Box::new(NoBook),
            position: Position::initial(),
            history: Vec::new(),
            from_initial: true,
        }
    }

    /// Consult `book` before searching while the game follows it.
    pub fn with_book(mut self, book: impl OpeningBook + 'static) -> Self {
        self.book = Box::new(book);
        self
    }

    /// Continue play from `position`. The opening book is not consulted.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
        self.history.clear();
        self.from_initial = false;
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Read commands from `input` until `quit` or end of input.
    ///
    /// Rejected input is reported on `output` and the session carries on;
    /// only I/O failures end it with an error.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> Result<(), ConsoleError> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            debug!(cmd = %trimmed, "received console line");

            match parse_command(trimmed).and_then(|cmd| self.execute(cmd, output)) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(ConsoleError::Io { source }) => return Err(source.into()),
                Err(e) => {
                    warn!(error = %e, "rejected console input");
                    writeln!(output, "error: {e}")?;
                }
            }
            output.flush()?;
        }
        info!("console session ended");
        Ok(())
    }

    fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow, ConsoleError> {
        match command {
            Command::New => {
                self.position = Position::initial();
                self.history.clear();
                self.from_initial = true;
            }
            Command::Go => {
                self.engine_move(out)?;
            }
            Command::Auto => while self.engine_move(out)? {},
            Command::WhiteDepth(depth) => self.engine.config_mut().depth.set(Color::White, depth)?,
            Command::BlackDepth(depth) => self.engine.config_mut().depth.set(Color::Black, depth)?,
            Command::Search(strategy) => self.engine.config_mut().search = strategy,
            Command::Eval(strategy) => self.engine.config_mut().eval = strategy,
            Command::Threads(threads) => self.engine.config_mut().threads = threads,
            Command::Display => writeln!(out, "{}", self.position)?,
            Command::Fen => writeln!(out, "{}", self.position.to_fen())?,
            Command::Moves => {
                let moves = generate_legal_moves(&self.position);
                let text: Vec<String> = moves.as_slice().iter().map(|&mv| format_coordinate_move(mv)).collect();
                writeln!(out, "{}", text.join(" "))?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Play(text) => {
                let mv = parse_coordinate_move(&text, &generate_legal_moves(&self.position))
                    .ok_or_else(|| ConsoleError::IllegalMove(text.clone()))?;
                self.play(mv, out)?;
            }
            Command::Empty => {}
        }
        Ok(Flow::Continue)
    }

    /// Let the engine move for the side to move. Returns whether the game
    /// goes on afterwards.
    fn engine_move<W: Write>(&mut self, out: &mut W) -> Result<bool, ConsoleError> {
        let status = game_status(&self.position);
        if status.is_over() {
            writeln!(out, "game over: {status}")?;
            return Ok(false);
        }

        let book: &dyn OpeningBook = if self.from_initial { self.book.as_ref() } else { &NoBook };
        let Some(mv) = self.engine.choose_move(&self.position, &self.history, book) else {
            return Ok(false);
        };
        writeln!(out, "move {mv}")?;
        Ok(self.play(mv, out)? == GameStatus::Ongoing)
    }

    /// Play a legal move and report a finished game.
    fn play<W: Write>(&mut self, mv: Move, out: &mut W) -> Result<GameStatus, ConsoleError> {
        self.position = self
            .position
            .apply(mv)
            .map_err(|_| ConsoleError::IllegalMove(mv.to_string()))?;
        self.history.push(mv);

        let status = game_status(&self.position);
        if status.is_over() {
            info!(%status, "game over");
            writeln!(out, "{status}")?;
        }
        Ok(status)
    }
}
