use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use chx_console::Session;
use chx_core::{Color, Position};
use chx_engine::{Engine, EngineConfig, EvalStrategy, LineBook, SearchStrategy, SideDepths};

#[derive(Parser)]
#[command(name = "chx")]
#[command(about = "Parallel alpha-beta chess engine with a line-oriented console")]
struct Args {
    /// Parallel worker slots (0 searches on one thread); overrides CHX_THREADS
    #[arg(short, long)]
    threads: Option<usize>,

    /// Search depth for both sides
    #[arg(short, long)]
    depth: Option<u8>,

    /// Search depth for White
    #[arg(long)]
    white_depth: Option<u32>,

    /// Search depth for Black
    #[arg(long)]
    black_depth: Option<u32>,

    /// Search strategy (minimax, alphabeta, mtdf)
    #[arg(short, long)]
    search: Option<SearchStrategy>,

    /// Evaluation (simple, original)
    #[arg(short, long)]
    eval: Option<EvalStrategy>,

    /// Disable the transposition table
    #[arg(long)]
    no_tt: bool,

    /// Start from this FEN instead of the initial position
    #[arg(long)]
    fen: Option<String>,

    /// Opening book: one line of coordinate moves per game line
    #[arg(long)]
    book: Option<PathBuf>,
}

impl Args {
    /// Flags over environment over defaults.
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::from_env().context("reading engine settings from the environment")?;
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(depth) = self.depth {
            config.depth = SideDepths::uniform(depth).context("--depth")?;
        }
        if let Some(depth) = self.white_depth {
            config.depth.set(Color::White, depth).context("--white-depth")?;
        }
        if let Some(depth) = self.black_depth {
            config.depth.set(Color::Black, depth).context("--black-depth")?;
        }
        if let Some(search) = self.search {
            config.search = search;
        }
        if let Some(eval) = self.eval {
            config.eval = eval;
        }
        if self.no_tt {
            config.use_tt = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();
    let config = args.engine_config()?;
    info!(
        threads = config.threads,
        search = %config.search,
        eval = %config.eval,
        white_depth = config.depth.white,
        black_depth = config.depth.black,
        use_tt = config.use_tt,
        "chx starting"
    );

    let mut session = Session::new(Engine::new(config));
    if let Some(path) = &args.book {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading book {}", path.display()))?;
        let book = LineBook::from_lines(&text).with_context(|| format!("parsing book {}", path.display()))?;
        info!(entries = book.len(), "opening book loaded");
        session = session.with_book(book);
    }
    if let Some(fen) = &args.fen {
        let position: Position = fen.parse().with_context(|| format!("invalid --fen `{fen}`"))?;
        session.set_position(position);
    }

    session
        .run(io::stdin().lock(), &mut io::stdout().lock())
        .context("console session failed")?;
    Ok(())
}
