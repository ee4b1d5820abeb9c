//! Perft (performance test) for move generation correctness verification.

use tracing::debug;

use crate::movegen::generate_pseudo_legal;
use crate::position::Position;

/// Count the legal leaf nodes `depth` plies below `position`.
///
/// Depth 0 returns 1 (the current position). Every pseudo-legal move is
/// played through [`Position::apply`], so this exercises generation and
/// application together.
pub fn perft(position: &Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    generate_pseudo_legal(position)
        .as_slice()
        .iter()
        .filter_map(|&mv| position.apply(mv).ok())
        .map(|child| perft(&child, depth - 1))
        .sum()
}

/// Run perft with per-move breakdown (useful for debugging).
///
/// Returns `(coordinate_move, node_count)` pairs sorted alphabetically.
pub fn divide(position: &Position, depth: usize) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = generate_pseudo_legal(position)
        .as_slice()
        .iter()
        .filter_map(|&mv| {
            let child = position.apply(mv).ok()?;
            Some((mv.to_string(), perft(&child, depth.saturating_sub(1))))
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    let total: u64 = results.iter().map(|(_, n)| n).sum();
    debug!(depth, moves = results.len(), total, "divide");
    results
}
