//! Performance Test
//!
//! [Perft](https://www.chessprogramming.org/Perft)
//!
//! A simple debugging and testing function used to count
//! the number of nodes at a specific depth.

use std::ops::{Add, AddAssign};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crate::coretypes::PlyKind;
use crate::movelist::MoveList;
use crate::position::Position;

/// Debugging information about results of perft test.
/// nodes: Number of nodes at lowest depth of perft.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PerftInfo {
    pub nodes: u64,
}

impl PerftInfo {
    fn new(nodes: u64) -> Self {
        PerftInfo { nodes }
    }
}

impl Add for PerftInfo {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        PerftInfo {
            nodes: self.nodes + rhs.nodes,
        }
    }
}

impl AddAssign for PerftInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
    }
}

/// Count the number of nodes at a certain depth.
/// This ignores higher terminal nodes.
/// In other words, it counts the number of paths to the given depth.
pub fn perft(mut position: Position, ply: PlyKind) -> PerftInfo {
    match ply {
        0 => PerftInfo::new(1),
        _ => perft_recurse(&mut position, ply),
    }
}

/// Same as `perft`, with the root moves shared out between `threads` workers.
pub fn perft_threaded(position: Position, ply: PlyKind, threads: usize) -> PerftInfo {
    if ply <= 2 || threads <= 1 {
        return perft(position, ply);
    }

    let legal_moves = Arc::new(Mutex::new(position.get_legal_moves()));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let legal_moves = Arc::clone(&legal_moves);
            thread::spawn(move || perft_executor(position, ply, legal_moves))
        })
        .collect();

    let mut total = PerftInfo::new(0);
    for handle in handles {
        // A worker only panics if perft itself is broken.
        match handle.join() {
            Ok(perft_info) => total += perft_info,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
    total
}

/// perft_executor works by stealing one move at a time from given moves list and running perft on that move.
/// When there are no moves left to steal, it returns the count collected so far.
fn perft_executor(mut position: Position, ply: PlyKind, moves: Arc<Mutex<MoveList>>) -> PerftInfo {
    debug_assert!(ply > 1);
    let steal = || moves.lock().unwrap_or_else(PoisonError::into_inner).pop();
    let mut perft_info = PerftInfo::new(0);
    let cache = position.cache();

    while let Some(move_) = steal() {
        if let Some(move_info) = position.do_move(move_) {
            perft_info += perft_recurse(&mut position, ply - 1);
            position.undo_move(move_info, cache);
        }
    }

    perft_info
}

/// Ply must be non-zero.
fn perft_recurse(position: &mut Position, ply: PlyKind) -> PerftInfo {
    debug_assert_ne!(ply, 0);
    let legal_moves = position.get_legal_moves();
    if ply == 1 {
        // If we reach the depth before the end,
        // return the count of legal moves.
        return PerftInfo::new(legal_moves.len() as u64);
    }

    let cache = position.cache();
    let mut perft_info = PerftInfo::new(0);
    for legal_move in legal_moves {
        if let Some(move_info) = position.do_move(legal_move) {
            perft_info += perft_recurse(position, ply - 1);
            position.undo_move(move_info, cache);
        }
    }
    perft_info
}
