//! Standard Algebraic Notation.
//! [SAN](https://en.wikipedia.org/wiki/Algebraic_notation_(chess))
//!
//! The SAN of a move depends on the position it is played from: captures are
//! marked, ambiguous piece moves name their origin file and/or rank, and the
//! resulting check or checkmate is appended.

use crate::coretypes::{Move, MoveKind, PieceKind};
use crate::position::Position;

/// Returns the SAN of a legal `move_` in `position`.
/// Returns None if the active player has no piece on the move's origin.
pub fn to_san(position: &Position, move_: Move) -> Option<String> {
    let legal_moves = position.get_legal_moves();
    let mut after = *position;
    let move_info = after.do_move(move_)?;

    let mut san = String::with_capacity(8);

    match (move_info.piece_kind, move_info.move_kind) {
        (PieceKind::King, MoveKind::Castle) => {
            if move_.to.file_u8() > move_.from.file_u8() {
                san.push_str("O-O");
            } else {
                san.push_str("O-O-O");
            }
        }
        (PieceKind::Pawn, _) => {
            if move_info.is_capture() {
                san.push(move_.from.file().to_char());
                san.push('x');
            }
            san.push_str(&move_.to.to_string());
            if let Some(promotion) = move_.promotion {
                san.push('=');
                san.push(promotion.to_char());
            }
        }
        (piece_kind, _) => {
            san.push(piece_kind.to_char());
            push_disambiguation(&mut san, position, &legal_moves, move_, piece_kind);
            if move_info.is_capture() {
                san.push('x');
            }
            san.push_str(&move_.to.to_string());
        }
    }

    if after.is_checkmate() {
        san.push('#');
    } else if after.is_in_check() {
        san.push('+');
    }

    Some(san)
}

/// Appends the origin file, rank, or both, when another piece of the same kind
/// could also legally move to the same destination.
fn push_disambiguation(
    san: &mut String,
    position: &Position,
    legal_moves: &[Move],
    move_: Move,
    piece_kind: PieceKind,
) {
    let rivals: Vec<Move> = legal_moves
        .iter()
        .copied()
        .filter(|other| other.to == move_.to && other.from != move_.from)
        .filter(|other| {
            position
                .piece_at(other.from)
                .map_or(false, |piece| piece.piece_kind == piece_kind)
        })
        .collect();

    if rivals.is_empty() {
        return;
    }

    let shares_file = rivals.iter().any(|other| other.from.file() == move_.from.file());
    let shares_rank = rivals.iter().any(|other| other.from.rank() == move_.from.rank());

    if !shares_file {
        san.push(move_.from.file().to_char());
    } else if !shares_rank {
        san.push(move_.from.rank().to_char());
    } else {
        san.push_str(&move_.from.to_string());
    }
}
