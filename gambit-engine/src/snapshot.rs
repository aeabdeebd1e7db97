//! Self-contained view of a game, handed to whoever displays it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::coretypes::{Color, Piece};
use crate::fen::Fen;
use crate::position::Position;
use crate::status::Status;

/// One occupied square of a snapshot.
/// piece is the FEN letter of the piece, uppercase for White and lowercase for Black.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct PieceView {
    pub piece: String,
    pub color: Color,
}

impl From<Piece> for PieceView {
    fn from(piece: Piece) -> Self {
        Self {
            piece: piece.to_char().to_string(),
            color: piece.color,
        }
    }
}

/// Board as a map from square name to piece, empty squares omitted,
/// together with the game status and the FEN of the position.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub board: BTreeMap<String, PieceView>,
    pub status: Status,
    pub fen: String,
}

impl Snapshot {
    pub fn new(position: &Position, status: Status) -> Self {
        let board = position
            .pieces()
            .pieces()
            .map(|(square, piece)| (square.to_string(), PieceView::from(piece)))
            .collect();

        Self {
            board,
            status,
            fen: position.to_fen(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_snapshot() {
        let position = Position::start_position();
        let snapshot = Snapshot::new(&position, Status::new(&position, 0, None, 1));

        assert_eq!(snapshot.board.len(), 32);
        assert_eq!(snapshot.board["e1"].piece, "K");
        assert_eq!(snapshot.board["e1"].color, Color::White);
        assert_eq!(snapshot.board["g8"].piece, "n");
        assert_eq!(snapshot.board["g8"].color, Color::Black);
        assert!(!snapshot.board.contains_key("e4"));
        assert_eq!(
            snapshot.fen,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn serializes_as_square_map() {
        let position = Position::start_position();
        let snapshot = Snapshot::new(&position, Status::new(&position, 0, None, 1));
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["board"]["d8"]["piece"], "q");
        assert_eq!(json["board"]["d8"]["color"], "black");
        assert_eq!(json["status"]["turn"], "white");
        assert_eq!(json["status"]["move_count"], 0);
    }
}
