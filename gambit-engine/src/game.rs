//! Game structure.

use uuid::Uuid;

use crate::coretypes::{Move, MoveInfo, PieceKind, Square};
use crate::error::{self, ErrorKind};
use crate::fen::Fen;
use crate::movelist::MoveList;
use crate::notation;
use crate::position::{Cache, Position};
use crate::snapshot::Snapshot;
use crate::status::Status;
use crate::zobrist::{HashKind, ZobristTable};

/// One applied move of a game.
/// Holds everything needed to print the move and to take it back exactly.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HistoryEntry {
    move_info: MoveInfo,
    cache: Cache,
    san: String,
    hash: HashKind,
}

impl HistoryEntry {
    pub fn move_info(&self) -> &MoveInfo {
        &self.move_info
    }
    pub fn san(&self) -> &str {
        &self.san
    }
    /// Hash of the position reached by this move.
    pub fn hash(&self) -> HashKind {
        self.hash
    }
}

/// Game contains information for an in progress game:
/// The position the game started from, the sequence of moves that were
/// played, and the current position.
#[derive(Debug, Clone)]
pub struct Game {
    game_id: Uuid,
    base_position: Position,
    position: Position,
    history: Vec<HistoryEntry>,
    ztable: ZobristTable,
    base_hash: HashKind,
}

impl Game {
    /// Create a new game in the standard chess start position.
    pub fn new() -> Self {
        Self::from(Position::start_position())
    }

    /// Create a new game starting from a FEN string.
    pub fn from_fen(fen: &str) -> error::Result<Self> {
        Position::parse_fen(fen).map(Self::from)
    }

    /// Identifier of this game, regenerated on every reset.
    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn base_position(&self) -> &Position {
        &self.base_position
    }

    pub fn history_entries(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Number of moves played so far.
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// All legal moves of the side to move.
    pub fn legal_moves(&self) -> MoveList {
        self.position.get_legal_moves()
    }

    /// Names of the squares the piece on `square` may legally move to.
    /// An unparsable square, an empty square, or a square holding a piece of the
    /// side not to move yields no destinations.
    pub fn moves_from(&self, square: &str) -> Vec<String> {
        let square: Square = match square.trim().parse() {
            Ok(square) => square,
            Err(_) => return Vec::new(),
        };

        let mut destinations: Vec<Square> = Vec::new();
        for move_ in self.position.legal_moves_from(square) {
            // The four promotion choices share one destination.
            if !destinations.contains(&move_.to) {
                destinations.push(move_.to);
            }
        }
        destinations.iter().map(Square::to_string).collect()
    }

    /// Attempts to play a move given by square names and an optional promotion letter.
    /// Returns the move's SAN when played.
    ///
    /// A pawn reaching the last rank without a promotion letter promotes to a queen.
    /// A promotion letter on any other move is ignored.
    /// On error the game is left untouched.
    pub fn attempt_move(
        &mut self,
        from: &str,
        to: &str,
        promotion: Option<&str>,
    ) -> error::Result<String> {
        let from: Square = from.trim().parse()?;
        let to: Square = to.trim().parse()?;
        let promotion = match promotion.map(str::trim).filter(|hint| !hint.is_empty()) {
            Some(hint) => Some(parse_promotion(hint)?),
            None => None,
        };

        let legal_moves = self.position.get_legal_moves();
        let is_promotion = legal_moves
            .iter()
            .any(|move_| move_.from == from && move_.to == to && move_.promotion.is_some());
        let move_ = match is_promotion {
            true => Move::new(from, to, Some(promotion.unwrap_or(PieceKind::Queen))),
            false => Move::new(from, to, None),
        };

        if !legal_moves.contains(&move_) {
            log::trace!("rejected illegal move {move_} in game {}", self.game_id);
            return Err(ErrorKind::IllegalMove.into());
        }
        self.play(move_)
    }

    /// Plays `move_` if it is legal in the current position, returning its SAN.
    pub fn apply_move(&mut self, move_: Move) -> error::Result<String> {
        if !self.position.is_legal_move(move_) {
            log::trace!("rejected illegal move {move_} in game {}", self.game_id);
            return Err(ErrorKind::IllegalMove.into());
        }
        self.play(move_)
    }

    /// Move must be legal.
    fn play(&mut self, move_: Move) -> error::Result<String> {
        let san = notation::to_san(&self.position, move_).ok_or(ErrorKind::IllegalMove)?;
        let cache = self.position.cache();
        let move_info = self
            .position
            .do_move(move_)
            .ok_or(ErrorKind::IllegalMove)?;
        let hash = self.ztable.generate_hash((&self.position).into());

        log::debug!("game {} played {san} ({move_})", self.game_id);
        self.history.push(HistoryEntry {
            move_info,
            cache,
            san: san.clone(),
            hash,
        });
        Ok(san)
    }

    /// Takes back the most recent move.
    /// Returns false, doing nothing, when no move has been played.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(entry) => {
                self.position.undo_move(entry.move_info, entry.cache);
                log::debug!("game {} took back {}", self.game_id, entry.san);
                true
            }
            None => false,
        }
    }

    /// Returns to the standard start position with an empty history and a new game id.
    pub fn reset(&mut self) {
        self.base_position = Position::start_position();
        self.position = self.base_position;
        self.history.clear();
        self.base_hash = self.ztable.generate_hash((&self.position).into());
        self.game_id = Uuid::new_v4();
        log::debug!("game reset, new id {}", self.game_id);
    }

    /// SAN of every move played, in order.
    pub fn history(&self) -> Vec<String> {
        self.history.iter().map(|entry| entry.san.clone()).collect()
    }

    /// SAN of the most recent move.
    pub fn last_move(&self) -> Option<&str> {
        self.history.last().map(HistoryEntry::san)
    }

    /// Number of times the current position has occurred in this game, itself included.
    pub fn repetitions(&self) -> usize {
        let current = self.current_hash();
        std::iter::once(self.base_hash)
            .chain(self.history.iter().map(HistoryEntry::hash))
            .filter(|hash| *hash == current)
            .count()
    }

    fn current_hash(&self) -> HashKind {
        self.history.last().map_or(self.base_hash, HistoryEntry::hash)
    }

    pub fn status(&self) -> Status {
        Status::new(
            &self.position,
            self.move_count(),
            self.last_move().map(str::to_string),
            self.repetitions(),
        )
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(&self.position, self.status())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a position to a Game with no past moves.
impl From<Position> for Game {
    fn from(position: Position) -> Self {
        let ztable = ZobristTable::new();
        let base_hash = ztable.generate_hash((&position).into());
        Self {
            game_id: Uuid::new_v4(),
            base_position: position,
            position,
            history: Vec::new(),
            ztable,
            base_hash,
        }
    }
}

/// Promotion hint ::= one of q, r, b, n in either case.
fn parse_promotion(hint: &str) -> error::Result<PieceKind> {
    let mut chars = hint.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => PieceKind::from_promotion_char(ch)
            .ok_or_else(|| (ErrorKind::InvalidPromotion, hint.escape_debug()).into()),
        _ => Err((ErrorKind::InvalidPromotion, hint.escape_debug()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Color;
    use crate::coretypes::Square::*;

    #[test]
    fn parse_promotion_hints() {
        assert_eq!(parse_promotion("q").unwrap(), PieceKind::Queen);
        assert_eq!(parse_promotion("N").unwrap(), PieceKind::Knight);
        for bad in ["k", "p", "x", "qq", "queen"] {
            assert_eq!(parse_promotion(bad).unwrap_err().kind(), ErrorKind::InvalidPromotion);
        }
    }

    #[test]
    fn moves_from_reports_destinations() {
        let game = Game::new();
        let mut destinations = game.moves_from("g1");
        destinations.sort();
        assert_eq!(destinations, vec!["f3", "h3"]);
        let mut destinations = game.moves_from("e2");
        destinations.sort();
        assert_eq!(destinations, vec!["e3", "e4"]);
        assert!(game.moves_from("e4").is_empty());
        assert!(game.moves_from("e7").is_empty());
        assert!(game.moves_from("z9").is_empty());
        assert!(game.moves_from("").is_empty());
    }

    #[test]
    fn promotion_destinations_are_listed_once() {
        let game = Game::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut destinations = game.moves_from("b7");
        destinations.sort();
        assert_eq!(destinations, vec!["b8"]);
    }

    #[test]
    fn attempt_and_undo() {
        let mut game = Game::new();
        assert_eq!(game.attempt_move("e2", "e4", None).unwrap(), "e4");
        assert_eq!(game.attempt_move("e7", "e5", Some("")).unwrap(), "e5");
        assert_eq!(game.history(), vec!["e4", "e5"]);
        assert_eq!(game.position().side_to_move(), &Color::White);

        assert!(game.undo());
        assert_eq!(game.history(), vec!["e4"]);
        assert!(game.undo());
        assert!(!game.undo());
        assert_eq!(game.position(), &Position::start_position());
    }

    #[test]
    fn errors_leave_game_untouched() {
        let mut game = Game::new();
        let errors = [
            (game.attempt_move("e2", "e5", None), ErrorKind::IllegalMove),
            (game.attempt_move("i2", "e4", None), ErrorKind::InvalidSquare),
            (game.attempt_move("e2", "e44", None), ErrorKind::InvalidSquare),
            (game.attempt_move("e2", "e4", Some("x")), ErrorKind::InvalidPromotion),
        ];
        for (result, kind) in errors {
            assert_eq!(result.unwrap_err().kind(), kind);
        }
        assert_eq!(game.position(), &Position::start_position());
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn promotion_policy() {
        let fen = "4k3/1P6/8/8/8/8/8/4K3 w - - 0 1";

        let mut game = Game::from_fen(fen).unwrap();
        assert_eq!(game.attempt_move("b7", "b8", None).unwrap(), "b8=Q+");

        let mut game = Game::from_fen(fen).unwrap();
        assert_eq!(game.attempt_move("b7", "b8", Some("n")).unwrap(), "b8=N");

        let mut game = Game::from_fen(fen).unwrap();
        assert_eq!(game.attempt_move("b7", "b8", Some("R")).unwrap(), "b8=R+");

        // A hint on a move that does not promote is ignored.
        let mut game = Game::new();
        assert_eq!(game.attempt_move("e2", "e4", Some("q")).unwrap(), "e4");
    }

    #[test]
    fn apply_move_requires_exact_legal_move() {
        let mut game = Game::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let error = game.apply_move(Move::new(B7, B8, None)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::IllegalMove);
        assert_eq!(
            game.apply_move(Move::new(B7, B8, Some(PieceKind::Bishop))).unwrap(),
            "b8=B"
        );
    }

    #[test]
    fn reset_restores_start_and_renews_id() {
        let mut game = Game::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        game.attempt_move("b7", "b8", None).unwrap();
        let old_id = game.game_id();

        game.reset();
        assert_ne!(game.game_id(), old_id);
        assert_eq!(game.position(), &Position::start_position());
        assert_eq!(game.base_position(), &Position::start_position());
        assert!(game.history().is_empty());
        assert_eq!(game.repetitions(), 1);
    }

    #[test]
    fn repetitions_count_returning_positions() {
        let mut game = Game::new();
        assert_eq!(game.repetitions(), 1);
        for _ in 0..2 {
            for (from, to) in [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")] {
                game.attempt_move(from, to, None).unwrap();
            }
        }
        assert_eq!(game.repetitions(), 3);
        assert!(game.status().can_claim_draw);

        game.undo();
        assert_eq!(game.repetitions(), 2);
    }
}
