//! Holds Position struct, the most important data structure for the engine.
//! Position represents a chess position.

use std::fmt::{self, Display};

use crate::boardrepr::Mailbox;
use crate::coretypes::{Castling, Color, Move, MoveCount, MoveInfo, MoveKind, Piece, Square};
use crate::coretypes::{Color::*, PieceKind::*};
use crate::fen::Fen;
use crate::movegen as mg;
use crate::movelist::MoveList;

/// struct Position
/// A complete data set that can represent any chess position.
/// # Members:
/// * pieces - a square-centric container of all chess piece positions.
/// * side_to_move - Color of player whose turn it is.
/// * castling - Castling rights for both players.
/// * en_passant - Indicates if en passant is possible, and for which square.
/// * halfmoves - Tracker for 50 move draw rule. Resets after capture/pawn move.
/// * fullmoves - Starts at 1, increments after each black player's move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    pub(crate) pieces: Mailbox,
    pub(crate) side_to_move: Color,
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmoves: MoveCount,
    pub(crate) fullmoves: MoveCount,
}

/// Cache holds the parts of a Position that a move destroys and that
/// cannot be recovered from the move itself. It is taken before `do_move`
/// and handed back to `undo_move`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Cache {
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmoves: MoveCount,
}

impl Position {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self {
            pieces: Mailbox::start_position(),
            side_to_move: Color::White,
            castling: Castling::ALL,
            en_passant: None,
            halfmoves: 0,
            fullmoves: 1,
        }
    }

    /// Const getters.
    pub fn pieces(&self) -> &Mailbox {
        &self.pieces
    }
    pub fn side_to_move(&self) -> &Color {
        &self.side_to_move
    }
    pub fn castling(&self) -> &Castling {
        &self.castling
    }
    pub fn en_passant(&self) -> &Option<Square> {
        &self.en_passant
    }
    pub fn halfmoves(&self) -> &MoveCount {
        &self.halfmoves
    }
    pub fn fullmoves(&self) -> &MoveCount {
        &self.fullmoves
    }

    /// Returns the piece on a square, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pieces[square]
    }

    /// Returns the irreversible state needed to undo the next move.
    pub fn cache(&self) -> Cache {
        Cache {
            castling: self.castling,
            en_passant: self.en_passant,
            halfmoves: self.halfmoves,
        }
    }

    /// Square of the active player's king.
    /// A Position always has exactly one king per color.
    fn active_king(&self) -> Square {
        self.pieces
            .king_square(self.side_to_move)
            .expect("position always has a king for each color")
    }

    /// En Passant square is set to the skipped square after a double pawn push.
    /// Any other kind of push is set to None.
    /// `do_move` drops the square again unless the capture is legal.
    fn update_en_passant(&mut self, move_: &Move, active_piece: &Piece) {
        self.en_passant = None;
        if active_piece.piece_kind != Pawn {
            return;
        }

        let rank_distance = (move_.to.rank_u8() as i8 - move_.from.rank_u8() as i8).abs();
        if rank_distance == 2 {
            self.en_passant = move_.from.offset(0, active_piece.color.forward());
        }
    }

    /// Returns true if the active player has a legal en passant capture onto `target`.
    /// A capturing pawn may be pinned, or the capture may open a line onto its king.
    fn has_legal_en_passant(&self, target: Square) -> bool {
        let capturer = Piece::new(self.side_to_move, Pawn);
        [-1, 1]
            .into_iter()
            .filter_map(|file_delta| target.offset(file_delta, -self.side_to_move.forward()))
            .filter(|&from| self.pieces[from] == Some(capturer))
            .any(|from| {
                let mut position = *self;
                position.do_move(Move::new(from, target, None)).is_some()
                    && !position.is_passive_king_attacked()
            })
    }

    /// Update Position move counters, as if move_ was applied to self.
    /// halfmoves is set to zero after a capture or pawn move, incremented otherwise.
    /// fullmoves is incremented after each Black player's move.
    fn update_move_counters(&mut self, move_info: &MoveInfo) {
        if move_info.is_unrepeatable() {
            self.halfmoves = 0;
        } else {
            self.halfmoves = self.halfmoves.saturating_add(1);
        }

        if self.side_to_move == Black {
            self.fullmoves = self.fullmoves.saturating_add(1);
        }
    }

    /// Square of the pawn removed by an en passant capture landing on `to`.
    fn en_passant_victim(move_: &Move) -> Option<Square> {
        Square::from_idx((move_.to.file(), move_.from.rank()))
    }

    /// Rook origin and destination for a castling king move.
    fn castling_rook(move_: &Move) -> Option<(Square, Square)> {
        let (rook_from_delta, rook_to_delta) = match move_.to.file_u8() > move_.from.file_u8() {
            true => (3, 1),
            false => (-4, -1),
        };
        let rook_from = move_.from.offset(rook_from_delta, 0)?;
        let rook_to = move_.from.offset(rook_to_delta, 0)?;
        Some((rook_from, rook_to))
    }

    /// Apply a move to self, in place.
    /// `do_move` does not check if the move is legal or not,
    /// it simply executes it while assuming pseudo-legality.
    /// Returns None and leaves self untouched if the active player has
    /// no piece on the from square.
    ///
    /// The returned MoveInfo, together with the Cache taken before the move,
    /// is everything `undo_move` needs to restore this position exactly.
    pub fn do_move(&mut self, move_: Move) -> Option<MoveInfo> {
        let active_piece = self.pieces[move_.from].filter(|piece| piece.color == self.side_to_move)?;

        let file_distance = (move_.to.file_u8() as i8 - move_.from.file_u8() as i8).abs();
        let move_kind = match (active_piece.piece_kind, self.pieces[move_.to]) {
            (_, Some(captured)) => MoveKind::Capture(captured.piece_kind),
            (King, None) if file_distance == 2 => MoveKind::Castle,
            (Pawn, None) if Some(move_.to) == self.en_passant => MoveKind::EnPassant,
            _ => MoveKind::Quiet,
        };
        let move_info = MoveInfo::new(move_, active_piece.piece_kind, move_kind);

        self.update_en_passant(&move_, &active_piece);
        self.update_move_counters(&move_info);
        self.castling.clear_square(move_.from);
        self.castling.clear_square(move_.to);

        match move_kind {
            MoveKind::Castle => {
                if let Some((rook_from, rook_to)) = Self::castling_rook(&move_) {
                    self.pieces[rook_to] = self.pieces[rook_from].take();
                }
            }
            MoveKind::EnPassant => {
                if let Some(victim) = Self::en_passant_victim(&move_) {
                    self.pieces[victim] = None;
                }
            }
            _ => (),
        }

        // If promoting, set promoting piece. Otherwise set active piece.
        self.pieces[move_.from] = None;
        self.pieces[move_.to] = match move_.promotion {
            Some(promoting_piece_kind) => Some(Piece::new(self.side_to_move, promoting_piece_kind)),
            None => Some(active_piece),
        };

        self.side_to_move = !self.side_to_move;
        self.en_passant = self
            .en_passant
            .filter(|&target| self.has_legal_en_passant(target));
        Some(move_info)
    }

    /// Undo the application of a move, in place.
    /// `move_info` must be the value returned by the matching `do_move`,
    /// and `cache` the value of `self.cache()` taken right before it.
    pub fn undo_move(&mut self, move_info: MoveInfo, cache: Cache) {
        self.side_to_move = !self.side_to_move;
        let mover = self.side_to_move;
        let move_ = move_info.move_();

        if mover == Black {
            self.fullmoves = self.fullmoves.saturating_sub(1);
        }
        self.castling = cache.castling;
        self.en_passant = cache.en_passant;
        self.halfmoves = cache.halfmoves;

        self.pieces[move_info.from] = Some(Piece::new(mover, move_info.piece_kind));
        self.pieces[move_info.to] = None;

        match move_info.move_kind {
            MoveKind::Capture(captured) => {
                self.pieces[move_info.to] = Some(Piece::new(!mover, captured));
            }
            MoveKind::EnPassant => {
                if let Some(victim) = Self::en_passant_victim(&move_) {
                    self.pieces[victim] = Some(Piece::new(!mover, Pawn));
                }
            }
            MoveKind::Castle => {
                if let Some((rook_from, rook_to)) = Self::castling_rook(&move_) {
                    self.pieces[rook_from] = self.pieces[rook_to].take();
                }
            }
            MoveKind::Quiet => (),
        }
    }

    /// Checks if move is legal before applying it.
    /// Returns MoveInfo of the applied move, or None if the move is illegal
    /// and self is unchanged.
    pub fn do_legal_move(&mut self, move_: Move) -> Option<MoveInfo> {
        if self.is_legal_move(move_) {
            self.do_move(move_)
        } else {
            None
        }
    }

    /// Generates a new Position from applying move on current Position.
    pub fn make_move(&self, move_: Move) -> Self {
        let mut position_clone: Position = *self;
        position_clone.do_move(move_);
        position_clone
    }

    /// Checks if given move is legal for current position.
    pub fn is_legal_move(&self, move_: Move) -> bool {
        self.get_legal_moves().contains(&move_)
    }

    /// Returns true if active player's king is in any check.
    pub fn is_in_check(&self) -> bool {
        self.num_active_king_checks() > 0
    }

    /// Returns tuple representing if current player's king is in single or double check.
    /// Tuple format: (is_in_single_check, is_in_double_check).
    pub fn active_king_checks(&self) -> (bool, bool) {
        let num_checks = self.num_active_king_checks();
        let single_check = num_checks >= 1;
        let double_check = num_checks >= 2;
        (single_check, double_check)
    }

    /// Counts and returns number of checks on current player's king.
    pub(crate) fn num_active_king_checks(&self) -> u32 {
        let king = self.active_king();
        mg::attackers_to(&self.pieces, king, !self.side_to_move).len() as u32
    }

    /// Returns true if the player who just moved left their own king attacked.
    fn is_passive_king_attacked(&self) -> bool {
        let passive_player = !self.side_to_move;
        match self.pieces.king_square(passive_player) {
            Some(king) => mg::is_attacked(&self.pieces, king, self.side_to_move),
            None => true,
        }
    }

    /// Returns a list of all legal moves for active player.
    /// Each pseudo-legal move is played on a copy of the position, and kept
    /// only if the moving player's king is not attacked afterwards.
    pub fn get_legal_moves(&self) -> MoveList {
        let pseudo_moves = mg::pseudo_legal_moves(
            &self.pieces,
            self.side_to_move,
            self.castling,
            self.en_passant,
        );

        pseudo_moves
            .into_iter()
            .filter(|move_| {
                let mut position = *self;
                position.do_move(*move_).is_some() && !position.is_passive_king_attacked()
            })
            .collect()
    }

    /// Returns all legal moves that start from `square`.
    /// Empty squares and squares of the passive player yield no moves.
    pub fn legal_moves_from(&self, square: Square) -> MoveList {
        if !self.pieces.is_color(square, self.side_to_move) {
            return MoveList::new();
        }
        self.get_legal_moves()
            .into_iter()
            .filter(|move_| move_.from == square)
            .collect()
    }

    /// Returns true if the active player has no legal moves.
    pub fn has_no_legal_moves(&self) -> bool {
        self.get_legal_moves().is_empty()
    }

    /// Returns true if active player is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.has_no_legal_moves()
    }

    /// Returns true if active player is stalemated.
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.has_no_legal_moves()
    }

    /// Returns true if `color` cannot possibly deliver checkmate with its
    /// remaining material, under any sequence of legal moves.
    pub fn has_insufficient_material(&self, color: Color) -> bool {
        let ours: Vec<Piece> = self
            .pieces
            .pieces()
            .map(|(_, piece)| piece)
            .filter(|piece| piece.color == color)
            .collect();

        if ours
            .iter()
            .any(|piece| matches!(piece.piece_kind, Pawn | Rook | Queen))
        {
            return false;
        }

        if ours.iter().any(|piece| piece.piece_kind == Knight) {
            // A lone knight can only help mate against pieces that can block the king in.
            let theirs_can_block = self
                .pieces
                .pieces()
                .any(|(_, piece)| piece.color != color && !matches!(piece.piece_kind, King | Queen));
            return ours.len() <= 2 && !theirs_can_block;
        }

        if ours.iter().any(|piece| piece.piece_kind == Bishop) {
            let mut colors = self
                .pieces
                .pieces()
                .filter(|(_, piece)| piece.piece_kind == Bishop)
                .map(|(square, _)| square.is_dark());
            let same_color = match colors.next() {
                Some(first) => colors.all(|dark| dark == first),
                None => true,
            };
            let no_pawns_or_knights = !self
                .pieces
                .pieces()
                .any(|(_, piece)| matches!(piece.piece_kind, Pawn | Knight));
            return same_color && no_pawns_or_knights;
        }

        true
    }

    /// Returns true if neither side has enough material to checkmate.
    pub fn is_insufficient_material(&self) -> bool {
        Color::iter().all(|color| self.has_insufficient_material(color))
    }
}

/// Defaults to standard chess start position.
impl Default for Position {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Displays pretty-printed chess board and Fen string representing Position.
impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // print: position, FEN string
        write!(f, "{}\n Fen: {}\n", self.pieces, self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::PieceKind;
    use Square::*;

    fn parse(fen: &str) -> Position {
        Position::parse_fen(fen).unwrap()
    }

    #[test]
    fn pretty_print_position() {
        let start_pos = Position::start_position();
        println!("{}", start_pos);
    }

    #[test]
    fn do_move_with_legal_move() {
        let move1 = Move::new(E2, E4, None);
        let move1_piece = Piece::new(Color::White, PieceKind::Pawn);
        let mut position = Position::start_position();
        let move_info = position.do_move(move1).unwrap();
        assert_eq!(position.pieces[E4], Some(move1_piece));
        assert_eq!(position.pieces[E2], None);
        assert_eq!(move_info.move_kind, MoveKind::Quiet);
        assert_eq!(position.side_to_move, Black);
        // No black pawn is next to e4, so no en passant square is recorded.
        assert_eq!(position.en_passant, None);
    }

    #[test]
    fn do_move_without_piece_is_noop() {
        let mut position = Position::start_position();
        assert_eq!(position.do_move(Move::new(E4, E5, None)), None);
        assert_eq!(position.do_move(Move::new(E7, E5, None)), None);
        assert_eq!(position, Position::start_position());
    }

    #[test]
    fn king_checks() {
        let check1_1 = parse("8/8/8/8/3K3r/8/8/7k w - - 0 1");
        let check1_2 = parse("rnb1kbnr/ppp1pppp/8/3p4/1qPPP3/8/PP3PPP/RNBQKBNR w KQkq - 1 4");
        let check2_1 = parse("3q4/8/4b3/3k4/4P1n1/8/3Q4/2R1K3 b - - 0 1");

        assert_eq!(check1_1.num_active_king_checks(), 1);
        assert_eq!(check1_2.num_active_king_checks(), 1);
        assert_eq!(check2_1.num_active_king_checks(), 2);
        assert_eq!(check2_1.active_king_checks(), (true, true));
        assert!(!Position::start_position().is_in_check());
    }

    #[test]
    fn start_position_has_20_legal_moves() {
        let position = Position::start_position();
        assert_eq!(position.get_legal_moves().len(), 20);
        assert_eq!(position.legal_moves_from(G1).len(), 2);
        assert_eq!(position.legal_moves_from(E4).len(), 0);
        assert_eq!(position.legal_moves_from(E7).len(), 0);
    }

    #[test]
    fn pinned_piece_cannot_leave_line() {
        // Knight on e2 is pinned against the king by the rook on e8.
        let position = parse("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(position.legal_moves_from(E2).is_empty());
        assert!(!position.is_legal_move(Move::new(E2, C3, None)));
    }

    #[test]
    fn castling_round_trip() {
        let before = parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10");
        let mut position = before;
        let cache = position.cache();
        let move_info = position.do_legal_move(Move::new(E1, G1, None)).unwrap();
        assert_eq!(move_info.move_kind, MoveKind::Castle);
        assert_eq!(position.pieces[G1], Some(Piece::new(White, King)));
        assert_eq!(position.pieces[F1], Some(Piece::new(White, PieceKind::Rook)));
        assert_eq!(position.pieces[H1], None);
        assert!(!position.castling.has_any(Castling::W_SIDE));
        assert!(position.castling.has(Castling::B_SIDE));
        assert_eq!(position.halfmoves, 4);

        position.undo_move(move_info, cache);
        assert_eq!(position, before);

        let cache = position.cache();
        let move_info = position.do_legal_move(Move::new(E1, C1, None)).unwrap();
        assert_eq!(position.pieces[D1], Some(Piece::new(White, PieceKind::Rook)));
        assert_eq!(position.pieces[A1], None);
        position.undo_move(move_info, cache);
        assert_eq!(position, before);
    }

    #[test]
    fn rook_capture_removes_castling_right() {
        let mut position = parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        position.do_legal_move(Move::new(A1, A8, None)).unwrap();
        assert!(!position.castling.has(Castling::W_QUEEN));
        assert!(!position.castling.has(Castling::B_QUEEN));
        assert!(position.castling.has(Castling::W_KING));
        assert!(position.castling.has(Castling::B_KING));
    }

    #[test]
    fn en_passant_round_trip() {
        let mut position = parse("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1");
        let move_info = position.do_legal_move(Move::new(D7, D5, None)).unwrap();
        assert_eq!(position.en_passant, Some(D6));
        assert_eq!(move_info.move_kind, MoveKind::Quiet);

        let before = position;
        let cache = position.cache();
        let move_info = position.do_legal_move(Move::new(E5, D6, None)).unwrap();
        assert_eq!(move_info.move_kind, MoveKind::EnPassant);
        assert_eq!(position.pieces[D5], None);
        assert_eq!(position.pieces[D6], Some(Piece::new(White, Pawn)));
        assert_eq!(position.en_passant, None);

        position.undo_move(move_info, cache);
        assert_eq!(position, before);
    }

    #[test]
    fn en_passant_recorded_only_when_capture_is_legal() {
        // The d4 pawn is pinned against its king by the rook on d1.
        let mut pinned = parse("3k4/8/8/8/3p4/8/4P3/3RK3 w - - 0 1");
        pinned.do_legal_move(Move::new(E2, E4, None)).unwrap();
        assert_eq!(pinned.en_passant, None);
        assert_eq!(pinned.to_fen(), "3k4/8/8/8/3pP3/8/8/3RK3 b - - 0 1");

        // Capturing would clear the fifth rank between the rook and the king.
        let mut discovered = parse("8/3p4/8/K3P2r/8/8/8/7k b - - 0 1");
        discovered.do_legal_move(Move::new(D7, D5, None)).unwrap();
        assert_eq!(discovered.en_passant, None);

        let mut free = parse("8/8/8/8/3p4/8/4P3/K5k1 w - - 0 1");
        free.do_legal_move(Move::new(E2, E4, None)).unwrap();
        assert_eq!(free.en_passant, Some(E3));
    }

    #[test]
    fn promotion_capture_round_trip() {
        let before = parse("1n2k3/P7/8/8/8/8/8/4K3 w - - 5 30");
        let mut position = before;
        let cache = position.cache();
        let move_info = position
            .do_legal_move(Move::new(A7, B8, Some(PieceKind::Knight)))
            .unwrap();
        assert_eq!(move_info.move_kind, MoveKind::Capture(PieceKind::Knight));
        assert_eq!(position.pieces[B8], Some(Piece::new(White, PieceKind::Knight)));
        assert_eq!(position.halfmoves, 0);

        position.undo_move(move_info, cache);
        assert_eq!(position, before);
    }

    #[test]
    fn illegal_move_is_rejected() {
        let mut position = Position::start_position();
        assert_eq!(position.do_legal_move(Move::new(A2, A5, None)), None);
        assert_eq!(position, Position::start_position());
    }

    #[test]
    fn checkmate_and_stalemate() {
        let mate = parse("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(mate.is_checkmate());
        assert!(!mate.is_stalemate());

        let stalemate = parse("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(stalemate.is_stalemate());
        assert!(!stalemate.is_checkmate());
    }

    #[test]
    fn insufficient_material() {
        assert!(parse("8/8/4k3/8/8/3K4/8/8 w - - 0 1").is_insufficient_material());
        assert!(parse("8/8/4k3/8/8/3KN3/8/8 w - - 0 1").is_insufficient_material());
        assert!(parse("8/8/4k3/8/8/3KB3/8/8 w - - 0 1").is_insufficient_material());
        // Bishops on same colored squares.
        assert!(parse("8/8/3bk3/8/8/3KB3/8/8 w - - 0 1").is_insufficient_material());
        // Bishops on opposite colored squares.
        assert!(!parse("8/8/2b1k3/8/8/3KB3/8/8 w - - 0 1").is_insufficient_material());
        // Two knights may mate a king with pieces to block it in.
        assert!(!parse("8/8/4k3/8/8/3KNN2/8/8 w - - 0 1").is_insufficient_material());
        assert!(!parse("8/8/4k3/8/8/3KP3/8/8 w - - 0 1").is_insufficient_material());
        assert!(!Position::start_position().is_insufficient_material());
    }
}
