//! Functions and constants used to help with generating moves for a position.
//!
//! Generation walks the Mailbox with file/rank offsets. Moves produced here are
//! pseudo-legal: they follow each piece's movement pattern and respect occupancy,
//! but may leave the moving king in check. Position filters them to legal moves.

use arrayvec::ArrayVec;

use crate::boardrepr::Mailbox;
use crate::coretypes::{Castling, Color, Move, Piece, PieceKind, Rank, Square};
use crate::coretypes::{Color::*, PieceKind::*, Square::*};

/// Single step (file, rank) deltas of a knight.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// North, East, South, West.
pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// North-East, South-East, South-West, North-West.
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// All 8 directions a king or queen may step in.
pub const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// Squares a single square can be attacked from: 8 rays plus 8 knight jumps.
pub type Attackers = ArrayVec<Square, 16>;

/// Returns every square holding a piece of color `by` that attacks `target`.
/// Pieces of either color block sliding attacks.
pub fn attackers_to(board: &Mailbox, target: Square, by: Color) -> Attackers {
    let mut attackers = Attackers::new();

    for (file_delta, rank_delta) in ALL_DIRECTIONS {
        let is_diagonal = file_delta != 0 && rank_delta != 0;
        let mut distance = 0;
        let mut maybe_square = target.offset(file_delta, rank_delta);

        while let Some(square) = maybe_square {
            distance += 1;
            if let Some(piece) = board[square] {
                if piece.color == by {
                    let attacks = match piece.piece_kind {
                        Queen => true,
                        Rook => !is_diagonal,
                        Bishop => is_diagonal,
                        King => distance == 1,
                        // A pawn attacking target sits one rank behind it, from by's perspective.
                        Pawn => distance == 1 && is_diagonal && rank_delta == -by.forward(),
                        Knight => false,
                    };
                    if attacks {
                        attackers.push(square);
                    }
                }
                break;
            }
            maybe_square = square.offset(file_delta, rank_delta);
        }
    }

    let knight = Piece::new(by, Knight);
    for (file_delta, rank_delta) in KNIGHT_OFFSETS {
        if let Some(square) = target.offset(file_delta, rank_delta) {
            if board[square] == Some(knight) {
                attackers.push(square);
            }
        }
    }

    attackers
}

/// Returns true if any piece of color `by` attacks `target`.
pub fn is_attacked(board: &Mailbox, target: Square, by: Color) -> bool {
    !attackers_to(board, target, by).is_empty()
}

// *_pseudo_moves:
// generate a move list of pseudo legal moves for each piece, including
// pushes and attacks. These moves do not consider check, but they do consider
// occupancy.

/// Generate all pseudo-legal pawn moves from a square and append to move list.
/// params:
/// moves - move list to add new moves to.
/// board - piece placement.
/// from - square of the pawn.
/// color - player to generate moves for.
/// en_passant - Optional en-passant target square.
pub fn pawn_pseudo_moves(
    moves: &mut Vec<Move>,
    board: &Mailbox,
    from: Square,
    color: Color,
    en_passant: Option<Square>,
) {
    let forward = color.forward();
    let start_rank = match color {
        White => Rank::R2,
        Black => Rank::R7,
    };

    let mut tos: ArrayVec<Square, 4> = ArrayVec::new();

    if let Some(single) = from.offset(0, forward) {
        if board[single].is_none() {
            tos.push(single);
            if from.rank() == start_rank {
                if let Some(double) = single.offset(0, forward) {
                    if board[double].is_none() {
                        tos.push(double);
                    }
                }
            }
        }
    }

    // Pawns can attack ep square as if it was occupied.
    for file_delta in [-1, 1] {
        if let Some(attacked) = from.offset(file_delta, forward) {
            let is_enemy = board.is_color(attacked, !color);
            if is_enemy || en_passant == Some(attacked) {
                tos.push(attacked);
            }
        }
    }

    let promotion_rank = (!color).back_rank();
    for to in tos {
        if to.rank() == promotion_rank {
            for promotion in PieceKind::PROMOTIONS {
                moves.push(Move::new(from, to, Some(promotion)));
            }
        } else {
            moves.push(Move::new(from, to, None));
        }
    }
}

/// Generate moves of a piece that steps once per offset, such as a knight or king.
pub fn step_pseudo_moves(
    moves: &mut Vec<Move>,
    board: &Mailbox,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
) {
    for &(file_delta, rank_delta) in offsets {
        if let Some(to) = from.offset(file_delta, rank_delta) {
            if !board.is_color(to, color) {
                moves.push(Move::new(from, to, None));
            }
        }
    }
}

/// Generate moves of a sliding piece along each direction, stopping at the first
/// occupied square. Enemy-occupied squares are included as captures.
pub fn slide_pseudo_moves(
    moves: &mut Vec<Move>,
    board: &Mailbox,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
) {
    for &(file_delta, rank_delta) in directions {
        let mut maybe_to = from.offset(file_delta, rank_delta);
        while let Some(to) = maybe_to {
            match board[to] {
                None => moves.push(Move::new(from, to, None)),
                Some(piece) => {
                    if piece.color != color {
                        moves.push(Move::new(from, to, None));
                    }
                    break;
                }
            }
            maybe_to = to.offset(file_delta, rank_delta);
        }
    }
}

/// Generate castling moves and append to move list.
/// Castling is legal if there are no pieces between rook and king,
/// the king is not in check, does not pass through or land on an attacked square,
/// and the player holds the castling right.
/// params:
/// moves - Move list to append to.
/// board - piece placement.
/// player - Player that is castling.
/// castling - Castling rights of the position.
pub fn legal_castling_moves(
    moves: &mut Vec<Move>,
    board: &Mailbox,
    player: Color,
    castling: Castling,
) {
    let (king_side, queen_side, king_from) = match player {
        White => (Castling::W_KING, Castling::W_QUEEN, E1),
        Black => (Castling::B_KING, Castling::B_QUEEN, E8),
    };
    if board[king_from] != Some(Piece::new(player, King)) {
        return;
    }
    let enemy = !player;
    if is_attacked(board, king_from, enemy) {
        return;
    }

    // (right, rook square, squares that must be empty, squares king passes or lands on)
    let wings: [(Castling, i8, &[i8], &[i8]); 2] = [
        (king_side, 3, &[1, 2], &[1, 2]),
        (queen_side, -4, &[-1, -2, -3], &[-1, -2]),
    ];

    for (right, rook_delta, between, pass) in wings {
        if !castling.has(right) {
            continue;
        }
        let rook_square = king_from.offset(rook_delta, 0);
        let has_rook = rook_square.map_or(false, |sq| board[sq] == Some(Piece::new(player, Rook)));
        let is_clear = between
            .iter()
            .filter_map(|delta| king_from.offset(*delta, 0))
            .all(|sq| board[sq].is_none());
        let is_safe = pass
            .iter()
            .filter_map(|delta| king_from.offset(*delta, 0))
            .all(|sq| !is_attacked(board, sq, enemy));

        if has_rook && is_clear && is_safe {
            if let Some(king_to) = king_from.offset(pass[1], 0) {
                moves.push(Move::new(king_from, king_to, None));
            }
        }
    }
}

/// Generate all pseudo-legal moves for `player`.
pub fn pseudo_legal_moves(
    board: &Mailbox,
    player: Color,
    castling: Castling,
    en_passant: Option<Square>,
) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);

    for (from, piece) in board.pieces().filter(|(_, piece)| piece.color == player) {
        match piece.piece_kind {
            Pawn => pawn_pseudo_moves(&mut moves, board, from, player, en_passant),
            Knight => step_pseudo_moves(&mut moves, board, from, player, &KNIGHT_OFFSETS),
            King => step_pseudo_moves(&mut moves, board, from, player, &ALL_DIRECTIONS),
            Bishop => slide_pseudo_moves(&mut moves, board, from, player, &DIAGONAL),
            Rook => slide_pseudo_moves(&mut moves, board, from, player, &ORTHOGONAL),
            Queen => slide_pseudo_moves(&mut moves, board, from, player, &ALL_DIRECTIONS),
        }
    }
    legal_castling_moves(&mut moves, board, player, castling);

    moves
}
