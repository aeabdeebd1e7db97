//! Forsyth-Edwards Notation, a standard notation for describing a chess position.
//! [FEN](https://en.wikipedia.org/wiki/Forsyth%E2%80%93Edwards_Notation)
//!
//! Example:
//! Starting Chess FEN = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"

use std::convert::TryFrom;

use crate::boardrepr::Mailbox;
use crate::coretypes::{Castling, Color, File, MoveCount, Piece, PieceKind, Rank, Square};
use crate::error::{self, ErrorKind};
use crate::movegen as mg;
use crate::position::Position;

/// Allows converting data to and from a FEN string.
pub trait Fen: Sized {
    /// Attempt to parse a Fen string into implementing type.
    fn parse_fen(s: &str) -> error::Result<Self>;

    /// Returns the Fen representation of implementing type.
    fn to_fen(&self) -> String;
}

fn fen_error(message: &str) -> error::Error {
    (ErrorKind::Fen, message).into()
}

/// Placement ::= 8 ranks from 8 to 1, separated by '/'.
/// Each rank is a sequence of piece chars or digits 1-8 counting empty squares.
fn parse_placement(s: &str) -> error::Result<Mailbox> {
    let mut mailbox = Mailbox::new();
    let ranks: Vec<&str> = s.split('/').collect();
    if ranks.len() != Mailbox::RANKS {
        return Err(fen_error("placement must have 8 ranks"));
    }

    for (rank_str, rank_idx) in ranks.into_iter().zip((0..Mailbox::RANKS as u8).rev()) {
        let rank = Rank::from_u8(rank_idx).ok_or_else(|| fen_error("rank out of range"))?;
        let mut file_idx: u8 = 0;

        for ch in rank_str.chars() {
            if let Some(empty) = ch.to_digit(10) {
                if !(1..=8).contains(&empty) {
                    return Err(fen_error("empty square count not of 1-8"));
                }
                file_idx += empty as u8;
            } else {
                let file = File::from_u8(file_idx).ok_or_else(|| fen_error("rank too long"))?;
                let piece = Piece::try_from(ch).map_err(|_| fen_error("piece char not of PRNBQKprnbqk"))?;
                mailbox[Square::from((file, rank))] = Some(piece);
                file_idx += 1;
            }
            if file_idx as usize > Mailbox::FILES {
                return Err(fen_error("rank too long"));
            }
        }
        if file_idx as usize != Mailbox::FILES {
            return Err(fen_error("rank too short"));
        }
    }

    Ok(mailbox)
}

fn placement_to_fen(mailbox: &Mailbox) -> String {
    let mut placement = String::with_capacity(64);

    for rank_idx in (0..Mailbox::RANKS).rev() {
        let mut empty = 0;
        for file_idx in 0..Mailbox::FILES {
            match mailbox[rank_idx * Mailbox::FILES + file_idx] {
                Some(piece) => {
                    if empty > 0 {
                        placement.push_str(&empty.to_string());
                        empty = 0;
                    }
                    placement.push(char::from(piece));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            placement.push_str(&empty.to_string());
        }
        if rank_idx > 0 {
            placement.push('/');
        }
    }

    placement
}

/// Rejects positions the rules engine cannot play from:
/// each side needs exactly one king, no pawns may stand on the first or last rank,
/// an en passant square must follow a double push,
/// and the side that just moved cannot be left in check.
fn validate(position: &Position) -> error::Result<()> {
    for color in Color::iter() {
        let kings = position
            .pieces
            .pieces()
            .filter(|(_, piece)| *piece == Piece::new(color, PieceKind::King))
            .count();
        if kings != 1 {
            return Err(fen_error("each side must have exactly one king"));
        }

        let count = position
            .pieces
            .pieces()
            .filter(|(_, piece)| piece.color == color)
            .count();
        if count > 16 {
            return Err(fen_error("a side may have at most 16 pieces"));
        }
    }

    let has_pawn_on_edge = position.pieces.pieces().any(|(square, piece)| {
        piece.piece_kind == PieceKind::Pawn && matches!(square.rank(), Rank::R1 | Rank::R8)
    });
    if has_pawn_on_edge {
        return Err(fen_error("pawns cannot stand on the first or last rank"));
    }

    let passive_player = !position.side_to_move;
    if let Some(ep_square) = position.en_passant {
        // The pawn that just double pushed stands in front of the square, its origin behind it.
        let forward = passive_player.forward();
        let pushed_pawn = ep_square.offset(0, forward);
        let origin = ep_square.offset(0, -forward);
        let expected_rank = match position.side_to_move {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        let is_consistent = ep_square.rank() == expected_rank
            && position.pieces[ep_square].is_none()
            && origin.map_or(false, |sq| position.pieces[sq].is_none())
            && pushed_pawn.map_or(false, |sq| {
                position.pieces[sq] == Some(Piece::new(passive_player, PieceKind::Pawn))
            });
        if !is_consistent {
            return Err(fen_error("en passant square does not follow a double pawn push"));
        }
    }

    if let Some(king) = position.pieces.king_square(passive_player) {
        if mg::is_attacked(&position.pieces, king, position.side_to_move) {
            return Err(fen_error("side not to move is in check"));
        }
    }

    Ok(())
}

impl Fen for Position {
    /// Parses the six space separated FEN fields.
    /// The two move counters may be omitted, defaulting to "0 1".
    fn parse_fen(s: &str) -> error::Result<Self> {
        let mut fields = s.split_whitespace();
        let mut next_field = |name: &str| {
            fields
                .next()
                .ok_or_else(|| fen_error(&format!("missing {name} field")))
        };

        let pieces = parse_placement(next_field("placement")?)?;

        let side_to_move = match next_field("side to move")? {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(fen_error("side to move not of w|b")),
        };

        let castling: Castling = next_field("castling")?
            .parse()
            .map_err(|_| fen_error("castling not of - or KQkq"))?;

        let en_passant = match next_field("en passant")? {
            "-" => None,
            square_str => {
                let square: Square = square_str
                    .parse()
                    .map_err(|_| fen_error("en passant square malformed"))?;
                Some(square)
            }
        };

        let halfmoves: MoveCount = match next_field("halfmove clock") {
            Ok(halfmoves_str) => halfmoves_str
                .parse()
                .map_err(|_| fen_error("halfmove clock not a number"))?,
            Err(_) => 0,
        };
        let fullmoves: MoveCount = match next_field("fullmove number") {
            Ok(fullmoves_str) => fullmoves_str
                .parse()
                .map_err(|_| fen_error("fullmove number not a number"))?,
            Err(_) => 1,
        };

        let position = Position {
            pieces,
            side_to_move,
            castling,
            en_passant,
            halfmoves,
            fullmoves: fullmoves.max(1),
        };
        validate(&position)?;

        Ok(position)
    }

    fn to_fen(&self) -> String {
        let en_passant = match self.en_passant {
            Some(square) => square.to_string(),
            None => "-".to_string(),
        };
        format!(
            "{} {} {} {} {} {}",
            placement_to_fen(&self.pieces),
            self.side_to_move,
            self.castling,
            en_passant,
            self.halfmoves,
            self.fullmoves
        )
    }
}
