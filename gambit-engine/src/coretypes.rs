//! The fundamental and simple types of `gambit_engine`.

use std::convert::TryFrom;
use std::fmt::{self, Display, Write};
use std::ops::{BitOr, Not};
use std::str::FromStr;

use serde::Serialize;

use crate::error::{self, ErrorKind};

///////////////
// Constants //
///////////////
pub const NUM_FILES: usize = 8; // A, B, C, D, E, F, G, H
pub const NUM_RANKS: usize = 8; // 1, 2, 3, 4, 5, 6, 7, 8
pub const NUM_SQUARES: usize = NUM_FILES * NUM_RANKS;

// 6 Black, 6 White of Pawn, Knight, Bishop, Rook, Queen, King.
pub const NUM_PIECE_KINDS: usize = 12;

// The max possible measured number of moves for any chess position.
pub const MAX_MOVES: usize = 218;

/////////////////////////
// Data and Structures //
/////////////////////////

/// Counter for half-move clock and full-moves.
pub type MoveCount = u16;

/// Depth of a move tree, in half moves.
pub type PlyKind = u32;

/// Color can represent the color of a piece, or a player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

/// Enum variant order and discriminant are important.
/// Must be contiguous and start from 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PieceKind {
    King,
    Pawn,
    Knight,
    Rook,
    Queen,
    Bishop,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    pub(crate) color: Color,
    pub(crate) piece_kind: PieceKind,
}

/// Observe Castling rights for a position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Castling(u8);

/// Castling Enum constants.
impl Castling {
    pub const W_KING: Castling = Castling(0b00000001);
    pub const W_QUEEN: Castling = Castling(0b00000010);
    pub const B_KING: Castling = Castling(0b00000100);
    pub const B_QUEEN: Castling = Castling(0b00001000);
    pub const W_SIDE: Castling = Castling(Self::W_KING.0 | Self::W_QUEEN.0);
    pub const B_SIDE: Castling = Castling(Self::B_KING.0 | Self::B_QUEEN.0);
    pub const ALL: Castling = Castling(Self::W_SIDE.0 | Self::B_SIDE.0);
    pub const NONE: Castling = Castling(0u8);
    pub const ENUMERATIONS: usize = 16; // 16 possibilities for castling rights.
}

/// Enum variant order and discriminant must be contiguous, start from 0,
/// and be in ascending order ABCDEFGH.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum File {
    A, B, C, D, E, F, G, H = 7u8,
}

/// Enum variant order and discriminant must be contiguous, start from 0,
/// and be in ascending order 12345678.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Rank {
    R1, R2, R3, R4, R5, R6, R7, R8 = 7u8,
}

/// Square
/// Every possible square on a chess board.
/// The order of enums is important, as `Square::A1 as u8` corresponds to
/// that Square's index in a Mailbox.
/// WARNING: The exact ordering of enums is important for their discriminants.
///          Changing the discriminant of any variant is breaking.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8 = 63u8,
}

#[rustfmt::skip]
const FILES: [File; NUM_FILES] = {
    use File::*;
    [A, B, C, D, E, F, G, H]
};

#[rustfmt::skip]
const RANKS: [Rank; NUM_RANKS] = {
    use Rank::*;
    [R1, R2, R3, R4, R5, R6, R7, R8]
};

/// Every Square, indexed by its discriminant.
#[rustfmt::skip]
const SQUARES: [Square; NUM_SQUARES] = {
    use Square::*;
    [
        A1, B1, C1, D1, E1, F1, G1, H1,
        A2, B2, C2, D2, E2, F2, G2, H2,
        A3, B3, C3, D3, E3, F3, G3, H3,
        A4, B4, C4, D4, E4, F4, G4, H4,
        A5, B5, C5, D5, E5, F5, G5, H5,
        A6, B6, C6, D6, E6, F6, G6, H6,
        A7, B7, C7, D7, E7, F7, G7, H7,
        A8, B8, C8, D8, E8, F8, G8, H8,
    ]
};

/// Move
/// Long Algebraic form of moving a single chess piece.
/// Equivalent to a chess "half move", or "ply".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Move {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) promotion: Option<PieceKind>,
}

/// Enum describing the kind of a move.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MoveKind {
    /// Move resulted in a capture.
    Capture(PieceKind),
    /// No special moves or captures, simply moved to empty square.
    Quiet,
    /// This move was the special castling move.
    Castle,
    /// En passant capture.
    EnPassant,
}

/// MoveInfo contains extra properties of a move in context of an existing position.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MoveInfo {
    /// Original square of moving piece.
    pub(crate) from: Square,
    /// Target square of moving piece.
    pub(crate) to: Square,
    /// Promotion piece kind.
    pub(crate) promotion: Option<PieceKind>,
    /// Kind of the piece that was moved.
    pub(crate) piece_kind: PieceKind,
    /// Flag if move was a regular or special move.
    pub(crate) move_kind: MoveKind,
}

////////////
// Traits //
////////////

/// SquareIndexable
/// A chessboard has 64 squares on it. SquareIndexable can be implemented
/// for types whose values can map directly to a chess Square's index.
pub trait SquareIndexable {
    /// idx must be implemented.
    /// idx(&self) must return a number between 0-63 inclusive, representing
    /// a square on a chess board in little-endian, rank-file order.
    /// Warning: Values outside of 0-63 may panic.
    fn idx(&self) -> usize;
}

// Blanket impl on references of types that are SquareIndexable.
impl<I: SquareIndexable> SquareIndexable for &I {
    fn idx(&self) -> usize {
        I::idx(*self)
    }
}

//////////////////////
/// Implementations //
//////////////////////

impl Color {
    /// FEN compliant conversion.
    pub const fn to_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Capitalized human readable name, "White" or "Black".
    pub const fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }

    /// Rank on which this color's pieces begin, other than pawns.
    pub const fn back_rank(&self) -> Rank {
        match self {
            Color::White => Rank::R1,
            Color::Black => Rank::R8,
        }
    }

    /// Rank delta of a single pawn push for this color.
    pub const fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Both colors, White first.
    pub fn iter() -> impl Iterator<Item = Color> {
        [Color::White, Color::Black].into_iter()
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Not for &Color {
    type Output = Color;
    fn not(self) -> Self::Output {
        Color::not(*self)
    }
}

impl From<Color> for char {
    fn from(color: Color) -> Self {
        color.to_char()
    }
}

impl TryFrom<char> for Color {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            'w' => Ok(Color::White),
            'b' => Ok(Color::Black),
            _ => Err((ErrorKind::ParseColorMalformed, "char is not w|b").into()),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(char::from(*self))
    }
}

impl PieceKind {
    /// Piece kinds a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// FEN compliant conversion, defaults as white pieces.
    pub const fn to_char(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Rook => 'R',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Parses a promotion letter, case-insensitive.
    /// Only the four kinds a pawn may promote to are accepted.
    pub fn from_promotion_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'q' => Some(PieceKind::Queen),
            'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop),
            'n' => Some(PieceKind::Knight),
            _ => None,
        }
    }
}

impl Piece {
    pub const fn new(color: Color, piece_kind: PieceKind) -> Self {
        Piece { color, piece_kind }
    }
    /// Immutable Getters.
    pub const fn color(&self) -> &Color {
        &self.color
    }

    pub const fn to_char(&self) -> char {
        match self.color {
            Color::White => self.piece_kind.to_char(),
            Color::Black => self.piece_kind.to_char().to_ascii_lowercase(),
        }
    }

    /// Index of this piece into a table with one row per colored piece.
    pub(crate) const fn table_idx(&self) -> usize {
        self.color as usize * 6 + self.piece_kind as usize
    }
}

impl From<Piece> for char {
    fn from(piece: Piece) -> Self {
        piece.to_char()
    }
}

impl TryFrom<char> for Piece {
    type Error = error::Error;
    fn try_from(value: char) -> error::Result<Self> {
        let color = match value.is_ascii_uppercase() {
            true => Color::White,
            false => Color::Black,
        };
        let piece_kind = match value.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'R' => PieceKind::Rook,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => {
                return Err((
                    ErrorKind::ParsePieceMalformed,
                    "char is not in PRNBQKprnbqk",
                )
                    .into())
            }
        };
        Ok(Piece { color, piece_kind })
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(char::from(*self))
    }
}

impl Castling {
    /// Returns underlying bits used to represent Castling rights.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns true if there are no castling rights.
    pub const fn is_none(&self) -> bool {
        self.0 == 0u8
    }

    /// Returns true if Castling mask has all of provided bits.
    pub fn has(&self, rights: Castling) -> bool {
        self.0 & rights.0 == rights.0
    }

    /// Returns true if self has any of the provided bits.
    pub fn has_any(&self, rights: Castling) -> bool {
        self.0 & rights.0 != 0
    }

    /// Set given bits to '1' on Castling mask.
    pub fn set(&mut self, rights: Castling) {
        self.0 |= rights.0;
    }

    /// Set given bits to '0' on Castling mask.
    pub fn clear(&mut self, rights: Castling) {
        self.0 &= !rights.0;
    }

    /// Removes any right that depends on a king or rook standing on `square`.
    /// Called for both the origin and destination of every move.
    pub fn clear_square(&mut self, square: Square) {
        match square {
            Square::E1 => self.clear(Self::W_SIDE),
            Square::E8 => self.clear(Self::B_SIDE),
            Square::H1 => self.clear(Self::W_KING),
            Square::A1 => self.clear(Self::W_QUEEN),
            Square::H8 => self.clear(Self::B_KING),
            Square::A8 => self.clear(Self::B_QUEEN),
            _ => (),
        }
    }
}

impl BitOr for Castling {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Displays in FEN-component format.
impl Display for Castling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut castling_str = String::with_capacity(4);

        if self.is_none() {
            castling_str.push('-');
        } else {
            if self.has(Self::W_KING) {
                castling_str.push('K');
            }
            if self.has(Self::W_QUEEN) {
                castling_str.push('Q');
            }
            if self.has(Self::B_KING) {
                castling_str.push('k');
            }
            if self.has(Self::B_QUEEN) {
                castling_str.push('q');
            }
        }
        f.write_str(&castling_str)
    }
}

/// Castling ::= '-' | ['K'] ['Q'] ['k'] ['q']
impl FromStr for Castling {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let mut castling_rights = Castling::NONE;

        if s == "-" {
            return Ok(castling_rights);
        }
        if s.is_empty() || s.len() > 4 {
            return Err((ErrorKind::ParseCastlingMalformed, "expected - or 1-4 of KQkq").into());
        }

        for ch in s.chars() {
            match ch {
                'K' => castling_rights.set(Self::W_KING),
                'Q' => castling_rights.set(Self::W_QUEEN),
                'k' => castling_rights.set(Self::B_KING),
                'q' => castling_rights.set(Self::B_QUEEN),
                _ => return Err((ErrorKind::ParseCastlingMalformed, "char not of KQkq").into()),
            };
        }
        Ok(castling_rights)
    }
}

impl File {
    /// Maps 0-7 onto files A-H.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match (value as usize) < NUM_FILES {
            true => Some(FILES[value as usize]),
            false => None,
        }
    }
    /// Get the character representation of File, in lowercase.
    pub const fn to_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl Rank {
    /// Maps 0-7 onto ranks 1-8.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match (value as usize) < NUM_RANKS {
            true => Some(RANKS[value as usize]),
            false => None,
        }
    }
    pub const fn to_char(&self) -> char {
        (b'1' + *self as u8) as char
    }
}

impl TryFrom<char> for File {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            'a'..='h' => Ok(FILES[(ch as u8 - b'a') as usize]),
            _ => Err((ErrorKind::ParseFileMalformed, "file char not of abcdefgh").into()),
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            '1'..='8' => Ok(RANKS[(ch as u8 - b'1') as usize]),
            _ => Err((ErrorKind::ParseRankMalformed, "rank char not of 12345678").into()),
        }
    }
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl SquareIndexable for (File, Rank) {
    fn idx(&self) -> usize {
        let &(file, rank) = self;
        NUM_FILES * rank as usize + file as usize
    }
}

impl Square {
    /// Square enum variants cover all u8 values from 0-63 inclusive.
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < NUM_SQUARES {
            Some(SQUARES[value as usize])
        } else {
            None
        }
    }
    pub fn from_idx<I: SquareIndexable>(indexable: I) -> Option<Square> {
        Self::from_u8(indexable.idx() as u8)
    }

    /// Every square from A1 to H8.
    pub fn iter() -> impl Iterator<Item = Square> {
        SQUARES.into_iter()
    }

    pub const fn file(&self) -> File {
        FILES[self.file_u8() as usize]
    }

    pub const fn rank(&self) -> Rank {
        RANKS[self.rank_u8() as usize]
    }

    /// Returns 0-based file (0,1,2,3,4,5,6,7), not 1-based chess file.
    pub const fn file_u8(&self) -> u8 {
        *self as u8 % NUM_FILES as u8
    }

    /// Returns 0-based rank (0,1,2,3,4,5,6,7), not 1-based chess rank.
    pub const fn rank_u8(&self) -> u8 {
        *self as u8 / NUM_FILES as u8
    }

    /// Returns the Square shifted by the given file and rank deltas,
    /// or None if the result falls off the board.
    pub const fn offset(&self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file_u8() as i8 + file_delta;
        let rank = self.rank_u8() as i8 + rank_delta;
        if file < 0 || file >= NUM_FILES as i8 || rank < 0 || rank >= NUM_RANKS as i8 {
            None
        } else {
            Self::from_u8((rank * NUM_FILES as i8 + file) as u8)
        }
    }

    /// Returns true for dark squares, where A1 is dark.
    pub const fn is_dark(&self) -> bool {
        (self.file_u8() + self.rank_u8()) % 2 == 0
    }
}

impl From<(File, Rank)> for Square {
    fn from(coordinate: (File, Rank)) -> Self {
        SQUARES[coordinate.idx()]
    }
}

/// Square::= <fileLetter><rankNumber>
/// Anything other than exactly two characters is rejected.
impl FromStr for Square {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let malformed = || error::Error::from((ErrorKind::InvalidSquare, s.escape_debug()));
        let mut chars = s.chars();
        let file_ch = chars.next().ok_or_else(malformed)?;
        let rank_ch = chars.next().ok_or_else(malformed)?;
        if chars.next().is_some() {
            return Err(malformed());
        }
        let file = File::try_from(file_ch).map_err(|_| malformed())?;
        let rank = Rank::try_from(rank_ch).map_err(|_| malformed())?;
        Ok(Square::from((file, rank)))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl SquareIndexable for Square {
    fn idx(&self) -> usize {
        *self as usize
    }
}

impl Move {
    pub const fn new(from: Square, to: Square, promotion: Option<PieceKind>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }
}

impl MoveInfo {
    pub const fn new(move_: Move, moved_piece_kind: PieceKind, move_kind: MoveKind) -> Self {
        Self {
            from: move_.from,
            to: move_.to,
            promotion: move_.promotion,
            piece_kind: moved_piece_kind,
            move_kind,
        }
    }

    /// Get this MoveInfo's inner Move.
    pub const fn move_(&self) -> Move {
        Move::new(self.from, self.to, self.promotion)
    }

    /// Returns true if the position before moving cannot be repeated in the game tree after the move.
    /// Positions that result from captures or pawn moves cannot be repeated after those moves
    /// because a pawn cannot move backwards, and material cannot be restored.
    pub fn is_unrepeatable(&self) -> bool {
        self.is_capture() || self.piece_kind == PieceKind::Pawn
    }

    /// Returns true if this MoveInfo came from a capturing move, including en passant.
    pub fn is_capture(&self) -> bool {
        matches!(self.move_kind, MoveKind::Capture(_) | MoveKind::EnPassant)
    }
}

/// # Example
/// Move { from: A7, to: B8, promotion: Some(Queen) } -> `a7b8q`.
impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece_kind) = self.promotion {
            f.write_char(piece_kind.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
