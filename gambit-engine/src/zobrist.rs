//! Zobrist Hashing

use std::collections::HashSet;
use std::ops::Index;

use rand::prelude::*;

use crate::boardrepr::Mailbox;
use crate::coretypes::{Castling, Color, File, Piece, Square, SquareIndexable};
use crate::coretypes::{NUM_FILES, NUM_PIECE_KINDS, NUM_SQUARES};
use crate::position::Position;

/// HashKind is an alias for the underlying type of a Zobrist Hash.
pub type HashKind = u64;

/// Key contains all data needed to generate a hash.
/// Two positions with equal keys are the same position for repetition purposes.
pub type Key<'a> = (&'a Mailbox, &'a Color, &'a Castling, &'a Option<Square>);

/// Convert a Position reference into a Key.
impl<'a> From<&'a Position> for Key<'a> {
    fn from(pos_ref: &'a Position) -> Self {
        (
            pos_ref.pieces(),
            pos_ref.side_to_move(),
            pos_ref.castling(),
            pos_ref.en_passant(),
        )
    }
}

/// Zobrist Hashing is a quick way to hash a chess position.
/// ZobristTable contains unique, pseudo-randomly generated values
/// used for calculating Zobrist Hash of a chess position.
///
/// Each Piece gets a unique number for each square.
/// A single side to move gets a unique number.
/// Each possible combination of castling rights gets a unique number.
/// Each possible file for En-Passant gets a unique number.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ZobristTable {
    piece_hash: [[HashKind; NUM_SQUARES]; NUM_PIECE_KINDS],
    ep_hash: [HashKind; NUM_FILES],
    castling_hash: [HashKind; Castling::ENUMERATIONS],
    pub(crate) player_hash: HashKind,
}

impl ZobristTable {
    const TOGGLE_PLAYER: Color = Color::Black;

    /// Returns a new ZobristTable with randomly seeded, unique values.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Returns a new ZobristTable with unique values generated from seeded rng.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Returns a new ZobristTable with unique values generated from rng.
    fn with_rng(mut rng: StdRng) -> Self {
        // Ensure there are no duplicates in Table. Each value used must be unique.
        let mut used_values = HashSet::new();
        let mut unique_value = |rng: &mut StdRng| loop {
            let value: HashKind = rng.gen();
            // insert returns false if item was already in set.
            if used_values.insert(value) {
                return value;
            }
        };

        let mut piece_hash = [[HashKind::default(); NUM_SQUARES]; NUM_PIECE_KINDS];
        let mut ep_hash = [HashKind::default(); NUM_FILES];
        let mut castling_hash = [HashKind::default(); Castling::ENUMERATIONS];

        for item in piece_hash
            .iter_mut()
            .flatten()
            .chain(ep_hash.iter_mut())
            .chain(castling_hash.iter_mut())
        {
            *item = unique_value(&mut rng);
        }
        let player_hash = unique_value(&mut rng);

        Self {
            piece_hash,
            ep_hash,
            castling_hash,
            player_hash,
        }
    }

    /// Generate a hash value from provided key in context of this ZobristTable.
    pub fn generate_hash(&self, key: Key) -> HashKind {
        let mut hash = HashKind::default();

        // For each piece, xor its value from ztable into the hash.
        for (square, piece) in key.0.pieces() {
            hash ^= self[(piece, square)];
        }

        // Hash the en-passant file if it exists.
        if let Some(ep_square) = key.3 {
            hash ^= self[ep_square.file()];
        }

        // Hash castling rights.
        hash ^= self[*key.2];

        // Hash player. Only need to hash when active player is Black.
        if *key.1 == ZobristTable::TOGGLE_PLAYER {
            hash ^= self.player_hash;
        }

        hash
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: SquareIndexable> Index<(Piece, I)> for ZobristTable {
    type Output = HashKind;
    fn index(&self, (piece, square): (Piece, I)) -> &Self::Output {
        &self.piece_hash[piece.table_idx()][square.idx()]
    }
}

impl Index<File> for ZobristTable {
    type Output = HashKind;
    fn index(&self, file: File) -> &Self::Output {
        &self.ep_hash[file as usize]
    }
}

impl Index<Castling> for ZobristTable {
    type Output = HashKind;
    fn index(&self, castling: Castling) -> &Self::Output {
        &self.castling_hash[castling.bits() as usize]
    }
}
