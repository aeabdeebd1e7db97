//! MoveList types used in Gambit engine.
//!
//! The underlying type of MoveList may change at any time during
//! pre-1.0 development, so a MoveList type alias makes changes easy.

use arrayvec::ArrayVec;

use crate::coretypes::MAX_MOVES;
use crate::coretypes::Move;

/// MoveList is a container that can hold at most `MAX_MOVES`, the most number of moves per any chess position.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;
