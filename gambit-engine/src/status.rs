//! Game status, recomputed from a position and the game's history on every query.

use std::fmt::{self, Display};

use serde::Serialize;

use crate::coretypes::{Color, MoveCount};
use crate::position::Position;

/// Halfmove clock value at which the game is drawn without a claim.
pub const SEVENTY_FIVE_MOVE_RULE: MoveCount = 150;
/// Halfmove clock value at which either player may claim a draw.
pub const FIFTY_MOVE_RULE: MoveCount = 100;
/// Occurrences of one position that draw the game without a claim.
pub const FIVEFOLD_REPETITION: usize = 5;
/// Occurrences of one position that let either player claim a draw.
pub const THREEFOLD_REPETITION: usize = 3;

/// The rule that ended a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

impl Termination {
    pub fn is_draw(&self) -> bool {
        *self != Termination::Checkmate
    }
}

/// Outcome of a finished game.
/// winner is None for every kind of draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Outcome {
    pub winner: Option<Color>,
    pub termination: Termination,
}

impl Outcome {
    /// Returns the outcome of `position` if the game is over, where `repetitions`
    /// is the number of times the position has occurred in the game so far.
    ///
    /// Checkmate beats every draw, and stalemate beats the remaining draws.
    pub fn of(position: &Position, repetitions: usize) -> Option<Self> {
        let side_to_move = *position.side_to_move();

        if position.has_no_legal_moves() {
            return Some(match position.is_in_check() {
                true => Self {
                    winner: Some(!side_to_move),
                    termination: Termination::Checkmate,
                },
                false => Self::draw(Termination::Stalemate),
            });
        }

        if position.is_insufficient_material() {
            Some(Self::draw(Termination::InsufficientMaterial))
        } else if *position.halfmoves() >= SEVENTY_FIVE_MOVE_RULE {
            Some(Self::draw(Termination::SeventyFiveMoves))
        } else if repetitions >= FIVEFOLD_REPETITION {
            Some(Self::draw(Termination::FivefoldRepetition))
        } else {
            None
        }
    }

    fn draw(termination: Termination) -> Self {
        Self {
            winner: None,
            termination,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.termination, self.winner) {
            (Termination::Checkmate, Some(winner)) => {
                write!(f, "{} wins by checkmate!", winner.name())
            }
            (Termination::Checkmate, None) => write!(f, "Checkmate!"),
            (Termination::Stalemate, _) => write!(f, "Draw by stalemate!"),
            (Termination::InsufficientMaterial, _) => write!(f, "Draw by insufficient material!"),
            (Termination::SeventyFiveMoves, _) => write!(f, "Draw by seventy-five-move rule!"),
            (Termination::FivefoldRepetition, _) => write!(f, "Draw by fivefold repetition!"),
        }
    }
}

/// Summary of a game at one point in time.
/// winner, result and termination are Some only once the game is over.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Status {
    pub turn: Color,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_draw_other: bool,
    pub is_game_over: bool,
    pub move_count: usize,
    pub last_move: Option<String>,
    pub winner: Option<Color>,
    pub result: Option<String>,
    pub termination: Option<Termination>,
    pub can_claim_draw: bool,
    pub halfmove_clock: MoveCount,
    pub fullmove_number: MoveCount,
}

impl Status {
    /// Computes the status of a game currently at `position`.
    /// * move_count - number of moves played in the game.
    /// * last_move - notation of the most recent move, if any.
    /// * repetitions - number of times `position` has occurred in the game, itself included.
    pub fn new(
        position: &Position,
        move_count: usize,
        last_move: Option<String>,
        repetitions: usize,
    ) -> Self {
        let outcome = Outcome::of(position, repetitions);
        let termination = outcome.map(|outcome| outcome.termination);
        let halfmove_clock = *position.halfmoves();

        let is_checkmate = termination == Some(Termination::Checkmate);
        let is_draw_other = !is_checkmate
            && termination != Some(Termination::Stalemate)
            && (position.is_insufficient_material()
                || halfmove_clock >= SEVENTY_FIVE_MOVE_RULE
                || repetitions >= FIVEFOLD_REPETITION);
        let can_claim_draw = outcome.is_none()
            && (halfmove_clock >= FIFTY_MOVE_RULE || repetitions >= THREEFOLD_REPETITION);

        Self {
            turn: *position.side_to_move(),
            is_check: position.is_in_check(),
            is_checkmate,
            is_stalemate: termination == Some(Termination::Stalemate),
            is_draw_other,
            is_game_over: outcome.is_some(),
            move_count,
            last_move,
            winner: outcome.and_then(|outcome| outcome.winner),
            result: outcome.map(|outcome| outcome.to_string()),
            termination,
            can_claim_draw,
            halfmove_clock,
            fullmove_number: *position.fullmoves(),
        }
    }
}
