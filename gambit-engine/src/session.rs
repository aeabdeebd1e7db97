//! Thread safe handle to one running game.
//!
//! Every mutation holds the write lock for its full duration, including the
//! building of its response, so callers on other threads never observe a
//! position between a legality check and the move being applied.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::game::Game;
use crate::snapshot::Snapshot;

/// Result of a move attempt.
/// message is the SAN of the move on success, or the reason it was rejected.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MoveResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

/// Result of taking back a move. success is false if there was nothing to undo.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct UndoResponse {
    pub success: bool,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

/// Result of a reset, which always succeeds.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub game_id: String,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct LegalMoves {
    pub legal_moves: Vec<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct History {
    pub history: Vec<String>,
}

/// SharedGame is a cloneable handle, all clones refer to the same Game.
#[derive(Debug, Clone, Default)]
pub struct SharedGame {
    game: Arc<RwLock<Game>>,
}

impl SharedGame {
    pub fn new(game: Game) -> Self {
        Self {
            game: Arc::new(RwLock::new(game)),
        }
    }

    // A panic while holding the lock cannot leave a Game half updated:
    // every mutation either completes or returns before touching state.
    fn read(&self) -> RwLockReadGuard<'_, Game> {
        self.game.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Game> {
        self.game.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with shared access to the game.
    pub fn with_game<T, F: FnOnce(&Game) -> T>(&self, f: F) -> T {
        f(&self.read())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.read().snapshot()
    }

    pub fn legal_moves(&self, square: &str) -> LegalMoves {
        LegalMoves {
            legal_moves: self.read().moves_from(square),
        }
    }

    pub fn attempt_move(&self, from: &str, to: &str, promotion: Option<&str>) -> MoveResponse {
        let mut game = self.write();
        let (success, message) = match game.attempt_move(from, to, promotion) {
            Ok(san) => (true, san),
            Err(error) => (false, error.to_string()),
        };
        MoveResponse {
            success,
            message,
            snapshot: game.snapshot(),
        }
    }

    pub fn undo(&self) -> UndoResponse {
        let mut game = self.write();
        let success = game.undo();
        UndoResponse {
            success,
            snapshot: game.snapshot(),
        }
    }

    pub fn reset(&self) -> ResetResponse {
        let mut game = self.write();
        game.reset();
        ResetResponse {
            success: true,
            game_id: game.game_id().to_string(),
            snapshot: game.snapshot(),
        }
    }

    pub fn history(&self) -> History {
        History {
            history: self.read().history(),
        }
    }
}

impl From<Game> for SharedGame {
    fn from(game: Game) -> Self {
        Self::new(game)
    }
}
