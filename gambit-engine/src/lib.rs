//! Rules engine for one game of chess between two players:
//! legal move generation, move application and take back, notation,
//! and game status including every automatic draw rule.

pub mod boardrepr;
pub mod coretypes;
pub mod error;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod movelist;
pub mod notation;
pub mod perft;
pub mod position;
pub mod session;
pub mod snapshot;
pub mod status;
pub mod zobrist;

pub use fen::Fen;
pub use game::Game;
pub use position::Position;
pub use session::SharedGame;
pub use snapshot::Snapshot;
pub use status::Status;
