//! Line based host for one shared game of chess.
//!
//! Reads one command per line from stdin and answers each with one JSON document
//! on stdout. Successful mutations are also published to the event hub.

mod hub;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::thread;

use clap::Parser;
use serde::Serialize;
use serde_json::json;

use gambit_engine::{Game, SharedGame};
use hub::{Event, Hub};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    /// Starting position as a FEN string. Reset always returns to the standard start.
    #[arg(long)]
    fen: Option<String>,
    /// Pretty print JSON replies
    #[arg(long)]
    pretty: bool,
    /// Print the board to stderr after every change
    #[arg(long)]
    board: bool,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Eq, PartialEq)]
enum InputKind {
    Board,
    Moves(String),
    Move {
        from: String,
        to: String,
        promotion: Option<String>,
    },
    Undo,
    Reset,
    History,
    Help,
    Quit,
    Empty,
    Error(String),
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        let words: Vec<&str> = s.split_whitespace().collect();
        match words.as_slice() {
            [] => Self::Empty,
            ["board"] => Self::Board,
            ["moves", square] => Self::Moves(square.to_string()),
            ["move", from, to] => Self::Move {
                from: from.to_string(),
                to: to.to_string(),
                promotion: None,
            },
            ["move", from, to, promotion] => Self::Move {
                from: from.to_string(),
                to: to.to_string(),
                promotion: Some(promotion.to_string()),
            },
            ["undo"] => Self::Undo,
            ["reset"] | ["newgame"] => Self::Reset,
            ["history"] => Self::History,
            ["help"] => Self::Help,
            ["quit"] | ["exit"] => Self::Quit,
            [coordinate] => Self::from_coordinate(coordinate),
            _ => Self::Error(format!("unknown command {}", s.trim().escape_debug())),
        }
    }
}

impl InputKind {
    /// Coordinate ::= <from><to>[promotion], for example e2e4 or e7e8q.
    fn from_coordinate(s: &str) -> Self {
        if s.is_ascii() && (s.len() == 4 || s.len() == 5) {
            Self::Move {
                from: s[0..2].to_string(),
                to: s[2..4].to_string(),
                promotion: s.get(4..).filter(|p| !p.is_empty()).map(str::to_string),
            }
        } else {
            Self::Error(format!("unknown command {}", s.escape_debug()))
        }
    }
}

const HELP: &str = "\
board                      print the board and game status
moves <square>             list legal destinations from a square
move <from> <to> [q|r|b|n] play a move, also written e2e4 or e7e8q
undo                       take back the last move
reset                      start a new game
history                    list the moves played so far
help                       print this help text
quit                       leave";

struct Host {
    game: SharedGame,
    hub: Hub,
    pretty: bool,
    show_board: bool,
}

impl Host {
    fn reply<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        match self.pretty {
            true => serde_json::to_writer_pretty(&mut stdout, value)?,
            false => serde_json::to_writer(&mut stdout, value)?,
        }
        writeln!(stdout)?;
        stdout.flush()
    }

    fn publish<T: Serialize>(&self, name: &'static str, payload: &T) -> io::Result<()> {
        let event = Event::new(name, payload)?;
        self.hub.publish(event);
        if self.show_board {
            let board = self.game.with_game(|game| game.position().to_string());
            eprintln!("{board}");
        }
        Ok(())
    }

    /// Returns false once the host should stop.
    fn handle(&self, input: InputKind) -> io::Result<bool> {
        match input {
            InputKind::Empty => (),
            InputKind::Board => self.reply(&self.game.snapshot())?,
            InputKind::Moves(square) => self.reply(&self.game.legal_moves(&square))?,
            InputKind::Move {
                from,
                to,
                promotion,
            } => {
                let response = self.game.attempt_move(&from, &to, promotion.as_deref());
                self.reply(&response)?;
                if response.success {
                    self.publish(Event::MOVE_MADE, &response)?;
                }
            }
            InputKind::Undo => {
                let response = self.game.undo();
                self.reply(&response)?;
                if response.success {
                    self.publish(Event::MOVE_UNDONE, &response)?;
                }
            }
            InputKind::Reset => {
                let response = self.game.reset();
                self.reply(&response)?;
                self.publish(Event::GAME_RESET, &response)?;
            }
            InputKind::History => self.reply(&self.game.history())?,
            InputKind::Help => self.reply(&json!({ "help": HELP }))?,
            InputKind::Quit => return Ok(false),
            InputKind::Error(message) => self.reply(&json!({ "error": message }))?,
        }
        Ok(true)
    }
}

/// Logs every published event until the hub goes away.
fn spawn_event_logger(hub: &Hub) -> thread::JoinHandle<()> {
    let events = hub.subscribe();
    thread::spawn(move || {
        for event in events {
            let status = &event.payload["status"];
            log::info!(
                "{}: move {} turn {} {}",
                event.name,
                status["move_count"],
                status["turn"],
                status["result"]
            );
        }
    })
}

/// Waits for the event logger. Returns false if it panicked.
fn join_event_logger(event_logger: thread::JoinHandle<()>) -> bool {
    match event_logger.join() {
        Ok(()) => true,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("unknown panic");
            log::error!("event logger panicked: {message}");
            false
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Arguments::parse();
    let env = env_logger::Env::default().default_filter_or(args.log_level.as_str());
    env_logger::Builder::from_env(env).init();

    let game = match &args.fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };
    log::info!("hosting game {}", game.game_id());

    let host = Host {
        game: SharedGame::new(game),
        hub: Hub::new(),
        pretty: args.pretty,
        show_board: args.board,
    };
    let event_logger = spawn_event_logger(&host.hub);
    log::debug!("{} event subscribers", host.hub.subscriber_count());

    for line in io::stdin().lock().lines() {
        if !host.handle(InputKind::from(line?.as_str()))? {
            break;
        }
    }

    // Dropping the hub hangs up the logger's channel.
    drop(host);
    join_event_logger(event_logger);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!(InputKind::from("board"), InputKind::Board);
        assert_eq!(InputKind::from("  "), InputKind::Empty);
        assert_eq!(InputKind::from("moves e2"), InputKind::Moves("e2".into()));
        assert_eq!(InputKind::from("quit"), InputKind::Quit);
        assert_eq!(
            InputKind::from("move e7 e8 n"),
            InputKind::Move {
                from: "e7".into(),
                to: "e8".into(),
                promotion: Some("n".into()),
            }
        );
        assert_eq!(
            InputKind::from("e2e4"),
            InputKind::Move {
                from: "e2".into(),
                to: "e4".into(),
                promotion: None,
            }
        );
        assert_eq!(
            InputKind::from("a7a8q"),
            InputKind::Move {
                from: "a7".into(),
                to: "a8".into(),
                promotion: Some("q".into()),
            }
        );
        assert!(matches!(InputKind::from("castle"), InputKind::Error(_)));
        assert!(matches!(InputKind::from("e2é4"), InputKind::Error(_)));
    }

    #[test]
    fn event_logger_panic_is_reported() {
        let quiet = thread::spawn(|| ());
        assert!(join_event_logger(quiet));

        let failing = thread::spawn(|| panic!("subscriber failed"));
        assert!(!join_event_logger(failing));
    }

    #[test]
    fn host_publishes_successful_mutations() {
        let host = Host {
            game: SharedGame::default(),
            hub: Hub::new(),
            pretty: false,
            show_board: false,
        };
        let events = host.hub.subscribe();

        assert!(host.handle(InputKind::from("e2e5")).unwrap());
        assert!(host.handle(InputKind::from("e2e4")).unwrap());
        assert!(host.handle(InputKind::from("undo")).unwrap());
        assert!(host.handle(InputKind::from("undo")).unwrap());
        assert!(host.handle(InputKind::from("reset")).unwrap());
        assert!(!host.handle(InputKind::from("quit")).unwrap());

        let names: Vec<&str> = events.try_iter().map(|event| event.name).collect();
        assert_eq!(names, vec!["move_made", "move_undone", "game_reset"]);
    }
}
