//! Prompt loop tying parsed commands to the game engine.
use std::io::{BufRead, Write};

use anyhow::Result;
use playground_core::{BoardView, EngineError, GameEngine, GameError, Position};
use tracing::{error, info, warn};

use crate::input::{Command, CommandError, USAGE, parse_command};
use crate::presentation::{Highlight, render_board, status_line};

/// Action name sent by the `attack` command.
pub const ATTACK_ACTION: &str = "attack";

const PROMPT: &str = "Enter command: ";

/// Text produced by one command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub exit: bool,
}

impl Reply {
    fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit: false,
        }
    }
}

pub struct CliApp<'r> {
    engine: GameEngine<'r>,
}

impl<'r> CliApp<'r> {
    /// Wraps an engine that is already populated and started.
    pub fn new(engine: GameEngine<'r>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &GameEngine<'r> {
        &self.engine
    }

    /// Reads commands from `input` until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.board_view())?;
        write!(out, "{PROMPT}")?;
        out.flush()?;

        for line in input.lines() {
            let reply = self.handle(&line?);
            if !reply.text.is_empty() {
                writeln!(out, "{}", reply.text)?;
            }
            if reply.exit {
                return Ok(());
            }
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }

        writeln!(out)?;
        writeln!(out, "Exiting CLI.")?;
        Ok(())
    }

    /// Executes one prompt line.
    pub fn handle(&mut self, line: &str) -> Reply {
        match parse_command(line) {
            Ok(command) => self.execute(command),
            Err(CommandError::Empty) => Reply::default(),
            Err(err) => Reply::say(format!("{err}. {USAGE}")),
        }
    }

    fn execute(&mut self, command: Command) -> Reply {
        match command {
            Command::Move { from, to } => self.move_piece(from, to),
            Command::Attack { from, target } => self.attack(from, target),
            Command::ShowMove(at) => self.show(at, 'M'),
            Command::ShowAttack(at) => self.show(at, 'A'),
            Command::Exit => Reply {
                text: "Exiting CLI.".to_owned(),
                exit: true,
            },
        }
    }

    fn move_piece(&mut self, from: Position, to: Position) -> Reply {
        let Some(id) = self.engine.board().piece_at(from).map(|piece| piece.id()) else {
            return Reply::say("Invalid move: No piece at source position.");
        };

        let headline = match self.engine.move_piece(id, to) {
            Ok(outcome) => {
                info!(
                    piece = %outcome.piece,
                    from = %outcome.from,
                    to = %outcome.to,
                    "move accepted"
                );
                "Move successful.".to_owned()
            }
            Err(err) => failure("Move", &err),
        };
        Reply::say(format!("{headline}\n{}", self.board_view()))
    }

    fn attack(&mut self, from: Position, target: Position) -> Reply {
        let Some(id) = self.engine.board().piece_at(from).map(|piece| piece.id()) else {
            return Reply::say("Invalid attack: No piece at source position.");
        };
        let victim = self
            .engine
            .board()
            .piece_at(target)
            .map(|piece| piece.name().to_owned());

        let headline = match self.engine.perform_action(id, target, ATTACK_ACTION) {
            Ok(outcome) => {
                let mut text = "Attack action performed.".to_owned();
                if outcome.captured.is_some()
                    && let Some(name) = victim
                {
                    text.push_str(&format!(" Captured {name} at {target}."));
                }
                text
            }
            Err(err) => failure("Attack", &err),
        };
        Reply::say(format!("{headline}\n{}", self.board_view()))
    }

    fn show(&self, at: Position, marker: char) -> Reply {
        let Some(piece) = self.engine.board().piece_at(at) else {
            return Reply::say(format!("No piece found at ({}, {}).", at.x, at.y));
        };

        let (pattern, label, targets) = if marker == 'M' {
            ("movement", "Move", self.engine.legal_moves(piece.id()))
        } else {
            (
                "attack",
                "Attack",
                self.engine.legal_action_targets(piece.id(), ATTACK_ACTION),
            )
        };
        let targets = match targets {
            Ok(targets) => targets,
            Err(err) => return Reply::say(failure("Lookup", &err)),
        };

        let highlight = Highlight::new(at, targets, marker);
        Reply::say(format!(
            "{}\nShowing {pattern} pattern for {} at ({},{}). {label}={marker}, X=Selected",
            render_board(self.engine.board(), Some(&highlight)),
            piece.name(),
            at.x,
            at.y,
        ))
    }

    fn board_view(&self) -> String {
        format!(
            "{}\n{}",
            render_board(self.engine.board(), None),
            status_line(self.engine.turn(), self.engine.phase())
        )
    }
}

fn failure(what: &str, err: &EngineError) -> String {
    let severity = err.severity();
    if severity.is_internal() {
        error!(code = err.error_code(), severity = severity.as_str(), %err, "{what} failed");
    } else {
        warn!(code = err.error_code(), severity = severity.as_str(), %err, "{what} failed");
    }
    format!("{what} failed: {err}")
}
