//! Input processing for the CLI client.
//!
//! Turns one line typed at the prompt into a [`Command`]. Coordinates are
//! `x y` pairs with `(0, 0)` at the bottom-left square.

use playground_core::Position;

/// One-line usage summary printed for unknown input.
pub const USAGE: &str = "Use: move <x1> <y1> <x2> <y2> | attack <x1> <y1> <x2> <y2> | \
                         showmove <x> <y> | showattack <x> <y> | exit";

/// Decoded prompt command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Move the piece on `from` to the empty square `to`.
    Move { from: Position, to: Position },
    /// Attack `target` with the piece on `from`.
    Attack { from: Position, target: Position },
    /// Highlight the legal moves of the piece on a square.
    ShowMove(Position),
    /// Highlight the legal attack targets of the piece on a square.
    ShowAttack(Position),
    Exit,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' takes {expected} coordinates, got {found}")]
    Arity {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("'{0}' is not a coordinate")]
    BadCoordinate(String),
}

/// Parses a prompt line. The command word is case-insensitive.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Err(CommandError::Empty);
    };
    let args: Vec<&str> = words.collect();

    match word.to_ascii_lowercase().as_str() {
        "move" => {
            let [x1, y1, x2, y2] = coordinates::<4>("move", &args)?;
            Ok(Command::Move {
                from: Position::new(x1, y1),
                to: Position::new(x2, y2),
            })
        }
        "attack" => {
            let [x1, y1, x2, y2] = coordinates::<4>("attack", &args)?;
            Ok(Command::Attack {
                from: Position::new(x1, y1),
                target: Position::new(x2, y2),
            })
        }
        "showmove" => {
            let [x, y] = coordinates::<2>("showmove", &args)?;
            Ok(Command::ShowMove(Position::new(x, y)))
        }
        "showattack" => {
            let [x, y] = coordinates::<2>("showattack", &args)?;
            Ok(Command::ShowAttack(Position::new(x, y)))
        }
        "exit" | "quit" => Ok(Command::Exit),
        _ => Err(CommandError::Unknown(word.to_owned())),
    }
}

fn coordinates<const N: usize>(
    command: &'static str,
    args: &[&str],
) -> Result<[i32; N], CommandError> {
    if args.len() != N {
        return Err(CommandError::Arity {
            command,
            expected: N,
            found: args.len(),
        });
    }

    let mut values = [0; N];
    for (slot, raw) in values.iter_mut().zip(args) {
        *slot = raw
            .parse()
            .map_err(|_| CommandError::BadCoordinate((*raw).to_owned()))?;
    }
    Ok(values)
}
