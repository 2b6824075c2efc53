//! Scripted input replayed against the session.

use glam::Vec2;
use skirmish_core::{Command, Direction};
use thiserror::Error;

/// Problems found in scripted input.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ScriptError {
    /// A key has no binding.
    #[error("unknown key {key:?} at position {position}")]
    UnknownKey {
        /// Offending key.
        key: char,
        /// One-based position within the key string.
        position: usize,
    },
    /// A click is not an `X,Y` pixel pair.
    #[error("click {0:?} must be an X,Y pixel pair")]
    MalformedClick(String),
}

/// Translates a key string into commands.
///
/// `w`, `a`, `s` and `d` move the cursor, `e` selects the hovered tile and
/// `x` drops the selection. Whitespace is ignored.
pub(crate) fn parse_keys(keys: &str) -> Result<Vec<Command>, ScriptError> {
    keys.chars()
        .enumerate()
        .filter(|(_, key)| !key.is_whitespace())
        .map(|(index, key)| {
            key_command(key).ok_or(ScriptError::UnknownKey {
                key,
                position: index + 1,
            })
        })
        .collect()
}

fn key_command(key: char) -> Option<Command> {
    let command = match key.to_ascii_lowercase() {
        'w' => Command::MoveCursor {
            direction: Direction::North,
        },
        'a' => Command::MoveCursor {
            direction: Direction::West,
        },
        's' => Command::MoveCursor {
            direction: Direction::South,
        },
        'd' => Command::MoveCursor {
            direction: Direction::East,
        },
        'e' => Command::SelectHovered,
        'x' => Command::ClearSelection,
        _ => return None,
    };
    Some(command)
}

/// Parses an `X,Y` pixel position.
pub(crate) fn parse_click(value: &str) -> Result<Vec2, ScriptError> {
    let malformed = || ScriptError::MalformedClick(value.to_owned());

    let (x, y) = value.split_once(',').ok_or_else(malformed)?;
    let x: f32 = x.trim().parse().map_err(|_| malformed())?;
    let y: f32 = y.trim().parse().map_err(|_| malformed())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(malformed());
    }

    Ok(Vec2::new(x, y))
}
