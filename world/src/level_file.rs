//! Plain-text level description format.
//!
//! Each non-blank line places one entity:
//!
//! ```text
//! <TYPE> <label> <x>, <y>
//! ```
//!
//! `TYPE` is one of `TAXI`, `PLANET`, `GAS_CLOUD` or `WARP_STAR`. The label is
//! ignored. The final character of the x token (the comma) is dropped before
//! parsing. Planets are visited in the order they are listed.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use star_taxi_core::Vec2;
use thiserror::Error;

/// Entity positions described by a level file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelLayout {
    /// Starting position of the taxi.
    pub taxi: Vec2,
    /// Planet positions in destination order.
    pub planets: Vec<Vec2>,
    /// Gas cloud positions.
    pub gas_clouds: Vec<Vec2>,
    /// Warp star positions.
    pub warp_stars: Vec<Vec2>,
}

/// Reasons a level file may be rejected.
#[derive(Debug, Error)]
pub enum LevelFileError {
    /// The file could not be read.
    #[error("failed to read level file {}", .path.display())]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A line has fewer than four tokens.
    #[error("line {line}: expected `<TYPE> <label> <x>, <y>`")]
    MissingField {
        /// One-based line number.
        line: usize,
    },
    /// A line names an entity type the game does not know.
    #[error("line {line}: unknown entity type `{kind}`")]
    UnknownEntity {
        /// One-based line number.
        line: usize,
        /// Type token found on the line.
        kind: String,
    },
    /// A coordinate token is not a finite number.
    #[error("line {line}: `{value}` is not a valid coordinate")]
    InvalidCoordinate {
        /// One-based line number.
        line: usize,
        /// Token that failed to parse.
        value: String,
    },
    /// A second `TAXI` line was found.
    #[error("line {line}: the taxi is placed more than once")]
    DuplicateTaxi {
        /// One-based line number of the repeated entry.
        line: usize,
    },
    /// No `TAXI` line was found.
    #[error("level file does not place the taxi")]
    MissingTaxi,
    /// No `PLANET` line was found, leaving no destination to fly to.
    #[error("level file does not place any planets")]
    NoPlanets,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntityKind {
    Taxi,
    Planet,
    GasCloud,
    WarpStar,
}

impl EntityKind {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "TAXI" => Some(Self::Taxi),
            "PLANET" => Some(Self::Planet),
            "GAS_CLOUD" => Some(Self::GasCloud),
            "WARP_STAR" => Some(Self::WarpStar),
            _ => None,
        }
    }
}

/// Reads and parses the level file at `path`.
pub fn read_level_file(path: &Path) -> Result<LevelLayout, LevelFileError> {
    let contents = fs::read_to_string(path).map_err(|source| LevelFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level(&contents)
}

/// Parses the contents of a level file.
pub fn parse_level(contents: &str) -> Result<LevelLayout, LevelFileError> {
    let mut taxi = None;
    let mut layout = LevelLayout::default();

    for (index, raw_line) in contents.lines().enumerate() {
        let line = index + 1;
        let mut tokens = raw_line.split_whitespace();
        let Some(kind_token) = tokens.next() else {
            continue;
        };
        let (Some(_label), Some(x_token), Some(y_token)) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(LevelFileError::MissingField { line });
        };

        let kind = EntityKind::parse(kind_token).ok_or_else(|| LevelFileError::UnknownEntity {
            line,
            kind: kind_token.to_owned(),
        })?;
        let position = Vec2::new(
            parse_coordinate(drop_last_char(x_token), line)?,
            parse_coordinate(y_token, line)?,
        );

        match kind {
            EntityKind::Taxi => {
                if taxi.replace(position).is_some() {
                    return Err(LevelFileError::DuplicateTaxi { line });
                }
            }
            EntityKind::Planet => layout.planets.push(position),
            EntityKind::GasCloud => layout.gas_clouds.push(position),
            EntityKind::WarpStar => layout.warp_stars.push(position),
        }
    }

    layout.taxi = taxi.ok_or(LevelFileError::MissingTaxi)?;
    if layout.planets.is_empty() {
        return Err(LevelFileError::NoPlanets);
    }
    Ok(layout)
}

fn drop_last_char(token: &str) -> &str {
    let mut chars = token.chars();
    let _ = chars.next_back();
    chars.as_str()
}

fn parse_coordinate(token: &str, line: usize) -> Result<f32, LevelFileError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| LevelFileError::InvalidCoordinate {
            line,
            value: token.to_owned(),
        })
}
