//! Named opening lines, the configuration the opening graph is built from.
//!
//! A repertoire is read from JSON, either `{"lines": [...]}` or a bare array
//! of `{"name": ..., "moves": [...]}` objects. Moves are written in SAN from
//! the standard starting position.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// One named path through opening theory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningLine {
    pub name: String,
    pub moves: Vec<String>,
}

impl OpeningLine {
    pub fn new<I, S>(name: impl Into<String>, moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OpeningLine {
            name: name.into(),
            moves: moves.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repertoire {
    pub lines: Vec<OpeningLine>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RepertoireFile {
    Wrapped { lines: Vec<OpeningLine> },
    Bare(Vec<OpeningLine>),
}

impl Repertoire {
    pub fn new(lines: Vec<OpeningLine>) -> Self {
        Repertoire { lines }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let lines = match serde_json::from_str::<RepertoireFile>(text)? {
            RepertoireFile::Wrapped { lines } | RepertoireFile::Bare(lines) => lines,
        };
        let repertoire = Repertoire { lines };
        repertoire.validate()?;
        Ok(repertoire)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let repertoire = Self::from_json_str(&text)?;
        debug!(path = %path.display(), lines = repertoire.lines.len(), "loaded repertoire");
        Ok(repertoire)
    }

    /// Structural checks only; move legality is the graph's concern.
    fn validate(&self) -> Result<()> {
        if self.lines.is_empty() {
            return Err(Error::Config("no lines defined".to_string()));
        }
        for (index, line) in self.lines.iter().enumerate() {
            if line.name.trim().is_empty() {
                return Err(Error::Config(format!("line {} has an empty name", index + 1)));
            }
            if line.moves.is_empty() {
                return Err(Error::Config(format!("line '{}' has no moves", line.name)));
            }
        }
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.name.as_str())
    }

    /// A small default repertoire of mainstream openings
    pub fn builtin() -> Self {
        Repertoire::new(vec![
            OpeningLine::new(
                "Ruy Lopez",
                ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4", "Nf6", "O-O", "Be7"],
            ),
            OpeningLine::new(
                "Italian Game",
                ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "c3", "Nf6", "d4", "exd4"],
            ),
            OpeningLine::new(
                "Scotch Game",
                ["e4", "e5", "Nf3", "Nc6", "d4", "exd4", "Nxd4", "Nf6", "Nxc6", "bxc6"],
            ),
            OpeningLine::new(
                "Sicilian Najdorf",
                ["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6"],
            ),
            OpeningLine::new(
                "French Winawer",
                ["e4", "e6", "d4", "d5", "Nc3", "Bb4", "e5", "c5", "a3", "Bxc3+"],
            ),
            OpeningLine::new(
                "Caro-Kann Classical",
                ["e4", "c6", "d4", "d5", "Nc3", "dxe4", "Nxe4", "Bf5", "Ng3", "Bg6"],
            ),
            OpeningLine::new(
                "Queen's Gambit Declined",
                ["d4", "d5", "c4", "e6", "Nc3", "Nf6", "Bg5", "Be7", "e3", "O-O"],
            ),
            OpeningLine::new(
                "Slav Defense",
                ["d4", "d5", "c4", "c6", "Nf3", "Nf6", "Nc3", "dxc4", "a4", "Bf5"],
            ),
            OpeningLine::new(
                "King's Indian Defense",
                ["d4", "Nf6", "c4", "g6", "Nc3", "Bg7", "e4", "d6", "Nf3", "O-O"],
            ),
            OpeningLine::new(
                "English Opening",
                ["c4", "e5", "Nc3", "Nf6", "Nf3", "Nc6", "g3", "d5", "cxd5", "Nxd5"],
            ),
        ])
    }
}
