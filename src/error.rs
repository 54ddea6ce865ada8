//! Error types for the opening trainer

use std::path::PathBuf;

use thiserror::Error;

use crate::position::PositionId;

pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A configured line contains a move the rules engine rejects.
    ///
    /// This points at bad opening data, not a transient condition.
    #[error("invalid move '{mv}' in line '{line}' from position {position}")]
    InvalidMove {
        mv: String,
        line: String,
        position: PositionId,
    },

    #[error("invalid FEN: {0}")]
    Fen(#[from] FenError),

    #[error("invalid repertoire: {0}")]
    Config(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("repertoire is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a FEN string can be rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected at least 4 fields, got {0}")]
    MissingFields(usize),

    #[error("piece placement must describe 8 ranks of 8 squares: '{0}'")]
    BadPlacement(String),

    #[error("unknown piece character '{0}'")]
    UnknownPiece(char),

    #[error("side to move must be 'w' or 'b', got '{0}'")]
    BadSideToMove(String),

    #[error("invalid castling field '{0}'")]
    BadCastling(String),

    #[error("invalid en passant square '{0}'")]
    BadEnPassant(String),

    #[error("invalid move counter '{0}'")]
    BadCounter(String),

    #[error("each side needs exactly one king")]
    KingCount,
}
