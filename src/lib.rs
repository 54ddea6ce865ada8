//! OpeningTrainer - Chess opening rehearsal
//!
//! Compiles named opening lines into a graph keyed by board position and
//! answers two questions during practice: which moves are theory from here,
//! and which line is this. Includes:
//! - A chess rules engine (FEN positions, SAN moves, legal move generation)
//! - The opening graph and its ingestion of named lines
//! - JSON repertoire loading
//! - A rehearsal session and its text protocol

pub mod types;
pub mod error;
pub mod position;
pub mod board;
pub mod move_generator;
pub mod notation;
pub mod rules;
pub mod repertoire;
pub mod graph;
pub mod trainer;
pub mod cli;

pub use error::{Error, FenError, Result};
pub use graph::{GraphNode, OpeningGraph};
pub use position::PositionId;
pub use repertoire::{OpeningLine, Repertoire};
pub use rules::{ChessRules, Played, RulesEngine};
pub use trainer::{Side, Trainer, Verdict};
