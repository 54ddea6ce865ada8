//! Rehearsal session over an opening graph.
//!
//! The user plays one side. Each submitted move is judged against theory;
//! a correct move is answered by a random theoretical reply for the other
//! side, an incorrect one leaves the position untouched so the user can try
//! again.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use tracing::debug;

use crate::graph::{GraphNode, OpeningGraph};
use crate::position::PositionId;
use crate::rules::{ChessRules, RulesEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("white"),
            Side::Black => f.write_str("black"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Side::White),
            "black" | "b" => Ok(Side::Black),
            other => Err(format!("unknown side '{other}' (expected white or black)")),
        }
    }
}

/// How a submitted move was judged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// In theory. `reply` is the opponent's answer, `None` once the line
    /// has been played out.
    Correct { played: String, reply: Option<String> },
    /// Legal, but not a move any line continues with.
    OffBook { played: String, expected: Vec<String> },
    /// Rejected by the rules engine.
    Illegal,
    /// No theory remains from the current position.
    Finished,
}

pub struct Trainer<'g, R: Rng, E: RulesEngine = ChessRules> {
    graph: &'g OpeningGraph<E>,
    side: Side,
    rng: R,
    position: PositionId,
    history: Vec<String>,
}

impl<'g, R: Rng, E: RulesEngine> Trainer<'g, R, E> {
    /// Start a session at the starting position. When the user plays Black
    /// the opponent opens immediately.
    pub fn new(graph: &'g OpeningGraph<E>, side: Side, rng: R) -> Self {
        let mut trainer = Trainer {
            graph,
            side,
            rng,
            position: graph.root().clone(),
            history: Vec::new(),
        };
        trainer.reset();
        trainer
    }

    pub fn reset(&mut self) {
        self.position = self.graph.root().clone();
        self.history.clear();
        if self.side == Side::Black {
            self.opponent_reply();
        }
    }

    /// Switch sides and start over
    pub fn restart_as(&mut self, side: Side) {
        self.side = side;
        self.reset();
    }

    pub fn submit(&mut self, mv: &str) -> Verdict {
        if self.is_finished() {
            return Verdict::Finished;
        }
        let Some((played, next)) = self.graph.play(&self.position, mv) else {
            return Verdict::Illegal;
        };

        if self.graph.next_position(&self.position, &played).is_none() {
            let expected = self.hint();
            debug!(played = %played, ?expected, "move is off book");
            return Verdict::OffBook { played, expected };
        }

        self.position = next;
        self.history.push(played.clone());
        let reply = self.opponent_reply();
        Verdict::Correct { played, reply }
    }

    fn opponent_reply(&mut self) -> Option<String> {
        let mv = self.graph.random_move(&self.position, &mut self.rng)?.to_string();
        let next = self.graph.next_position(&self.position, &mv)?.clone();
        self.position = next;
        self.history.push(mv.clone());
        Some(mv)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn position(&self) -> &PositionId {
        &self.position
    }

    /// Moves played so far by both sides
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn current_line(&self) -> Option<&str> {
        self.graph.line_label(&self.position)
    }

    /// The theoretical moves for the user from here
    pub fn hint(&self) -> Vec<String> {
        self.graph
            .next_moves(&self.position)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn legal_moves(&self) -> Vec<String> {
        self.graph.legal_moves(&self.position)
    }

    /// No theory continues from the current position
    pub fn is_finished(&self) -> bool {
        self.graph.node(&self.position).map_or(true, GraphNode::is_leaf)
    }
}
