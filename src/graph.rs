//! OpeningTrainer - Opening Graph Module
//!
//! Compiles named opening lines into a graph keyed by canonical position:
//! - one node per distinct position, so transpositions collapse
//! - each node maps the theoretical moves from it to the positions they reach
//! - each node remembers the first line (in input order) that reached it
//!
//! The graph is a map of maps rather than linked nodes. It only grows, and
//! re-ingesting a line that is already present changes nothing.

use std::collections::HashMap;

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::position::PositionId;
use crate::repertoire::{OpeningLine, Repertoire};
use crate::rules::{ChessRules, RulesEngine};

/// Everything known about one position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub position: PositionId,
    /// Theoretical moves in first-seen order
    pub outgoing: IndexMap<String, PositionId>,
    /// First line that reached this position
    pub label: Option<String>,
}

impl GraphNode {
    fn new(position: PositionId) -> Self {
        GraphNode {
            position,
            outgoing: IndexMap::new(),
            label: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.outgoing.is_empty()
    }
}

pub struct OpeningGraph<E: RulesEngine = ChessRules> {
    engine: E,
    root: PositionId,
    nodes: HashMap<PositionId, GraphNode>,
}

impl OpeningGraph<ChessRules> {
    /// Empty graph over standard chess rules
    pub fn new() -> Self {
        Self::with_engine(ChessRules::new())
    }

    /// Build a graph and ingest every line of `repertoire`
    pub fn from_repertoire(repertoire: &Repertoire) -> Result<Self> {
        let mut graph = Self::new();
        graph.ingest_lines(&repertoire.lines)?;
        Ok(graph)
    }
}

impl Default for OpeningGraph<ChessRules> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RulesEngine> OpeningGraph<E> {
    /// Graph holding only the engine's starting position
    pub fn with_engine(engine: E) -> Self {
        let root = engine.position_id(&engine.starting_state());
        let mut nodes = HashMap::new();
        nodes.insert(root.clone(), GraphNode::new(root.clone()));
        OpeningGraph { engine, root, nodes }
    }

    /// Replay every line through the rules engine and record each position
    /// and move it passes through.
    ///
    /// Fails on the first move the engine rejects. Whatever was recorded
    /// before that move, from this line or earlier ones, stays in the graph.
    pub fn ingest_lines(&mut self, lines: &[OpeningLine]) -> Result<()> {
        for line in lines {
            self.ingest_line(line)?;
        }
        info!(lines = lines.len(), positions = self.nodes.len(), "opening graph built");
        Ok(())
    }

    fn ingest_line(&mut self, line: &OpeningLine) -> Result<()> {
        let mut state = self.engine.starting_state();
        let mut source = self.root.clone();

        for mv in &line.moves {
            let Some(played) = self.engine.play(&state, mv) else {
                warn!(line = %line.name, mv = %mv, position = %source, "illegal move in line");
                return Err(Error::InvalidMove {
                    mv: mv.clone(),
                    line: line.name.clone(),
                    position: source,
                });
            };
            let target = self.engine.position_id(&played.state);

            self.nodes
                .entry(source.clone())
                .or_insert_with(|| GraphNode::new(source.clone()))
                .outgoing
                .insert(played.notation, target.clone());

            let node = self
                .nodes
                .entry(target.clone())
                .or_insert_with(|| GraphNode::new(target.clone()));
            if node.label.is_none() {
                node.label = Some(line.name.clone());
            }

            state = played.state;
            source = target;
        }

        debug!(line = %line.name, moves = line.moves.len(), "ingested line");
        Ok(())
    }

    pub fn root(&self) -> &PositionId {
        &self.root
    }

    pub fn node(&self, position: &PositionId) -> Option<&GraphNode> {
        self.nodes.get(position)
    }

    pub fn contains(&self, position: &PositionId) -> bool {
        self.nodes.contains_key(position)
    }

    /// Number of distinct positions, the root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the root position always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Theoretical moves from `position`; empty outside known theory.
    pub fn next_moves(&self, position: &PositionId) -> Vec<&str> {
        self.nodes
            .get(position)
            .map(|node| node.outgoing.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// A uniformly chosen theoretical move, or `None` once the line is
    /// played out from here.
    pub fn random_move<R: Rng + ?Sized>(&self, position: &PositionId, rng: &mut R) -> Option<&str> {
        self.next_moves(position).choose(rng).copied()
    }

    /// Name of the first line that reached `position`
    pub fn line_label(&self, position: &PositionId) -> Option<&str> {
        self.nodes.get(position)?.label.as_deref()
    }

    /// Follow a recorded edge
    pub fn next_position(&self, position: &PositionId, mv: &str) -> Option<&PositionId> {
        self.nodes.get(position)?.outgoing.get(mv)
    }

    /// Every legal move from `position`, for move highlighting. Empty when
    /// the engine cannot rebuild a state from the id.
    pub fn legal_moves(&self, position: &PositionId) -> Vec<String> {
        self.engine
            .state_at(position)
            .map(|state| self.engine.legal_moves(&state))
            .unwrap_or_default()
    }

    /// Ask the engine to play any move from `position`, in theory or not.
    /// Returns the canonical move and the resulting position.
    pub fn play(&self, position: &PositionId, mv: &str) -> Option<(String, PositionId)> {
        let state = self.engine.state_at(position)?;
        let played = self.engine.play(&state, mv)?;
        let next = self.engine.position_id(&played.state);
        Some((played.notation, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Engine over integers: a move "+n" adds n, anything else is illegal.
    #[derive(Debug, Clone, Copy)]
    struct Counter;

    impl RulesEngine for Counter {
        type State = i64;

        fn starting_state(&self) -> i64 {
            0
        }

        fn position_id(&self, state: &i64) -> PositionId {
            PositionId::new(state.to_string())
        }

        fn play(&self, state: &i64, mv: &str) -> Option<crate::rules::Played<i64>> {
            let step: i64 = mv.strip_prefix('+')?.parse().ok()?;
            Some(crate::rules::Played { notation: format!("+{step}"), state: state + step })
        }

        fn legal_moves(&self, _state: &i64) -> Vec<String> {
            vec!["+1".to_string()]
        }

        fn state_at(&self, position: &PositionId) -> Option<i64> {
            position.as_str().parse().ok()
        }
    }

    fn id(value: &str) -> PositionId {
        PositionId::new(value)
    }

    #[test]
    fn starts_with_root_only() {
        let graph = OpeningGraph::with_engine(Counter);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.root(), &id("0"));
        assert!(graph.next_moves(&id("0")).is_empty());
        assert_eq!(graph.line_label(&id("0")), None);
    }

    #[test]
    fn transpositions_share_a_node() {
        let mut graph = OpeningGraph::with_engine(Counter);
        graph
            .ingest_lines(&[
                OpeningLine::new("A", ["+1", "+2", "+10"]),
                OpeningLine::new("B", ["+2", "+1", "+20"]),
            ])
            .unwrap();

        assert_eq!(graph.next_moves(&id("3")), vec!["+10", "+20"]);
        assert_eq!(graph.line_label(&id("3")), Some("A"));
        assert_eq!(graph.line_label(&id("2")), Some("B"));
        assert_eq!(graph.line_label(&id("23")), Some("B"));
        // 0, 1, 3, 13, 2, 23
        assert_eq!(graph.len(), 6);
    }

    #[test]
    fn failed_line_keeps_earlier_writes() {
        let mut graph = OpeningGraph::with_engine(Counter);
        let err = graph
            .ingest_lines(&[
                OpeningLine::new("Good", ["+1"]),
                OpeningLine::new("Bad", ["+5", "x", "+1"]),
            ])
            .unwrap_err();

        match err {
            Error::InvalidMove { mv, line, position } => {
                assert_eq!(mv, "x");
                assert_eq!(line, "Bad");
                assert_eq!(position, id("5"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(graph.next_moves(&id("0")), vec!["+1", "+5"]);
        assert!(!graph.contains(&id("6")));
    }

    #[test]
    fn random_move_is_absent_only_at_leaves() {
        let mut graph = OpeningGraph::with_engine(Counter);
        graph
            .ingest_lines(&[
                OpeningLine::new("A", ["+1"]),
                OpeningLine::new("B", ["+2"]),
                OpeningLine::new("C", ["+3"]),
            ])
            .unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mv = graph.random_move(&id("0"), &mut rng).unwrap();
            assert!(["+1", "+2", "+3"].contains(&mv));
        }
        assert_eq!(graph.random_move(&id("1"), &mut rng), None);
        assert_eq!(graph.random_move(&id("99"), &mut rng), None);
        assert!(graph.node(&id("1")).unwrap().is_leaf());
        assert!(!graph.node(&id("0")).unwrap().is_leaf());
    }

    #[test]
    fn seeded_selection_is_reproducible() {
        let mut graph = OpeningGraph::with_engine(Counter);
        let lines: Vec<_> = (1..=6).map(|n| OpeningLine::new(n.to_string(), [format!("+{n}")])).collect();
        graph.ingest_lines(&lines).unwrap();

        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| graph.random_move(&id("0"), &mut rng).unwrap().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn next_position_follows_edges() {
        let mut graph = OpeningGraph::with_engine(Counter);
        graph.ingest_lines(&[OpeningLine::new("A", ["+4"])]).unwrap();
        assert_eq!(graph.next_position(&id("0"), "+4"), Some(&id("4")));
        assert_eq!(graph.next_position(&id("0"), "+5"), None);
        assert_eq!(graph.play(&id("4"), "+5"), Some(("+5".to_string(), id("9"))));
        assert_eq!(graph.legal_moves(&id("nope")), Vec::<String>::new());
    }
}
