//! The rules engine seam.
//!
//! The opening graph never interprets chess itself. It asks a `RulesEngine`
//! for the starting state, for the canonical id of a state, and whether a
//! move is playable from a state. `ChessRules` is the standard chess engine
//! built on `Board`, `MoveGenerator` and SAN notation.

use crate::board::Board;
use crate::move_generator::MoveGenerator;
use crate::notation::{parse_move, to_san};
use crate::position::PositionId;

/// Result of playing a move: the engine's canonical spelling of the move and
/// the state it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Played<S> {
    pub notation: String,
    pub state: S,
}

pub trait RulesEngine {
    type State: Clone;

    fn starting_state(&self) -> Self::State;

    fn position_id(&self, state: &Self::State) -> PositionId;

    /// Play `mv` from `state`, or `None` if it is not a legal move there.
    fn play(&self, state: &Self::State, mv: &str) -> Option<Played<Self::State>>;

    /// Canonical notation of every legal move from `state`.
    fn legal_moves(&self, state: &Self::State) -> Vec<String>;

    /// Recover a state from an id this engine produced.
    fn state_at(&self, position: &PositionId) -> Option<Self::State>;
}

/// Standard chess rules with FEN ids and SAN moves
#[derive(Debug, Clone, Copy, Default)]
pub struct ChessRules {
    generator: MoveGenerator,
}

impl ChessRules {
    pub fn new() -> Self {
        ChessRules { generator: MoveGenerator::new() }
    }
}

impl RulesEngine for ChessRules {
    type State = Board;

    fn starting_state(&self) -> Board {
        Board::new()
    }

    /// The FEN of `state`, with the en passant target only when the capture
    /// is actually available, so move orders that differ only in a harmless
    /// double push share an id.
    fn position_id(&self, state: &Board) -> PositionId {
        if state.en_passant_square.is_some() && !self.generator.can_capture_en_passant(state) {
            let mut plain = state.clone();
            plain.en_passant_square = None;
            return PositionId::new(plain.to_fen());
        }
        PositionId::new(state.to_fen())
    }

    fn play(&self, state: &Board, mv: &str) -> Option<Played<Board>> {
        let parsed = parse_move(&self.generator, state, mv)?;
        let legal = self.generator.generate_legal_moves(state);
        let notation = to_san(&self.generator, state, &parsed, &legal);
        let mut next = state.clone();
        next.make_move(&parsed);
        Some(Played { notation, state: next })
    }

    fn legal_moves(&self, state: &Board) -> Vec<String> {
        let legal = self.generator.generate_legal_moves(state);
        legal
            .iter()
            .map(|mv| to_san(&self.generator, state, mv, &legal))
            .collect()
    }

    fn state_at(&self, position: &PositionId) -> Option<Board> {
        let board = Board::from_fen(position.as_str()).ok()?;
        if self.generator.is_opponent_in_check(&board) {
            return None;
        }
        Some(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STARTING_FEN;

    #[test]
    fn starting_state_has_starting_id() {
        let rules = ChessRules::new();
        assert_eq!(rules.position_id(&rules.starting_state()), STARTING_FEN);
    }

    #[test]
    fn play_returns_canonical_notation() {
        let rules = ChessRules::new();
        let start = rules.starting_state();
        let played = rules.play(&start, "e2e4").unwrap();
        assert_eq!(played.notation, "e4");
        assert_eq!(
            rules.position_id(&played.state),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert!(rules.play(&start, "e9").is_none());
    }

    #[test]
    fn en_passant_target_is_kept_only_when_capturable() {
        let rules = ChessRules::new();
        let mut state = rules.starting_state();
        for mv in ["e4", "Nf6", "e5", "d5"] {
            state = rules.play(&state, mv).unwrap().state;
        }
        let id = rules.position_id(&state);
        assert_eq!(
            id,
            "rnbqkb1r/ppp1pppp/5n2/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
        );
        let exd6 = rules.play(&rules.state_at(&id).unwrap(), "exd6").unwrap();
        assert_eq!(exd6.notation, "exd6");
    }

    #[test]
    fn impossible_positions_have_no_state() {
        let rules = ChessRules::new();
        // White to move with the black king already in check
        assert_eq!(rules.state_at(&PositionId::new("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1")), None);
    }

    #[test]
    fn state_round_trips_through_its_id() {
        let rules = ChessRules::new();
        let state = rules.play(&rules.starting_state(), "Nf3").unwrap().state;
        let id = rules.position_id(&state);
        assert_eq!(rules.state_at(&id), Some(state));
        assert_eq!(rules.state_at(&PositionId::new("not a fen")), None);
    }

    #[test]
    fn legal_moves_from_start() {
        let rules = ChessRules::new();
        let moves = rules.legal_moves(&rules.starting_state());
        assert_eq!(moves.len(), 20);
        assert!(moves.iter().any(|m| m == "Nc3"));
    }
}
