//! OpeningTrainer - Move Generator Module
//!
//! Legal move generation for a `Board`, including castling, en passant and
//! promotion, plus check and checkmate detection. Directions are expressed
//! as (file, rank) deltas so edge wrap-around never has to be special-cased.

use crate::board::{Board, Move};
use crate::types::*;

const ROOK_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
const KING_DIRECTIONS: [(i32, i32); 8] = [
    (0, 1), (0, -1), (1, 0), (-1, 0),
    (1, 1), (-1, 1), (1, -1), (-1, -1),
];
const KNIGHT_JUMPS: [(i32, i32); 8] = [
    (1, 2), (-1, 2), (2, 1), (-2, 1),
    (1, -2), (-1, -2), (2, -1), (-2, -1),
];

/// Castling option: flag, king target, squares that must be empty, squares
/// the king crosses (must not be attacked).
struct CastlePath {
    flag: u8,
    king_from: usize,
    king_to: usize,
    empty: &'static [usize],
    safe: &'static [usize],
}

const WHITE_CASTLES: [CastlePath; 2] = [
    CastlePath { flag: CASTLE_WK, king_from: 4, king_to: 6, empty: &[5, 6], safe: &[4, 5, 6] },
    CastlePath { flag: CASTLE_WQ, king_from: 4, king_to: 2, empty: &[1, 2, 3], safe: &[4, 3, 2] },
];
const BLACK_CASTLES: [CastlePath; 2] = [
    CastlePath { flag: CASTLE_BK, king_from: 60, king_to: 62, empty: &[61, 62], safe: &[60, 61, 62] },
    CastlePath { flag: CASTLE_BQ, king_from: 60, king_to: 58, empty: &[57, 58, 59], safe: &[60, 59, 58] },
];

/// Move generator for chess positions
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        MoveGenerator
    }

    /// All legal moves for the side to move
    pub fn generate_legal_moves(&self, board: &Board) -> Vec<Move> {
        self.generate_pseudo_legal_moves(board)
            .into_iter()
            .filter(|mv| self.is_legal(board, mv))
            .collect()
    }

    /// Moves that obey piece movement but may leave the own king in check
    pub fn generate_pseudo_legal_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        let color = side_color(board.white_to_move);

        for sq in 0..64 {
            let piece = board.squares[sq];
            if piece == EMPTY || piece_color(piece) != color {
                continue;
            }
            match piece_kind(piece) {
                PAWN => self.pawn_moves(board, sq, &mut moves),
                KNIGHT => self.step_moves(board, sq, &KNIGHT_JUMPS, &mut moves),
                BISHOP => self.slide_moves(board, sq, &BISHOP_DIRECTIONS, &mut moves),
                ROOK => self.slide_moves(board, sq, &ROOK_DIRECTIONS, &mut moves),
                QUEEN => {
                    self.slide_moves(board, sq, &ROOK_DIRECTIONS, &mut moves);
                    self.slide_moves(board, sq, &BISHOP_DIRECTIONS, &mut moves);
                }
                KING => {
                    self.step_moves(board, sq, &KING_DIRECTIONS, &mut moves);
                    self.castling_moves(board, sq, &mut moves);
                }
                _ => {}
            }
        }

        moves
    }

    fn pawn_moves(&self, board: &Board, sq: usize, moves: &mut Vec<Move>) {
        let white = board.white_to_move;
        let forward: i32 = if white { 1 } else { -1 };
        let start_rank = if white { 1 } else { 6 };
        let promo_rank = if white { 7 } else { 0 };

        let push = |to_sq: usize, moves: &mut Vec<Move>| {
            if rank_of(to_sq) == promo_rank {
                for promo in PROMOTION_PIECES {
                    moves.push(Move::with_promotion(sq, to_sq, promo));
                }
            } else {
                moves.push(Move::new(sq, to_sq));
            }
        };

        if let Some(one) = offset_square(sq, 0, forward) {
            if board.squares[one] == EMPTY {
                push(one, moves);
                if rank_of(sq) == start_rank {
                    if let Some(two) = offset_square(sq, 0, 2 * forward) {
                        if board.squares[two] == EMPTY {
                            moves.push(Move::new(sq, two));
                        }
                    }
                }
            }
        }

        let enemy = side_color(!white);
        for file_delta in [-1, 1] {
            let Some(target) = offset_square(sq, file_delta, forward) else {
                continue;
            };
            let victim = board.squares[target];
            if victim != EMPTY && piece_color(victim) == enemy {
                push(target, moves);
            } else if board.en_passant_square == Some(target) {
                moves.push(Move::en_passant(sq, target));
            }
        }
    }

    /// Single-step pieces: knights and the king's ordinary moves
    fn step_moves(&self, board: &Board, sq: usize, deltas: &[(i32, i32)], moves: &mut Vec<Move>) {
        let color = piece_color(board.squares[sq]);
        for &(df, dr) in deltas {
            if let Some(to_sq) = offset_square(sq, df, dr) {
                let target = board.squares[to_sq];
                if target == EMPTY || piece_color(target) != color {
                    moves.push(Move::new(sq, to_sq));
                }
            }
        }
    }

    fn slide_moves(&self, board: &Board, sq: usize, directions: &[(i32, i32)], moves: &mut Vec<Move>) {
        let color = piece_color(board.squares[sq]);
        for &(df, dr) in directions {
            let mut current = sq;
            while let Some(next) = offset_square(current, df, dr) {
                let target = board.squares[next];
                if target == EMPTY {
                    moves.push(Move::new(sq, next));
                } else {
                    if piece_color(target) != color {
                        moves.push(Move::new(sq, next));
                    }
                    break;
                }
                current = next;
            }
        }
    }

    fn castling_moves(&self, board: &Board, sq: usize, moves: &mut Vec<Move>) {
        let white = board.white_to_move;
        let paths = if white { &WHITE_CASTLES } else { &BLACK_CASTLES };
        let rook = side_color(white) | ROOK;

        for path in paths {
            if sq != path.king_from || board.castling_rights & path.flag == 0 {
                continue;
            }
            let rook_home = if path.king_to > path.king_from { path.king_from + 3 } else { path.king_from - 4 };
            if board.squares[rook_home] != rook {
                continue;
            }
            if path.empty.iter().any(|&s| board.squares[s] != EMPTY) {
                continue;
            }
            if path.safe.iter().any(|&s| self.is_square_attacked(board, s, !white)) {
                continue;
            }
            moves.push(Move::castling(sq, path.king_to));
        }
    }

    /// Whether `sq` is attacked by any piece of the given color
    pub fn is_square_attacked(&self, board: &Board, sq: usize, by_white: bool) -> bool {
        let attacker = side_color(by_white);
        let holds = |target: usize, kinds: &[u8]| {
            let piece = board.squares[target];
            piece != EMPTY && piece_color(piece) == attacker && kinds.contains(&piece_kind(piece))
        };

        // A pawn attacks diagonally forward, so look one rank behind it.
        let pawn_rank: i32 = if by_white { -1 } else { 1 };
        for file_delta in [-1, 1] {
            if let Some(from) = offset_square(sq, file_delta, pawn_rank) {
                if holds(from, &[PAWN]) {
                    return true;
                }
            }
        }

        for &(df, dr) in &KNIGHT_JUMPS {
            if let Some(from) = offset_square(sq, df, dr) {
                if holds(from, &[KNIGHT]) {
                    return true;
                }
            }
        }

        for &(df, dr) in &KING_DIRECTIONS {
            if let Some(from) = offset_square(sq, df, dr) {
                if holds(from, &[KING]) {
                    return true;
                }
            }
        }

        let rays = [(&ROOK_DIRECTIONS, [ROOK, QUEEN]), (&BISHOP_DIRECTIONS, [BISHOP, QUEEN])];
        for (directions, kinds) in rays {
            for &(df, dr) in directions.iter() {
                let mut current = sq;
                while let Some(next) = offset_square(current, df, dr) {
                    if board.squares[next] != EMPTY {
                        if holds(next, &kinds) {
                            return true;
                        }
                        break;
                    }
                    current = next;
                }
            }
        }

        false
    }

    /// A move is legal if it does not leave the mover's king attacked
    fn is_legal(&self, board: &Board, mv: &Move) -> bool {
        let mut after = board.clone();
        after.make_move(mv);
        match after.find_king(board.white_to_move) {
            Some(king_sq) => !self.is_square_attacked(&after, king_sq, after.white_to_move),
            None => false,
        }
    }

    /// Whether the side to move is in check
    pub fn is_in_check(&self, board: &Board) -> bool {
        match board.find_king(board.white_to_move) {
            Some(king_sq) => self.is_square_attacked(board, king_sq, !board.white_to_move),
            None => false,
        }
    }

    /// The side that just moved left its own king attacked. Such a position
    /// cannot arise in play.
    pub fn is_opponent_in_check(&self, board: &Board) -> bool {
        match board.find_king(!board.white_to_move) {
            Some(king_sq) => self.is_square_attacked(board, king_sq, board.white_to_move),
            None => false,
        }
    }

    pub fn can_capture_en_passant(&self, board: &Board) -> bool {
        board.en_passant_square.is_some()
            && self.generate_legal_moves(board).iter().any(|mv| mv.is_en_passant)
    }

    pub fn is_checkmate(&self, board: &Board) -> bool {
        self.is_in_check(board) && self.generate_legal_moves(board).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perft(generator: &MoveGenerator, board: &Board, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = generator.generate_legal_moves(board);
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .iter()
            .map(|mv| {
                let mut next = board.clone();
                next.make_move(mv);
                perft(generator, &next, depth - 1)
            })
            .sum()
    }

    #[test]
    fn perft_from_start() {
        let generator = MoveGenerator::new();
        let board = Board::new();
        assert_eq!(perft(&generator, &board, 1), 20);
        assert_eq!(perft(&generator, &board, 2), 400);
        assert_eq!(perft(&generator, &board, 3), 8902);
    }

    #[test]
    fn perft_kiwipete_shallow() {
        let generator = MoveGenerator::new();
        let board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(perft(&generator, &board, 1), 48);
        assert_eq!(perft(&generator, &board, 2), 2039);
    }

    #[test]
    fn castling_through_check_is_excluded() {
        let generator = MoveGenerator::new();
        // Black rook on f8 covers f1.
        let board = Board::from_fen("k4r2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let castles: Vec<_> = generator
            .generate_legal_moves(&board)
            .into_iter()
            .filter(|m| m.is_castling)
            .map(|m| m.to_sq)
            .collect();
        assert_eq!(castles, vec![2]);
    }

    #[test]
    fn en_passant_needs_a_legal_capture() {
        let generator = MoveGenerator::new();
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert!(generator.can_capture_en_passant(&board));

        // Taking on d6 would open the fifth rank to the h5 rook.
        let pinned = Board::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").unwrap();
        assert!(!generator.can_capture_en_passant(&pinned));

        let mut after_e4 = Board::new();
        after_e4.make_move(&Move::new(12, 28));
        assert!(after_e4.en_passant_square.is_some());
        assert!(!generator.can_capture_en_passant(&after_e4));
    }

    #[test]
    fn king_left_en_prise_is_detected() {
        let generator = MoveGenerator::new();
        let board = Board::from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(generator.is_opponent_in_check(&board));
        assert!(!generator.is_opponent_in_check(&Board::new()));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let generator = MoveGenerator::new();
        let board = Board::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        assert!(generator.is_in_check(&board));
        assert!(generator.is_checkmate(&board));
    }
}
