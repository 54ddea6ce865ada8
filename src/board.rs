//! OpeningTrainer - Board Representation Module
//!
//! Mailbox board with FEN parsing and generation and move execution. The
//! board is the state the chess rules engine threads through an opening
//! line; its FEN is the canonical position identifier.

use crate::error::FenError;
use crate::types::*;

/// Starting position FEN
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [u8; 8] = [ROOK, KNIGHT, BISHOP, QUEEN, KING, BISHOP, KNIGHT, ROOK];

/// A chess move in board coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from_sq: usize,
    pub to_sq: usize,
    pub promotion: u8,
    pub is_castling: bool,
    pub is_en_passant: bool,
}

impl Move {
    pub fn new(from_sq: usize, to_sq: usize) -> Self {
        Move {
            from_sq,
            to_sq,
            promotion: EMPTY,
            is_castling: false,
            is_en_passant: false,
        }
    }

    pub fn with_promotion(from_sq: usize, to_sq: usize, promotion: u8) -> Self {
        Move { promotion, ..Move::new(from_sq, to_sq) }
    }

    pub fn castling(from_sq: usize, to_sq: usize) -> Self {
        Move { is_castling: true, ..Move::new(from_sq, to_sq) }
    }

    pub fn en_passant(from_sq: usize, to_sq: usize) -> Self {
        Move { is_en_passant: true, ..Move::new(from_sq, to_sq) }
    }
}

/// Chess board representation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// 0=a1, 1=b1, ..., 63=h8
    pub squares: [u8; 64],
    pub white_to_move: bool,
    /// Bitmask of CASTLE_* flags
    pub castling_rights: u8,
    /// En passant target square, if the last move was a double pawn push
    pub en_passant_square: Option<usize>,
    /// Plies since the last pawn move or capture
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl Board {
    /// The standard starting position
    pub fn new() -> Self {
        let mut squares = [EMPTY; 64];
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            squares[file] = WHITE | kind;
            squares[8 + file] = WHITE_PAWN;
            squares[48 + file] = BLACK_PAWN;
            squares[56 + file] = BLACK | kind;
        }
        Board {
            squares,
            white_to_move: true,
            castling_rights: CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Parse a FEN string. The two move counters may be omitted.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingFields(parts.len()));
        }

        let mut board = Board {
            squares: [EMPTY; 64],
            white_to_move: true,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        };

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadPlacement(parts[0].to_string()));
        }
        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0usize;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(FenError::BadPlacement(parts[0].to_string()));
                    }
                    file += skip as usize;
                } else {
                    let piece = fen_to_piece(c).ok_or(FenError::UnknownPiece(c))?;
                    if file >= 8 || (piece_kind(piece) == PAWN && (rank == 0 || rank == 7)) {
                        return Err(FenError::BadPlacement(parts[0].to_string()));
                    }
                    board.squares[rank * 8 + file] = piece;
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadPlacement(parts[0].to_string()));
            }
        }

        board.white_to_move = match parts[1] {
            "w" => true,
            "b" => false,
            other => return Err(FenError::BadSideToMove(other.to_string())),
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                let flag = match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    _ => return Err(FenError::BadCastling(parts[2].to_string())),
                };
                if board.castling_rights & flag != 0 {
                    return Err(FenError::BadCastling(parts[2].to_string()));
                }
                board.castling_rights |= flag;
            }
        }

        if parts[3] != "-" {
            // The target sits behind a pawn of the side that just moved
            let (target_rank, toward_pawn, pushed) = if board.white_to_move {
                (5, -1, BLACK_PAWN)
            } else {
                (2, 1, WHITE_PAWN)
            };
            let pawn_behind = |sq: usize| {
                offset_square(sq, 0, toward_pawn).map_or(false, |p| board.squares[p] == pushed)
            };
            match parse_square(parts[3]) {
                Some(sq) if rank_of(sq) == target_rank && pawn_behind(sq) => {
                    board.en_passant_square = Some(sq);
                }
                _ => return Err(FenError::BadEnPassant(parts[3].to_string())),
            }
        }

        if let Some(text) = parts.get(4) {
            board.halfmove_clock = text
                .parse()
                .map_err(|_| FenError::BadCounter(text.to_string()))?;
        }
        if let Some(text) = parts.get(5) {
            board.fullmove_number = match text.parse() {
                Ok(n) if n >= 1 => n,
                _ => return Err(FenError::BadCounter(text.to_string())),
            };
        }

        let white_kings = board.squares.iter().filter(|&&p| p == WHITE_KING).count();
        let black_kings = board.squares.iter().filter(|&&p| p == BLACK_KING).count();
        if white_kings != 1 || black_kings != 1 {
            return Err(FenError::KingCount);
        }

        Ok(board)
    }

    /// Generate the full six-field FEN for the current state
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                let piece = self.squares[rank * 8 + file];
                match piece_to_fen(piece) {
                    None => empty_count += 1,
                    Some(c) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(c);
                    }
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.white_to_move { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            for (flag, c) in [(CASTLE_WK, 'K'), (CASTLE_WQ, 'Q'), (CASTLE_BK, 'k'), (CASTLE_BQ, 'q')] {
                if self.castling_rights & flag != 0 {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant_square {
            Some(sq) => fen.push_str(&square_name(sq)),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));

        fen
    }

    /// Execute a move. The move is assumed to be legal for this position.
    pub fn make_move(&mut self, mv: &Move) {
        let from_sq = mv.from_sq;
        let to_sq = mv.to_sq;
        let piece = self.squares[from_sq];
        let kind = piece_kind(piece);
        let is_capture = self.squares[to_sq] != EMPTY || mv.is_en_passant;

        if kind == PAWN || is_capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if mv.is_en_passant {
            let victim = if self.white_to_move { to_sq - 8 } else { to_sq + 8 };
            self.squares[victim] = EMPTY;
        }

        if mv.is_castling {
            let (rook_from, rook_to) = match to_sq {
                6 => (7, 5),
                2 => (0, 3),
                62 => (63, 61),
                58 => (56, 59),
                _ => (to_sq, to_sq),
            };
            let rook = self.squares[rook_from];
            self.squares[rook_from] = EMPTY;
            self.squares[rook_to] = rook;
        }

        self.squares[to_sq] = piece;
        self.squares[from_sq] = EMPTY;

        if mv.promotion != EMPTY {
            self.squares[to_sq] = side_color(self.white_to_move) | mv.promotion;
        }

        if kind == KING {
            if self.white_to_move {
                self.castling_rights &= !(CASTLE_WK | CASTLE_WQ);
            } else {
                self.castling_rights &= !(CASTLE_BK | CASTLE_BQ);
            }
        }

        // A rook leaving or being captured on its home square
        for (home, flag) in [(0, CASTLE_WQ), (7, CASTLE_WK), (56, CASTLE_BQ), (63, CASTLE_BK)] {
            if from_sq == home || to_sq == home {
                self.castling_rights &= !flag;
            }
        }

        self.en_passant_square = None;
        if kind == PAWN && from_sq.abs_diff(to_sq) == 16 {
            self.en_passant_square = Some((from_sq + to_sq) / 2);
        }

        if !self.white_to_move {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.white_to_move = !self.white_to_move;
    }

    pub fn find_king(&self, white: bool) -> Option<usize> {
        let king = if white { WHITE_KING } else { BLACK_KING };
        self.squares.iter().position(|&p| p == king)
    }

    /// ASCII diagram of the board, white at the bottom
    pub fn display(&self) -> String {
        let mut lines = Vec::new();
        lines.push("  +---+---+---+---+---+---+---+---+".to_string());

        for rank in (0..8).rev() {
            let mut row = format!("{} |", rank + 1);
            for file in 0..8 {
                match piece_to_fen(self.squares[rank * 8 + file]) {
                    Some(c) => row.push_str(&format!(" {} |", c)),
                    None => row.push_str("   |"),
                }
            }
            lines.push(row);
            lines.push("  +---+---+---+---+---+---+---+---+".to_string());
        }
        lines.push("    a   b   c   d   e   f   g   h".to_string());

        lines.join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
