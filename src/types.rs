//! OpeningTrainer - Piece encoding and square helpers
//!
//! Pieces are packed into a single byte: the lower three bits carry the
//! piece kind and bits 3-4 carry the color. Squares are indexed 0..64 with
//! a1 = 0, h1 = 7 and h8 = 63.

/// Piece kinds (lower 3 bits)
pub const EMPTY: u8 = 0;
pub const PAWN: u8 = 1;
pub const KNIGHT: u8 = 2;
pub const BISHOP: u8 = 3;
pub const ROOK: u8 = 4;
pub const QUEEN: u8 = 5;
pub const KING: u8 = 6;

/// Colors (bits 3-4)
pub const WHITE: u8 = 8;
pub const BLACK: u8 = 16;

pub const PIECE_MASK: u8 = 0b111;
pub const COLOR_MASK: u8 = 0b11000;

pub const WHITE_PAWN: u8 = WHITE | PAWN;
pub const WHITE_KNIGHT: u8 = WHITE | KNIGHT;
pub const WHITE_BISHOP: u8 = WHITE | BISHOP;
pub const WHITE_ROOK: u8 = WHITE | ROOK;
pub const WHITE_QUEEN: u8 = WHITE | QUEEN;
pub const WHITE_KING: u8 = WHITE | KING;

pub const BLACK_PAWN: u8 = BLACK | PAWN;
pub const BLACK_KNIGHT: u8 = BLACK | KNIGHT;
pub const BLACK_BISHOP: u8 = BLACK | BISHOP;
pub const BLACK_ROOK: u8 = BLACK | ROOK;
pub const BLACK_QUEEN: u8 = BLACK | QUEEN;
pub const BLACK_KING: u8 = BLACK | KING;

/// Castling rights bitmasks
pub const CASTLE_WK: u8 = 1;
pub const CASTLE_WQ: u8 = 2;
pub const CASTLE_BK: u8 = 4;
pub const CASTLE_BQ: u8 = 8;

pub const FILE_NAMES: &[u8; 8] = b"abcdefgh";
pub const RANK_NAMES: &[u8; 8] = b"12345678";

/// Promotion targets in the order they are generated
pub const PROMOTION_PIECES: [u8; 4] = [QUEEN, ROOK, BISHOP, KNIGHT];

#[inline]
pub fn piece_kind(piece: u8) -> u8 {
    piece & PIECE_MASK
}

#[inline]
pub fn piece_color(piece: u8) -> u8 {
    piece & COLOR_MASK
}

/// Color byte for the side to move
#[inline]
pub fn side_color(white: bool) -> u8 {
    if white { WHITE } else { BLACK }
}

#[inline]
pub fn file_of(sq: usize) -> usize {
    sq % 8
}

#[inline]
pub fn rank_of(sq: usize) -> usize {
    sq / 8
}

/// Step from `sq` by a file/rank delta, or `None` if that leaves the board.
#[inline]
pub fn offset_square(sq: usize, file_delta: i32, rank_delta: i32) -> Option<usize> {
    let file = file_of(sq) as i32 + file_delta;
    let rank = rank_of(sq) as i32 + rank_delta;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank * 8 + file) as usize)
    } else {
        None
    }
}

/// Square index (0-63) to its name, e.g. 28 -> "e4"
pub fn square_name(sq: usize) -> String {
    format!(
        "{}{}",
        FILE_NAMES[file_of(sq)] as char,
        RANK_NAMES[rank_of(sq)] as char
    )
}

/// Square name to index. Only exact two-character names are accepted.
pub fn parse_square(name: &str) -> Option<usize> {
    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = file_index(bytes[0] as char)?;
    let rank = rank_index(bytes[1] as char)?;
    Some(rank * 8 + file)
}

pub fn file_index(c: char) -> Option<usize> {
    match c {
        'a'..='h' => Some(c as usize - 'a' as usize),
        _ => None,
    }
}

pub fn rank_index(c: char) -> Option<usize> {
    match c {
        '1'..='8' => Some(c as usize - '1' as usize),
        _ => None,
    }
}

/// FEN piece character to piece value
pub fn fen_to_piece(c: char) -> Option<u8> {
    match c {
        'P' => Some(WHITE_PAWN),
        'N' => Some(WHITE_KNIGHT),
        'B' => Some(WHITE_BISHOP),
        'R' => Some(WHITE_ROOK),
        'Q' => Some(WHITE_QUEEN),
        'K' => Some(WHITE_KING),
        'p' => Some(BLACK_PAWN),
        'n' => Some(BLACK_KNIGHT),
        'b' => Some(BLACK_BISHOP),
        'r' => Some(BLACK_ROOK),
        'q' => Some(BLACK_QUEEN),
        'k' => Some(BLACK_KING),
        _ => None,
    }
}

/// Piece value to FEN character
pub fn piece_to_fen(piece: u8) -> Option<char> {
    let letter = kind_letter(piece_kind(piece))?;
    if piece_color(piece) == BLACK {
        Some(letter.to_ascii_lowercase())
    } else {
        Some(letter)
    }
}

/// Uppercase letter for a piece kind as used in SAN ('P' for pawns)
pub fn kind_letter(kind: u8) -> Option<char> {
    match kind {
        PAWN => Some('P'),
        KNIGHT => Some('N'),
        BISHOP => Some('B'),
        ROOK => Some('R'),
        QUEEN => Some('Q'),
        KING => Some('K'),
        _ => None,
    }
}

/// SAN/UCI piece letter (either case) to a piece kind
pub fn letter_kind(c: char) -> Option<u8> {
    match c.to_ascii_uppercase() {
        'P' => Some(PAWN),
        'N' => Some(KNIGHT),
        'B' => Some(BISHOP),
        'R' => Some(ROOK),
        'Q' => Some(QUEEN),
        'K' => Some(KING),
        _ => None,
    }
}
