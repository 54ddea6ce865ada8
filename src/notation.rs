//! Standard Algebraic Notation.
//!
//! Rendering produces the canonical SAN for a legal move (minimal
//! disambiguation, `x` for captures, `=Q` for promotions, `O-O` castling and
//! a `+`/`#` suffix). Parsing resolves user or configuration text against the
//! legal moves of a position and accepts a few common variants: missing or
//! extra check marks, annotation glyphs, `0-0` castling, promotions without
//! `=`, a redundant origin file or rank (`Ngf3`, `Ng1f3`), and coordinate
//! moves such as `e2e4`. Text that still fits more than one legal move is
//! rejected.

use crate::board::{Board, Move};
use crate::move_generator::MoveGenerator;
use crate::types::*;

/// SAN for `mv`, which must be one of `legal` (the legal moves of `board`).
pub fn to_san(generator: &MoveGenerator, board: &Board, mv: &Move, legal: &[Move]) -> String {
    let mut san = san_core(board, mv, legal);
    let mut after = board.clone();
    after.make_move(mv);
    if generator.is_in_check(&after) {
        if generator.generate_legal_moves(&after).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}

/// SAN without the check suffix
fn san_core(board: &Board, mv: &Move, legal: &[Move]) -> String {
    if mv.is_castling {
        return if file_of(mv.to_sq) == 6 { "O-O".to_string() } else { "O-O-O".to_string() };
    }

    let kind = piece_kind(board.squares[mv.from_sq]);
    let is_capture = board.squares[mv.to_sq] != EMPTY || mv.is_en_passant;
    let mut san = String::with_capacity(7);

    if kind == PAWN {
        if is_capture {
            san.push(FILE_NAMES[file_of(mv.from_sq)] as char);
            san.push('x');
        }
        san.push_str(&square_name(mv.to_sq));
        if let Some(letter) = kind_letter(mv.promotion) {
            san.push('=');
            san.push(letter);
        }
        return san;
    }

    if let Some(letter) = kind_letter(kind) {
        san.push(letter);
    }

    let rivals: Vec<usize> = legal
        .iter()
        .filter(|other| {
            other.to_sq == mv.to_sq
                && other.from_sq != mv.from_sq
                && piece_kind(board.squares[other.from_sq]) == kind
        })
        .map(|other| other.from_sq)
        .collect();
    if !rivals.is_empty() {
        let same_file = rivals.iter().any(|&sq| file_of(sq) == file_of(mv.from_sq));
        let same_rank = rivals.iter().any(|&sq| rank_of(sq) == rank_of(mv.from_sq));
        if !same_file {
            san.push(FILE_NAMES[file_of(mv.from_sq)] as char);
        } else if !same_rank {
            san.push(RANK_NAMES[rank_of(mv.from_sq)] as char);
        } else {
            san.push_str(&square_name(mv.from_sq));
        }
    }

    if is_capture {
        san.push('x');
    }
    san.push_str(&square_name(mv.to_sq));
    san
}

/// Strip check marks and annotation glyphs and normalise castling zeros.
fn normalise(text: &str) -> String {
    let trimmed = text.trim().trim_end_matches(['+', '#', '!', '?']);
    let mut out = trimmed.replace('0', "O").replace('=', "");
    if out.ends_with("e.p.") {
        out.truncate(out.len() - 4);
    }
    out
}

/// Resolve move text to one of the legal moves of `board`.
pub fn parse_move(generator: &MoveGenerator, board: &Board, text: &str) -> Option<Move> {
    let wanted = normalise(text);
    if wanted.is_empty() {
        return None;
    }
    let legal = generator.generate_legal_moves(board);

    if let Some(mv) = legal
        .iter()
        .find(|mv| san_core(board, mv, &legal).replace('=', "") == wanted)
    {
        return Some(*mv);
    }

    parse_long_form(board, &wanted, &legal).or_else(|| parse_coordinates(text.trim(), &legal))
}

/// SAN with more origin information than needed, e.g. "Ngf3" or "Qd1xd7".
/// The origin file and rank must agree with the move and pick out exactly one.
fn parse_long_form(board: &Board, text: &str, legal: &[Move]) -> Option<Move> {
    let mut chars: Vec<char> = text.chars().collect();

    let kind = match chars.first() {
        Some(&c) if c.is_ascii_uppercase() => {
            chars.remove(0);
            letter_kind(c).filter(|&k| k != PAWN)?
        }
        _ => PAWN,
    };
    let promotion = match chars.last() {
        Some(&c) if kind == PAWN && c.is_ascii_uppercase() => {
            chars.pop();
            letter_kind(c).filter(|k| PROMOTION_PIECES.contains(k))?
        }
        _ => EMPTY,
    };

    if chars.len() < 2 {
        return None;
    }
    let dest: String = chars.split_off(chars.len() - 2).into_iter().collect();
    let to_sq = parse_square(&dest)?;
    let capture = chars.last() == Some(&'x');
    if capture {
        chars.pop();
    }

    let mut from_file = None;
    let mut from_rank = None;
    for c in chars {
        match (file_index(c), rank_index(c)) {
            (Some(file), _) if from_file.is_none() && from_rank.is_none() => from_file = Some(file),
            (_, Some(rank)) if from_rank.is_none() => from_rank = Some(rank),
            _ => return None,
        }
    }

    let mut candidates = legal.iter().filter(|mv| {
        !mv.is_castling
            && mv.to_sq == to_sq
            && mv.promotion == promotion
            && piece_kind(board.squares[mv.from_sq]) == kind
            && from_file.map_or(true, |file| file_of(mv.from_sq) == file)
            && from_rank.map_or(true, |rank| rank_of(mv.from_sq) == rank)
            && (!capture || board.squares[mv.to_sq] != EMPTY || mv.is_en_passant)
    });
    match (candidates.next(), candidates.next()) {
        (Some(mv), None) => Some(*mv),
        _ => None,
    }
}

/// Coordinate notation ("e2e4", "e7e8q") against a list of legal moves
fn parse_coordinates(text: &str, legal: &[Move]) -> Option<Move> {
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return None;
    }
    let from_sq = parse_square(&text[0..2])?;
    let to_sq = parse_square(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        Some(c) => letter_kind(c).filter(|k| PROMOTION_PIECES.contains(k))?,
        None => EMPTY,
    };

    legal
        .iter()
        .find(|mv| mv.from_sq == from_sq && mv.to_sq == to_sq && mv.promotion == promotion)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTING: &str = crate::board::STARTING_FEN;

    fn san_after(fen: &str, text: &str) -> Option<String> {
        let generator = MoveGenerator::new();
        let board = Board::from_fen(fen).unwrap();
        let mv = parse_move(&generator, &board, text)?;
        let legal = generator.generate_legal_moves(&board);
        Some(to_san(&generator, &board, &mv, &legal))
    }

    #[test]
    fn opening_moves_render_plainly() {
        let generator = MoveGenerator::new();
        let board = Board::new();
        let legal = generator.generate_legal_moves(&board);
        let mut sans: Vec<String> = legal
            .iter()
            .map(|mv| to_san(&generator, &board, mv, &legal))
            .collect();
        sans.sort();
        assert_eq!(sans.len(), 20);
        assert!(sans.contains(&"e4".to_string()));
        assert!(sans.contains(&"Nf3".to_string()));
        assert!(sans.contains(&"Na3".to_string()));
    }

    #[test]
    fn knights_disambiguate_by_file() {
        let fen = "r1bqkbnr/pppppppp/2n5/8/8/5N2/PPPPPPPP/RNBQKB1R w KQkq - 0 1";
        // Only the f3 knight reaches d4 here, no prefix needed.
        assert_eq!(san_after(fen, "Nd4").as_deref(), Some("Nd4"));

        let fen = "4k3/8/8/8/8/8/3P4/1N2KN2 w - - 0 1";
        assert_eq!(san_after(fen, "Nbd2"), None);
        let fen = "4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1";
        assert_eq!(san_after(fen, "Nbd2").as_deref(), Some("Nbd2"));
        assert_eq!(san_after(fen, "b1d2").as_deref(), Some("Nbd2"));
        assert_eq!(san_after(fen, "Nd2"), None);
    }

    #[test]
    fn rooks_disambiguate_by_rank() {
        let fen = "4k3/8/8/8/R7/8/8/R3K3 w - - 0 1";
        assert_eq!(san_after(fen, "R1a2").as_deref(), Some("R1a2"));
        assert_eq!(san_after(fen, "R4a2").as_deref(), Some("R4a2"));
    }

    #[test]
    fn captures_promotions_and_castling() {
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
        assert_eq!(san_after(fen, "exd5").as_deref(), Some("exd5"));

        let fen = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";
        assert_eq!(san_after(fen, "e8=Q").as_deref(), Some("e8=Q"));
        assert_eq!(san_after(fen, "e8N").as_deref(), Some("e8=N"));
        assert_eq!(san_after(fen, "e7e8r").as_deref(), Some("e8=R"));

        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        assert_eq!(san_after(fen, "O-O").as_deref(), Some("O-O"));
        assert_eq!(san_after(fen, "0-0-0").as_deref(), Some("O-O-O"));
        assert_eq!(san_after(fen, "e1g1").as_deref(), Some("O-O"));
    }

    #[test]
    fn check_and_mate_suffixes() {
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2";
        assert_eq!(san_after(fen, "Nc6").as_deref(), Some("Nc6"));

        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        assert_eq!(san_after(fen, "Bb5").as_deref(), Some("Bb5"));

        let fen = "rnbqkbnr/ppppp2p/5p2/6p1/4P3/8/PPPP1PPP/RNBQKBNR w KQkq g6 0 3";
        assert_eq!(san_after(fen, "Qh5").as_deref(), Some("Qh5#"));
        assert_eq!(san_after(fen, "Qh5+").as_deref(), Some("Qh5#"));
        assert_eq!(san_after(fen, "Qh5!!").as_deref(), Some("Qh5#"));
    }

    #[test]
    fn redundant_origin_is_accepted() {
        assert_eq!(san_after(STARTING, "Ngf3").as_deref(), Some("Nf3"));
        assert_eq!(san_after(STARTING, "Ng1f3").as_deref(), Some("Nf3"));
        assert_eq!(san_after(STARTING, "N1c3").as_deref(), Some("Nc3"));
        assert_eq!(san_after(STARTING, "Nbf3"), None);
        assert_eq!(san_after(STARTING, "Nxf3"), None);

        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
        assert_eq!(san_after(fen, "e4xd5").as_deref(), Some("exd5"));
        assert_eq!(san_after(fen, "Pe4d5"), None);

        // Both knights reach d2, the file or rank still has to choose.
        let fen = "4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1";
        assert_eq!(san_after(fen, "N1d2"), None);
        assert_eq!(san_after(fen, "Nf1d2").as_deref(), Some("Nfd2"));
    }

    #[test]
    fn nonsense_is_rejected() {
        let board = Board::new();
        let generator = MoveGenerator::new();
        for text in ["e9", "", "Ke2", "e5", "zz", "e2e5", "Nf3e"] {
            assert_eq!(parse_move(&generator, &board, text), None, "{text}");
        }
    }
}
