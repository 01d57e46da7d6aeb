//! FEN parsing/formatting (§6): piece placement, side to move, castling
//! rights, en-passant target, halfmove clock, fullmove number.

use super::squares::{parse_algebraic, square_of, GRID_SIZE};
use super::{
    piece_code, Board, Color, Piece, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, EMPTY,
};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 space-separated fields, found {0}")]
    WrongFieldCount(usize),
    #[error("piece placement must have 8 ranks, found {0}")]
    WrongRankCount(usize),
    #[error("rank has {0} files, expected 8")]
    WrongFileCount(usize),
    #[error("unrecognized piece letter '{0}'")]
    BadPieceLetter(char),
    #[error("active color must be 'w' or 'b', found '{0}'")]
    BadActiveColor(String),
    #[error("castling rights must be '-' or a subset of KQkq, found '{0}'")]
    BadCastlingRights(String),
    #[error("en-passant target must be '-' or a valid square, found '{0}'")]
    BadEnPassant(String),
    #[error("halfmove clock must be a non-negative integer, found '{0}'")]
    BadHalfmoveClock(String),
    #[error("fullmove number must be a positive integer, found '{0}'")]
    BadFullmoveNumber(String),
    #[error("exactly one white king and one black king are required (found {white}, {black})")]
    BadKingCount { white: usize, black: usize },
}

fn piece_from_letter(c: char) -> Result<(Color, Piece), FenError> {
    let color = if c.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let piece = match c.to_ascii_lowercase() {
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return Err(FenError::BadPieceLetter(c)),
    };
    Ok((color, piece))
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_ascii_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount(fields.len()));
        }

        let mut board = Board::empty();

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount(ranks.len()));
        }
        for (display_rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = display_rank_idx as u8; // 0 = 8th rank
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(d) = c.to_digit(10) {
                    file += d as u8;
                } else {
                    if file > 7 {
                        return Err(FenError::WrongFileCount(file as usize + 1));
                    }
                    let (color, piece) = piece_from_letter(c)?;
                    let sq = square_of(file, rank);
                    board.cells[sq as usize] = piece_code(color, piece);
                    board.list_mut(color).add(sq);
                    if piece == Piece::King {
                        match color {
                            Color::White => board.white_king = sq,
                            Color::Black => board.black_king = sq,
                        }
                    }
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::WrongFileCount(file as usize));
            }
        }

        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadActiveColor(other.to_string())),
        };

        board.castling_rights = 0;
        if fields[2] != "-" {
            for c in fields[2].chars() {
                board.castling_rights |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    _ => return Err(FenError::BadCastlingRights(fields[2].to_string())),
                };
            }
        }

        board.en_passant_file = if fields[3] == "-" {
            None
        } else {
            let sq = parse_algebraic(fields[3])
                .ok_or_else(|| FenError::BadEnPassant(fields[3].to_string()))?;
            Some(super::squares::file_of(sq))
        };

        board.halfmove_clock = fields[4]
            .parse()
            .map_err(|_| FenError::BadHalfmoveClock(fields[4].to_string()))?;
        board.fullmove_number = fields[5]
            .parse()
            .map_err(|_| FenError::BadFullmoveNumber(fields[5].to_string()))?;
        if board.fullmove_number == 0 {
            return Err(FenError::BadFullmoveNumber(fields[5].to_string()));
        }

        if board.list(Color::White).len() == 0 || board.list(Color::Black).len() == 0 {
            // Coarse check; exact king count validated below.
        }
        let white_kings = board
            .list(Color::White)
            .squares()
            .iter()
            .filter(|&&sq| board.cells[sq as usize] & super::KIND_MASK == super::KING_KIND)
            .count();
        let black_kings = board
            .list(Color::Black)
            .squares()
            .iter()
            .filter(|&&sq| board.cells[sq as usize] & super::KIND_MASK == super::KING_KIND)
            .count();
        if white_kings != 1 || black_kings != 1 {
            return Err(FenError::BadKingCount {
                white: white_kings,
                black: black_kings,
            });
        }

        board.ply = 0;
        board.history = [0; super::REPETITION_RING];
        board.zobrist = board.recompute_zobrist();
        board.history[0] = board.zobrist;

        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 0..8u8 {
            let mut empty_run = 0u8;
            for file in 0..8u8 {
                let sq = square_of(file, rank);
                let code = self.cells[sq as usize];
                if code == EMPTY {
                    empty_run += 1;
                    continue;
                }
                if empty_run > 0 {
                    write!(f, "{empty_run}")?;
                    empty_run = 0;
                }
                let color = super::code_color(code).expect("occupied square has a color");
                let piece = super::code_piece(code).expect("occupied square has a kind");
                write!(f, "{}", piece.fen_char(color))?;
            }
            if empty_run > 0 {
                write!(f, "{empty_run}")?;
            }
            if rank != 7 {
                write!(f, "/")?;
            }
        }

        write!(
            f,
            " {}",
            match self.side_to_move {
                Color::White => "w",
                Color::Black => "b",
            }
        )?;

        write!(f, " ")?;
        if self.castling_rights == 0 {
            write!(f, "-")?;
        } else {
            if self.castling_rights & CASTLE_WK != 0 {
                write!(f, "K")?;
            }
            if self.castling_rights & CASTLE_WQ != 0 {
                write!(f, "Q")?;
            }
            if self.castling_rights & CASTLE_BK != 0 {
                write!(f, "k")?;
            }
            if self.castling_rights & CASTLE_BQ != 0 {
                write!(f, "q")?;
            }
        }

        write!(f, " ")?;
        match self.en_passant_file {
            None => write!(f, "-")?,
            Some(file) => {
                // White to move means black just double-pushed, so the
                // passed-over square is the higher display rank (6), and
                // vice versa.
                let rank = match self.side_to_move {
                    Color::White => 2,
                    Color::Black => 5,
                };
                let sq = square_of(file, rank);
                write!(f, "{}", super::squares::algebraic(sq))?;
            }
        }

        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

const _: () = assert!(GRID_SIZE == 120);
