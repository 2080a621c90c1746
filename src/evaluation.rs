//! Static evaluation of a position.

use crate::{square, Board, Color, Piece, PieceType};

/// Positional weight of every square. Back rows and edges are worth more
/// than the center.
#[rustfmt::skip]
const BOARD_WEIGHTS: [i32; 32] = [
    4, 4, 4, 4,
    4, 3, 3, 3,
    3, 2, 2, 4,
    4, 2, 1, 3,
    3, 1, 2, 4,
    4, 2, 2, 3,
    3, 3, 3, 4,
    4, 4, 4, 4,
];

const MAN_VALUE: i32 = 5;
/// a man one row away from being crowned
const ADVANCED_MAN_VALUE: i32 = 7;
const KING_VALUE: i32 = 10;

#[inline]
pub fn piece_value(piece: Piece, pos: u8) -> i32 {
    let value = match piece.typ() {
        PieceType::King => KING_VALUE,
        PieceType::Man => {
            let row_before_promotion = match piece.color() {
                Color::White => 1,
                Color::Black => 6,
            };
            if square::index_to_row(pos) == row_before_promotion {
                ADVANCED_MAN_VALUE
            } else {
                MAN_VALUE
            }
        }
    };
    value * BOARD_WEIGHTS[pos as usize]
}

/// Material and position of `color` minus that of its opponent.
pub fn strength(board: &Board, color: Color) -> i32 {
    board
        .occupied()
        .map(|(pos, piece)| {
            let value = piece_value(piece, pos);
            if piece.color() == color {
                value
            } else {
                -value
            }
        })
        .sum()
}
