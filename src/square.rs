//! Geometry of the 32 playable squares.
//!
//! Square indices run row by row from the top of the board. Row 0 is black's
//! home row, row 7 white's. On even rows the playable squares are the odd
//! columns, on odd rows the even columns.

use crate::Color;
use lazy_static::lazy_static;

pub const SQUARE_COUNT: usize = 32;

lazy_static! {
    /// For every square and direction the squares reached by sliding towards
    /// the edge of the board, nearest first.
    static ref RAYS: Vec<[Vec<u8>; 4]> = (0..SQUARE_COUNT as u8)
        .map(|idx| Direction::ALL.map(|dir| compute_ray(idx, dir)))
        .collect();
}

#[inline]
pub const fn index_to_row(index: u8) -> i8 {
    (index / 4) as i8
}

#[inline]
pub const fn index_to_col(index: u8) -> i8 {
    let offset = if (index / 4) % 2 == 0 { 1 } else { 0 };
    ((index % 4) * 2 + offset) as i8
}

/// Inverse of [index_to_col] and [index_to_row]. The result is only
/// meaningful for a playable square, see [square_at] for a checked version.
#[inline]
pub const fn col_row_to_index(col: i8, row: i8) -> u8 {
    if row % 2 == 0 {
        (row * 4 + (col - 1) / 2) as u8
    } else {
        (row * 4 + col / 2) as u8
    }
}

/// The square at `col`/`row` or `None` if that is off the board or not playable.
pub fn square_at(col: i8, row: i8) -> Option<u8> {
    if !(0..8).contains(&col) || !(0..8).contains(&row) || (col + row) % 2 == 0 {
        return None;
    }
    Some(col_row_to_index(col, row))
}

/// One of the four diagonals. "Up" is towards row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    DownRight = 0,
    UpLeft = 1,
    UpRight = 2,
    DownLeft = 3,
}

impl Direction {
    /// order in which kings search the diagonals
    pub const ALL: [Direction; 4] = [
        Direction::DownRight,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
    ];

    /// column and row delta of a single step
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::DownRight => (1, 1),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (1, -1),
            Direction::DownLeft => (-1, 1),
        }
    }

    #[inline]
    pub const fn reverse(self) -> Direction {
        match self {
            Direction::DownRight => Direction::UpLeft,
            Direction::UpLeft => Direction::DownRight,
            Direction::UpRight => Direction::DownLeft,
            Direction::DownLeft => Direction::UpRight,
        }
    }

    /// Direction from the signs of a column and row delta.
    pub fn from_delta(col: i8, row: i8) -> Option<Direction> {
        match (col.signum(), row.signum()) {
            (1, 1) => Some(Direction::DownRight),
            (-1, -1) => Some(Direction::UpLeft),
            (1, -1) => Some(Direction::UpRight),
            (-1, 1) => Some(Direction::DownLeft),
            _ => None,
        }
    }

    /// the two directions a man of `color` moves in, right before left
    #[inline]
    pub const fn forward(color: Color) -> [Direction; 2] {
        match color {
            Color::White => [Direction::UpRight, Direction::UpLeft],
            Color::Black => [Direction::DownRight, Direction::DownLeft],
        }
    }

    #[inline]
    pub const fn is_forward(self, color: Color) -> bool {
        self.delta().1 == color.forward()
    }
}

fn compute_ray(from: u8, dir: Direction) -> Vec<u8> {
    let (col_off, row_off) = dir.delta();
    let mut col = index_to_col(from);
    let mut row = index_to_row(from);
    let mut ray = Vec::with_capacity(7);
    loop {
        col += col_off;
        row += row_off;
        match square_at(col, row) {
            Some(idx) => ray.push(idx),
            None => break,
        }
    }
    ray
}

/// Squares from `from` (exclusive) to the edge of the board along `dir`.
#[inline]
pub fn ray(from: u8, dir: Direction) -> &'static [u8] {
    &RAYS[from as usize][dir as usize]
}

#[inline]
pub fn step(from: u8, dir: Direction) -> Option<u8> {
    ray(from, dir).first().copied()
}

/// Direction and number of steps from `from` to `to`, if both share a diagonal.
pub fn diagonal_between(from: u8, to: u8) -> Option<(Direction, usize)> {
    let col_off = index_to_col(to) - index_to_col(from);
    let row_off = index_to_row(to) - index_to_row(from);
    if col_off == 0 || col_off.abs() != row_off.abs() {
        return None;
    }
    let dir = Direction::from_delta(col_off, row_off)?;
    Some((dir, col_off.unsigned_abs() as usize))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn coordinate_round_trip() {
        for idx in 0..SQUARE_COUNT as u8 {
            let col = index_to_col(idx);
            let row = index_to_row(idx);
            assert!((0..8).contains(&col) && (0..8).contains(&row));
            assert_eq!((col + row) % 2, 1, "square {idx} must be a dark square");
            assert_eq!(col_row_to_index(col, row), idx);
            assert_eq!(square_at(col, row), Some(idx));
        }
    }

    #[test]
    fn known_coordinates() {
        assert_eq!((index_to_col(0), index_to_row(0)), (1, 0));
        assert_eq!((index_to_col(3), index_to_row(3)), (7, 0));
        assert_eq!((index_to_col(4), index_to_row(4)), (0, 1));
        assert_eq!((index_to_col(13), index_to_row(13)), (2, 3));
        assert_eq!((index_to_col(31), index_to_row(31)), (6, 7));
    }

    #[test]
    fn light_and_outside_squares() {
        assert_eq!(square_at(0, 0), None);
        assert_eq!(square_at(8, 1), None);
        assert_eq!(square_at(-1, 2), None);
        assert_eq!(square_at(1, 8), None);
    }

    #[test]
    fn rays() {
        assert_eq!(ray(28, Direction::UpRight), &[24, 21, 17, 14, 10, 7, 3]);
        assert_eq!(ray(28, Direction::DownLeft), &[] as &[u8]);
        assert_eq!(ray(9, Direction::DownLeft), &[13, 16, 20]);
        assert_eq!(step(11, Direction::DownRight), None);
        assert_eq!(step(11, Direction::DownLeft), Some(15));
        for idx in 0..SQUARE_COUNT as u8 {
            for dir in Direction::ALL {
                for &other in ray(idx, dir) {
                    assert!(ray(other, dir.reverse()).contains(&idx));
                }
            }
        }
    }

    #[test]
    fn diagonals() {
        assert_eq!(diagonal_between(9, 16), Some((Direction::DownLeft, 2)));
        assert_eq!(diagonal_between(9, 13), Some((Direction::DownLeft, 1)));
        assert_eq!(diagonal_between(28, 3), Some((Direction::UpRight, 7)));
        assert_eq!(diagonal_between(9, 10), None);
        assert_eq!(diagonal_between(9, 9), None);
        assert_eq!(diagonal_between(0, 12), None);
    }

    #[test]
    fn forward_directions() {
        for dir in Direction::forward(Color::White) {
            assert!(dir.is_forward(Color::White));
            assert!(!dir.is_forward(Color::Black));
        }
        for dir in Direction::forward(Color::Black) {
            assert!(dir.is_forward(Color::Black));
        }
    }
}
