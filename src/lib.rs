use core::fmt;
use std::{
    fmt::Display,
    num::NonZeroU8,
    ops::{Deref, Index, Not},
};

pub use anyhow::Result;

/// prints search diagnostics when the `trace-search` feature is enabled
macro_rules! trace_search {
    ($($arg:tt)*) => {
        #[cfg(feature = "trace-search")]
        {
            println!($($arg)*);
        }
    };
}

pub mod engine;
pub mod evaluation;
pub mod movegen;
pub mod rules;
pub mod square;
pub mod turn;

pub use rules::{GameStatus, RulesEngine};
pub use square::{Direction, SQUARE_COUNT};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceType {
    Man = 0b001,
    King = 0b010,
}

impl PieceType {
    pub const ALL_TYPES: [PieceType; 2] = [PieceType::Man, PieceType::King];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 0b1000,
}

impl Color {
    pub const ALL_COLORS: [Color; 2] = [Color::White, Color::Black];

    /// Row delta of a man moving forward. White starts on the bottom rows
    /// and moves towards row 0, black the other way around.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece(NonZeroU8);

impl Piece {
    pub const WHITE_MAN: Piece = Piece::new(PieceType::Man, Color::White);
    pub const WHITE_KING: Piece = Piece::new(PieceType::King, Color::White);
    pub const BLACK_MAN: Piece = Piece::new(PieceType::Man, Color::Black);
    pub const BLACK_KING: Piece = Piece::new(PieceType::King, Color::Black);

    pub const fn new(typ: PieceType, color: Color) -> Self {
        // Safety: typ is always > 0
        unsafe { Piece(NonZeroU8::new_unchecked(typ as u8 | color as u8)) }
    }

    #[inline(always)]
    pub fn typ(&self) -> PieceType {
        if self.0.get() & PieceType::King as u8 != 0 {
            PieceType::King
        } else {
            PieceType::Man
        }
    }

    #[inline(always)]
    pub fn color(&self) -> Color {
        if self.0.get() & Color::Black as u8 == Color::Black as u8 {
            Color::Black
        } else {
            Color::White
        }
    }

    #[inline]
    pub fn is_king(&self) -> bool {
        self.typ() == PieceType::King
    }

    /// the same piece after promotion
    #[inline]
    pub fn crowned(&self) -> Piece {
        Piece::new(PieceType::King, self.color())
    }

    pub fn notation_char(&self) -> char {
        match (self.typ(), self.color()) {
            (PieceType::Man, Color::White) => 'w',
            (PieceType::King, Color::White) => 'W',
            (PieceType::Man, Color::Black) => 'b',
            (PieceType::King, Color::Black) => 'B',
        }
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Piece")
            .field("type", &self.typ())
            .field("color", &self.color())
            .finish()
    }
}

/// Content of one playable square.
pub type SquareContent = Option<Piece>;

/// A single hop of a piece, either a step or one capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: u8,
    pub to: u8,
}

impl Move {
    pub const fn new(from: u8, to: u8) -> Self {
        Move { from, to }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.from, self.to)
    }
}

/// One complete turn: a single step or every hop of a capture sequence.
///
/// A chain is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveChain(Vec<Move>);

impl MoveChain {
    pub fn single(mve: Move) -> Self {
        MoveChain(vec![mve])
    }

    /// Returns `None` if `moves` is empty.
    pub fn from_moves(moves: Vec<Move>) -> Option<Self> {
        if moves.is_empty() {
            None
        } else {
            Some(MoveChain(moves))
        }
    }

    /// square the moving piece starts on
    pub fn start(&self) -> u8 {
        self.0[0].from
    }

    /// square the moving piece ends on
    pub fn end(&self) -> u8 {
        self.0[self.0.len() - 1].to
    }

    /// every square the piece visits, starting with [MoveChain::start]
    pub fn squares(&self) -> impl Iterator<Item = u8> + '_ {
        std::iter::once(self.start()).chain(self.0.iter().map(|m| m.to))
    }

    pub fn into_moves(self) -> Vec<Move> {
        self.0
    }
}

impl Deref for MoveChain {
    type Target = [Move];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a MoveChain {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for MoveChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, square) in self.squares().enumerate() {
            if i != 0 {
                f.write_str("-")?;
            }
            write!(f, "{square}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// square index outside of 0..31
    OutOfRange(usize),
    /// the move is not legal in the current position
    InvalidMove(Move),
    /// no legal turn starts at the selected square
    IllegalSelection(u8),
}

impl Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::OutOfRange(index) => {
                write!(f, "square {index} is outside of 0..{}", SQUARE_COUNT - 1)
            }
            GameError::InvalidMove(mve) => write!(f, "invalid move {mve}"),
            GameError::IllegalSelection(square) => {
                write!(f, "no legal move starts at square {square}")
            }
        }
    }
}

impl std::error::Error for GameError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    fields: [SquareContent; SQUARE_COUNT],

    white_pieces: u8,
    black_pieces: u8,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            fields: [None; SQUARE_COUNT],
            white_pieces: 0,
            black_pieces: 0,
        }
    }

    /// The starting position: black men on squares 0..11, white men on 20..31.
    pub fn new() -> Self {
        let mut board = Board::empty();
        for idx in 0..12 {
            board.set(idx, Some(Piece::BLACK_MAN));
        }
        for idx in 20..32 {
            board.set(idx, Some(Piece::WHITE_MAN));
        }
        board
    }

    /// Creates a board holding only `pieces`.
    pub fn from_pieces(pieces: &[(u8, Piece)]) -> Result<Self, GameError> {
        let mut board = Board::empty();
        for &(idx, piece) in pieces {
            if idx as usize >= SQUARE_COUNT {
                return Err(GameError::OutOfRange(idx as usize));
            }
            board.set(idx, Some(piece));
        }
        Ok(board)
    }

    pub fn get(&self, index: usize) -> Result<SquareContent, GameError> {
        self.fields
            .get(index)
            .copied()
            .ok_or(GameError::OutOfRange(index))
    }

    /// Overwrites a square and keeps the piece counts in sync.
    ///
    /// # Panics
    /// if `index` is not a valid square.
    pub fn set(&mut self, index: u8, content: SquareContent) {
        if let Some(old) = self.fields[index as usize] {
            *self.count_mut(old.color()) -= 1;
        }
        if let Some(new) = content {
            *self.count_mut(new.color()) += 1;
        }
        self.fields[index as usize] = content;
    }

    #[inline]
    pub fn piece_count(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_pieces,
            Color::Black => self.black_pieces,
        }
    }

    #[inline]
    fn count_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white_pieces,
            Color::Black => &mut self.black_pieces,
        }
    }

    /// all occupied squares in index order
    pub fn occupied(&self) -> impl Iterator<Item = (u8, Piece)> + '_ {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(idx, field)| field.map(|piece| (idx as u8, piece)))
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (u8, Piece)> + '_ {
        self.occupied().filter(move |(_, piece)| piece.color() == color)
    }
}

impl Index<usize> for Board {
    type Output = SquareContent;

    fn index(&self, index: usize) -> &Self::Output {
        &self.fields[index]
    }
}

impl Index<u8> for Board {
    type Output = SquareContent;

    fn index(&self, index: u8) -> &Self::Output {
        &self[index as usize]
    }
}

impl Display for Board {
    /// Renders the board with row 0 on top. Empty dark squares show their index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            for col in 0..8 {
                match square::square_at(col, row) {
                    None => f.write_str("   ")?,
                    Some(idx) => match self[idx] {
                        Some(piece) => write!(f, "  {}", piece.notation_char())?,
                        None => write!(f, " {idx:>2}")?,
                    },
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
