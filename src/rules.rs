use core::fmt;
use std::fmt::Display;

use crate::{
    square::{self, Direction},
    Board, Color, GameError, Move, MoveChain, Piece, SquareContent, SQUARE_COUNT,
};

/// What a legal hop does to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopKind {
    Step,
    /// jumps the enemy piece on the given square
    Capture(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    ToMove(Color),
    GameOver { winner: Color },
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::GameOver { .. })
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::ToMove(color) => write!(f, "{color} to move"),
            GameStatus::GameOver { winner } => write!(f, "{winner} wins"),
        }
    }
}

/// The state of a game together with the rules that change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesEngine {
    board: Board,
    current_player: Color,
}

impl Default for RulesEngine {
    fn default() -> Self {
        RulesEngine::new()
    }
}

impl RulesEngine {
    /// new game, black moves first
    pub fn new() -> Self {
        RulesEngine {
            board: Board::new(),
            current_player: Color::Black,
        }
    }

    pub fn from_board(board: Board, current_player: Color) -> Self {
        RulesEngine {
            board,
            current_player,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn get(&self, index: usize) -> Result<SquareContent, GameError> {
        self.board.get(index)
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    #[inline]
    pub fn piece_count(&self, color: Color) -> u8 {
        self.board.piece_count(color)
    }

    #[inline]
    fn is_enemy(&self, square: u8, color: Color) -> bool {
        matches!(self.board[square], Some(piece) if piece.color() != color)
    }

    /// Checks whether the piece on `from` may hop to `to` this turn.
    pub fn is_valid_move(&self, from: u8, to: u8) -> bool {
        self.classify_hop(from, to).is_some()
    }

    /// Classifies a hop of the current player, `None` if it is not legal.
    ///
    /// A capture always names the single enemy piece that is jumped, so
    /// applying it never has to guess which squares to clear.
    pub fn classify_hop(&self, from: u8, to: u8) -> Option<HopKind> {
        if from as usize >= SQUARE_COUNT || to as usize >= SQUARE_COUNT {
            return None;
        }
        let piece = self.board[from]?;
        let color = piece.color();
        if self.board[to].is_some() || color != self.current_player {
            return None;
        }

        let (dir, distance) = square::diagonal_between(from, to)?;
        let between = &square::ray(from, dir)[..distance - 1];

        if piece.is_king() {
            let mut occupied = between
                .iter()
                .copied()
                .filter(|&sq| self.board[sq].is_some());
            match (occupied.next(), occupied.next()) {
                (None, _) => (!self.can_current_player_attack()).then_some(HopKind::Step),
                (Some(target), None) if self.is_enemy(target, color) => {
                    Some(HopKind::Capture(target))
                }
                _ => None,
            }
        } else {
            if !dir.is_forward(color) {
                return None;
            }
            match distance {
                1 => (!self.can_current_player_attack()).then_some(HopKind::Step),
                2 => {
                    let over = between[0];
                    self.is_enemy(over, color).then_some(HopKind::Capture(over))
                }
                _ => None,
            }
        }
    }

    /// true if any piece of the side to move can capture
    pub fn can_current_player_attack(&self) -> bool {
        self.board
            .pieces(self.current_player)
            .any(|(idx, _)| self.can_attack_position(idx))
    }

    /// true if the piece on `index` has at least one capture available
    pub fn can_attack_position(&self, index: u8) -> bool {
        let Ok(Some(piece)) = self.board.get(index as usize) else {
            return false;
        };
        let color = piece.color();

        if piece.is_king() {
            Direction::ALL
                .iter()
                .any(|&dir| self.king_can_capture_towards(index, color, dir))
        } else {
            Direction::forward(color).iter().any(|&dir| {
                let ray = square::ray(index, dir);
                ray.len() >= 2 && self.is_enemy(ray[0], color) && self.board[ray[1]].is_none()
            })
        }
    }

    fn king_can_capture_towards(&self, from: u8, color: Color, dir: Direction) -> bool {
        let mut ray = square::ray(from, dir)
            .iter()
            .copied()
            .skip_while(|&sq| self.board[sq].is_none());
        match (ray.next(), ray.next()) {
            (Some(target), Some(landing)) => {
                self.is_enemy(target, color) && self.board[landing].is_none()
            }
            _ => false,
        }
    }

    /// Plays a single hop. The turn passes to the opponent unless the hop was
    /// a mandatory capture and the same piece can capture again.
    pub fn apply_move(&mut self, from: u8, to: u8) -> Result<(), GameError> {
        let must_capture = self.can_current_player_attack();

        self.play_hop(from, to)?;

        if !must_capture || !self.can_attack_position(to) {
            self.switch_player();
        }
        Ok(())
    }

    /// Plays every hop of `chain` and passes the turn. Either all hops are
    /// applied or, on error, none of them.
    pub fn apply_move_chain(&mut self, chain: &MoveChain) -> Result<(), GameError> {
        let mut next = self.clone();
        for mve in chain {
            next.play_hop(mve.from, mve.to)?;
        }
        next.switch_player();

        *self = next;
        Ok(())
    }

    /// Validates and plays one hop without passing the turn.
    pub(crate) fn play_hop(&mut self, from: u8, to: u8) -> Result<HopKind, GameError> {
        let invalid = GameError::InvalidMove(Move::new(from, to));
        let kind = self.classify_hop(from, to).ok_or(invalid)?;
        let Some(piece) = self.board[from] else {
            return Err(invalid);
        };

        if let HopKind::Capture(captured) = kind {
            debug_assert!(self.is_enemy(captured, piece.color()));
            self.board.set(captured, None);
        }

        let piece = if Self::promotes(piece, to) {
            piece.crowned()
        } else {
            piece
        };
        self.board.set(from, None);
        self.board.set(to, Some(piece));

        Ok(kind)
    }

    /// men are crowned on the opponent's home row
    fn promotes(piece: Piece, to: u8) -> bool {
        if piece.is_king() {
            return false;
        }
        match piece.color() {
            Color::White => to < 4,
            Color::Black => to > 27,
        }
    }

    fn switch_player(&mut self) {
        self.current_player = !self.current_player;
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_over()
    }

    /// The side that still has a legal move. Only meaningful once
    /// [RulesEngine::is_game_over] returns true.
    pub fn winner(&self) -> Color {
        if self.find_all_legal_moves().is_empty() {
            !self.current_player
        } else {
            self.current_player
        }
    }

    pub fn status(&self) -> GameStatus {
        let no_pieces = Color::ALL_COLORS
            .iter()
            .any(|&color| self.piece_count(color) == 0);
        let has_moves = !self.find_all_legal_moves().is_empty();

        if no_pieces || !has_moves {
            let winner = if has_moves {
                self.current_player
            } else {
                !self.current_player
            };
            GameStatus::GameOver { winner }
        } else {
            GameStatus::ToMove(self.current_player)
        }
    }
}
