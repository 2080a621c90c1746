//! Assembles a turn one hop at a time, the way a player enters it on a board.

use crate::{GameError, Move, MoveChain, RulesEngine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnProgress {
    /// the piece on this square has to keep capturing
    Continue(u8),
    Complete(MoveChain),
}

/// Builds a turn hop by hop. Every partial turn is checked against the legal
/// turns of the starting position, so a completed turn is always one of them.
#[derive(Debug, Clone)]
pub struct TurnBuilder {
    legal: Vec<MoveChain>,
    /// position before the turn followed by the position after every hop
    positions: Vec<RulesEngine>,
    /// the selected square followed by every landing square
    squares: Vec<u8>,
}

impl TurnBuilder {
    pub fn new(rules: &RulesEngine) -> Self {
        TurnBuilder {
            legal: rules.find_all_legal_moves(),
            positions: vec![rules.clone()],
            squares: Vec::new(),
        }
    }

    pub fn legal_moves(&self) -> &[MoveChain] {
        &self.legal
    }

    pub fn selected(&self) -> Option<u8> {
        self.squares.first().copied()
    }

    /// the selected square and every square landed on so far
    pub fn squares(&self) -> &[u8] {
        &self.squares
    }

    /// the position after the hops played so far
    pub fn position(&self) -> &RulesEngine {
        // positions is never empty
        &self.positions[self.positions.len() - 1]
    }

    /// Selects the piece to move. Before the first hop a different piece may
    /// be selected at any time. Selecting the square the piece currently
    /// stands on again undoes the last hop.
    pub fn select(&mut self, square: u8) -> Result<(), GameError> {
        if self.squares.len() > 1 {
            if self.squares.last() == Some(&square) {
                self.undo();
                return Ok(());
            }
            return Err(GameError::IllegalSelection(square));
        }

        if !self.legal.iter().any(|chain| chain.start() == square) {
            return Err(GameError::IllegalSelection(square));
        }
        self.squares = vec![square];
        Ok(())
    }

    /// Moves the selected piece to `to`.
    pub fn hop(&mut self, to: u8) -> Result<TurnProgress, GameError> {
        let Some(&from) = self.squares.last() else {
            return Err(GameError::IllegalSelection(to));
        };

        self.squares.push(to);
        if !self.legal.iter().any(|chain| self.continues(chain)) {
            self.squares.pop();
            return Err(GameError::InvalidMove(Move::new(from, to)));
        }

        let mut next = self.position().clone();
        if let Err(err) = next.play_hop(from, to) {
            self.squares.pop();
            return Err(err);
        }

        let complete = self
            .legal
            .iter()
            .find(|chain| chain.len() + 1 == self.squares.len() && self.continues(chain))
            .cloned();
        match complete {
            Some(chain) => {
                let mut done = self.positions[0].clone();
                done.apply_move_chain(&chain)?;
                self.positions.push(done);
                Ok(TurnProgress::Complete(chain))
            }
            None => {
                self.positions.push(next);
                Ok(TurnProgress::Continue(to))
            }
        }
    }

    /// Takes back the last hop, or the selection if no hop was played.
    /// Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.squares.len() {
            0 => false,
            1 => {
                self.squares.clear();
                true
            }
            _ => {
                self.squares.pop();
                self.positions.pop();
                true
            }
        }
    }

    /// true if `chain` starts with the squares entered so far
    fn continues(&self, chain: &MoveChain) -> bool {
        chain.len() + 1 >= self.squares.len()
            && chain
                .squares()
                .zip(self.squares.iter())
                .all(|(a, &b)| a == b)
    }
}
