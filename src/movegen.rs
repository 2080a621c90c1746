//! Enumeration of every legal turn for the side to move.
//!
//! Captures are mandatory, so as soon as any piece of the side to move can
//! capture only capture chains are generated. A chain is followed as long as
//! the capturing piece can keep capturing.

use crate::{
    square::{self, Direction},
    Color, Move, MoveChain, RulesEngine,
};

/// Shared state of the depth first search for capture chains of one piece.
struct ChainSearch {
    /// square the piece started on, it counts as empty while the piece is away
    start: u8,
    /// squares of the enemy pieces jumped so far
    captured: Vec<u8>,
    path: Vec<Move>,
    chains: Vec<MoveChain>,
}

impl ChainSearch {
    fn new(start: u8) -> Self {
        ChainSearch {
            start,
            captured: Vec::with_capacity(12),
            path: Vec::with_capacity(12),
            chains: Vec::new(),
        }
    }

    fn finish_path(&mut self) {
        if let Some(chain) = MoveChain::from_moves(self.path.clone()) {
            self.chains.push(chain);
        }
    }
}

impl RulesEngine {
    /// Every legal turn for the current player.
    pub fn find_all_legal_moves(&self) -> Vec<MoveChain> {
        if self.can_current_player_attack() {
            self.generate_capture_chains()
        } else {
            self.generate_simple_moves()
        }
    }

    /// true if `chain` is one of the turns [RulesEngine::find_all_legal_moves] returns
    pub fn is_legal_turn(&self, chain: &MoveChain) -> bool {
        self.find_all_legal_moves().contains(chain)
    }

    fn generate_capture_chains(&self) -> Vec<MoveChain> {
        let color = self.current_player();
        let mut moves = Vec::new();
        for (pos, piece) in self.board().pieces(color) {
            let mut search = ChainSearch::new(pos);
            if piece.is_king() {
                self.extend_king_chain(&mut search, pos, None, color);
            } else {
                self.extend_man_chain(&mut search, pos, color);
            }
            moves.append(&mut search.chains);
        }
        moves
    }

    /// Men capture forward only, one square over an adjacent enemy.
    fn extend_man_chain(&self, search: &mut ChainSearch, at: u8, color: Color) {
        let board = self.board();
        let mut extended = false;

        for dir in Direction::forward(color) {
            let ray = square::ray(at, dir);
            if ray.len() < 2 {
                continue;
            }
            let (over, landing) = (ray[0], ray[1]);
            let is_enemy = matches!(board[over], Some(p) if p.color() != color);
            if !is_enemy || board[landing].is_some() {
                continue;
            }

            extended = true;
            search.path.push(Move::new(at, landing));
            self.extend_man_chain(search, landing, color);
            search.path.pop();
        }

        if !extended && !search.path.is_empty() {
            search.finish_path();
        }
    }

    /// Kings slide over a single enemy and may land on any free square behind it.
    ///
    /// Landing squares from which the capture can be continued take precedence:
    /// only if none of them continues does every landing square end a chain.
    /// Returns true if a capture was found.
    fn extend_king_chain(
        &self,
        search: &mut ChainSearch,
        at: u8,
        last_dir: Option<Direction>,
        color: Color,
    ) -> bool {
        let mut found = false;
        for dir in Direction::ALL {
            if last_dir.map(Direction::reverse) == Some(dir) {
                continue;
            }
            found |= self.extend_king_diagonal(search, at, dir, color);
        }
        found
    }

    fn extend_king_diagonal(
        &self,
        search: &mut ChainSearch,
        at: u8,
        dir: Direction,
        color: Color,
    ) -> bool {
        let board = self.board();
        let start = search.start;
        let vacant = |sq: u8| board[sq].is_none() || sq == start;

        let mut ray = square::ray(at, dir).iter().copied();
        let Some(target) = ray.by_ref().find(|&sq| !vacant(sq)) else {
            return false;
        };
        let is_enemy = matches!(board[target], Some(p) if p.color() != color);
        if !is_enemy || search.captured.contains(&target) {
            return false;
        }

        let landings: Vec<u8> = ray.take_while(|&sq| vacant(sq)).collect();
        if landings.is_empty() {
            return false;
        }

        search.captured.push(target);
        let mut continued = false;
        for &landing in &landings {
            search.path.push(Move::new(at, landing));
            continued |= self.extend_king_chain(search, landing, Some(dir), color);
            search.path.pop();
        }
        search.captured.pop();

        if !continued {
            for &landing in &landings {
                search.path.push(Move::new(at, landing));
                search.finish_path();
                search.path.pop();
            }
        }
        true
    }

    fn generate_simple_moves(&self) -> Vec<MoveChain> {
        let board = self.board();
        let color = self.current_player();
        let mut moves = Vec::new();

        for (pos, piece) in board.pieces(color) {
            if piece.is_king() {
                for dir in Direction::ALL {
                    for &target in square::ray(pos, dir) {
                        if board[target].is_some() {
                            break;
                        }
                        moves.push(MoveChain::single(Move::new(pos, target)));
                    }
                }
            } else {
                for dir in Direction::forward(color) {
                    if let Some(target) = square::step(pos, dir) {
                        if board[target].is_none() {
                            moves.push(MoveChain::single(Move::new(pos, target)));
                        }
                    }
                }
            }
        }

        moves
    }

    /// Number of move chain sequences of length `depth` from this position.
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.find_all_legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut count = 0;
        for chain in moves {
            let mut next = self.clone();
            if next.apply_move_chain(&chain).is_ok() {
                count += next.perft(depth - 1);
            }
        }
        count
    }
}
