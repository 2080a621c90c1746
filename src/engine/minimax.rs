use anyhow::{bail, Context};

use super::Engine;
use crate::{evaluation, Color, MoveChain, Result, RulesEngine};

/// search depth used when none is configured
pub const DEFAULT_DEPTH: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub positions_checked: u64,
    pub leaf_evaluations: u64,
    pub cutoffs: u64,
    /// positions checked at every ply, the root is ply 0
    #[cfg(feature = "slow-stats")]
    pub nodes_per_ply: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<MoveChain>,
    pub score: i32,
}

/// Plays with a fixed depth alpha-beta search.
pub struct MinimaxEngine {
    rules: RulesEngine,
    color: Color,
    depth: u32,
    result: Option<SearchResult>,
    stats: Option<SearchStats>,
}

impl Engine for MinimaxEngine {
    fn new_from_rules(rules: RulesEngine, color: Color) -> Self {
        MinimaxEngine {
            rules,
            color,
            depth: DEFAULT_DEPTH,
            result: None,
            stats: None,
        }
    }

    fn color(&self) -> Color {
        self.color
    }

    fn accept_move(&mut self, chain: &MoveChain) -> Result<()> {
        self.rules
            .apply_move_chain(chain)
            .with_context(|| format!("accept move {chain}"))?;
        self.result = None;
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        if self.rules.current_player() != self.color {
            bail!(
                "Can't search for {} while {} is to move",
                self.color,
                self.rules.current_player()
            );
        }

        let mut search = Search::new(self.color, self.depth);
        let result = search.search(&self.rules).context("minimax search")?;

        self.stats = Some(search.stats);
        self.result = Some(result);
        Ok(())
    }

    fn best_move(&self) -> Option<&MoveChain> {
        self.result.as_ref().and_then(|r| r.best_move.as_ref())
    }

    fn current_score(&self) -> i32 {
        self.result.as_ref().map_or(0, |r| r.score)
    }
}

impl MinimaxEngine {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn rules(&self) -> &RulesEngine {
        &self.rules
    }

    /// statistics of the last search
    pub fn stats(&self) -> Option<&SearchStats> {
        self.stats.as_ref()
    }

    pub fn search_to_depth(&mut self, depth: u32) -> Result<(Option<MoveChain>, i32)> {
        self.depth = depth;
        self.search()?;
        Ok((self.best_move().cloned(), self.current_score()))
    }
}

/// Searches `depth_limit` plies past the first move of the side to move and
/// returns the move with the best score for that side.
pub fn search_to_depth(rules: &RulesEngine, depth_limit: u32) -> Result<SearchResult> {
    Search::new(rules.current_player(), depth_limit).search(rules)
}

/// Picks the move chain for the side to move, `None` if it has no legal move.
pub fn select_move(rules: &RulesEngine, depth_limit: u32) -> Result<Option<MoveChain>> {
    Ok(search_to_depth(rules, depth_limit)?.best_move)
}

/// Alpha-beta search. Every node is scored from the computer's point of view,
/// max nodes are the computer's turns and min nodes the opponent's.
struct Search {
    computer: Color,
    depth_limit: u32,
    stats: SearchStats,
}

impl Search {
    fn new(computer: Color, depth_limit: u32) -> Self {
        Search {
            computer,
            depth_limit,
            stats: SearchStats::default(),
        }
    }

    fn search(&mut self, rules: &RulesEngine) -> Result<SearchResult> {
        self.count_node(0);
        let moves = rules.find_all_legal_moves();
        if moves.is_empty() {
            return Ok(SearchResult {
                best_move: None,
                score: self.evaluate(rules),
            });
        }

        let mut best_score = i32::MIN;
        let mut best_move = None;
        for chain in moves {
            let next = Self::successor(rules, &chain)?;
            let score = self.min_node(&next, 1, best_score, i32::MAX)?;
            if score > best_score {
                trace_search!("Max value : {score} at depth : 0 for {chain}");
                best_score = score;
                best_move = Some(chain);
            }
        }

        trace_search!("Move value selected : {best_score} at depth : 0");
        Ok(SearchResult {
            best_move,
            score: best_score,
        })
    }

    fn successor(rules: &RulesEngine, chain: &MoveChain) -> Result<RulesEngine> {
        let mut next = rules.clone();
        next.apply_move_chain(chain)
            .with_context(|| format!("generated move {chain} is not valid"))?;
        Ok(next)
    }

    /// The moves to search from this node or `None` if it is a leaf, because
    /// the depth limit is reached or the game is over.
    fn expand(&mut self, rules: &RulesEngine, ply: u32) -> Option<Vec<MoveChain>> {
        self.count_node(ply);
        if ply > self.depth_limit {
            return None;
        }
        if Color::ALL_COLORS
            .iter()
            .any(|&color| rules.piece_count(color) == 0)
        {
            return None;
        }
        let moves = rules.find_all_legal_moves();
        if moves.is_empty() {
            None
        } else {
            Some(moves)
        }
    }

    fn evaluate(&mut self, rules: &RulesEngine) -> i32 {
        self.stats.leaf_evaluations += 1;
        evaluation::strength(rules.board(), self.computer)
    }

    fn max_node(&mut self, rules: &RulesEngine, ply: u32, mut alpha: i32, beta: i32) -> Result<i32> {
        let Some(moves) = self.expand(rules, ply) else {
            return Ok(self.evaluate(rules));
        };
        trace_search!("Max node at depth : {ply} with alpha : {alpha} beta : {beta}");

        for chain in &moves {
            let next = Self::successor(rules, chain)?;
            let value = self.min_node(&next, ply + 1, alpha, beta)?;

            if value > alpha {
                alpha = value;
                trace_search!("Max value : {value} at depth : {ply}");
            }
            if alpha > beta {
                self.stats.cutoffs += 1;
                trace_search!("Max value with pruning : {beta} at depth : {ply}");
                return Ok(beta);
            }
        }

        trace_search!("Max value selected : {alpha} at depth : {ply}");
        Ok(alpha)
    }

    fn min_node(&mut self, rules: &RulesEngine, ply: u32, alpha: i32, mut beta: i32) -> Result<i32> {
        let Some(moves) = self.expand(rules, ply) else {
            return Ok(self.evaluate(rules));
        };
        trace_search!("Min node at depth : {ply} with alpha : {alpha} beta : {beta}");

        for chain in &moves {
            let next = Self::successor(rules, chain)?;
            let value = self.max_node(&next, ply + 1, alpha, beta)?;

            if value < beta {
                beta = value;
                trace_search!("Min value : {value} at depth : {ply}");
            }
            if beta < alpha {
                self.stats.cutoffs += 1;
                trace_search!("Min value with pruning : {alpha} at depth : {ply}");
                return Ok(alpha);
            }
        }

        trace_search!("Min value selected : {beta} at depth : {ply}");
        Ok(beta)
    }

    #[inline]
    fn count_node(&mut self, _ply: u32) {
        self.stats.positions_checked += 1;

        #[cfg(feature = "slow-stats")]
        {
            let ply = _ply as usize;
            if self.stats.nodes_per_ply.len() <= ply {
                self.stats.nodes_per_ply.resize(ply + 1, 0);
            }
            self.stats.nodes_per_ply[ply] += 1;
        }
    }
}

#[cfg(test)]
mod test {
    use super::{search_to_depth, select_move, MinimaxEngine};
    use crate::{
        engine::Engine, evaluation::strength, Board, Color, Move, MoveChain, Piece, RulesEngine,
    };
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    /// plain minimax without any pruning
    fn minimax(rules: &RulesEngine, computer: Color, ply: u32, depth: u32, maximize: bool) -> i32 {
        if ply > depth || rules.is_game_over() {
            return strength(rules.board(), computer);
        }
        let values = rules.find_all_legal_moves().into_iter().map(|chain| {
            let mut next = rules.clone();
            next.apply_move_chain(&chain).unwrap();
            minimax(&next, computer, ply + 1, depth, !maximize)
        });
        if maximize {
            values.max().unwrap()
        } else {
            values.min().unwrap()
        }
    }

    fn full_search(rules: &RulesEngine, depth: u32) -> (Option<MoveChain>, i32) {
        let computer = rules.current_player();
        let mut best = (None, i32::MIN);
        for chain in rules.find_all_legal_moves() {
            let mut next = rules.clone();
            next.apply_move_chain(&chain).unwrap();
            let value = minimax(&next, computer, 1, depth, false);
            if value > best.1 {
                best = (Some(chain), value);
            }
        }
        best
    }

    fn assert_same_as_full_search(rules: &RulesEngine, depth: u32) {
        let result = search_to_depth(rules, depth).unwrap();
        let (best_move, score) = full_search(rules, depth);
        assert_eq!(result.score, score, "score at depth {depth}");
        assert_eq!(result.best_move, best_move, "move at depth {depth}");
    }

    #[test]
    fn pruning_keeps_the_minimax_value_at_the_start() {
        let rules = RulesEngine::new();
        for depth in 0..=3 {
            assert_same_as_full_search(&rules, depth);
        }
    }

    #[test]
    fn pruning_keeps_the_minimax_value_in_random_positions() {
        let mut rng = StdRng::seed_from_u64(123456789);
        for _ in 0..8 {
            let mut rules = RulesEngine::new();
            for _ in 0..12 {
                let moves = rules.find_all_legal_moves();
                let Some(chain) = moves.choose(&mut rng) else {
                    break;
                };
                rules.apply_move_chain(chain).unwrap();
            }
            for depth in 0..=2 {
                assert_same_as_full_search(&rules, depth);
            }
        }
    }

    #[test]
    fn pruning_skips_positions() {
        let rules = RulesEngine::new();
        let mut engine = MinimaxEngine::new_from_rules(rules.clone(), Color::Black).with_depth(3);
        engine.search().unwrap();
        let stats = engine.stats().unwrap();

        let full_tree: u64 = (0..=4).map(|depth| rules.perft(depth)).sum();
        assert!(stats.cutoffs > 0);
        assert!(stats.leaf_evaluations < stats.positions_checked);
        assert!(stats.positions_checked < full_tree);
    }

    fn double_capture_position() -> RulesEngine {
        let board = Board::from_pieces(&[
            (9, Piece::BLACK_MAN),
            (13, Piece::WHITE_MAN),
            (14, Piece::WHITE_MAN),
            (22, Piece::WHITE_MAN),
        ])
        .unwrap();
        RulesEngine::from_board(board, Color::Black)
    }

    #[test]
    fn prefers_the_longer_capture() {
        let rules = double_capture_position();
        let expected = MoveChain::from_moves(vec![Move::new(9, 18), Move::new(18, 25)]);
        assert_eq!(select_move(&rules, 0).unwrap(), expected);
        assert_eq!(select_move(&rules, 1).unwrap(), expected);
        assert_eq!(search_to_depth(&rules, 0).unwrap().score, 11);
        assert_eq!(search_to_depth(&rules, 1).unwrap().score, 6);
    }

    #[test]
    fn no_move_without_legal_moves() {
        let board = Board::from_pieces(&[
            (24, Piece::BLACK_MAN),
            (28, Piece::WHITE_MAN),
            (29, Piece::WHITE_MAN),
        ])
        .unwrap();
        let rules = RulesEngine::from_board(board, Color::Black);
        assert_eq!(select_move(&rules, 2).unwrap(), None);
    }

    #[test]
    fn engine_plays_legal_moves() {
        let mut black = MinimaxEngine::new_from_rules(RulesEngine::new(), Color::Black);
        assert_eq!(black.depth(), super::DEFAULT_DEPTH);
        assert!(black.best_move().is_none());

        black.search().unwrap();
        let chain = black.best_move().cloned().unwrap();
        assert!(black.rules().is_legal_turn(&chain));

        black.accept_move(&chain).unwrap();
        assert!(black.best_move().is_none());
        assert_eq!(black.rules().current_player(), Color::White);
        assert!(black.search().is_err());
    }

    #[test]
    fn search_to_depth_reports_score() {
        let mut engine =
            MinimaxEngine::new_from_rules(double_capture_position(), Color::Black);
        let (best_move, score) = engine.search_to_depth(0).unwrap();
        assert_eq!(best_move.map(|c| c.end()), Some(25));
        assert_eq!(score, 11);
        assert_eq!(engine.current_score(), 11);
    }
}
