use crate::{Color, MoveChain, Result, RulesEngine};

pub trait Engine {
    /// creates a new engine playing `color` in the given position
    fn new_from_rules(rules: RulesEngine, color: Color) -> Self;

    /// the side this engine plays
    fn color(&self) -> Color;

    /// advance the position by `chain`
    fn accept_move(&mut self, chain: &MoveChain) -> Result<()>;

    /// search for the best move. Fails if it is not this engine's turn.
    fn search(&mut self) -> Result<()>;

    /// returns the best move the engine found or `None`.
    /// After [Engine::search] this is only `None` if there is no legal move.
    fn best_move(&self) -> Option<&MoveChain>;

    /// returns the calculated score for the current position
    fn current_score(&self) -> i32;
}

pub mod minimax;
pub mod random;
