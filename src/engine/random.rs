use anyhow::{bail, Context};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use super::Engine;
use crate::{evaluation, Color, MoveChain, Result, RulesEngine};

/// Plays a uniformly random legal move.
pub struct RandomEngine {
    rules: RulesEngine,
    color: Color,
    rng: StdRng,
    best_move: Option<MoveChain>,
}

impl RandomEngine {
    /// a reproducible engine, every seed always plays the same game
    pub fn with_seed(rules: RulesEngine, color: Color, seed: u64) -> Self {
        RandomEngine {
            rules,
            color,
            rng: StdRng::seed_from_u64(seed),
            best_move: None,
        }
    }
}

impl Engine for RandomEngine {
    fn new_from_rules(rules: RulesEngine, color: Color) -> Self {
        RandomEngine {
            rules,
            color,
            rng: StdRng::from_entropy(),
            best_move: None,
        }
    }

    fn color(&self) -> Color {
        self.color
    }

    fn accept_move(&mut self, chain: &MoveChain) -> Result<()> {
        self.rules
            .apply_move_chain(chain)
            .with_context(|| format!("accept move {chain}"))?;
        self.best_move = None;
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
        let moves = self.rules.find_all_legal_moves();
        self.best_move = moves.choose(&mut self.rng).cloned();
        Ok(())
    }

    fn best_move(&self) -> Option<&MoveChain> {
        self.best_move.as_ref()
    }

    fn current_score(&self) -> i32 {
        evaluation::strength(self.rules.board(), self.color)
    }
}

#[cfg(test)]
mod test {
    use super::RandomEngine;
    use crate::{engine::Engine, Color, RulesEngine};

    #[test]
    fn same_seed_same_moves() {
        let mut first = RandomEngine::with_seed(RulesEngine::new(), Color::Black, 7);
        let mut second = RandomEngine::with_seed(RulesEngine::new(), Color::Black, 7);
        first.search().unwrap();
        second.search().unwrap();
        assert_eq!(first.best_move(), second.best_move());

        let chain = first.best_move().cloned().unwrap();
        assert!(RulesEngine::new().is_legal_turn(&chain));
    }

    #[test]
    fn only_searches_on_its_turn() {
        let mut engine = RandomEngine::new_from_rules(RulesEngine::new(), Color::White);
        assert!(engine.search().is_err());
        assert_eq!(engine.current_score(), 0);
    }
}
