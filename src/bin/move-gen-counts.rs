use std::time::Instant;

use checkers::engine::minimax::MinimaxEngine;
use checkers::engine::Engine;
use checkers::{Color, RulesEngine};

fn main() {
    for depth in 1..=6 {
        perft(depth);
    }

    search_stats(1);
    search_stats(3);
    search_stats(5);
    search_stats(6);
}

fn perft(depth: u32) {
    let rules = RulesEngine::new();

    let start = Instant::now();
    let count = rules.perft(depth);
    let elapsed = start.elapsed();

    println!("perft {depth}: {count} move chains in {elapsed:?}");
}

fn search_stats(depth: u32) {
    let mut engine = MinimaxEngine::new_from_rules(RulesEngine::new(), Color::Black);

    let start = Instant::now();
    let (best_move, score) = match engine.search_to_depth(depth) {
        Ok(result) => result,
        Err(e) => {
            println!("Search to depth {depth} failed: {e:#}");
            return;
        }
    };
    let elapsed = start.elapsed();

    let best_move = best_move.map_or_else(|| "none".to_string(), |chain| chain.to_string());
    println!(
        "Stats after searching to depth {depth} from start pos:\ntime: {elapsed:?}\nbest move: {best_move} (score {score})\n{:#?}",
        engine.stats()
    );
}
