use checkers::{
    engine::{minimax::MinimaxEngine, random::RandomEngine, Engine},
    rules::HopKind,
    Color, GameStatus, Piece, RulesEngine,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

const MAX_TURNS: usize = 200;

fn check_invariants(rules: &RulesEngine) {
    let board = rules.board();
    for color in Color::ALL_COLORS {
        let counted = board.pieces(color).count();
        assert_eq!(rules.piece_count(color) as usize, counted, "{color}\n{board}");
    }

    // men are crowned as soon as they reach the last row
    for (pos, piece) in board.occupied() {
        if piece == Piece::WHITE_MAN {
            assert!(pos >= 4, "white man on {pos}\n{board}");
        }
        if piece == Piece::BLACK_MAN {
            assert!(pos <= 27, "black man on {pos}\n{board}");
        }
    }

    let moves = rules.find_all_legal_moves();
    let no_pieces = Color::ALL_COLORS
        .iter()
        .any(|&color| rules.piece_count(color) == 0);
    assert_eq!(rules.is_game_over(), no_pieces || moves.is_empty());

    let captures = moves
        .iter()
        .filter(|chain| matches!(rules.classify_hop(chain[0].from, chain[0].to), Some(HopKind::Capture(_))))
        .count();
    assert!(captures == 0 || captures == moves.len(), "captures are mandatory\n{board}");
    assert_eq!(captures > 0, rules.can_current_player_attack());

    for chain in &moves {
        assert!(rules.is_valid_move(chain.start(), chain[0].to), "{chain}");
        let mut next = rules.clone();
        next.apply_move_chain(chain).unwrap();
        assert_eq!(next.current_player(), !rules.current_player());

        let before = rules.piece_count(!rules.current_player());
        let after = next.piece_count(!rules.current_player());
        if captures > 0 {
            assert_eq!(before - after, chain.len() as u8, "{chain}\n{board}");
        } else {
            assert_eq!(before, after);
        }
    }
}

fn play_random_game(seed: u64) -> RulesEngine {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rules = RulesEngine::new();
    for _ in 0..MAX_TURNS {
        check_invariants(&rules);
        let moves = rules.find_all_legal_moves();
        let Some(chain) = moves.choose(&mut rng) else {
            break;
        };
        rules.apply_move_chain(chain).unwrap();
    }
    rules
}

#[test]
fn random_games_keep_the_rules() {
    for seed in 0..20 {
        let rules = play_random_game(seed);
        if let GameStatus::GameOver { winner } = rules.status() {
            assert_eq!(rules.winner(), winner);
            assert!(rules.find_all_legal_moves().is_empty() || rules.piece_count(!winner) == 0);
        }
    }
}

#[test]
fn random_games_are_reproducible() {
    assert_eq!(play_random_game(42), play_random_game(42));
}

#[test]
fn minimax_against_random() {
    let rules = RulesEngine::new();
    let mut black = MinimaxEngine::new_from_rules(rules.clone(), Color::Black).with_depth(2);
    let mut white = RandomEngine::with_seed(rules.clone(), Color::White, 3);
    let mut rules = rules;

    for _ in 0..MAX_TURNS {
        if rules.is_game_over() {
            break;
        }
        let chain = if rules.current_player() == Color::Black {
            black.search().unwrap();
            black.best_move().cloned()
        } else {
            white.search().unwrap();
            white.best_move().cloned()
        }
        .unwrap();

        assert!(rules.is_legal_turn(&chain), "{chain}");
        rules.apply_move_chain(&chain).unwrap();
        black.accept_move(&chain).unwrap();
        white.accept_move(&chain).unwrap();
        assert_eq!(black.rules(), &rules);
    }
}
