use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use checkers::{
    engine::{
        minimax::{MinimaxEngine, DEFAULT_DEPTH},
        Engine,
    },
    turn::{TurnBuilder, TurnProgress},
    Color, GameStatus, Result, RulesEngine,
};

/// self-play games between kings can go on forever
const MAX_SELF_PLAY_TURNS: usize = 300;

fn main() -> Result<()> {
    let settings = GameSettings::from_args(std::env::args().skip(1))?;
    let mut game = Game::new(settings);
    game.run(io::stdin().lock())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GameSettings {
    depth: u32,
    human: Color,
    self_play: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            depth: DEFAULT_DEPTH,
            human: Color::Black,
            self_play: false,
        }
    }
}

impl GameSettings {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut settings = GameSettings::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--depth" => {
                    let value = args.next().context("--depth needs a value")?;
                    settings.depth = value
                        .parse()
                        .with_context(|| format!("invalid depth \"{value}\""))?;
                }
                "--human" => {
                    let value = args.next().context("--human needs a color")?;
                    settings.human = match value.to_lowercase().as_str() {
                        "white" => Color::White,
                        "black" => Color::Black,
                        _ => bail!("invalid color \"{value}\", expected white or black"),
                    };
                }
                "--self-play" => settings.self_play = true,
                _ => bail!("unknown argument \"{arg}\""),
            }
        }
        Ok(settings)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Message {
    /// the selected square followed by every landing square
    Turn(Vec<u8>),
    Undo,
    Moves,
    Restart,
    Quit,
}

impl Message {
    fn parse(line: &str) -> Result<Message> {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "undo" | "u" => return Ok(Message::Undo),
            "moves" | "m" => return Ok(Message::Moves),
            "restart" => return Ok(Message::Restart),
            "quit" | "exit" | "q" => return Ok(Message::Quit),
            _ => {}
        }

        let squares = line
            .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u8>()
                    .with_context(|| format!("\"{s}\" is not a square"))
            })
            .collect::<Result<Vec<_>>>()?;
        if squares.len() < 2 {
            bail!("a turn needs a start square and at least one landing square, e.g. \"9 13\"");
        }
        Ok(Message::Turn(squares))
    }
}

struct Game {
    settings: GameSettings,
    rules: RulesEngine,
    /// positions before every human turn, used by undo
    history: Vec<RulesEngine>,
    turns: usize,
}

impl Game {
    fn new(settings: GameSettings) -> Self {
        Game {
            settings,
            rules: RulesEngine::new(),
            history: Vec::new(),
            turns: 0,
        }
    }

    fn is_computer(&self, color: Color) -> bool {
        self.settings.self_play || color != self.settings.human
    }

    fn run(&mut self, input: impl BufRead) -> Result<()> {
        println!("{}", self.rules.board());
        let mut lines = input.lines();

        loop {
            let color = match self.rules.status() {
                status @ GameStatus::GameOver { .. } => {
                    println!("{status}");
                    return Ok(());
                }
                GameStatus::ToMove(color) => color,
            };

            if self.is_computer(color) {
                if self.settings.self_play && self.turns >= MAX_SELF_PLAY_TURNS {
                    println!("Draw after {} turns", self.turns);
                    return Ok(());
                }
                self.play_computer_turn(color)?;
                continue;
            }

            print!("{color} to move> ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            let line = line.context("failed to read input")?;

            match Message::parse(&line) {
                Ok(Message::Quit) => return Ok(()),
                Ok(message) => {
                    if let Err(e) = self.update(message) {
                        println!("{e:#}");
                    }
                }
                Err(e) => println!("{e:#}"),
            }
        }
    }

    fn update(&mut self, message: Message) -> Result<()> {
        match message {
            Message::Turn(squares) => self.play_human_turn(&squares)?,
            Message::Undo => {
                let previous = self.history.pop().context("nothing to undo")?;
                self.rules = previous;
                println!("{}", self.rules.board());
            }
            Message::Moves => {
                let moves = self.rules.find_all_legal_moves();
                println!(
                    "There are {} possible moves for {}",
                    moves.len(),
                    self.rules.current_player()
                );
                for chain in moves {
                    println!("  {chain}");
                }
            }
            Message::Restart => {
                self.rules = RulesEngine::new();
                self.history.clear();
                self.turns = 0;
                println!("{}", self.rules.board());
            }
            Message::Quit => {}
        }
        Ok(())
    }

    fn play_human_turn(&mut self, squares: &[u8]) -> Result<()> {
        let Some((&start, landings)) = squares.split_first() else {
            bail!("empty turn");
        };

        let mut turn = TurnBuilder::new(&self.rules);
        turn.select(start)?;
        let mut progress = TurnProgress::Continue(start);
        for &to in landings {
            if let TurnProgress::Complete(chain) = &progress {
                bail!("{chain} is already a complete turn");
            }
            progress = turn.hop(to)?;
        }

        match progress {
            TurnProgress::Continue(square) => {
                bail!("the piece on {square} has to keep capturing")
            }
            TurnProgress::Complete(chain) => {
                self.history.push(self.rules.clone());
                self.rules = turn.position().clone();
                self.turns += 1;
                println!("{} played {chain}", !self.rules.current_player());
                println!("{}", self.rules.board());
            }
        }
        Ok(())
    }

    fn play_computer_turn(&mut self, color: Color) -> Result<()> {
        let mut engine =
            MinimaxEngine::new_from_rules(self.rules.clone(), color).with_depth(self.settings.depth);
        engine.search()?;
        let chain = engine
            .best_move()
            .cloned()
            .context("the computer has no legal move")?;

        self.rules
            .apply_move_chain(&chain)
            .with_context(|| format!("computer move {chain} is invalid"))?;
        self.turns += 1;
        println!(
            "{color} played {chain} (score {})",
            engine.current_score()
        );
        println!("{}", self.rules.board());
        Ok(())
    }
}
