use std::sync::Arc;

use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use wordship::strategy::{
    CoordinateStrategy, GuessKind, LetterStrategy, Recommendation, StrategyView, WordStrategy,
};
use wordship::{
    init_logging, miss_limit, Board, DensityHeuristic, GameEngine, GameStatus, GuessOutcome,
    MemoryStore, MemoryWordBank, OpponentSetupData, PlayerId, SessionId, Session, SkillConfig,
    TimingConfig, WordBank,
};

/// Demo word list; real deployments load their own bank.
const WORDS: &[&str] = &[
    "CAT", "DOG", "SUN", "MAP", "OAK", "FOX", "ICE", "GEM", "TREE", "STAR", "MOON", "FISH",
    "LAMP", "ROAD", "WIND", "SAND", "STONE", "RIVER", "CLOUD", "PLANT", "TIGER", "HORSE",
    "LIGHT", "BREAD", "FOREST", "GARDEN", "SILVER", "WINTER",
];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Run a computer-vs-computer game on the local machine.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 0.7)]
        skill: f64,
        #[arg(long, default_value_t = 10)]
        grid_size: u8,
    },
    /// Run both sides of a remote game through the in-memory store.
    RemoteDemo {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 0.7)]
        skill: f64,
        #[arg(long, default_value_t = 10)]
        grid_size: u8,
    },
}

fn seeded_rng(seed: Option<u64>, salt: u64) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s.wrapping_add(salt)),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

/// Strategy arbitration used to drive a demo player: word recommendation
/// first (it gates itself), then the more confident of letter/coordinate.
fn decide(
    bank: &dyn WordBank,
    heuristic: &DensityHeuristic,
    config: &SkillConfig,
    view: &StrategyView,
    rng: &mut SmallRng,
) -> Option<Recommendation> {
    let word = WordStrategy { bank, config }.recommend(view, rng);
    if word.is_some() {
        return word;
    }
    let letter = LetterStrategy { bank, config }.recommend(view, rng);
    let coordinate = CoordinateStrategy { heuristic, config }.recommend(view, rng);
    match (letter, coordinate) {
        (Some(l), Some(c)) => Some(if l.confidence >= c.confidence { l } else { c }),
        (l, c) => l.or(c),
    }
}

fn pick_words<'a>(rng: &mut SmallRng, count: usize) -> Vec<&'a str> {
    let mut picked = Vec::new();
    while picked.len() < count {
        let w = WORDS[rng.random_range(0..WORDS.len())];
        if !picked.contains(&w) {
            picked.push(w);
        }
    }
    picked
}

fn run_local(seed: Option<u64>, skill: f64, grid_size: u8) -> anyhow::Result<()> {
    let bank: Arc<dyn WordBank> = Arc::new(MemoryWordBank::new(WORDS.iter().copied()));
    let heuristic = DensityHeuristic;
    let config = SkillConfig::default();

    let mut rng = seeded_rng(seed, 0);
    let words_one = pick_words(&mut rng, 4);
    let words_two = pick_words(&mut rng, 4);
    let boards = [
        Board::random(&mut rng, grid_size, &words_one)
            .map_err(|e| anyhow::anyhow!("player one layout: {e}"))?,
        Board::random(&mut rng, grid_size, &words_two)
            .map_err(|e| anyhow::anyhow!("player two layout: {e}"))?,
    ];
    let limit = miss_limit(skill, 4);
    let mut engine = GameEngine::new(boards, [limit, limit], PlayerId::One, Arc::clone(&bank));

    let mut turns = 0u32;
    let winner = loop {
        let mover = engine.turn_holder();
        let view = engine.strategy_view(mover, skill);
        let Some(rec) = decide(bank.as_ref(), &heuristic, &config, &view, &mut rng) else {
            // Nothing recommendable means the mover has cleared the board.
            break mover;
        };
        let outcome = match &rec.kind {
            GuessKind::Letter(letter) => engine.process_letter(mover, *letter)?,
            GuessKind::Coordinate { row, col } => engine.process_coordinate(mover, *row, *col)?,
            GuessKind::Word {
                text,
                pattern_index,
            } => engine.process_word(mover, text, *pattern_index)?,
        };
        log::debug!(
            "{:?} guessed {:?} -> {:?} (confidence {:.2})",
            mover,
            rec.kind,
            outcome,
            rec.confidence
        );
        match engine.status(mover) {
            GameStatus::Lost => break mover.other(),
            GameStatus::Won => break mover,
            GameStatus::InProgress => {}
        }
        if matches!(outcome, GuessOutcome::Hit | GuessOutcome::Miss) {
            engine.advance_turn();
            turns += 1;
        }
    };

    println!(
        "{:?} wins after {} turns ({} / {} misses)",
        winner,
        turns,
        engine.guess_state(PlayerId::One).miss_count,
        engine.guess_state(PlayerId::Two).miss_count,
    );
    Ok(())
}

async fn run_remote_side(
    local: PlayerId,
    seed: Option<u64>,
    skill: f64,
    grid_size: u8,
    store: Arc<MemoryStore>,
) -> anyhow::Result<GameStatus> {
    let bank: Arc<dyn WordBank> = Arc::new(MemoryWordBank::new(WORDS.iter().copied()));
    let heuristic = DensityHeuristic;
    let config = SkillConfig::default();
    let mut rng = seeded_rng(seed, local.index() as u64);

    let words = pick_words(&mut rng, 3);
    let board = Board::random(&mut rng, grid_size, &words)
        .map_err(|e| anyhow::anyhow!("{:?} layout: {e}", local))?;
    let setup = OpponentSetupData {
        display_name: format!("demo-{:?}", local),
        color: if local == PlayerId::One {
            (219, 84, 97)
        } else {
            (84, 130, 219)
        },
        grid_size,
        word_count: words.len(),
        difficulty: skill,
        word_lengths: words.iter().map(|w| w.len()).collect(),
        placements: board.placements().to_vec(),
    };

    let timing = TimingConfig {
        poll_interval: std::time::Duration::from_millis(20),
        thinking_delay: std::time::Duration::ZERO,
        ..TimingConfig::default()
    };
    let mut session = Session::connect_remote(
        board,
        &setup,
        local,
        SessionId::new("remote-demo"),
        store,
        Arc::clone(&bank),
        timing,
    )
    .await?;

    loop {
        if session.outcome().is_some() {
            break;
        }
        if session.can_take_action(local) {
            let view = session.engine().strategy_view(local, skill);
            match decide(bank.as_ref(), &heuristic, &config, &view, &mut rng) {
                Some(rec) => {
                    match rec.kind {
                        GuessKind::Letter(letter) => {
                            session.play_letter(letter).await?;
                        }
                        GuessKind::Coordinate { row, col } => {
                            session.play_coordinate(row, col).await?;
                        }
                        GuessKind::Word {
                            text,
                            pattern_index,
                        } => {
                            session.play_word(&text, pattern_index).await?;
                        }
                    };
                }
                None => break,
            }
        } else {
            session.run_opponent_turn().await?;
        }
    }

    let status = session.engine().status(local);
    session.shutdown();
    Ok(status)
}

async fn run_remote_demo(seed: Option<u64>, skill: f64, grid_size: u8) -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let one = run_remote_side(PlayerId::One, seed, skill, grid_size, Arc::clone(&store));
    let two = run_remote_side(PlayerId::Two, seed, skill, grid_size, Arc::clone(&store));
    let (status_one, status_two) = tokio::try_join!(one, two)?;
    println!(
        "player one: {:?}, player two: {:?}",
        status_one, status_two
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Local {
            seed,
            skill,
            grid_size,
        } => run_local(seed, skill, grid_size),
        Commands::RemoteDemo {
            seed,
            skill,
            grid_size,
        } => run_remote_demo(seed, skill, grid_size).await,
    }
}
