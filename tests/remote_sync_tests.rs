//! Two full sessions synchronized through the in-memory store: every guess
//! one side makes must be reproduced on the other side by snapshot
//! inference alone.

use std::sync::Arc;
use std::time::Duration;

use wordship::{
    Board, GridCell, GuessOutcome, MemoryStore, MemoryWordBank, OpponentEvent, OpponentSetupData,
    PlayerId, Session, SessionId, TimingConfig, WordPlacement,
};

fn cat_board() -> Board {
    let placements = vec![WordPlacement::new("cat", 6, 0, 0, 0, 1).unwrap()];
    Board::new(6, placements).unwrap()
}

fn setup_for(name: &str, board: &Board) -> OpponentSetupData {
    OpponentSetupData {
        display_name: name.into(),
        color: (120, 120, 220),
        grid_size: board.size(),
        word_count: board.placements().len(),
        difficulty: 0.5,
        word_lengths: board.placements().iter().map(|p| p.len()).collect(),
        placements: board.placements().to_vec(),
    }
}

async fn connect_pair(store: Arc<MemoryStore>) -> (Session, Session) {
    let timing = TimingConfig {
        poll_interval: Duration::from_millis(5),
        ..TimingConfig::default()
    };
    let bank = Arc::new(MemoryWordBank::new(["cat", "cot"]));
    let session_id = SessionId::new("sync-test");

    let board_one = cat_board();
    let setup_one = setup_for("one", &board_one);
    let board_two = cat_board();
    let setup_two = setup_for("two", &board_two);

    let one = Session::connect_remote(
        board_one,
        &setup_one,
        PlayerId::One,
        session_id.clone(),
        Arc::clone(&store) as Arc<dyn wordship::RemoteStore>,
        Arc::clone(&bank) as Arc<dyn wordship::WordBank>,
        timing.clone(),
    );
    let two = Session::connect_remote(
        board_two,
        &setup_two,
        PlayerId::Two,
        session_id,
        store,
        bank,
        timing,
    );
    let (one, two) = tokio::join!(one, two);
    (one.unwrap(), two.unwrap())
}

#[tokio::test(flavor = "multi_thread")]
async fn guesses_replicate_through_snapshot_inference() {
    let store = Arc::new(MemoryStore::new());
    let (mut one, mut two) = connect_pair(store).await;

    // Round 1: One guesses a letter that hits; Two must infer it.
    let (outcome, events) = tokio::join!(one.play_letter('C'), two.run_opponent_turn());
    assert_eq!(outcome.unwrap(), GuessOutcome::Hit);
    let events = events.unwrap();
    assert!(events.contains(&OpponentEvent::LetterGuessed('C')));
    assert!(two
        .engine()
        .guess_state(PlayerId::One)
        .known_letters
        .contains(&'C'));
    assert!(two.can_take_action(PlayerId::Two));

    // Round 2: Two misses with a letter; One sees only the miss count.
    let (outcome, events) = tokio::join!(two.play_letter('Z'), one.run_opponent_turn());
    assert_eq!(outcome.unwrap(), GuessOutcome::Miss);
    let events = events.unwrap();
    assert!(!events
        .iter()
        .any(|e| matches!(e, OpponentEvent::LetterGuessed(_))));
    assert_eq!(one.engine().guess_state(PlayerId::Two).miss_count, 1);

    // Round 3: One probes the C cell; Two must infer the coordinate.
    let (outcome, events) = tokio::join!(one.play_coordinate(0, 0), two.run_opponent_turn());
    assert_eq!(outcome.unwrap(), GuessOutcome::Hit);
    assert!(events
        .unwrap()
        .contains(&OpponentEvent::CoordinateGuessed { row: 0, col: 0 }));
    assert!(two
        .engine()
        .guess_state(PlayerId::One)
        .guessed_coords
        .contains(&(0, 0)));
    // The letter was already known, so Two's own board shows it revealed.
    assert_eq!(
        two.engine().board(PlayerId::Two).cell(0, 0).unwrap(),
        GridCell::Revealed
    );

    // Rounds 4-7: Two burns turns while One learns the remaining letters.
    let (_, ev) = tokio::join!(two.play_coordinate(5, 5), one.run_opponent_turn());
    ev.unwrap();
    let (outcome, ev) = tokio::join!(one.play_letter('A'), two.run_opponent_turn());
    assert_eq!(outcome.unwrap(), GuessOutcome::Hit);
    ev.unwrap();
    let (_, ev) = tokio::join!(two.play_coordinate(5, 4), one.run_opponent_turn());
    ev.unwrap();
    let (outcome, ev) = tokio::join!(one.play_letter('T'), two.run_opponent_turn());
    assert_eq!(outcome.unwrap(), GuessOutcome::Hit);
    ev.unwrap();
    let (_, ev) = tokio::join!(two.play_coordinate(5, 3), one.run_opponent_turn());
    ev.unwrap();

    // Round 8: all letters were already known, so One's word solve grows
    // only the solved-row array and Two receives it as a word event with
    // the text withheld.
    let (outcome, events) = tokio::join!(one.play_word("cat", 0), two.run_opponent_turn());
    assert_eq!(outcome.unwrap(), GuessOutcome::Hit);
    let events = events.unwrap();
    assert!(events.contains(&OpponentEvent::WordGuessed {
        pattern_index: 0,
        text: None
    }));
    assert!(two
        .engine()
        .guess_state(PlayerId::One)
        .solved_rows
        .contains(&0));

    one.shutdown();
    two.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn engines_agree_after_interleaved_rounds() {
    let store = Arc::new(MemoryStore::new());
    let (mut one, mut two) = connect_pair(store).await;

    // All hits: missed letters and coordinates are silent by design and
    // only their count replicates, so agreement is asserted on hits.
    let (_, ev) = tokio::join!(one.play_letter('A'), two.run_opponent_turn());
    ev.unwrap();
    let (_, ev) = tokio::join!(two.play_letter('C'), one.run_opponent_turn());
    ev.unwrap();
    let (_, ev) = tokio::join!(one.play_coordinate(0, 1), two.run_opponent_turn());
    ev.unwrap();
    let (_, ev) = tokio::join!(two.play_coordinate(0, 0), one.run_opponent_turn());
    ev.unwrap();

    // Each side's authoritative view of its own progress must match the
    // other side's inferred mirror.
    for side in [PlayerId::One, PlayerId::Two] {
        let own = one.engine().guess_state(side);
        let mirrored = two.engine().guess_state(side);
        assert_eq!(own.known_letters, mirrored.known_letters, "{side:?}");
        assert_eq!(own.guessed_coords, mirrored.guessed_coords, "{side:?}");
        assert_eq!(own.miss_count, mirrored.miss_count, "{side:?}");
        assert_eq!(own.solved_rows, mirrored.solved_rows, "{side:?}");
    }

    one.shutdown();
    two.shutdown();
}
