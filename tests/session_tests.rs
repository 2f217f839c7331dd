use std::sync::Arc;
use std::time::{Duration, SystemTime};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::time::{advance, Instant};

use wordship::{
    Board, DensityHeuristic, GameEngine, GameplaySnapshot, MemoryStore, MemoryWordBank,
    OpponentEvent, OpponentSetupData, PlayerId, RemoteStore, Session, SessionId, SessionOutcome,
    SkillConfig, TimingConfig, WordPlacement,
};

fn cat_board() -> Board {
    let placements = vec![WordPlacement::new("cat", 6, 0, 0, 0, 1).unwrap()];
    Board::new(6, placements).unwrap()
}

fn setup_for(name: &str, board: &Board) -> OpponentSetupData {
    OpponentSetupData {
        display_name: name.into(),
        color: (200, 80, 80),
        grid_size: board.size(),
        word_count: board.placements().len(),
        difficulty: 0.5,
        word_lengths: board.placements().iter().map(|p| p.len()).collect(),
        placements: board.placements().to_vec(),
    }
}

fn bank() -> Arc<MemoryWordBank> {
    Arc::new(MemoryWordBank::new(["cat", "cot", "tar"]))
}

/// Remote session for `local`, with the other side's setup already in the
/// store as if that player had connected first.
async fn remote_session(local: PlayerId, store: Arc<MemoryStore>) -> Session {
    let session_id = SessionId::new("test-session");
    let remote_board = cat_board();
    store
        .push_setup(
            &session_id,
            local.other(),
            &setup_for("remote", &remote_board),
        )
        .await
        .unwrap();

    let local_board = cat_board();
    let local_setup = setup_for("local", &local_board);
    Session::connect_remote(
        local_board,
        &local_setup,
        local,
        session_id,
        store,
        bank(),
        TimingConfig::default(),
    )
    .await
    .unwrap()
}

fn single_player_session() -> Session {
    let engine = GameEngine::new(
        [cat_board(), cat_board()],
        [10, 10],
        PlayerId::One,
        bank(),
    );
    Session::single_player(
        engine,
        PlayerId::One,
        0.7,
        bank(),
        Arc::new(DensityHeuristic),
        SkillConfig::default(),
        TimingConfig::default(),
        SmallRng::seed_from_u64(7),
    )
}

#[tokio::test(start_paused = true)]
async fn grace_period_expiry_forfeits_opponent() {
    let store = Arc::new(MemoryStore::new());
    let mut session = remote_session(PlayerId::One, store).await;

    session.mark_disconnected(Instant::now());
    advance(Duration::from_secs(30)).await;
    assert_eq!(session.check_forfeit(Instant::now()), None);

    advance(Duration::from_secs(31)).await;
    assert_eq!(
        session.check_forfeit(Instant::now()),
        Some(SessionOutcome::OpponentForfeit)
    );
    assert!(!session.can_take_action(PlayerId::One));
}

#[tokio::test(start_paused = true)]
async fn reconnect_within_grace_cancels_forfeit() {
    let store = Arc::new(MemoryStore::new());
    let mut session = remote_session(PlayerId::One, store).await;

    session.mark_disconnected(Instant::now());
    advance(Duration::from_secs(30)).await;
    session.mark_reconnected();

    advance(Duration::from_secs(120)).await;
    assert_eq!(session.check_forfeit(Instant::now()), None);
    assert!(session.can_take_action(PlayerId::One));
}

#[tokio::test(start_paused = true)]
async fn disconnect_and_reconnect_surface_as_events() {
    let store = Arc::new(MemoryStore::new());
    // Local player Two waits for remote One's first move.
    let session = remote_session(PlayerId::Two, Arc::clone(&store)).await;

    store.set_offline(true);
    let handle = tokio::spawn(async move {
        let mut session = session;
        let events = session.run_opponent_turn().await.unwrap();
        (session, events)
    });

    // Outage for 30s, then the remote move lands.
    tokio::time::sleep(Duration::from_secs(30)).await;
    store.set_offline(false);
    let remote_move = GameplaySnapshot {
        known_letters: vec!['C'],
        revealed_cells: Vec::new(),
        solved_rows: Vec::new(),
        miss_count: 0,
        miss_limit: 20,
        turn_holder: PlayerId::Two,
        turn_counter: 1,
    };
    store
        .push_snapshot(&SessionId::new("test-session"), PlayerId::One, &remote_move)
        .await
        .unwrap();

    let (mut session, events) = handle.await.unwrap();
    assert!(events.contains(&OpponentEvent::Disconnected));
    assert!(events.contains(&OpponentEvent::Reconnected));
    assert!(events.contains(&OpponentEvent::LetterGuessed('C')));
    assert_eq!(events.last(), Some(&OpponentEvent::ThinkingComplete));

    // The reconnect cancelled the pending forfeit.
    assert_eq!(session.check_forfeit(Instant::now()), None);
    assert!(session.can_take_action(PlayerId::Two));
    // And the inferred guess reached the engine.
    assert!(session
        .engine()
        .guess_state(PlayerId::One)
        .known_letters
        .contains(&'C'));
}

#[tokio::test(start_paused = true)]
async fn wait_ceiling_reports_timeout_and_forfeits() {
    let store = Arc::new(MemoryStore::new());
    let mut session = remote_session(PlayerId::Two, store).await;

    let events = session.run_opponent_turn().await.unwrap();
    assert!(events.contains(&OpponentEvent::WaitTimedOut));
    assert_eq!(session.outcome(), Some(SessionOutcome::OpponentForfeit));
}

#[tokio::test(start_paused = true)]
async fn single_player_turn_cycle() {
    let mut session = single_player_session();
    assert!(session.can_take_action(PlayerId::One));

    session.play_letter('C').await.unwrap();
    assert!(!session.can_take_action(PlayerId::One));

    let events = session.run_opponent_turn().await.unwrap();
    assert_eq!(events.first(), Some(&OpponentEvent::ThinkingStarted));
    assert_eq!(events.last(), Some(&OpponentEvent::ThinkingComplete));
    // One guess event in between.
    assert!(events.len() >= 3);
    assert!(session.can_take_action(PlayerId::One));
}

#[tokio::test]
async fn inactivity_checked_against_persisted_timestamp() {
    let session = single_player_session();
    let last_activity = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);

    // Default timeout is 10 minutes.
    assert!(!session.check_inactivity(last_activity, last_activity + Duration::from_secs(599)));
    assert!(session.check_inactivity(last_activity, last_activity + Duration::from_secs(600)));
    // A clock that went backwards never times out.
    assert!(!session.check_inactivity(last_activity, last_activity - Duration::from_secs(1)));
}

#[tokio::test]
async fn declared_forfeit_is_terminal() {
    let mut session = single_player_session();
    session.declare_forfeit(PlayerId::One);
    assert_eq!(session.outcome(), Some(SessionOutcome::LocalForfeit));
    assert!(!session.can_take_action(PlayerId::One));
}

#[tokio::test(start_paused = true)]
async fn rematch_reset_clears_outcome_and_timers() {
    let mut session = single_player_session();
    session.play_letter('C').await.unwrap();
    session.mark_disconnected(Instant::now());
    session.declare_forfeit(PlayerId::Two);
    assert!(session.outcome().is_some());

    session.reset([8, 8], PlayerId::One).await.unwrap();
    assert_eq!(session.outcome(), None);
    assert_eq!(session.check_forfeit(Instant::now()), None);
    assert!(session.can_take_action(PlayerId::One));
    assert_eq!(
        session.engine().guess_state(PlayerId::One).miss_limit,
        8
    );
}
