use wordship::{
    DetectedAction, DetectorState, GameplaySnapshot, PlayerId, RevealedCell, TurnChangeDetector,
};

fn snapshot(
    revealed: usize,
    letters: usize,
    solved: usize,
    misses: u32,
    turn_holder: PlayerId,
    turn_counter: u64,
) -> GameplaySnapshot {
    GameplaySnapshot {
        known_letters: ('A'..='Z').take(letters).collect(),
        revealed_cells: (0..revealed)
            .map(|i| RevealedCell {
                row: i as u8,
                col: i as u8,
                hit: true,
                letter: None,
            })
            .collect(),
        solved_rows: (0..solved).collect(),
        miss_count: misses,
        miss_limit: 12,
        turn_holder,
        turn_counter,
    }
}

#[test]
fn coordinate_growth_outranks_simultaneous_letter_growth() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    detector.observe(&snapshot(2, 3, 0, 1, PlayerId::Two, 4));
    detector.begin_wait();

    let actions = detector.observe(&snapshot(3, 4, 0, 1, PlayerId::Two, 4));
    assert_eq!(actions.len(), 1);
    assert!(matches!(
        actions[0],
        DetectedAction::CoordinateGuessed(RevealedCell { row: 2, col: 2, .. })
    ));
}

#[test]
fn letter_growth_reported_with_tail_element() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    detector.observe(&snapshot(1, 1, 0, 0, PlayerId::Two, 2));
    detector.begin_wait();

    let actions = detector.observe(&snapshot(1, 2, 0, 0, PlayerId::Two, 2));
    assert_eq!(actions, vec![DetectedAction::LetterGuessed('B')]);
}

#[test]
fn letter_growth_absorbs_word_solve_in_same_cycle() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    detector.observe(&snapshot(0, 1, 0, 0, PlayerId::Two, 2));
    detector.begin_wait();

    // A word guess that also taught new letters: only the letter signal
    // fires; the solved row is absorbed.
    let actions = detector.observe(&snapshot(0, 3, 1, 0, PlayerId::Two, 2));
    assert_eq!(actions, vec![DetectedAction::LetterGuessed('C')]);
}

#[test]
fn word_solve_reported_when_letters_unchanged() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    detector.observe(&snapshot(0, 3, 0, 0, PlayerId::Two, 2));
    detector.begin_wait();

    let actions = detector.observe(&snapshot(0, 3, 1, 0, PlayerId::Two, 2));
    assert_eq!(actions, vec![DetectedAction::WordSolved { pattern_index: 0 }]);
}

#[test]
fn miss_growth_is_silent() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    detector.observe(&snapshot(1, 1, 0, 0, PlayerId::Two, 2));
    detector.begin_wait();

    let actions = detector.observe(&snapshot(1, 1, 0, 1, PlayerId::Two, 2));
    assert_eq!(actions, vec![DetectedAction::SilentMiss { miss_count: 1 }]);
}

#[test]
fn turn_handoff_detected_independently_of_diffs() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    detector.observe(&snapshot(1, 1, 0, 0, PlayerId::Two, 2));
    detector.begin_wait();
    assert_eq!(detector.state(), DetectorState::WaitingForOpponentTurn);

    // No array changed, only the marker flipped.
    let actions = detector.observe(&snapshot(1, 1, 0, 0, PlayerId::One, 3));
    assert_eq!(actions, vec![DetectedAction::TurnPassedToLocal]);
    assert_eq!(detector.state(), DetectorState::Idle);
}

#[test]
fn guess_and_handoff_in_one_cycle() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    detector.observe(&snapshot(0, 0, 0, 0, PlayerId::Two, 0));
    detector.begin_wait();

    let actions = detector.observe(&snapshot(1, 0, 0, 0, PlayerId::One, 1));
    assert_eq!(actions.len(), 2);
    assert!(matches!(actions[0], DetectedAction::CoordinateGuessed(_)));
    assert_eq!(actions[1], DetectedAction::TurnPassedToLocal);
}

#[test]
fn idle_detector_emits_nothing() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    detector.observe(&snapshot(0, 0, 0, 0, PlayerId::Two, 0));
    let actions = detector.observe(&snapshot(3, 2, 1, 2, PlayerId::Two, 0));
    assert!(actions.is_empty());
}

#[test]
fn stale_local_marker_does_not_rehandoff() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    // The remote document still shows our turn from its last push.
    detector.observe(&snapshot(1, 1, 0, 0, PlayerId::One, 1));
    detector.begin_wait();

    let actions = detector.observe(&snapshot(1, 1, 0, 0, PlayerId::One, 1));
    assert!(actions.is_empty());
    assert_eq!(detector.state(), DetectorState::WaitingForOpponentTurn);

    // A fresh push with a new counter is a real handoff.
    let actions = detector.observe(&snapshot(2, 1, 0, 0, PlayerId::One, 3));
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[1], DetectedAction::TurnPassedToLocal);
}

#[test]
fn missing_baseline_diffs_against_empty_document() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    detector.begin_wait();

    let actions = detector.observe(&snapshot(0, 1, 0, 0, PlayerId::Two, 1));
    assert_eq!(actions, vec![DetectedAction::LetterGuessed('A')]);
}

#[test]
fn reset_forgets_history() {
    let mut detector = TurnChangeDetector::new(PlayerId::One);
    detector.observe(&snapshot(2, 2, 0, 1, PlayerId::Two, 4));
    detector.reset();
    assert_eq!(detector.state(), DetectorState::Idle);
    detector.begin_wait();

    // After reset the next snapshot diffs against empty again.
    let actions = detector.observe(&snapshot(1, 0, 0, 0, PlayerId::Two, 0));
    assert!(matches!(actions[0], DetectedAction::CoordinateGuessed(_)));
}
