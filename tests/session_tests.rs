//! Session scenarios: scoring, leveling, locking and game over

use fallblock::core::{GameSession, Grid, Phase, Piece, SessionConfig, SessionEvent};
use fallblock::types::{GameAction, InputFrame, Orientation, PieceKind};

fn session_with(level: u32, rows: &[&str]) -> GameSession {
    let mut session = GameSession::with_grid(SessionConfig::new(level).with_seed(5), Grid::from_rows(rows));
    session.start();
    session.drain_events().for_each(drop);
    session
}

fn cleared_events(events: &[SessionEvent]) -> Vec<(Vec<u8>, u32)> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::LinesCleared { rows, points } => Some((rows.to_vec(), *points)),
            _ => None,
        })
        .collect()
}

/// Drop the active piece until it locks.
fn drop_to_lock(session: &mut GameSession) -> Vec<SessionEvent> {
    let piece_id = session.piece_id();
    while session.piece_id() == piece_id && !session.is_game_over() {
        session.apply_action(GameAction::SoftDrop);
    }
    session.drain_events().collect()
}

#[test]
fn single_at_level_zero_scores_fifty() {
    let mut session = session_with(0, &["######...."]);
    assert!(session.set_active(Piece::new(PieceKind::I, 7, 1, Orientation::Deg0)));

    let events = drop_to_lock(&mut session);
    assert_eq!(cleared_events(&events), vec![(vec![0], 50)]);
    // line points plus the untouched fall bonus
    assert_eq!(session.score(), 70);
    assert_eq!(session.lines(), 1);
    assert_eq!(session.grid().filled_count(), 0);
}

#[test]
fn double_at_level_three_scores_two_forty() {
    let mut session = session_with(3, &["########..", "########.."]);
    assert!(session.set_active(Piece::new(PieceKind::O, 8, 0, Orientation::Deg0)));

    let events = drop_to_lock(&mut session);
    assert_eq!(cleared_events(&events), vec![(vec![0, 1], 240)]);
    assert_eq!(session.score(), 240 + 20);
    assert_eq!(session.level(), 3);
}

#[test]
fn four_rows_clear_atomically() {
    let mut session = session_with(
        2,
        &[
            "#########.",
            "#########.",
            "#########.",
            "#########.",
            "t.........",
        ],
    );
    assert!(session.set_active(Piece::new(PieceKind::I, 9, 1, Orientation::Deg90)));

    let events = drop_to_lock(&mut session);
    let cleared = cleared_events(&events);
    assert_eq!(cleared, vec![(vec![0, 1, 2, 3], 1200 + 2 * 50)]);
    assert_eq!(session.lines(), 4);
    // the stray cell above the stack fell to the bottom
    assert_eq!(session.grid().get(0, 0), Some(Some(PieceKind::T)));
    assert_eq!(session.grid().filled_count(), 1);
}

#[test]
fn chosen_start_level_never_regresses() {
    let mut session = session_with(
        5,
        &["#########.", "#########.", "#########.", "#########."],
    );
    assert_eq!(session.level(), 5);
    assert_eq!(session.fall_interval_ms(), 500);
    assert!(session.set_active(Piece::new(PieceKind::I, 9, 1, Orientation::Deg90)));
    drop_to_lock(&mut session);
    session.tick(InputFrame::IDLE, 16);
    assert_eq!(session.lines(), 4);
    assert_eq!(session.level(), 5);
}

#[test]
fn lock_above_ceiling_is_game_over_with_grid_untouched() {
    let column: Vec<&str> = (0..20).map(|_| ".....#....").collect();
    let mut session = session_with(0, &column);
    assert!(session.set_active(Piece::spawn(PieceKind::T)));
    let before = session.grid().clone();

    let events = drop_to_lock(&mut session);
    assert!(session.is_game_over());
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.grid(), &before);
    assert!(session.active().is_none());
    assert!(matches!(events.last(), Some(SessionEvent::GameOver { .. })));
    assert!(!events.iter().any(|e| matches!(e, SessionEvent::Landed { .. })));

    // terminal: further ticks and commands change nothing
    let snap = session.snapshot();
    session.tick(InputFrame { down: true, ..InputFrame::IDLE }, 1000);
    assert!(!session.apply_action(GameAction::MoveLeft));
    assert_eq!(session.snapshot(), snap);
    assert_eq!(session.drain_events().count(), 0);
}

#[test]
fn blocked_rotation_keeps_orientation() {
    let mut session = session_with(0, &[".#........"]);
    assert!(session.set_active(Piece::new(PieceKind::T, 1, 1, Orientation::Deg0)));

    assert!(!session.apply_action(GameAction::Rotate));
    assert!(!session.apply_action(GameAction::Rotate));
    assert_eq!(session.active().unwrap().orientation, Orientation::Deg0);
    assert_eq!(session.drain_events().count(), 0);
}

#[test]
fn rotation_above_the_visible_field_succeeds() {
    let mut session = session_with(0, &[]);
    assert!(session.set_active(Piece::spawn(PieceKind::L)));
    assert!(session.apply_action(GameAction::Rotate));
    let events: Vec<_> = session.drain_events().collect();
    assert_eq!(
        events,
        vec![SessionEvent::Rotated {
            orientation: Orientation::Deg90
        }]
    );
}

#[test]
fn o_piece_never_rotates() {
    let mut session = session_with(0, &[]);
    assert!(session.set_active(Piece::spawn(PieceKind::O)));
    assert!(!session.apply_action(GameAction::Rotate));
    assert_eq!(session.active().unwrap().orientation, Orientation::Deg0);
}

#[test]
fn held_left_follows_repeat_schedule() {
    let mut session = session_with(0, &[]);
    assert!(session.set_active(Piece::spawn(PieceKind::T)));
    let left = InputFrame {
        left: true,
        ..InputFrame::IDLE
    };

    let mut cols = Vec::new();
    for _ in 0..14 {
        session.tick(left, 50);
        cols.push(session.active().unwrap().col);
    }
    assert_eq!(cols, vec![4, 4, 4, 4, 4, 4, 4, 3, 3, 3, 2, 2, 2, 1]);
}

#[test]
fn gravity_follows_level_interval() {
    let mut session = session_with(5, &[]);
    assert!(session.set_active(Piece::spawn(PieceKind::T)));
    for _ in 0..4 {
        session.tick(InputFrame::IDLE, 100);
    }
    assert_eq!(session.active().unwrap().row, 20);
    session.tick(InputFrame::IDLE, 100);
    assert_eq!(session.active().unwrap().row, 19);
}

#[test]
fn fall_bonus_decays_while_piece_is_active() {
    let mut session = session_with(0, &[]);
    assert!(session.set_active(Piece::spawn(PieceKind::O)));
    // 1000ms accumulated, then the next tick applies the decay
    for _ in 0..11 {
        session.tick(InputFrame::IDLE, 100);
    }
    assert_eq!(session.fall_bonus(), 18);
}

#[test]
fn preview_becomes_next_piece() {
    let mut session = session_with(0, &[]);
    let preview = session.preview().unwrap();
    let events = drop_to_lock(&mut session);
    assert_eq!(session.active().unwrap().kind, preview);
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::Spawned { kind, .. } if *kind == preview
    )));
}

#[test]
fn held_soft_drop_keeps_gravity_running() {
    let mut session = session_with(15, &[]);
    assert_eq!(session.fall_interval_ms(), 50);
    assert!(session.set_active(Piece::spawn(PieceKind::T)));
    let down = InputFrame {
        down: true,
        ..InputFrame::IDLE
    };

    let mut soft_drops = 0;
    for _ in 0..20 {
        session.tick(down, 16);
        soft_drops += session
            .drain_events()
            .filter(|e| *e == SessionEvent::Moved { dx: 0, dy: -1 })
            .count();
    }
    // two soft-drop steps, the other four rows come from gravity
    assert_eq!(soft_drops, 2);
    assert_eq!(session.active().unwrap().row, 14);
}

#[test]
fn huge_levels_and_tick_lengths_saturate() {
    let mut session = GameSession::new(SessionConfig::new(500_000_000).with_seed(2));
    session.start();
    session.tick(InputFrame::IDLE, 16);
    assert_eq!(session.fall_interval_ms(), 50);

    let row = session.active().unwrap().row;
    session.tick(InputFrame { down: true, ..InputFrame::IDLE }, u32::MAX);
    session.tick(InputFrame::IDLE, u32::MAX);
    assert!(session.active().unwrap().row < row);
}

#[test]
fn set_active_rejects_anchor_outside_i8_offsets() {
    let mut session = session_with(0, &[]);
    let before = *session.active().unwrap();
    assert!(!session.set_active(Piece::new(PieceKind::I, 5, 126, Orientation::Deg90)));
    assert_eq!(*session.active().unwrap(), before);
}
