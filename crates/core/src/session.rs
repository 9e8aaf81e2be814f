//! Game session - the piece/grid state machine
//!
//! The session owns the grid, the falling piece, the preview, the randomizer,
//! the input timing controller and the score tracker. Everything advances
//! through [`GameSession::tick`]; there is no other clock.
//!
//! Phases run `Spawning -> Falling -> Locking -> Spawning` until a piece locks
//! with a cell at or above the ceiling, which ends the session in `GameOver`.

use log::{debug, info, trace};
use serde::Serialize;

use fallblock_types::{
    AudioCue, GameAction, InputFrame, Orientation, PieceKind, DEBUG_OVERRIDE_LEVEL,
    DEBUG_OVERRIDE_SCORE, VISIBLE_HEIGHT,
};

use crate::grid::{Grid, RowList};
use crate::piece::{Piece, PieceShape};
use crate::rng::Randomizer;
use crate::scoring::{compute_level, fall_interval_ms, FallBonus, ScoreTracker};
use crate::snapshot::{GameSnapshot, HudSnapshot, Phase};
use crate::timing::InputTiming;

/// Session setup, fixed for the lifetime of a session (and its restarts)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub starting_level: u32,
    /// A default start lets the level follow the cleared lines freely.
    pub is_default_start: bool,
    pub seed: u32,
}

impl SessionConfig {
    /// Level 0 counts as the default start; any other level is a chosen start.
    pub fn new(starting_level: u32) -> Self {
        Self {
            starting_level,
            is_default_start: starting_level == 0,
            seed: 1,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    Spawned {
        piece_id: u32,
        kind: PieceKind,
        preview: PieceKind,
    },
    /// Player-driven translation (horizontal or soft drop)
    Moved { dx: i8, dy: i8 },
    Rotated { orientation: Orientation },
    /// Cells to fill and the skin to fill them with
    Landed { kind: PieceKind, cells: PieceShape },
    /// Cleared rows in pre-clear coordinates, bottom first
    LinesCleared { rows: RowList, points: u32 },
    LevelUp { level: u32 },
    CheatUnlocked,
    GameOver { score: u32 },
}

impl SessionEvent {
    /// Sound cue attached to this event, if any
    pub fn audio_cue(&self) -> Option<AudioCue> {
        match self {
            SessionEvent::Moved { .. } => Some(AudioCue::Moved),
            SessionEvent::Rotated { .. } => Some(AudioCue::Rotated),
            SessionEvent::Landed { .. } => Some(AudioCue::Landed),
            SessionEvent::LinesCleared { .. } => Some(AudioCue::LineCleared),
            SessionEvent::CheatUnlocked => Some(AudioCue::CheatUnlocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Applied,
    Rejected,
    Locked,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    seed: u32,
    grid: Grid,
    active: Option<Piece>,
    preview: Option<PieceKind>,
    randomizer: Randomizer,
    timing: InputTiming,
    score: ScoreTracker,
    bonus: FallBonus,
    level: u32,
    level_floor: u32,
    lines: u32,
    gravity_ms: u32,
    phase: Phase,
    events: Vec<SessionEvent>,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Monotonic id for spawned pieces.
    piece_id: u32,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_grid(config, Grid::new())
    }

    /// Session starting from a prepared grid (puzzles, tests)
    pub fn with_grid(config: SessionConfig, grid: Grid) -> Self {
        Self {
            config,
            seed: config.seed,
            grid,
            active: None,
            preview: None,
            randomizer: Randomizer::new(config.seed),
            timing: InputTiming::new(),
            score: ScoreTracker::new(),
            bonus: FallBonus::new(),
            level: config.starting_level,
            level_floor: 0,
            lines: 0,
            gravity_ms: 0,
            phase: Phase::Spawning,
            events: Vec::with_capacity(16),
            episode_id: 0,
            piece_id: 0,
        }
    }

    /// Spawn the first piece. Does nothing once a piece has been spawned.
    pub fn start(&mut self) {
        if self.phase == Phase::Spawning {
            self.spawn_piece();
        }
    }

    /// Start over with the same configuration and a fresh piece sequence
    pub fn restart(&mut self) {
        let episode_id = self.episode_id.wrapping_add(1);
        let seed = self
            .config
            .seed
            .wrapping_add(episode_id.wrapping_mul(0x9E37_79B9));
        let mut fresh = Self::new(self.config.with_seed(seed));
        fresh.config = self.config;
        fresh.episode_id = episode_id;
        *self = fresh;
        info!("restart episode={} seed={}", episode_id, seed);
        self.start();
    }

    /// Advance the simulation by one tick.
    ///
    /// Order: spawn if needed, player actions (horizontal, rotate, soft drop),
    /// gravity, fall bonus decay, level update. A lock ends the movement part
    /// of the tick.
    pub fn tick(&mut self, frame: InputFrame, elapsed_ms: u32) {
        if self.phase == Phase::GameOver {
            return;
        }
        if self.phase == Phase::Spawning {
            self.spawn_piece();
        }

        let mut locked = false;
        for action in self.timing.update(&frame, elapsed_ms) {
            if self.step(action) == StepOutcome::Locked {
                locked = true;
                break;
            }
        }
        if self.phase == Phase::GameOver {
            return;
        }

        if !locked {
            self.gravity_ms = self.gravity_ms.saturating_add(elapsed_ms);
            if self.gravity_ms >= self.fall_interval_ms() {
                self.gravity_ms = 0;
                locked = self.step_down(false) == StepOutcome::Locked;
            }
            if self.phase == Phase::GameOver {
                return;
            }
        }

        if !locked {
            self.bonus.tick(elapsed_ms);
        }

        self.update_level();
    }

    /// Apply one command immediately, bypassing input timing.
    /// Returns false when the command was rejected.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if self.phase == Phase::Spawning {
            self.spawn_piece();
        }
        if self.phase != Phase::Falling {
            return false;
        }
        let outcome = self.step(action);
        self.update_level();
        outcome != StepOutcome::Rejected
    }

    /// Cheat hook: score 9999 and a level floor of 15.
    pub fn apply_debug_override(&mut self) -> bool {
        if self.phase == Phase::GameOver {
            return false;
        }
        self.score.set_total(DEBUG_OVERRIDE_SCORE);
        self.level_floor = self.level_floor.max(DEBUG_OVERRIDE_LEVEL);
        info!("debug override: score={} level floor={}", DEBUG_OVERRIDE_SCORE, DEBUG_OVERRIDE_LEVEL);
        self.events.push(SessionEvent::CheatUnlocked);
        self.update_level();
        true
    }

    /// Replace the falling piece. Only valid placements are accepted.
    pub fn set_active(&mut self, piece: Piece) -> bool {
        if self.phase == Phase::GameOver || !piece.is_valid(&self.grid) {
            return false;
        }
        if self.preview.is_none() {
            self.preview = Some(self.randomizer.next_kind());
        }
        self.active = Some(piece);
        self.phase = Phase::Falling;
        true
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SessionEvent> {
        self.events.drain(..)
    }

    fn step(&mut self, action: GameAction) -> StepOutcome {
        match action {
            GameAction::MoveLeft => self.try_shift(-1),
            GameAction::MoveRight => self.try_shift(1),
            GameAction::Rotate => self.try_rotate(),
            GameAction::SoftDrop => self.step_down(true),
        }
    }

    fn try_shift(&mut self, dx: i8) -> StepOutcome {
        let Some(piece) = self.active else {
            return StepOutcome::Rejected;
        };
        let candidate = piece.moved(dx, 0);
        if candidate.is_valid(&self.grid) {
            self.active = Some(candidate);
            self.events.push(SessionEvent::Moved { dx, dy: 0 });
            StepOutcome::Applied
        } else {
            trace!("shift {} rejected at ({}, {})", dx, piece.col, piece.row);
            StepOutcome::Rejected
        }
    }

    fn try_rotate(&mut self) -> StepOutcome {
        let Some(piece) = self.active else {
            return StepOutcome::Rejected;
        };
        let candidate = piece.rotated();
        if candidate == piece {
            return StepOutcome::Rejected;
        }
        if candidate.is_valid(&self.grid) {
            self.active = Some(candidate);
            self.events.push(SessionEvent::Rotated {
                orientation: candidate.orientation,
            });
            StepOutcome::Applied
        } else {
            trace!("rotation of {:?} rejected", piece.kind);
            StepOutcome::Rejected
        }
    }

    /// One row down; a blocked move locks the piece.
    fn step_down(&mut self, from_input: bool) -> StepOutcome {
        let Some(piece) = self.active else {
            return StepOutcome::Rejected;
        };
        let candidate = piece.moved(0, -1);
        if candidate.is_valid(&self.grid) {
            self.active = Some(candidate);
            if from_input {
                self.gravity_ms = 0;
                self.events.push(SessionEvent::Moved { dx: 0, dy: -1 });
            }
            StepOutcome::Applied
        } else {
            self.lock_piece(piece);
            StepOutcome::Locked
        }
    }

    fn lock_piece(&mut self, piece: Piece) {
        self.phase = Phase::Locking;
        self.active = None;

        if piece.reaches(VISIBLE_HEIGHT as i8) {
            self.phase = Phase::GameOver;
            info!(
                "game over: score={} level={} lines={}",
                self.score.total(),
                self.level,
                self.lines
            );
            self.events.push(SessionEvent::GameOver {
                score: self.score.total(),
            });
            return;
        }

        let cells = piece.cells();
        self.grid.integrate(&cells, piece.kind);
        debug!("lock {:?} piece_id={} cells={:?}", piece.kind, self.piece_id, cells);
        self.events.push(SessionEvent::Landed {
            kind: piece.kind,
            cells,
        });

        let cleared = self.grid.clear_and_compact();
        if !cleared.is_empty() {
            self.score.record_rows(cleared.len() as u32);
            let (rows, points) = self.score.consume(self.level);
            self.lines = self.lines.saturating_add(rows);
            debug!("cleared rows={:?} points={} lines={}", cleared, points, self.lines);
            self.events.push(SessionEvent::LinesCleared {
                rows: cleared,
                points,
            });
        }

        self.score.add(self.bonus.value());
        self.spawn_piece();
    }

    fn spawn_piece(&mut self) {
        let kind = match self.preview.take() {
            Some(kind) => kind,
            None => self.randomizer.next_kind(),
        };
        let preview = self.randomizer.next_kind();
        self.preview = Some(preview);

        let piece = Piece::spawn(kind);
        self.piece_id = self.piece_id.wrapping_add(1);
        self.active = Some(piece);
        self.gravity_ms = 0;
        self.bonus.reset();
        self.timing.reset();
        self.phase = Phase::Falling;

        debug!("spawn {:?} piece_id={} preview={:?}", kind, self.piece_id, preview);
        self.events.push(SessionEvent::Spawned {
            piece_id: self.piece_id,
            kind,
            preview,
        });
    }

    fn update_level(&mut self) {
        let computed = compute_level(
            self.config.starting_level,
            self.lines,
            self.config.is_default_start,
            self.level,
        );
        let level = computed.max(self.level_floor);
        if level == self.level {
            return;
        }
        let raised = level > self.level;
        self.level = level;
        if raised {
            info!("level up: {} (lines={})", level, self.lines);
            self.events.push(SessionEvent::LevelUp { level });
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn preview(&self) -> Option<PieceKind> {
        self.preview
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score.total()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn fall_interval_ms(&self) -> u32 {
        fall_interval_ms(self.level)
    }

    pub fn fall_bonus(&self) -> u32 {
        self.bonus.value()
    }

    pub fn gravity_timer_ms(&self) -> u32 {
        self.gravity_ms
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score(),
            level: self.level,
            lines: self.lines,
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.grid.write_u8_grid(&mut out.grid);
        out.active = self.active.map(Into::into);
        out.preview = self.preview;
        out.phase = self.phase;
        out.episode_id = self.episode_id;
        out.piece_id = self.piece_id;
        out.seed = self.seed;
        out.score = self.score();
        out.level = self.level;
        out.lines = self.lines;
        out.starting_level = self.config.starting_level;
        out.fall_interval_ms = self.fall_interval_ms();
        out.fall_bonus = self.bonus.value();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(level: u32) -> GameSession {
        let mut session = GameSession::new(SessionConfig::new(level).with_seed(3));
        session.start();
        session.drain_events().for_each(drop);
        session
    }

    #[test]
    fn test_config_default_start_rule() {
        assert!(SessionConfig::new(0).is_default_start);
        assert!(!SessionConfig::new(5).is_default_start);
    }

    #[test]
    fn test_start_spawns_with_preview() {
        let mut session = GameSession::new(SessionConfig::default());
        assert_eq!(session.phase(), Phase::Spawning);
        session.start();
        assert_eq!(session.phase(), Phase::Falling);
        assert_eq!(session.piece_id(), 1);
        assert!(session.preview().is_some());
        let piece = session.active().copied().unwrap();
        assert_eq!((piece.col, piece.row), (5, 20));

        let events: Vec<_> = session.drain_events().collect();
        assert!(matches!(events.as_slice(), [SessionEvent::Spawned { piece_id: 1, .. }]));

        session.start();
        assert_eq!(session.piece_id(), 1);
    }

    #[test]
    fn test_gravity_drops_after_interval() {
        let mut session = started(0);
        let row = session.active().unwrap().row;
        for _ in 0..9 {
            session.tick(InputFrame::IDLE, 100);
        }
        assert_eq!(session.active().unwrap().row, row);
        session.tick(InputFrame::IDLE, 100);
        assert_eq!(session.active().unwrap().row, row - 1);
        assert_eq!(session.gravity_timer_ms(), 0);
        // gravity makes no sound
        assert!(session.drain_events().all(|e| e.audio_cue().is_none()));
    }

    #[test]
    fn test_soft_drop_emits_moved_and_resets_gravity() {
        let mut session = started(0);
        session.tick(InputFrame::IDLE, 500);
        let frame = InputFrame {
            down: true,
            ..InputFrame::IDLE
        };
        session.tick(frame, 16);
        assert_eq!(session.gravity_timer_ms(), 16);
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(events, vec![SessionEvent::Moved { dx: 0, dy: -1 }]);
    }

    #[test]
    fn test_rejected_move_is_idempotent() {
        let mut session = started(0);
        for _ in 0..10 {
            session.apply_action(GameAction::MoveLeft);
        }
        let before = *session.active().unwrap();
        assert!(!session.apply_action(GameAction::MoveLeft));
        assert!(!session.apply_action(GameAction::MoveLeft));
        assert_eq!(*session.active().unwrap(), before);
    }

    #[test]
    fn test_lock_spawns_next_and_adds_bonus() {
        let mut session = started(0);
        let preview = session.preview().unwrap();
        while session.piece_id() == 1 {
            session.apply_action(GameAction::SoftDrop);
        }
        assert_eq!(session.score(), 20);
        assert_eq!(session.active().unwrap().kind, preview);
        assert_eq!(session.grid().filled_count(), 4);
        let events: Vec<_> = session.drain_events().collect();
        assert!(events.iter().any(|e| matches!(e, SessionEvent::Landed { .. })));
    }

    #[test]
    fn test_debug_override() {
        let mut session = started(0);
        assert!(session.apply_debug_override());
        assert_eq!(session.score(), 9999);
        assert_eq!(session.level(), 15);
        assert_eq!(session.fall_interval_ms(), 50);
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            vec![SessionEvent::CheatUnlocked, SessionEvent::LevelUp { level: 15 }]
        );
        // the floor holds on later ticks
        session.tick(InputFrame::IDLE, 16);
        assert_eq!(session.level(), 15);
    }

    #[test]
    fn test_restart_bumps_episode() {
        let mut session = started(4);
        session.apply_debug_override();
        session.restart();
        assert_eq!(session.episode_id(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 4);
        assert_eq!(session.config().seed, 3);
        assert_ne!(session.seed(), 3);
        assert_eq!(session.phase(), Phase::Falling);
    }

    #[test]
    fn test_set_active_rejects_invalid() {
        let mut session = started(0);
        assert!(!session.set_active(Piece::new(PieceKind::O, -1, 0, Orientation::Deg0)));
        assert!(session.set_active(Piece::new(PieceKind::O, 0, 0, Orientation::Deg0)));
        assert_eq!(session.active().unwrap().col, 0);
    }

    #[test]
    fn test_audio_cues() {
        assert_eq!(
            SessionEvent::Moved { dx: 1, dy: 0 }.audio_cue(),
            Some(AudioCue::Moved)
        );
        assert_eq!(SessionEvent::LevelUp { level: 1 }.audio_cue(), None);
        assert_eq!(SessionEvent::GameOver { score: 0 }.audio_cue(), None);
    }
}
