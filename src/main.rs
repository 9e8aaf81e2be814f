//! Terminal runner (default binary).
//!
//! Fixed 16ms ticks, crossterm input and the framebuffer renderer. Logs go to
//! a file so they never land on the alternate screen.

use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};

use fallblock::core::{GameSession, SessionConfig, SessionEvent};
use fallblock::input::{is_restart, map_key, should_quit, CheatMatcher, KeyboardState};
use fallblock::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use fallblock::types::TICK_MS;

#[derive(Parser, Debug)]
#[command(name = "fallblock", version, about = "Falling-block puzzle game for the terminal")]
struct Cli {
    /// Starting level; 0 lets the level follow cleared lines from the start
    #[arg(long, env = "FALLBLOCK_LEVEL", default_value_t = 0)]
    level: u32,

    /// Piece sequence seed (defaults to one derived from the clock)
    #[arg(long, env = "FALLBLOCK_SEED")]
    seed: Option<u32>,

    /// Where log output goes (filter with RUST_LOG)
    #[arg(long, value_name = "PATH", default_value = "fallblock.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let seed = cli.seed.unwrap_or_else(clock_seed);
    let config = SessionConfig::new(cli.level).with_seed(seed);
    info!("starting level={} seed={}", config.starting_level, seed);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let key_event_types = term.enable_key_event_types()?;
    debug!("key event types reported: {}", key_event_types);

    let result = run(&mut term, config, key_event_types);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(cli: &Cli) -> Result<()> {
    let file = File::create(&cli.log_file)
        .with_context(|| format!("create log file {}", cli.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, config: SessionConfig, key_event_types: bool) -> Result<()> {
    let mut session = GameSession::new(config);
    session.start();

    let view = GameView::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut keyboard = KeyboardState::new().with_reported_event_types(key_event_types);
    let mut cheat = CheatMatcher::new();

    let tick = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&session.snapshot(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if session.is_game_over() {
                            if is_restart(key) {
                                session.restart();
                                keyboard.reset();
                                cheat.clear();
                            }
                            continue;
                        }
                        if let Some(k) = map_key(key) {
                            if key.kind == KeyEventKind::Repeat {
                                keyboard.handle_key_repeat(k);
                            } else {
                                keyboard.handle_key_press(k);
                                if cheat.push(k) {
                                    session.apply_debug_override();
                                }
                            }
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(k) = map_key(key) {
                            keyboard.handle_key_release(k);
                        }
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            session.tick(keyboard.sample(), TICK_MS);
            for event in session.drain_events() {
                if let Some(cue) = event.audio_cue() {
                    debug!("cue {}", cue.as_str());
                }
                if let SessionEvent::GameOver { score } = event {
                    info!("final score {}", score);
                }
            }
        }
    }
}
