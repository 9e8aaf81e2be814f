//! Replay scripts: scripted input for headless runs.
//!
//! One step per line: a tick count followed by the keys held for those ticks.
//!
//! ```text
//! # wait a second, then slide left while rotating once
//! 60
//! 20 left rotate
//! 5 down
//! cheat
//! ```
//!
//! Keys are `left`, `right`, `down` and `rotate` (aliases `up` and the action names
//! `moveLeft`, `moveRight`, `softDrop`); `rotate` counts as pressed
//! on the first tick of its step only. A line reading `cheat` applies the
//! debug override. Blank lines and `#` comments are skipped.

use anyhow::{anyhow, bail, Context, Result};

use crate::core::{GameSession, SessionEvent};
use crate::types::{GameAction, InputFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    Hold { ticks: u32, frame: InputFrame },
    Cheat,
}

/// Parse a whole script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.split('#').next().unwrap_or("").trim();
            (!line.is_empty()).then_some((i + 1, line))
        })
        .map(|(line_no, line)| parse_line(line).with_context(|| format!("line {}", line_no)))
        .collect()
}

fn parse_line(line: &str) -> Result<ScriptStep> {
    let mut words = line.split_whitespace();
    let first = words.next().ok_or_else(|| anyhow!("empty step"))?;
    if first.eq_ignore_ascii_case("cheat") {
        if let Some(extra) = words.next() {
            bail!("unexpected `{}` after cheat", extra);
        }
        return Ok(ScriptStep::Cheat);
    }

    let ticks: u32 = first
        .parse()
        .with_context(|| format!("invalid tick count `{}`", first))?;
    let mut frame = InputFrame::IDLE;
    for word in words {
        let action = GameAction::from_str(word).ok_or_else(|| anyhow!("unknown key `{}`", word))?;
        frame.press(action);
    }
    Ok(ScriptStep::Hold { ticks, frame })
}

/// Feed `steps` into `session`, stopping early on game over.
/// Returns the ticks run and every event in order.
pub fn run_script(
    session: &mut GameSession,
    steps: &[ScriptStep],
    tick_ms: u32,
) -> (u64, Vec<SessionEvent>) {
    let mut ticks = 0u64;
    let mut events = Vec::new();
    for step in steps {
        match *step {
            ScriptStep::Cheat => {
                session.apply_debug_override();
                events.extend(session.drain_events());
            }
            ScriptStep::Hold { ticks: n, frame } => {
                for i in 0..n {
                    if session.is_game_over() {
                        return (ticks, events);
                    }
                    let frame = InputFrame {
                        rotate: frame.rotate && i == 0,
                        ..frame
                    };
                    session.tick(frame, tick_ms);
                    events.extend(session.drain_events());
                    ticks += 1;
                }
            }
        }
    }
    (ticks, events)
}
