//! Headless runner: plays a replay script (or idles) and prints JSON.
//!
//! ```text
//! replay --seed 7 --level 3 --script moves.txt
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde_json::json;

use fallblock::core::{GameSession, SessionConfig};
use fallblock::script::{parse_script, run_script, ScriptStep};
use fallblock::types::{InputFrame, TICK_MS};

#[derive(Parser, Debug)]
#[command(name = "replay", version, about = "Run a scripted session and print the result as JSON")]
struct Cli {
    /// Starting level; 0 lets the level follow cleared lines from the start
    #[arg(long, env = "FALLBLOCK_LEVEL", default_value_t = 0)]
    level: u32,

    #[arg(long, env = "FALLBLOCK_SEED", default_value_t = 1)]
    seed: u32,

    /// Milliseconds of simulated time per tick
    #[arg(long, default_value_t = TICK_MS)]
    tick_ms: u32,

    /// Script to play; without one the session idles until game over
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Upper bound on idle ticks when no script is given
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let steps = match &cli.script {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read script {}", path.display()))?;
            parse_script(&text).with_context(|| format!("parse script {}", path.display()))?
        }
        None => vec![ScriptStep::Hold {
            ticks: cli.max_ticks,
            frame: InputFrame::IDLE,
        }],
    };

    let config = SessionConfig::new(cli.level).with_seed(cli.seed);
    let mut session = GameSession::new(config);
    session.start();
    let mut events: Vec<_> = session.drain_events().collect();

    let (ticks, played) = run_script(&mut session, &steps, cli.tick_ms);
    events.extend(played);
    info!("replay finished after {} ticks", ticks);

    let out = json!({
        "ticks": ticks,
        "events": events,
        "hud": session.hud(),
        "snapshot": session.snapshot(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
