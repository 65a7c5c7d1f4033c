use anyhow::{Context, Result};
use clap::Parser;
use excavator_core::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use command::{Command, Line};

mod command;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of a time based one
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML file overriding the reference game settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read config {}", path.display()))?;
    GameConfig::from_toml_str(&source)
        .with_context(|| format!("Invalid config {}", path.display()))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

enum Flow {
    Continue,
    Quit,
}

struct Session {
    shared: SharedEngine,
    events: EventReceiver,
}

impl Session {
    fn handle(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        match command {
            Command::Dig { id } => {
                let outcome = self
                    .shared
                    .excavate(id)
                    .with_context(|| format!("Could not excavate tile {id}"))?;
                log::debug!("Excavate {} -> {:?}", id, outcome);
                if outcome == ExcavateOutcome::NoOp {
                    writeln!(out, "tile {id} is already excavated")?;
                }
            }
            Command::Reset => self.shared.reset(),
            Command::Status { json } => {
                let (snapshot, state) = self
                    .shared
                    .with(|engine| (engine.snapshot(), engine.state()));
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
                } else {
                    write!(out, "{}", render::status(&snapshot, state))?;
                }
            }
            Command::Grid => {
                let board = self.shared.with(|engine| render::grid(engine.grid()));
                write!(out, "{board}")?;
            }
            Command::Inventory => {
                let counts = self.shared.snapshot().treasure_counts;
                write!(out, "{}", render::inventory(&counts))?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn flush_events(&mut self, out: &mut impl Write) -> io::Result<()> {
        while let Ok(Some(event)) = self.events.try_next() {
            if let Some(line) = render::event(&event) {
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(time_seed);
    log::debug!("seed: {}", seed);

    let mut engine = ExcavationEngine::seeded(config, seed);
    let events = engine.subscribe();
    let shared = SharedEngine::new(engine);
    let scheduler =
        RegenScheduler::spawn(shared.clone()).context("Could not start energy regeneration")?;
    let mut session = Session { shared, events };

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "Dig tiles with `dig <0-63>`, each dig costs {} energy and traps deal {} damage.",
        config.energy_per_dig, config.trap_damage
    )?;
    let board = session.shared.with(|engine| render::grid(engine.grid()));
    write!(out, "{board}")?;

    for line in stdin.lock().lines() {
        let line = line.context("Could not read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let flow = match Line::parse_line(&line) {
            Ok(command) => session.handle(command, &mut out),
            Err(err) => {
                write!(out, "{err}")?;
                Ok(Flow::Continue)
            }
        };
        session.flush_events(&mut out)?;

        match flow {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => writeln!(out, "error: {err:#}")?,
        }
        out.flush()?;
    }

    scheduler.stop();
    log::debug!("Session ended");
    Ok(())
}
