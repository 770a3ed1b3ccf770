//! Terminal runner (default binary).
//!
//! Single-threaded frame loop: collect key events, sample one input frame,
//! tick the session, play its cues, render the snapshot, wait for the next
//! frame. Logs go to a file since the terminal is in raw mode.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing_subscriber::EnvFilter;

use blockfall::config::{Config, LogConfig, Randomizer};
use blockfall::core::{GameSession, GameSnapshot, ShapeSource};
use blockfall::input::KeySampler;
use blockfall::term::{
    BellPlayer, CuePlayer, FrameBuffer, GameView, SilentPlayer, TerminalRenderer, Viewport,
};

/// Falling-block puzzle game for the terminal
#[derive(Parser)]
#[command(name = "blockfall", version, about, long_about = None)]
struct Cli {
    /// Seed for the shape randomizer (defaults to the clock)
    #[arg(long)]
    seed: Option<u32>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    /// Hide the landing preview
    #[arg(long)]
    no_ghost: bool,

    /// How new shapes are drawn
    #[arg(long, value_enum)]
    randomizer: Option<Randomizer>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.game.seed = Some(seed);
        }
        if let Some(randomizer) = self.randomizer {
            config.game.randomizer = randomizer;
        }
        if let Some(path) = &self.log_file {
            config.log.file = path.clone();
        }
        if self.mute {
            config.audio.enabled = false;
        }
        if self.no_ghost {
            config.render.show_ghost = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    init_logging(&config.log)?;

    // Restore the terminal before the default hook prints the panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let seed = config.game.seed.unwrap_or_else(clock_seed);
    tracing::info!(seed, randomizer = ?config.game.randomizer, "starting");
    let source = config.game.randomizer.source(seed);

    let mut term = TerminalRenderer::new();
    term.enter("blockfall")?;

    let result = if config.audio.enabled {
        let player = BellPlayer::new(std::io::stdout(), config.audio.bell_threshold);
        run(&mut term, &config, source, player)
    } else {
        run(&mut term, &config, source, SilentPlayer)
    };

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(error) = &result {
        tracing::error!(%error, "exiting with error");
    }
    result
}

fn run<P: CuePlayer>(
    term: &mut TerminalRenderer,
    config: &Config,
    source: Box<dyn ShapeSource>,
    mut player: P,
) -> Result<()> {
    let start = Instant::now();
    let now_ms = || start.elapsed().as_millis() as u64;

    let view = GameView::new(config.view_config());
    let frame = config.frame_duration();
    let mut sampler = KeySampler::new();
    let mut session = GameSession::new(source, now_ms());

    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut viewport = Viewport::new(w, h);

    loop {
        let frame_start = Instant::now();

        let now = now_ms();
        let input = sampler.sample(now);
        if session.tick(now, &input).is_break() {
            tracing::info!(score = session.score(), lines = session.lines(), "quit");
            return Ok(());
        }

        player.play_frame(session.drain_cues());

        session.snapshot_into(now, &mut snap);
        view.render_into(&snap, viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Wait out the rest of the frame, collecting input as it arrives.
        let deadline = frame_start + frame;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining == Duration::ZERO || !event::poll(remaining)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    sampler.handle_key(key, now_ms());
                }
                Event::Resize(w, h) => {
                    viewport = Viewport::new(w, h);
                    term.invalidate();
                }
                Event::FocusLost => sampler.reset(),
                _ => {}
            }
        }
    }
}

fn init_logging(log: &LogConfig) -> Result<()> {
    if let Some(dir) = log.file.parent() {
        std::fs::create_dir_all(dir).ok();
    }
    let file = std::fs::File::create(&log.file)
        .with_context(|| format!("failed to create log file {}", log.file.display()))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.filter)
            .with_context(|| format!("invalid log filter `{}`", log.filter))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Restore terminal state - called on panic
fn restore_terminal() {
    use crossterm::{
        cursor, execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };
    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), LeaveAlternateScreen, cursor::Show);
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}
