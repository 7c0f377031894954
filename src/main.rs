mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use invaders::compute::{FrameEvent, GameWindow};
use invaders::config::GameConfig;
use invaders::input::{HeldKeys, Key, QUIT_KEY};

/// Longest frame time fed to the simulation.  A stalled terminal should not
/// teleport everything on the next tick.
const MAX_FRAME_TIME: f32 = 0.1;

#[derive(Parser, Debug)]
#[command(about = "Invaders from space, in your terminal")]
struct Arguments {
    /// JSON file overriding the default tunables.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write logs here (the terminal itself is busy drawing the game).
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Keep the player inside the play area.
    #[arg(long)]
    clamp_player: bool,
    /// Remove bullets once they leave the top of the play area.
    #[arg(long)]
    cull_bullets: bool,
    /// Number of stationary aliens to shoot at.
    #[arg(long)]
    aliens: Option<usize>,
    /// Seed for alien placement.
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("invaders=info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // Without a file only log when explicitly asked to; stderr shares
        // the screen with the game.
        None if std::env::var_os("RUST_LOG").is_none() => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {}
    }
    builder.init();
    Ok(())
}

fn load_config(args: &Arguments) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.clamp_player |= args.clamp_player;
    config.cull_offscreen_bullets |= args.cull_bullets;
    if let Some(count) = args.aliens {
        config.alien_count = count;
    }
    config.validate()?;
    Ok(config)
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Char(c) => Some(Key::from_char(c)),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the user quits.
///
/// Input events are folded into `HeldKeys`; the simulation only sees the
/// held state sampled once per tick, with the real elapsed time as `dt`.
fn game_loop<W: Write>(
    out: &mut W,
    window: &mut GameWindow,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let frame = Duration::try_from_secs_f32(window.config.tick_interval())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let started = Instant::now();
    let mut held = HeldKeys::default();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        held.set_time(started.elapsed().as_secs_f64());

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match (kind, code) {
                (KeyEventKind::Press, KeyCode::Esc) => return Ok(()),
                (KeyEventKind::Press, code) if map_key(code) == Some(QUIT_KEY) => return Ok(()),
                (KeyEventKind::Press, KeyCode::Char('c'))
                    if modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    return Ok(());
                }
                (KeyEventKind::Press | KeyEventKind::Repeat, code) => {
                    if let Some(key) = map_key(code) {
                        held.press(key);
                    }
                }
                (KeyEventKind::Release, code) => {
                    if let Some(key) = map_key(code) {
                        held.release(key);
                    }
                }
            }
        }

        let dt = last.elapsed().as_secs_f32().min(MAX_FRAME_TIME);
        last = Instant::now();

        for event in window.tick(&held, dt) {
            if let FrameEvent::AlienHit { x, y } = event {
                info!("alien down at ({x:.0}, {y:.0}), {} left", window.aliens.len());
            }
        }

        display::render(out, window)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Arguments::parse();
    init_logging(args.log_file.as_ref())?;
    let config = load_config(&args)?;

    let mut window = GameWindow::new(config);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let count = window.config.alien_count;
    window.scatter_aliens(count, &mut rng);
    info!("starting with {count} aliens");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &mut window, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("quit after {:.1}s of play", window.now());
    result.context("game loop")
}
