mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use river_leap::config::GameConfig;
use river_leap::entities::{GameStatus, KeyState};
use river_leap::level::{load_levels, LevelParse};
use river_leap::world::World;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

const DEFAULT_LEVEL_DIR: &str = "assets/levels";
const LEVEL_DIR_VAR: &str = "RIVER_LEAP_LEVELS";
const CONFIG_VAR: &str = "RIVER_LEAP_CONFIG";
const STRICT_VAR: &str = "RIVER_LEAP_STRICT";

// ── Logging ───────────────────────────────────────────────────────────────────

/// Send tracing output to a file; the terminal belongs to the game.
fn init_logging() -> anyhow::Result<PathBuf> {
    let path = std::env::temp_dir().join("river_leap.log");
    let file = std::fs::File::create(&path)
        .with_context(|| format!("creating log file {}", path.display()))?;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .init();
    Ok(path)
}

/// `RUST_LOG` replaces the crate's default level entirely when set.
fn log_filter(rust_log: Option<&str>) -> anyhow::Result<EnvFilter> {
    let default = if cfg!(debug_assertions) {
        "river_leap=debug"
    } else {
        "river_leap=info"
    };
    let directives = rust_log.filter(|s| !s.trim().is_empty()).unwrap_or(default);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse(directives)?;
    Ok(filter)
}

// ── Startup ───────────────────────────────────────────────────────────────────

fn level_dir() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(LEVEL_DIR_VAR).ok())
        .unwrap_or_else(|| DEFAULT_LEVEL_DIR.to_string())
        .into()
}

fn load_config() -> anyhow::Result<GameConfig> {
    match std::env::var_os(CONFIG_VAR) {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = GameConfig::load(&path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(GameConfig::default()),
    }
}

fn build_world() -> anyhow::Result<World> {
    let config = load_config()?;
    let mode = if std::env::var_os(STRICT_VAR).is_some() {
        LevelParse::Strict
    } else {
        LevelParse::Permissive
    };
    let dir = level_dir();
    let levels = load_levels(&dir, mode)
        .with_context(|| format!("loading levels from {}", dir.display()))?;
    let world = World::new(levels, config, &mut thread_rng())?;
    Ok(world)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum Exit {
    Quit,
    Finished(GameStatus),
}

/// Keys pressed since the previous frame. Only presses count: a hop is one
/// press, holding a key does not repeat it unless the terminal re-sends the
/// press.
fn drain_input(rx: &mpsc::Receiver<Event>) -> Option<KeyState> {
    let mut keys = KeyState::default();
    while let Ok(ev) = rx.try_recv() {
        let Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) = ev
        else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return None,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return None,
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => keys.left = true,
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => keys.right = true,
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => keys.up = true,
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => keys.down = true,
            _ => {}
        }
    }
    Some(keys)
}

fn game_loop<W: Write>(
    out: &mut W,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<Exit> {
    let mut rng = thread_rng();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        let Some(keys) = drain_input(rx) else {
            return Ok(Exit::Quit);
        };

        let elapsed_ms = u32::try_from(last.elapsed().as_millis()).unwrap_or(u32::MAX);
        last = frame_start;

        let status = world.update(&keys, elapsed_ms, &mut rng);
        display::render(out, world)?;
        if status != GameStatus::Playing {
            return Ok(Exit::Finished(status));
        }

        let spent = frame_start.elapsed();
        if spent < FRAME {
            thread::sleep(FRAME - spent);
        }
    }
}

/// Block until any key press.
fn wait_for_key(rx: &mpsc::Receiver<Event>) {
    while let Ok(ev) = rx.recv() {
        if let Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            ..
        }) = ev
        {
            break;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let log_path = init_logging()?;
    info!(log = %log_path.display(), "starting");

    // Fail on bad level data before touching the terminal.
    let mut world = build_world().inspect_err(|e| error!("startup failed: {e:#}"))?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for press/release events so held keys don't masquerade as presses.
    // Terminals without the kitty protocol fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread to blocking event reads so the frame loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut world, &rx);
    if let Ok(Exit::Finished(status)) = &result {
        info!(?status, frame = world.frame(), "game finished");
        wait_for_key(&rx);
    }

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;
    Ok(())
}
