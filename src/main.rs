mod display;

use std::fs::File;
use std::io::{stdout, BufWriter};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use asteroids_game::config::{GameConfig, DEFAULT_CONFIG_PATH};
use asteroids_game::game::Game;
use asteroids_game::leaderboard::FileStore;
use asteroids_game::render::Renderer;

use display::TerminalRenderer;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Logs go to a file: the terminal belongs to the game while it runs.
/// `RUST_LOG` overrides the default `info` level.
fn init_logging(path: &Path) {
    match File::create(path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!("logging disabled, cannot create {}: {}", path.display(), e),
    }
}

fn main() -> std::io::Result<()> {
    let config_path = Path::new(DEFAULT_CONFIG_PATH);
    let config = GameConfig::load(config_path);
    let log_file = config
        .as_ref()
        .map(|c| c.log_file.clone())
        .unwrap_or_else(|_| GameConfig::default().log_file);
    init_logging(&log_file);

    let config = config.unwrap_or_else(|e| {
        warn!("{}; using default configuration", e);
        GameConfig::default()
    });
    info!("starting with {:?}", config);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to hold timing.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    info!("keyboard enhancement: {}", keyboard_enhanced);

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never blocks on input.
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

    let result = run(&mut out, rx, &config, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("bye");
    result
}

fn run<W: std::io::Write>(
    out: &mut W,
    rx: mpsc::Receiver<Event>,
    config: &GameConfig,
    keyboard_enhanced: bool,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let store = FileStore::new(config.leaderboard_path.clone());
    let mut game = Game::new(config, store, &mut rng);

    let size = terminal::size()?;
    let mut renderer = TerminalRenderer::new(out, rx, config.bounds(), size, keyboard_enhanced);

    let mut last = Instant::now();
    while !renderer.is_closed() {
        let frame_start = Instant::now();
        // Variable time step: physics scale with the measured frame time.
        let dt = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;

        game.run_frame(&mut renderer, dt, &mut rng);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
    Ok(())
}
