use std::env;
use std::sync::mpsc;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

mod event_loop;
mod logging;
mod settings;
mod startup;
mod terminal;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = settings::load_settings();

    match logging::init(&settings.log) {
        Ok(path) => info!("dropdeck starting, logging to {}", path.display()),
        // Logging is optional; the player still works without it.
        Err(e) => eprintln!("logging disabled: {e}"),
    }
    if let Some(msg) = fallback {
        warn!("{msg}");
    }

    // Fail before touching the terminal if there is no output device.
    let mut app = startup::build_app(&settings)?;
    startup::initial_drop(&mut app, env::args().skip(1));

    let (tx, rx) = mpsc::channel::<event_loop::AppEvent>();
    let mut input = event_loop::InputReader::spawn(tx.clone());

    enable_raw_mode()?;
    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut stdout = std::io::stdout();
        terminal::enter(&mut stdout)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        event_loop::run(&mut terminal, &settings, &mut app, &tx, &rx)
    })();

    // From here on every step runs, whatever failed before it.
    input.stop();
    terminal::restore(&mut std::io::stdout(), disable_raw_mode);
    app.player.teardown();
    info!("dropdeck stopped");

    run_result
}
