use std::path::PathBuf;

use log::info;

use crate::app::App;
use crate::audio::RodioEngine;
use crate::config;
use crate::engine::PlaybackEngine;
use crate::error::Result;
use crate::player::Player;
use crate::visualizer::Visualizer;

/// Open the audio device and assemble the app around it.
pub fn build_app(settings: &config::Settings) -> Result<App<RodioEngine>> {
    let engine = RodioEngine::new(&settings.audio)?;
    let analyser = engine.analyser(&settings.audio);
    let visualizer = Visualizer::new(Box::new(analyser), &settings.visualizer);
    Ok(App::new(Player::new(engine), visualizer, settings))
}

/// Treat command-line arguments as a drop onto the empty playlist.
pub fn initial_drop<E: PlaybackEngine>(
    app: &mut App<E>,
    args: impl IntoIterator<Item = String>,
) -> usize {
    let paths: Vec<PathBuf> = args.into_iter().map(PathBuf::from).collect();
    if paths.is_empty() {
        return 0;
    }
    let added = app.drop_paths(&paths);
    info!("startup: {added} tracks from {} arguments", paths.len());
    added
}
