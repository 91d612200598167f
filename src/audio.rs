//! Audio playback on a dedicated thread, plus the frequency analyser that
//! feeds the visualizer.

mod analyser;
mod capture;
mod player;
mod sink;
mod thread;
mod types;

pub use analyser::Analyser;
pub use player::RodioEngine;
