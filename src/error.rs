//! Error type shared by the engine, library and configuration layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },

    #[error("no audio output device: {0}")]
    Output(String),

    /// The audio thread has exited and no longer accepts commands.
    #[error("audio thread is gone")]
    EngineGone,

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
