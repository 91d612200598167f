use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::config::LogSettings;

/// Send `log` records to the configured file; the terminal belongs to the UI.
///
/// `log.level` sets the filter and `RUST_LOG` overrides it. Returns the log
/// file path.
pub fn init(settings: &LogSettings) -> io::Result<PathBuf> {
    let path = settings.file_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let mut builder = Builder::new();
    builder
        .parse_filters(&settings.level)
        .parse_env(Env::default())
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis();
    builder
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;

    Ok(path)
}
