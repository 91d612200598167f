use std::path::PathBuf;
use std::time::Duration;

/// A dropped audio file.
///
/// `path` is the handle the engine opens when the track is played; nothing
/// is read from it until then.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub display_name: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    /// A track with no tag information, named after its file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            path,
            display_name,
            title: None,
            artist: None,
            album: None,
            duration: None,
        }
    }
}
