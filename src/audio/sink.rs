//! Opening and decoding tracks.
//!
//! Decoding happens on the caller's thread so open and format errors come
//! back from `load` directly instead of surfacing later as events.

use std::fs::File;
use std::io::BufReader;

use rodio::Decoder;

use crate::error::{Error, Result};
use crate::library::Track;

use super::types::FileSource;

pub(super) fn open_source(track: &Track) -> Result<FileSource> {
    let open_err = |source| Error::Open {
        path: track.path.clone(),
        source,
    };
    let file = File::open(&track.path).map_err(open_err)?;
    let len = file.metadata().map_err(open_err)?.len();

    let mut builder = Decoder::builder()
        .with_data(BufReader::new(file))
        .with_byte_len(len)
        // required for backwards seeks
        .with_seekable(true);
    if let Some(ext) = track.path.extension().and_then(|e| e.to_str()) {
        builder = builder.with_hint(ext);
    }

    builder.build().map_err(|source| Error::Decode {
        path: track.path.clone(),
        source,
    })
}
