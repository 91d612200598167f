//! Application model: the player plus everything the terminal front-end
//! tracks about it (selection, prompt, drags, hit areas).

use std::path::PathBuf;

use log::info;
use ratatui::layout::Rect;

use crate::config::{LibrarySettings, Settings};
use crate::engine::PlaybackEngine;
use crate::library::{expand_drop, parse_drop};
use crate::player::Player;
use crate::playlist::TrackId;
use crate::visualizer::Visualizer;

/// What keystrokes currently edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a path to add; the string is the prompt contents.
    AddPath(String),
}

/// Screen regions from the last layout, used to map mouse positions.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct HitAreas {
    /// Rows of the playlist, inside its border.
    pub list: Rect,
    /// Playlist index shown on the first row of `list`.
    pub list_offset: usize,
    /// The progress gauge, inside its border.
    pub gauge: Rect,
}

/// Width of the play-button column at the left of each playlist row.
pub const PLAY_COLUMN_WIDTH: u16 = 2;

/// First and one-past-last index of a `height`-row window over `total`
/// rows that keeps `selected` near the middle.
pub fn list_window(selected: usize, total: usize, height: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

pub struct App<E> {
    pub player: Player<E>,
    pub selected: usize,
    pub mode: InputMode,
    pub show_visualizer: bool,
    pub areas: HitAreas,
    visualizer: Visualizer,
    reorder_drag: Option<TrackId>,
    library: LibrarySettings,
    scrub_seconds: u64,
}

impl<E: PlaybackEngine> App<E> {
    pub fn new(player: Player<E>, visualizer: Visualizer, settings: &Settings) -> Self {
        Self {
            player,
            selected: 0,
            mode: InputMode::Normal,
            show_visualizer: settings.visualizer.enabled,
            areas: HitAreas::default(),
            visualizer,
            reorder_drag: None,
            library: settings.library.clone(),
            scrub_seconds: settings.controls.scrub_seconds,
        }
    }

    pub fn visualizer(&self) -> &Visualizer {
        &self.visualizer
    }

    /// Pull a new frame of magnitudes for the bars.
    pub fn on_frame(&mut self) {
        if self.show_visualizer {
            self.visualizer.sample();
        }
    }

    pub fn scrub_seconds(&self) -> u64 {
        self.scrub_seconds
    }

    /// Record the layout of the frame about to be drawn.
    pub fn set_areas(&mut self, areas: HitAreas) {
        self.areas = areas;
        let g = areas.gauge;
        // first column maps to 0, last column to 1
        let span = g.width.saturating_sub(1).max(1);
        self.player
            .progress_mut()
            .set_bounds(f64::from(g.x), f64::from(span));
    }

    pub fn selected_id(&self) -> Option<TrackId> {
        self.player.playlist().id_at(self.selected)
    }

    pub fn clamp_selection(&mut self) {
        let len = self.player.playlist().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.player.playlist().len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection on `id` after the list changed order.
    pub fn follow(&mut self, id: TrackId) {
        if let Some(pos) = self.player.playlist().position(id) {
            self.selected = pos;
        }
    }

    pub fn reorder_drag(&self) -> Option<TrackId> {
        self.reorder_drag
    }

    pub fn start_reorder_drag(&mut self, id: TrackId) {
        self.reorder_drag = Some(id);
    }

    pub fn end_drags(&mut self) {
        self.reorder_drag = None;
        self.player.progress_mut().pointer_up();
    }

    /// Add paths to the end of the playlist. Returns how many tracks were added.
    pub fn drop_paths(&mut self, paths: &[PathBuf]) -> usize {
        if paths.is_empty() {
            return 0;
        }
        let outcome = expand_drop(paths, &self.library);
        let added = outcome.tracks.len();
        for track in outcome.tracks {
            self.player.append(track);
        }
        info!("drop: {added} tracks added, {} missing", outcome.missing.len());

        match outcome.missing.as_slice() {
            [] => {}
            [one] => self
                .player
                .notify(format!("skipped missing path {}", one.display())),
            many => self
                .player
                .notify(format!("skipped {} missing paths", many.len())),
        }
        added
    }

    /// Treat pasted text as a drop.
    pub fn drop_text(&mut self, text: &str) -> usize {
        self.drop_paths(&parse_drop(text))
    }
}
