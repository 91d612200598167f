use std::fs;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use super::*;
use crate::config::Settings;
use crate::player::testing::FakeEngine;
use crate::player::{PlaybackState, Player};
use crate::visualizer::{SpectrumSource, Visualizer};

struct Silent;

impl SpectrumSource for Silent {
    fn frequency_bin_count(&self) -> usize {
        4
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        out.fill(0);
    }
}

fn app() -> App<FakeEngine> {
    let settings = Settings::default();
    let visualizer = Visualizer::new(Box::new(Silent), &settings.visualizer);
    App::new(Player::new(FakeEngine::default()), visualizer, &settings)
}

fn touch(dir: &Path, name: &str) -> String {
    let p = dir.join(name);
    fs::write(&p, b"").unwrap();
    p.to_string_lossy().into_owned()
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn names(app: &App<FakeEngine>) -> Vec<String> {
    app.player
        .playlist()
        .iter()
        .map(|(_, t)| t.display_name.clone())
        .collect()
}

/// App with tracks A..=n appended directly and a list area at rows 5..15.
fn app_with(tracks: &[&str]) -> App<FakeEngine> {
    let mut app = app();
    for name in tracks {
        app.player
            .append(crate::library::Track::from_path(format!("/m/{name}")));
    }
    app.set_areas(HitAreas {
        list: Rect::new(1, 5, 40, 10),
        list_offset: 0,
        gauge: Rect::new(1, 20, 11, 1),
    });
    app
}

#[test]
fn pasting_a_file_drops_it_and_enter_plays_it() {
    let dir = tempfile::tempdir().unwrap();
    let song = touch(dir.path(), "song1.mp3");

    let mut app = app();
    assert!(!app.on_event(Event::Paste(format!("{song}\n"))));
    assert_eq!(names(&app), vec!["song1.mp3"]);

    app.on_event(key(KeyCode::Enter));
    assert_eq!(app.player.state(), PlaybackState::Playing);
    assert_eq!(
        app.player.current_track().map(|t| t.display_name.as_str()),
        Some("song1.mp3")
    );
}

#[test]
fn pasting_a_missing_path_raises_a_notice() {
    let dir = tempfile::tempdir().unwrap();
    let real = touch(dir.path(), "a.ogg");
    let gone = dir.path().join("gone.ogg");

    let mut app = app();
    app.on_paste(&format!("{real}\n{}", gone.display()));
    assert_eq!(names(&app), vec!["a.ogg"]);
    assert!(app.player.notice().unwrap().contains("gone.ogg"));

    app.on_event(key(KeyCode::Esc));
    assert!(app.player.notice().is_none());
}

#[test]
fn pasting_a_directory_adds_its_audio_files_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "b.mp3");
    touch(dir.path(), "A.flac");
    touch(dir.path(), "cover.jpg");

    let mut app = app();
    app.on_paste(&dir.path().display().to_string());
    assert_eq!(names(&app), vec!["A.flac", "b.mp3"]);
}

#[test]
fn add_prompt_collects_typed_and_pasted_text() {
    let dir = tempfile::tempdir().unwrap();
    let song = touch(dir.path(), "typed.wav");
    let (head, tail) = song.split_at(song.len() - 3);

    let mut app = app();
    app.on_event(key(KeyCode::Char('a')));
    assert_eq!(app.mode, InputMode::AddPath(String::new()));

    app.on_event(Event::Paste(head.to_string()));
    for c in tail.chars() {
        app.on_event(key(KeyCode::Char(c)));
    }
    // keys that normally act on the player are text here
    app.on_event(key(KeyCode::Char('q')));
    app.on_event(key(KeyCode::Backspace));
    app.on_event(key(KeyCode::Enter));

    assert_eq!(app.mode, InputMode::Normal);
    assert_eq!(names(&app), vec!["typed.wav"]);
}

#[test]
fn escape_cancels_the_prompt() {
    let mut app = app();
    app.on_event(key(KeyCode::Char('a')));
    app.on_event(key(KeyCode::Char('x')));
    app.on_event(key(KeyCode::Esc));
    assert_eq!(app.mode, InputMode::Normal);
    assert!(app.player.playlist().is_empty());
}

#[test]
fn play_pause_and_skip_keys() {
    let mut app = app_with(&["A", "B", "C"]);

    app.on_event(key(KeyCode::Char(' ')));
    assert_eq!(app.player.state(), PlaybackState::Playing);
    app.on_event(key(KeyCode::Char('p')));
    assert_eq!(app.player.state(), PlaybackState::Paused);

    app.on_event(key(KeyCode::Char('n')));
    app.on_event(key(KeyCode::Right));
    assert_eq!(app.player.playlist().index_of_current(), Some(2));
    app.on_event(key(KeyCode::Left));
    assert_eq!(app.player.playlist().index_of_current(), Some(1));

    app.on_event(key(KeyCode::Char('n')));
    app.on_event(key(KeyCode::Char('n')));
    assert_eq!(app.player.playlist().current(), None);
    assert_eq!(app.player.state(), PlaybackState::Idle);
}

#[test]
fn keyboard_reorder_moves_the_selected_track_and_the_selection() {
    let mut app = app_with(&["A", "B", "C"]);

    app.on_event(key(KeyCode::Char('J')));
    assert_eq!(names(&app), vec!["B", "A", "C"]);
    assert_eq!(app.selected, 1);

    app.on_event(key(KeyCode::Char('J')));
    app.on_event(key(KeyCode::Char('J')));
    assert_eq!(names(&app), vec!["B", "C", "A"]);
    assert_eq!(app.selected, 2);

    app.on_event(key(KeyCode::Char('K')));
    assert_eq!(names(&app), vec!["B", "A", "C"]);
    assert_eq!(app.selected, 1);
}

#[test]
fn deleting_the_last_row_keeps_the_selection_in_range() {
    let mut app = app_with(&["A", "B"]);
    app.on_event(key(KeyCode::Char('j')));
    app.on_event(key(KeyCode::Enter));

    app.on_event(key(KeyCode::Delete));
    assert_eq!(names(&app), vec!["A"]);
    assert_eq!(app.selected, 0);
    assert_eq!(app.player.state(), PlaybackState::Idle);

    app.on_event(key(KeyCode::Char('d')));
    assert!(app.player.playlist().is_empty());
    app.on_event(key(KeyCode::Char('d')));
}

#[test]
fn scrub_keys_seek_by_the_configured_step() {
    let mut app = app_with(&["A"]);
    app.on_event(key(KeyCode::Enter));

    app.on_event(key(KeyCode::Char('L')));
    app.on_event(key(KeyCode::Char('L')));
    app.on_event(key(KeyCode::Char('H')));
    let pos = app.player.position();
    assert!(pos.abs_diff(Duration::from_secs(5)) < Duration::from_millis(1));
}

#[test]
fn quit_keys() {
    let mut app = app();
    assert!(app.on_event(key(KeyCode::Char('q'))));
    assert!(app.on_event(Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL
    ))));
}

#[test]
fn visualizer_toggle_stops_sampling() {
    let mut app = app();
    assert!(app.show_visualizer);
    app.on_event(key(KeyCode::Char('v')));
    assert!(!app.show_visualizer);
    app.on_frame();
    app.on_event(key(KeyCode::Char('v')));
    assert!(app.show_visualizer);
}

#[test]
fn clicking_the_play_column_plays_that_row() {
    let mut app = app_with(&["A", "B", "C"]);
    app.on_event(mouse(MouseEventKind::Down(MouseButton::Left), 1, 7));

    assert_eq!(app.player.playlist().index_of_current(), Some(2));
    assert_eq!(app.player.state(), PlaybackState::Playing);
    assert_eq!(app.selected, 2);
    assert_eq!(app.reorder_drag(), None);
}

#[test]
fn dragging_a_row_reorders_until_release() {
    let mut app = app_with(&["A", "B", "C", "D"]);

    app.on_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
    assert!(app.reorder_drag().is_some());

    app.on_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 7));
    assert_eq!(names(&app), vec!["B", "C", "A", "D"]);
    assert_eq!(app.selected, 2);

    app.on_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 6));
    assert_eq!(names(&app), vec!["B", "A", "C", "D"]);

    app.on_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 6));
    app.on_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 8));
    assert_eq!(names(&app), vec!["B", "A", "C", "D"]);
}

#[test]
fn rows_below_the_list_are_ignored() {
    let mut app = app_with(&["A", "B"]);
    app.on_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 9));
    assert_eq!(app.reorder_drag(), None);
    assert_eq!(app.selected, 0);
}

#[test]
fn gauge_drag_seeks_and_release_wins() {
    let mut app = app_with(&["A"]);
    app.on_event(key(KeyCode::Enter));

    // gauge spans columns 1..=11, so column 6 is the middle
    app.on_event(mouse(MouseEventKind::Down(MouseButton::Left), 6, 20));
    assert!(app.player.progress().is_dragging());
    assert!((app.player.progress().percent() - 50.0).abs() < 1e-9);
    assert_eq!(app.player.position(), Duration::from_secs(100));

    // pointer leaves the bar but capture continues
    app.on_event(mouse(MouseEventKind::Drag(MouseButton::Left), 60, 3));
    assert_eq!(app.player.position(), Duration::from_secs(200));

    app.on_event(mouse(MouseEventKind::Up(MouseButton::Left), 60, 3));
    app.on_event(mouse(MouseEventKind::Moved, 1, 20));
    assert_eq!(app.player.position(), Duration::from_secs(200));
    assert!(!app.player.progress().is_dragging());
}

#[test]
fn list_offset_maps_rows_to_later_tracks() {
    let mut app = app_with(&["A", "B", "C", "D"]);
    app.set_areas(HitAreas {
        list: Rect::new(1, 5, 40, 2),
        list_offset: 2,
        gauge: Rect::default(),
    });
    app.on_event(mouse(MouseEventKind::Down(MouseButton::Left), 1, 6));
    assert_eq!(
        app.player.current_track().map(|t| t.display_name.as_str()),
        Some("D")
    );
}

#[test]
fn list_window_centres_the_selection() {
    assert_eq!(list_window(0, 3, 10), (0, 3));
    assert_eq!(list_window(0, 20, 5), (0, 5));
    assert_eq!(list_window(10, 20, 5), (8, 13));
    assert_eq!(list_window(19, 20, 5), (15, 20));
    assert_eq!(list_window(3, 20, 0), (0, 20));
}
