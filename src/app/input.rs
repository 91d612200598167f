//! Keyboard, mouse and paste handling.

use std::path::PathBuf;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::debug;
use ratatui::layout::{Position, Rect};

use crate::engine::PlaybackEngine;
use crate::playlist::TrackId;

use super::model::{App, InputMode, PLAY_COLUMN_WIDTH};

fn contains(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}

impl<E: PlaybackEngine> App<E> {
    /// Handle one terminal event. Returns `true` when the user asked to quit.
    pub fn on_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
            Event::Mouse(mouse) => {
                self.on_mouse(mouse);
                false
            }
            Event::Paste(text) => {
                self.on_paste(&text);
                false
            }
            _ => false,
        }
    }

    pub fn on_paste(&mut self, text: &str) {
        if let InputMode::AddPath(buf) = &mut self.mode {
            buf.push_str(text.trim_end_matches(['\r', '\n']));
            return;
        }
        self.drop_text(text);
    }

    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        if let InputMode::AddPath(_) = self.mode {
            self.on_prompt_key(key);
            return false;
        }

        let scrub = i64::try_from(self.scrub_seconds()).unwrap_or(i64::MAX);
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char(' ') | KeyCode::Char('p') => self.player.toggle_play_pause(),
            KeyCode::Char('n') | KeyCode::Right => {
                self.player.next();
            }
            KeyCode::Char('b') | KeyCode::Left => {
                self.player.previous();
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.player.play(id);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('J') => self.move_selected(1),
            KeyCode::Char('K') => self.move_selected(-1),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.player.remove(id);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('L') => {
                self.player.seek_by(scrub);
            }
            KeyCode::Char('H') => {
                self.player.seek_by(-scrub);
            }
            KeyCode::Char('a') => self.mode = InputMode::AddPath(String::new()),
            KeyCode::Char('v') => self.show_visualizer = !self.show_visualizer,
            KeyCode::Esc => self.player.dismiss_notice(),
            _ => {}
        }
        false
    }

    fn on_prompt_key(&mut self, key: KeyEvent) {
        let InputMode::AddPath(buf) = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char(c) if !c.is_control() => buf.push(c),
            KeyCode::Enter => {
                let typed = std::mem::take(buf);
                self.mode = InputMode::Normal;
                let typed = typed.trim();
                if !typed.is_empty() {
                    self.drop_paths(&[PathBuf::from(typed)]);
                }
            }
            _ => {}
        }
    }

    fn move_selected(&mut self, delta: isize) {
        if let Some(id) = self.selected_id() {
            if self.player.move_by(id, delta) {
                self.follow(id);
            }
        }
    }

    /// Playlist entry under a screen row, if the row shows one.
    fn row_track(&self, row: u16) -> Option<TrackId> {
        let list = self.areas.list;
        if row < list.y || row >= list.bottom() {
            return None;
        }
        let index = self.areas.list_offset + usize::from(row - list.y);
        self.player.playlist().id_at(index)
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if contains(self.areas.gauge, col, row) {
                    if let Some(f) = self.player.progress_mut().pointer_down(f64::from(col)) {
                        self.player.seek_fraction(f);
                    }
                    return;
                }
                if !contains(self.areas.list, col, row) {
                    return;
                }
                let Some(id) = self.row_track(row) else {
                    return;
                };
                self.follow(id);
                if col < self.areas.list.x + PLAY_COLUMN_WIDTH {
                    self.player.play(id);
                } else {
                    self.start_reorder_drag(id);
                }
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                if self.player.progress().is_dragging() {
                    if let Some(f) = self.player.progress_mut().pointer_move(f64::from(col)) {
                        self.player.seek_fraction(f);
                    }
                    return;
                }
                let Some(dragging) = self.reorder_drag() else {
                    return;
                };
                if let Some(target) = self.row_track(row) {
                    if self.player.drag_over(dragging, target) {
                        debug!("reorder drag moved {dragging:?} over {target:?}");
                        self.follow(dragging);
                    }
                }
            }
            MouseEventKind::Up(_) => self.end_drags(),
            MouseEventKind::ScrollDown => self.select_next(),
            MouseEventKind::ScrollUp => self.select_prev(),
            _ => {}
        }
    }
}
