//! UI rendering helpers for the terminal user interface.
//!
//! `compute_areas` lays the screen out and `draw` renders the app into
//! those areas; the runtime hands the same areas to the app for mouse
//! hit-testing so both always agree.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, HitAreas, InputMode, list_window};
use crate::config::{Settings, TimeField, UiSettings};
use crate::engine::PlaybackEngine;
use crate::player::PlaybackState;
use crate::visualizer::BufferSurface;

const PLAY_BUTTON: &str = "⏵ ";
const CURRENT_MARK: &str = "▶ ";
const VISUALIZER_HEIGHT: u16 = 10;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("J/K".to_string(), "move track".to_string());
    map.insert("enter".to_string(), "play selected".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("b/n".to_string(), "prev/next".to_string());
    // H/L is filled dynamically from config.
    map.insert("a".to_string(), "add path".to_string());
    map.insert("d".to_string(), "remove".to_string());
    map.insert("v".to_string(), "visualizer".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "J/K", "enter", "space/p", "b/n", "H/L", "a", "d", "v", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the gauge label (elapsed/total/remaining) per `UiSettings`.
fn time_text(elapsed: Duration, total: Option<Duration>, ui: &UiSettings) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

/// Screen regions for one frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub status: Rect,
    pub list: Rect,
    pub gauge: Rect,
    pub visualizer: Option<Rect>,
    pub controls: Rect,
    pub prompt: Option<Rect>,
}

impl Areas {
    /// Mouse targets for `app` when drawn into these areas.
    pub fn hit_areas<E: PlaybackEngine>(&self, app: &App<E>) -> HitAreas {
        let list = bordered_inner(self.list);
        let (start, _) = list_window(
            app.selected,
            app.player.playlist().len(),
            usize::from(list.height),
        );
        HitAreas {
            list,
            list_offset: start,
            gauge: bordered_inner(self.gauge),
        }
    }
}

fn bordered_inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

pub fn compute_areas(area: Rect, show_visualizer: bool, prompt: bool) -> Areas {
    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Min(3),
        Constraint::Length(3),
    ];
    if show_visualizer {
        constraints.push(Constraint::Length(VISUALIZER_HEIGHT));
    }
    constraints.push(Constraint::Length(4));
    if prompt {
        constraints.push(Constraint::Length(3));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut next = 4;
    let visualizer = show_visualizer.then(|| {
        next += 1;
        chunks[next - 1]
    });
    let controls = chunks[next];
    let prompt = prompt.then(|| chunks[next + 1]);

    Areas {
        header: chunks[0],
        status: chunks[1],
        list: chunks[2],
        gauge: chunks[3],
        visualizer,
        controls,
        prompt,
    }
}

/// Render the entire UI into `frame`.
pub fn draw<E: PlaybackEngine>(
    frame: &mut Frame,
    app: &App<E>,
    areas: &Areas,
    settings: &Settings,
) {
    let ui_settings = &settings.ui;
    let player = &app.player;

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" dropdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, areas.header);

    // Status box
    let mut lines: Vec<Line> = Vec::new();
    let now_playing = match player.current_track() {
        Some(track) => format!("Song: {}", track.display_name),
        None => "Song: -".to_string(),
    };
    lines.push(Line::from(format!(
        "{} • {} • {} tracks",
        now_playing,
        state_label(player.state()),
        player.playlist().len()
    )));
    if let Some(notice) = player.notice() {
        lines.push(Line::from(Span::styled(
            format!("{notice} (esc dismisses)"),
            Style::default().fg(Color::Yellow),
        )));
    }
    let status = Paragraph::new(lines)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, areas.status);

    // Playlist: a projection of the store, windowed around the selection.
    {
        let total = player.playlist().len();
        let list_height = usize::from(bordered_inner(areas.list).height);
        let (start, end) = list_window(app.selected, total, list_height);
        let current = player.playlist().current();

        let visible_items: Vec<ListItem> = player
            .playlist()
            .iter()
            .skip(start)
            .take(end - start)
            .map(|(id, track)| {
                let (mark, style) = if Some(id) == current {
                    (CURRENT_MARK, Style::default().add_modifier(Modifier::BOLD))
                } else {
                    (PLAY_BUTTON, Style::default())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, Style::default().fg(Color::Cyan)),
                    Span::styled(track.display_name.as_str(), style),
                ]))
            })
            .collect();

        let title = match app.reorder_drag() {
            Some(_) => " playlist (dragging) ",
            None => " playlist ",
        };
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        if !player.playlist().is_empty() {
            state.select(Some(app.selected.saturating_sub(start)));
        }
        frame.render_stateful_widget(list, areas.list, &mut state);
    }

    // Progress
    let label = time_text(player.position(), player.duration(), ui_settings).unwrap_or_default();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().fg(Color::Rgb(50, 50, 200)))
        .ratio(player.progress().percent() / 100.0)
        .label(label);
    frame.render_widget(gauge, areas.gauge);

    if let Some(area) = areas.visualizer {
        let block = Block::default().borders(Borders::ALL).title(" visualizer ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let mut surface = BufferSurface::new(frame.buffer_mut(), inner);
        app.visualizer().draw(&mut surface);
    }

    let footer = Paragraph::new(controls_text(app.scrub_seconds()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.controls);

    if let (Some(area), InputMode::AddPath(typed)) = (areas.prompt, &app.mode) {
        let prompt = Paragraph::new(format!("{typed}▏")).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" add path (enter adds, esc cancels) "),
        );
        frame.render_widget(prompt, area);
    }
}
