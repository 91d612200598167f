//! The playlist store: an ordered list of dropped tracks and the single
//! "current" marker.
//!
//! The list widget is a projection of this store; nothing about order or the
//! current track lives in the UI.

use crate::library::Track;

/// Stable handle to a playlist entry. Ids are never reused within a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(u64);

/// Outcome of stepping forward through the playlist.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    To(TrackId),
    EndReached,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TrackId,
    track: Track,
}

#[derive(Debug, Default)]
pub struct Playlist {
    entries: Vec<Entry>,
    current: Option<TrackId>,
    next_id: u64,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `track` at the end. Any track is accepted.
    pub fn append(&mut self, track: Track) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, track });
        id
    }

    /// Remove a track, clearing the current marker if it pointed at it.
    pub fn remove(&mut self, id: TrackId) -> Option<Track> {
        let pos = self.position(id)?;
        if self.current == Some(id) {
            self.current = None;
        }
        Some(self.entries.remove(pos).track)
    }

    /// Drop every track and the current marker.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.track)
    }

    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<TrackId> {
        self.entries.get(index).map(|e| e.id)
    }

    pub fn first(&self) -> Option<TrackId> {
        self.id_at(0)
    }

    /// Entries in playlist order.
    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &Track)> {
        self.entries.iter().map(|e| (e.id, &e.track))
    }

    /// Move `id` so that it sits immediately before `before`.
    ///
    /// Returns `false` (and changes nothing) when either id is not part of
    /// this playlist or both are the same entry.
    pub fn reorder(&mut self, id: TrackId, before: TrackId) -> bool {
        if id == before {
            return false;
        }
        let (Some(from), Some(_)) = (self.position(id), self.position(before)) else {
            return false;
        };

        let entry = self.entries.remove(from);
        // `before` may have shifted left by one after the removal.
        let to = self.position(before).unwrap_or(self.entries.len());
        self.entries.insert(to, entry);
        true
    }

    /// Mouse drag of `dragging` over `target`.
    ///
    /// Dragging upwards places the entry before the target, dragging
    /// downwards places it after, so the dragged row always lands where the
    /// pointer is.
    pub fn drag_over(&mut self, dragging: TrackId, target: TrackId) -> bool {
        let (Some(from), Some(over)) = (self.position(dragging), self.position(target)) else {
            return false;
        };
        if from == over {
            return false;
        }

        let entry = self.entries.remove(from);
        // After removal, `over` indexes the slot right after the target when
        // moving down and the target itself when moving up.
        self.entries.insert(over, entry);
        true
    }

    /// Move `id` by one slot up (`delta < 0`) or down (`delta > 0`).
    pub fn move_by(&mut self, id: TrackId, delta: isize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let Some(to) = from.checked_add_signed(delta.signum()) else {
            return false;
        };
        match self.id_at(to) {
            Some(neighbor) if delta < 0 => self.reorder(id, neighbor),
            Some(neighbor) if delta > 0 => self.reorder(neighbor, id),
            _ => false,
        }
    }

    pub fn current(&self) -> Option<TrackId> {
        self.current
    }

    /// Mark `id` as current, unmarking the previous one.
    pub fn mark_current(&mut self, id: TrackId) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.current = Some(id);
        true
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Position of the current track, or `None` when nothing is current.
    pub fn index_of_current(&self) -> Option<usize> {
        self.current.and_then(|id| self.position(id))
    }

    /// The track after the current one. With nothing current this is the
    /// first track.
    pub fn step_forward(&self) -> Step {
        let target = match self.index_of_current() {
            Some(i) => i + 1,
            None => 0,
        };
        match self.id_at(target) {
            Some(id) => Step::To(id),
            None => Step::EndReached,
        }
    }

    /// The track before the current one; `None` at the first track or when
    /// nothing is current.
    pub fn step_back(&self) -> Option<TrackId> {
        let i = self.index_of_current()?;
        i.checked_sub(1).and_then(|p| self.id_at(p))
    }
}
