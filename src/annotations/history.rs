//! Bounded linear undo/redo log of whole annotation-set snapshots

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use super::store::AnnotationSet;

/// Number of snapshots kept by default
pub const DEFAULT_CAPACITY: usize = 50;

/// Immutable snapshot of the annotation set at one point in time
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub annotations: AnnotationSet,
    pub recorded_at: DateTime<Local>,
}

impl HistoryEntry {
    fn new(annotations: AnnotationSet) -> Self {
        Self {
            annotations,
            recorded_at: Local::now(),
        }
    }
}

/// The log always holds at least one entry; `cursor` points at the active one.
#[derive(Clone, Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    capacity: usize,
}

impl History {
    /// Start a log whose first entry is `initial`
    pub fn new(capacity: usize, initial: AnnotationSet) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity);
        entries.push_back(HistoryEntry::new(initial));
        Self {
            entries,
            cursor: 0,
            capacity,
        }
    }

    /// Drop everything and start again from `initial`
    pub fn reset(&mut self, initial: AnnotationSet) {
        *self = Self::new(self.capacity, initial);
    }

    /// Commit a snapshot, discarding any redo branch
    pub fn record(&mut self, snapshot: AnnotationSet) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(HistoryEntry::new(snapshot));
        self.cursor = self.entries.len() - 1;

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.cursor = self.cursor.saturating_sub(1);
        }
        log::debug!(
            "History recorded: {} entries, cursor {}",
            self.entries.len(),
            self.cursor
        );
    }

    /// Step back one entry and return its snapshot
    pub fn undo(&mut self) -> Option<AnnotationSet> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].annotations.clone())
    }

    /// Step forward one entry and return its snapshot
    pub fn redo(&mut self) -> Option<AnnotationSet> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].annotations.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Currently active entry
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, AnnotationSet::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::domain::{Annotation, AnnotationId, AnnotationKind, Point, Stroke};

    fn stroke_annotation(id: u64) -> Annotation {
        Annotation::new(
            AnnotationId(id),
            1,
            AnnotationKind::Ink(vec![Stroke {
                points: vec![Point::new(0.0, id as f32), Point::new(10.0, id as f32)],
                color: Color::rgb(0xef, 0x44, 0x44),
                width: 3.0,
            }]),
        )
    }

    /// Commit `count` appends, returning the set after each commit
    fn commit_many(history: &mut History, count: u64) -> Vec<AnnotationSet> {
        let mut set = history.current().annotations.clone();
        let mut states = Vec::new();
        for id in 1..=count {
            set = set.append(stroke_annotation(id));
            history.record(set.clone());
            states.push(set.clone());
        }
        states
    }

    #[test]
    fn undo_and_redo_are_noops_at_the_ends() {
        let mut history = History::default();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());

        commit_many(&mut history, 1);
        assert!(history.redo().is_none());
        assert!(history.undo().is_some());
        assert!(history.undo().is_none());
    }

    #[test]
    fn undo_then_redo_round_trips() {
        for k in [1u64, 5, 20, 49] {
            let mut history = History::default();
            let states = commit_many(&mut history, k);

            for _ in 0..k {
                assert!(history.undo().is_some());
            }
            assert!(history.current().annotations.is_empty());

            let mut last = None;
            for _ in 0..k {
                last = history.redo();
            }
            assert_eq!(last.as_ref(), states.last());
        }
    }

    #[test]
    fn recording_after_undo_discards_redo_branch() {
        let mut history = History::default();
        commit_many(&mut history, 3);
        history.undo();
        history.undo();
        assert!(history.can_redo());

        let branch = history
            .current()
            .annotations
            .append(stroke_annotation(99));
        history.record(branch.clone());

        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().annotations, branch);
    }

    #[test]
    fn overflow_evicts_oldest_entry() {
        let mut history = History::default();
        commit_many(&mut history, 50);
        assert_eq!(history.len(), DEFAULT_CAPACITY);
        assert_eq!(history.cursor(), DEFAULT_CAPACITY - 1);

        let mut depth = 0;
        while history.undo().is_some() {
            depth += 1;
        }
        assert!(depth <= DEFAULT_CAPACITY);
        assert_eq!(depth, DEFAULT_CAPACITY - 1);
        // The empty starting snapshot was evicted.
        assert_eq!(history.current().annotations.len(), 1);
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut history = History::new(5, AnnotationSet::new());
        commit_many(&mut history, 8);
        assert_eq!(history.len(), 5);
        history.reset(AnnotationSet::new());
        assert_eq!(history.len(), 1);
        assert_eq!(history.capacity(), 5);
        assert!(!history.can_undo());
    }
}
