//! Linear undo/redo log.
//!
//! Entries are kept in the order they were committed together with a cursor
//! that marks the newest applied entry. Everything past the cursor is redo
//! history and is dropped as soon as a new entry is appended.

#[derive(Clone, Debug)]
pub struct History<T> {
    entries: Vec<T>,
    /// Number of entries currently applied; the cursor is `applied - 1`.
    applied: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            applied: 0,
        }
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards any redo branch, then appends `entry` and applies it.
    pub fn append(&mut self, entry: T) {
        self.entries.truncate(self.applied);
        self.entries.push(entry);
        self.applied = self.entries.len();
    }

    /// Steps the cursor back. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.applied -= 1;
        true
    }

    /// Steps the cursor forward. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.applied += 1;
        true
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.applied = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Index of the newest applied entry, `None` when nothing is applied.
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// The applied prefix, oldest first. Replaying it reproduces the drawing.
    pub fn current_state(&self) -> &[T] {
        &self.entries[..self.applied]
    }

    /// The newest applied entry.
    pub fn current(&self) -> Option<&T> {
        self.cursor().map(|index| &self.entries[index])
    }

    pub fn applied_len(&self) -> usize {
        self.applied
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::History;
    use crate::{Point, Stroke};

    fn stroke(points: usize, offset: f32) -> Stroke {
        Stroke::new(
            (0..points)
                .map(|i| Point::new(offset + i as f32, offset))
                .collect(),
        )
    }

    #[test]
    fn starts_empty() {
        let history = History::<Stroke>::new();
        assert_eq!(history.cursor(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.current_state().is_empty());
        assert!(history.current().is_none());
    }

    #[test]
    fn cursor_tracks_end_while_appending() {
        let mut history = History::new();
        for i in 0..5 {
            history.append(i);
            assert_eq!(history.cursor(), Some(history.len() - 1));
            assert!(!history.can_redo());
        }
    }

    #[test]
    fn undo_then_redo_is_identity() {
        let mut history = History::new();
        history.append(1);
        history.append(2);
        history.append(3);
        history.undo();

        let before = (history.entries().to_vec(), history.cursor());
        assert!(history.can_undo());
        assert!(history.undo());
        assert!(history.redo());
        assert_eq!((history.entries().to_vec(), history.cursor()), before);
    }

    #[test]
    fn append_after_undo_discards_redo_branch() {
        let a = stroke(2, 0.0);
        let b = stroke(3, 10.0);
        let c = stroke(2, 20.0);

        let mut history = History::new();
        history.append(a.clone());
        history.append(b);
        assert_eq!(history.cursor(), Some(1));
        assert!(history.can_undo());
        assert!(!history.can_redo());

        assert!(history.undo());
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.current_state(), &[a.clone()]);

        history.append(c.clone());
        assert_eq!(history.entries(), &[a, c]);
        assert_eq!(history.cursor(), Some(1));
        assert!(!history.can_redo());
    }

    #[test]
    fn append_after_undoing_everything_replaces_all() {
        let mut history = History::new();
        history.append('a');
        history.append('b');
        history.undo();
        history.undo();
        assert_eq!(history.cursor(), None);
        assert!(history.can_redo());

        history.append('c');
        assert_eq!(history.entries(), &['c']);
        assert_eq!(history.current(), Some(&'c'));
    }

    #[test]
    fn undo_at_start_is_noop() {
        let mut history = History::new();
        assert!(!history.undo());
        history.append(1);
        history.undo();
        assert!(!history.undo());
        assert_eq!(history.cursor(), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn redo_at_end_is_noop() {
        let mut history = History::new();
        history.append(1);
        assert!(!history.redo());
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn reset_clears_both_directions() {
        let mut history = History::new();
        history.append(1);
        history.append(2);
        history.undo();
        history.reset();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.is_empty());

        history.reset();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn identical_entries_are_kept() {
        let mut history = History::new();
        history.append(7);
        history.append(7);
        assert_eq!(history.len(), 2);
    }
}
