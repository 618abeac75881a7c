//! Navigation history as an explicit append-only log.
//!
//! The browser's history stack is modeled as `{path, snapshot}` entries
//! with a current-position cursor: push on explicit navigation (which
//! drops any forward branch), replace on in-place mutation or reset,
//! cursor moves on back/forward traversal.

use crate::snapshot::StateSnapshot;

/// One history entry: where we were and what the counter looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub path: String,
    /// Absent until the counter state is first persisted on this entry.
    pub snapshot: Option<StateSnapshot>,
}

/// Append-only log with a cursor. There is always at least one entry,
/// mirroring the browser's initial document entry.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl HistoryLog {
    #[must_use]
    pub fn new(initial_path: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                path: initial_path.to_owned(),
                snapshot: None,
            }],
            cursor: 0,
        }
    }

    #[must_use]
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Push a new entry, discarding any forward branch first.
    pub fn push(&mut self, path: &str, snapshot: Option<StateSnapshot>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            path: path.to_owned(),
            snapshot,
        });
        self.cursor = self.entries.len() - 1;
    }

    /// Replace the entry under the cursor in place.
    pub fn replace(&mut self, path: &str, snapshot: Option<StateSnapshot>) {
        self.entries[self.cursor] = HistoryEntry {
            path: path.to_owned(),
            snapshot,
        };
    }

    /// Replace only the snapshot of the current entry, keeping its path.
    pub fn replace_snapshot(&mut self, snapshot: StateSnapshot) {
        self.entries[self.cursor].snapshot = Some(snapshot);
    }

    /// Move the cursor one entry back, if possible.
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Move the cursor one entry forward, if possible.
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// Realign the cursor after a host-reported traversal (popstate):
    /// prefer an adjacent entry with the reported path, else rewrite
    /// the current entry to match the host.
    pub fn align_to(&mut self, path: &str, snapshot: Option<StateSnapshot>) {
        if self.cursor > 0 && self.entries[self.cursor - 1].path == path {
            self.cursor -= 1;
        } else if self.cursor + 1 < self.entries.len() && self.entries[self.cursor + 1].path == path
        {
            self.cursor += 1;
        }
        self.entries[self.cursor] = HistoryEntry {
            path: path.to_owned(),
            snapshot,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_entry_and_no_snapshot() {
        let log = HistoryLog::new("/");
        assert_eq!(log.len(), 1);
        assert_eq!(log.current().path, "/");
        assert_eq!(log.current().snapshot, None);
    }

    #[test]
    fn push_then_back_round_trips_the_snapshot() {
        let mut log = HistoryLog::new("/");
        log.replace_snapshot(StateSnapshot::new(5, 7));
        log.push("/test", Some(StateSnapshot::new(5, 7)));

        let entry = log.back().expect("one entry behind");
        assert_eq!(entry.path, "/");
        assert_eq!(entry.snapshot, Some(StateSnapshot::new(5, 7)));
    }

    #[test]
    fn push_discards_the_forward_branch() {
        let mut log = HistoryLog::new("/");
        log.push("/test", None);
        log.back();
        log.push("/counter", None);

        assert_eq!(log.len(), 2);
        assert!(log.forward().is_none());
        assert_eq!(log.current().path, "/counter");
    }

    #[test]
    fn replace_keeps_the_stack_depth() {
        let mut log = HistoryLog::new("/");
        log.push("/test", None);
        log.replace("/test", Some(StateSnapshot::new(1, 1)));
        assert_eq!(log.len(), 2);
        assert_eq!(log.current().snapshot, Some(StateSnapshot::new(1, 1)));
    }

    #[test]
    fn back_at_the_oldest_entry_is_a_no_op() {
        let mut log = HistoryLog::new("/");
        assert!(log.back().is_none());
        assert_eq!(log.current().path, "/");
    }

    #[test]
    fn align_to_prefers_adjacent_entries() {
        let mut log = HistoryLog::new("/");
        log.push("/test", None);

        // Host reports traversal back to "/" with a stored snapshot.
        log.align_to("/", Some(StateSnapshot::new(2, 3)));
        assert_eq!(log.current().path, "/");
        assert_eq!(log.current().snapshot, Some(StateSnapshot::new(2, 3)));

        // And forward again.
        log.align_to("/test", None);
        assert_eq!(log.current().path, "/test");
    }
}
