/// Linear undo/redo stack of full snapshots.
///
/// Index 0 holds the initial state. Pushing after an undo drops every
/// snapshot past the cursor.
#[derive(Debug, Clone)]
pub(crate) struct History<T> {
    snapshots: Vec<T>,
    cursor: usize,
}

impl<T: Clone> History<T> {
    /// Starts a history whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Records `snapshot` as the new current entry.
    pub fn push(&mut self, snapshot: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
    }

    /// Steps back one entry. Returns `None` at the start of history.
    pub fn undo(&mut self) -> Option<T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor).cloned()
    }

    /// Steps forward one entry. Returns `None` at the end of history.
    pub fn redo(&mut self) -> Option<T> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor).cloned()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
