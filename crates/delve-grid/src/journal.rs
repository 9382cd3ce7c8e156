//! Undo journal backing grid transactions.

use delve_core::{BorderId, SquareId};

use crate::border::Border;
use crate::square::Square;

/// One reversible change.
#[derive(Clone, Debug)]
pub(crate) enum Undo {
    /// Restore the square slot to this value.
    Square(SquareId, Square),
    /// Restore the border slot to this value.
    Border(BorderId, Border),
    /// Pop the last square slot.
    SquareCreated,
    /// Pop the last border slot.
    BorderCreated,
}

/// Stack of undo entries with nested transaction marks.
///
/// Entries are only recorded while at least one mark is open. Committing
/// the outermost mark discards the entries; committing an inner mark keeps
/// them so the enclosing transaction can still roll back.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    entries: Vec<Undo>,
    marks: Vec<usize>,
}

impl Journal {
    pub(crate) fn is_active(&self) -> bool {
        !self.marks.is_empty()
    }

    pub(crate) fn depth(&self) -> usize {
        self.marks.len()
    }

    pub(crate) fn record(&mut self, undo: Undo) {
        if self.is_active() {
            self.entries.push(undo);
        }
    }

    pub(crate) fn begin(&mut self) {
        self.marks.push(self.entries.len());
    }

    /// Close the innermost mark. Returns `false` if none was open.
    pub(crate) fn commit(&mut self) -> bool {
        if self.marks.pop().is_none() {
            return false;
        }
        if self.marks.is_empty() {
            self.entries.clear();
        }
        true
    }

    /// Close the innermost mark and hand back its entries, newest first.
    pub(crate) fn unwind(&mut self) -> Option<Vec<Undo>> {
        let mark = self.marks.pop()?;
        let mut undone = self.entries.split_off(mark);
        undone.reverse();
        Some(undone)
    }
}
