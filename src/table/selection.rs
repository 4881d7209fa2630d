use std::collections::HashSet;

use crate::members::{Member, MemberId};

/// How much of a row set is currently checked (drives the header checkbox)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    None,
    Partial,
    All,
}

/// Ids the user has checked. Kept apart from the row pipeline so sorting or
/// filtering never touches it.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<MemberId>,
}

impl Selection {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip a single row in or out of the selection
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Select every row in `visible` (the rows matching the current filter),
    /// or clear the selection when all of them are already checked.
    pub fn toggle_all(&mut self, visible: &[&Member]) {
        if self.coverage(visible) == Coverage::All {
            self.ids.clear();
        } else {
            self.ids = visible.iter().map(|m| m.id.clone()).collect();
        }
    }

    pub fn coverage(&self, rows: &[&Member]) -> Coverage {
        let checked = rows.iter().filter(|m| self.ids.contains(&m.id)).count();
        if rows.is_empty() || checked == 0 {
            Coverage::None
        } else if checked == rows.len() {
            Coverage::All
        } else {
            Coverage::Partial
        }
    }

    /// Hand over the selected ids, leaving the selection empty
    pub fn take(&mut self) -> HashSet<MemberId> {
        std::mem::take(&mut self.ids)
    }
}
