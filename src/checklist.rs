use serde::{Deserialize, Serialize};

pub const ITEMS: [&str; 10] = [
    "Preferences persist after refresh",
    "Match score calculates correctly",
    "\"Show only matches\" toggle works",
    "Save job persists after refresh",
    "Apply opens the posting link",
    "Status update persists after refresh",
    "Status filter works correctly",
    "Digest generates top 10 by score",
    "Digest persists for the day",
    "No errors on any main view",
];

/// Manual verification steps. Shipping is locked until every step passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklist {
    flags: [bool; ITEMS.len()],
}

impl Checklist {
    /// Mark step `index` (zero based). Out-of-range indexes are ignored.
    pub fn set(&mut self, index: usize, passed: bool) -> bool {
        match self.flags.get_mut(index) {
            Some(flag) => {
                *flag = passed;
                true
            }
            None => false,
        }
    }

    pub fn is_passed(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    pub fn passed_count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    pub fn ready_to_ship(&self) -> bool {
        self.flags.iter().all(|f| *f)
    }

    pub fn reset(&mut self) {
        self.flags = [false; ITEMS.len()];
    }

    pub fn items(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        ITEMS
            .iter()
            .enumerate()
            .map(|(i, label)| (*label, self.is_passed(i)))
    }
}
