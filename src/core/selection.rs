use serde::{Deserialize, Serialize};

use crate::core::state::WorkflowError;
use crate::models::MALES_PER_MATCHING;

/// Male members picked for a matching, in the order they were checked.
///
/// Never holds more than [`MALES_PER_MATCHING`] ids and never holds the
/// same id twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaleSelection {
    ids: Vec<i64>,
}

impl MaleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    /// True once exactly three males are selected
    pub fn is_complete(&self) -> bool {
        self.ids.len() == MALES_PER_MATCHING
    }

    /// Apply a checkbox change.
    ///
    /// Checking a fourth id is rejected and leaves the selection untouched.
    /// Re-checking a selected id is a no-op. Unchecking always removes.
    pub fn toggle(&mut self, id: i64, checked: bool) -> Result<(), WorkflowError> {
        if !checked {
            self.ids.retain(|selected| *selected != id);
            return Ok(());
        }
        if self.contains(id) {
            return Ok(());
        }
        if self.ids.len() >= MALES_PER_MATCHING {
            return Err(WorkflowError::SelectionFull);
        }
        self.ids.push(id);
        Ok(())
    }

    /// Select-all control. Checking fills up to the cap from `visible` in
    /// display order, keeping what is already selected; unchecking clears.
    pub fn select_all<I>(&mut self, visible: I, checked: bool)
    where
        I: IntoIterator<Item = i64>,
    {
        if !checked {
            self.clear();
            return;
        }
        for id in visible {
            if self.is_complete() {
                break;
            }
            if !self.contains(id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
