//! Slot/tab arithmetic for the interleaved plan document
//!
//! Interleaving writes page `slot * tab_count + tab`; assembly reads back
//! `slot * tab_count .. slot * tab_count + tab_count`. Both sides go through
//! [`PlanLayout`] so the two formulas cannot drift apart.

use std::ops::Range;

/// Shape of an interleaved plan document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLayout {
    /// Number of tabs (pages per room block)
    pub tab_count: usize,
    /// Number of crop table rows (room blocks)
    pub slot_count: usize,
}

impl PlanLayout {
    pub fn new(tab_count: usize, slot_count: usize) -> Self {
        Self {
            tab_count,
            slot_count,
        }
    }

    /// Total pages in the interleaved document
    pub fn total_pages(&self) -> usize {
        self.tab_count * self.slot_count
    }

    /// Absolute page index of `tab`'s page for `slot`
    pub fn page_index(&self, slot: usize, tab: usize) -> usize {
        debug_assert!(tab < self.tab_count);
        slot * self.tab_count + tab
    }

    /// The contiguous block of pages belonging to `slot`, one per tab
    pub fn slot_pages(&self, slot: usize) -> Range<usize> {
        let start = slot * self.tab_count;
        start..start + self.tab_count
    }
}

// =============================================================================
// Tests
// =============================================================================
