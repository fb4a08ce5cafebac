//! Riffle shuffle of cropped tab documents
//!
//! Every tab document holds one page per slot. Interleaving them slot-major
//! puts each room's pages from all tabs next to each other:
//!
//! ```text
//! tab A: A0 A1 A2        slot 0    slot 1    slot 2
//! tab B: B0 B1 B2   ->   A0 B0  |  A1 B1  |  A2 B2
//! ```

use crate::crop::TabDocument;
use crate::layout::PlanLayout;
use crate::render::{PageSource, PageWriter};
use crate::types::*;
use lopdf::Document;
use std::ops::Range;

/// All tabs' cropped pages in slot-major order
#[derive(Debug, Clone)]
pub struct InterleavedDocument {
    document: Document,
    layout: PlanLayout,
}

impl InterleavedDocument {
    /// Wrap an already interleaved document.
    ///
    /// The document's actual page count may differ from `layout.total_pages()`
    /// when it was produced elsewhere; assembly clamps to what is there.
    pub fn new(document: Document, layout: PlanLayout) -> Self {
        Self { document, layout }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn layout(&self) -> PlanLayout {
        self.layout
    }

    pub fn tab_count(&self) -> usize {
        self.layout.tab_count
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page indices of `slot`'s block, clamped to the pages actually present
    pub fn slot_pages(&self, slot: usize) -> Range<usize> {
        let expected = self.layout.slot_pages(slot);
        let available = self.page_count();
        expected.start.min(available)..expected.end.min(available)
    }
}

/// Interleave tab documents page-major by slot.
///
/// Output page `slot * N + tab` is page `slot` of `tabs[tab]`. All documents
/// must have the same page count; otherwise nothing is produced and the error
/// lists every tab's count.
pub fn riffle(tabs: &[TabDocument]) -> Result<InterleavedDocument> {
    if tabs.is_empty() {
        return Err(PlanError::NoTabs);
    }

    let counts: Vec<TabPageCount> = tabs
        .iter()
        .map(|tab| TabPageCount {
            tab: tab.tab().to_string(),
            pages: tab.page_count(),
        })
        .collect();

    let slot_count = counts[0].pages;
    if counts.iter().any(|count| count.pages != slot_count) {
        return Err(PlanError::PageCountMismatch { counts });
    }

    let layout = PlanLayout::new(tabs.len(), slot_count);
    let mut sources: Vec<PageSource<'_>> = tabs
        .iter()
        .map(|tab| PageSource::new(tab.document()))
        .collect();

    let mut writer = PageWriter::new();
    for slot in 0..layout.slot_count {
        for (tab, source) in sources.iter_mut().enumerate() {
            debug_assert_eq!(writer.page_count(), layout.page_index(slot, tab));
            writer.append_page(source, slot)?;
        }
    }

    log::debug!(
        "Interleaved {} tab(s) x {} slot(s) into {} page(s)",
        layout.tab_count,
        layout.slot_count,
        writer.page_count()
    );

    Ok(InterleavedDocument::new(writer.finish(), layout))
}
