// File: src/core/context.rs

/// Lookbehind state for the syllable currently being written.
/// Only a byte offset into the output is kept, so memory stays constant.
#[derive(Debug, Clone, Default)]
pub struct SyllableContext {
    syllable_start: Option<usize>,
}

impl SyllableContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `at` (an output byte offset) as the start of a new syllable.
    pub fn begin(&mut self, at: usize) {
        self.syllable_start = Some(at);
    }

    /// Whitespace, punctuation and numerals end the syllable.
    pub fn close(&mut self) {
        self.syllable_start = None;
    }

    /// Where a reph typed after the syllable must be inserted. A syllable
    /// takes one reph, so the anchor is consumed.
    pub fn take_reph_anchor(&mut self) -> Option<usize> {
        self.syllable_start.take()
    }
}
