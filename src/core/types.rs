// src/core/types.rs
use serde::{Deserialize, Serialize};

pub const HALANTA: char = '\u{094d}';
pub const DEVANAGARI_ZERO: char = '\u{0966}';

/// What a Preeti glyph contributes to an orthographic syllable.
/// The engine decides reordering from this tag alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlyphClass {
    /// Full consonant, half form (run ends in a halanta) or a pre-built conjunct.
    Consonant,
    IndependentVowel,
    DependentVowelSign,
    /// Typed before its consonant, stored after it (the `ि` glyph).
    PreBaseVowelSign,
    /// A bare halanta or a post-base `्र`.
    ConjunctJoiner,
    Digit,
    Modifier,
    /// `र्` typed after the syllable it sits on.
    Reph,
    Literal,
}

/// A single legacy codepoint and what it becomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphEntry {
    pub source_code: char,
    pub unicode_run: String,
    pub class: GlyphClass,
}

impl GlyphEntry {
    pub fn new(source_code: char, unicode_run: &str, class: GlyphClass) -> Self {
        Self {
            source_code,
            unicode_run: unicode_run.to_string(),
            class,
        }
    }
}

/// A multi-glyph Preeti sequence that renders as one Unicode run, e.g. `cf` for `आ`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRule {
    pub sequence: String,
    pub unicode_run: String,
    pub class: GlyphClass,
}

impl SequenceRule {
    pub fn new(sequence: &str, unicode_run: &str, class: GlyphClass) -> Self {
        Self {
            sequence: sequence.to_string(),
            unicode_run: unicode_run.to_string(),
            class,
        }
    }
}

/// A matched glyph at the head of the input: its run, its class and how many
/// source bytes it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph<'t> {
    pub run: &'t str,
    pub class: GlyphClass,
    pub len: usize,
}

impl Glyph<'_> {
    /// Half forms keep a conjunct open.
    pub fn is_half(&self) -> bool {
        self.run.ends_with(HALANTA)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    pub convert_numbers: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            convert_numbers: true,
        }
    }
}

/// Recoverable things noticed while converting. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// A pre-base vowel sign with no consonant to attach to.
    /// `position` is the byte offset of the sign in the text the reordering
    /// pass read. When `Converter` pre-hooks are installed that is the
    /// pre-processed text, not the caller's input.
    OrphanedMark { position: usize, mark: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub text: String,
    pub conditions: Vec<Condition>,
}

impl Conversion {
    pub fn has_orphans(&self) -> bool {
        self.conditions
            .iter()
            .any(|c| matches!(c, Condition::OrphanedMark { .. }))
    }
}
