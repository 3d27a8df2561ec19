// File: src/core/table.rs
use crate::core::trie::SequenceTrie;
use crate::core::types::{Glyph, GlyphClass, GlyphEntry, SequenceRule, DEVANAGARI_ZERO};
use crate::error::{PreetiError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::core::types::GlyphClass::{
    Consonant, ConjunctJoiner, DependentVowelSign, Digit, IndependentVowel, Literal, Modifier,
    PreBaseVowelSign, Reph,
};

/// Standard Preeti keyboard layout.
const STANDARD_GLYPHS: &[(char, &str, GlyphClass)] = &[
    // a-z
    ('a', "ब", Consonant), ('b', "द", Consonant), ('c', "अ", IndependentVowel),
    ('d', "म", Consonant), ('e', "भ", Consonant), ('f', "ा", DependentVowelSign),
    ('g', "न", Consonant), ('h', "ज", Consonant), ('i', "ष्", Consonant),
    ('j', "व", Consonant), ('k', "प", Consonant), ('l', "ि", PreBaseVowelSign),
    ('m', "फ", Consonant), ('n', "ल", Consonant), ('o', "य", Consonant),
    ('p', "उ", IndependentVowel), ('q', "त्र", Consonant), ('r', "च", Consonant),
    ('s', "क", Consonant), ('t', "त", Consonant), ('u', "ग", Consonant),
    ('v', "ख", Consonant), ('w', "ध", Consonant), ('x', "ह", Consonant),
    ('y', "थ", Consonant), ('z', "श", Consonant),
    // A-Z
    ('A', "ब्", Consonant), ('B', "द्य", Consonant), ('C', "ऋ", IndependentVowel),
    ('D', "म्", Consonant), ('E', "भ्", Consonant), ('F', "ँ", Modifier),
    ('G', "न्", Consonant), ('H', "ज्", Consonant), ('I', "क्ष्", Consonant),
    ('J', "व्", Consonant), ('K', "प्", Consonant), ('L', "ी", DependentVowelSign),
    ('M', "ः", Modifier), ('N', "ल्", Consonant), ('O', "इ", IndependentVowel),
    ('P', "ए", IndependentVowel), ('Q', "त्त", Consonant), ('R', "च्", Consonant),
    ('S', "क्", Consonant), ('T', "त्", Consonant), ('U', "ग्", Consonant),
    ('V', "ख्", Consonant), ('W', "ध्", Consonant), ('X', "ह्", Consonant),
    ('Y', "थ्", Consonant), ('Z', "श्", Consonant),
    // 0-9 are consonant glyphs in Preeti, not numerals
    ('0', "ण्", Consonant), ('1', "ज्ञ", Consonant), ('2', "द्द", Consonant),
    ('3', "घ", Consonant), ('4', "द्ध", Consonant), ('5', "छ", Consonant),
    ('6', "ट", Consonant), ('7', "ठ", Consonant), ('8', "ड", Consonant),
    ('9', "ढ", Consonant),
    // shifted digit row carries the numerals
    ('!', "१", Digit), ('@', "२", Digit), ('#', "३", Digit), ('$', "४", Digit),
    ('%', "५", Digit), ('^', "६", Digit), ('&', "७", Digit), ('*', "८", Digit),
    ('(', "९", Digit), (')', "०", Digit),
    ('~', "ञ्", Consonant), ('`', "ञ", Consonant),
    ('-', "(", Literal), ('_', ")", Literal), ('+', "ं", Modifier),
    ('[', "ृ", DependentVowelSign), ('{', "र्", Reph), (']', "े", DependentVowelSign),
    ('}', "ै", DependentVowelSign), ('\\', "्", ConjunctJoiner), ('|', "्र", ConjunctJoiner),
    (';', "स", Consonant), (':', "स्", Consonant), ('\'', "ु", DependentVowelSign),
    ('"', "ू", DependentVowelSign), (',', ",", Literal), ('<', "?", Literal),
    ('.', "।", Literal), ('>', "श्र", Consonant), ('/', "र", Consonant),
    ('?', "रु", Consonant), ('=', ".", Literal),
    // extended code page
    ('ˆ', "फ्", Consonant), ('Î', "ङ्ख", Consonant), ('å', "द्व", Consonant),
    ('÷', "/", Literal), ('«', "्र", ConjunctJoiner), ('»', "्र", ConjunctJoiner),
    ('°', "्र", ConjunctJoiner), ('¿', "्र", ConjunctJoiner), ('¡', "्र", ConjunctJoiner),
];

/// Glyph pairs and triples that only make sense together.
const STANDARD_SEQUENCES: &[(&str, &str, GlyphClass)] = &[
    ("qm", "क्र", Consonant),
    ("km", "फ", Consonant),
    ("0f", "ण", Consonant),
    ("If", "क्ष", Consonant),
    ("if", "ष", Consonant),
    ("f]", "ो", DependentVowelSign),
    ("f}", "ौ", DependentVowelSign),
    ("cf", "आ", IndependentVowel),
    ("cf]", "ओ", IndependentVowel),
    ("cf}", "औ", IndependentVowel),
    ("P]", "ऐ", IndependentVowel),
    ("O{", "ई", IndependentVowel),
];

/// Legacy codepoint to Unicode association plus the multi-glyph rules.
/// Read-only once built; share it by reference across threads.
///
/// Only the records are serialized. The sequence index is rebuilt on
/// deserialization, so its rule ids always point into `rules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TableRecords")]
pub struct MappingTable {
    glyphs: HashMap<char, GlyphEntry>,
    rules: Vec<SequenceRule>,
    #[serde(skip)]
    trie: SequenceTrie,
}

#[derive(Deserialize)]
struct TableRecords {
    glyphs: HashMap<char, GlyphEntry>,
    rules: Vec<SequenceRule>,
}

impl From<TableRecords> for MappingTable {
    fn from(records: TableRecords) -> Self {
        Self::assemble(records.glyphs, records.rules)
    }
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl MappingTable {
    /// The built-in Preeti table.
    pub fn standard() -> Self {
        let glyphs = STANDARD_GLYPHS
            .iter()
            .map(|&(code, run, class)| (code, GlyphEntry::new(code, run, class)))
            .collect();
        let rules = STANDARD_SEQUENCES
            .iter()
            .map(|&(seq, run, class)| SequenceRule::new(seq, run, class))
            .collect();
        Self::assemble(glyphs, rules)
    }

    /// Merges single-glyph overrides onto the built-in table.
    pub fn load<I>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = GlyphEntry>,
    {
        Self::load_with_sequences(overrides, Vec::new())
    }

    /// Merges glyph overrides and extra sequence rules onto the built-in table.
    ///
    /// Built-in sequences that contain an overridden code are dropped so the
    /// override applies wherever the code appears. Supplied sequences are
    /// always kept and win over built-in ones with the same key.
    pub fn load_with_sequences<I, S>(overrides: I, sequences: S) -> Result<Self>
    where
        I: IntoIterator<Item = GlyphEntry>,
        S: IntoIterator<Item = SequenceRule>,
    {
        let base = Self::standard();
        let mut glyphs = base.glyphs;
        let mut overridden = HashSet::new();

        for entry in overrides {
            validate_run(&entry.source_code.to_string(), &entry.unicode_run, entry.class)?;
            overridden.insert(entry.source_code);
            glyphs.insert(entry.source_code, entry);
        }

        let mut rules: Vec<SequenceRule> = base
            .rules
            .into_iter()
            .filter(|rule| !rule.sequence.chars().any(|c| overridden.contains(&c)))
            .collect();

        for rule in sequences {
            validate_sequence(&rule.sequence)?;
            validate_run(&rule.sequence, &rule.unicode_run, rule.class)?;
            rules.retain(|existing| existing.sequence != rule.sequence);
            rules.push(rule);
        }

        log::debug!(
            "mapping table built: {} glyphs, {} sequences, {} overrides",
            glyphs.len(),
            rules.len(),
            overridden.len()
        );
        Ok(Self::assemble(glyphs, rules))
    }

    fn assemble(glyphs: HashMap<char, GlyphEntry>, rules: Vec<SequenceRule>) -> Self {
        let mut trie = SequenceTrie::new();
        for (id, rule) in rules.iter().enumerate() {
            trie.insert(&rule.sequence, id);
        }
        Self { glyphs, rules, trie }
    }

    /// Re-checks every record, e.g. after deserializing a snapshot.
    pub fn validate(&self) -> Result<()> {
        for (code, entry) in &self.glyphs {
            if *code != entry.source_code {
                return Err(PreetiError::invalid_mapping(
                    code.to_string(),
                    "record is filed under a different source code",
                ));
            }
            validate_run(&code.to_string(), &entry.unicode_run, entry.class)?;
        }
        for rule in &self.rules {
            validate_sequence(&rule.sequence)?;
            validate_run(&rule.sequence, &rule.unicode_run, rule.class)?;
        }
        Ok(())
    }

    pub fn lookup(&self, code: char) -> Option<&GlyphEntry> {
        self.glyphs.get(&code)
    }

    /// The glyph starting at the head of `text`: the longest sequence rule if
    /// one matches, otherwise the single codepoint entry.
    pub fn match_at<'t>(&'t self, text: &str) -> Option<Glyph<'t>> {
        if let Some((id, len)) = self.trie.longest_match(text) {
            let rule = &self.rules[id];
            return Some(Glyph { run: &rule.unicode_run, class: rule.class, len });
        }
        let code = text.chars().next()?;
        self.lookup(code).map(|entry| Glyph {
            run: &entry.unicode_run,
            class: entry.class,
            len: code.len_utf8(),
        })
    }

    /// Flat records sorted by source code, for export.
    pub fn entries(&self) -> Vec<&GlyphEntry> {
        let mut entries: Vec<&GlyphEntry> = self.glyphs.values().collect();
        entries.sort_by_key(|entry| entry.source_code);
        entries
    }

    pub fn sequences(&self) -> &[SequenceRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// ASCII numeral for a Devanagari digit run.
pub fn ascii_digit(run: &str) -> Option<char> {
    let c = run.chars().next()?;
    let value = (c as u32).checked_sub(DEVANAGARI_ZERO as u32)?;
    char::from_digit(value, 10)
}

fn validate_sequence(sequence: &str) -> Result<()> {
    if sequence.chars().count() < 2 {
        return Err(PreetiError::invalid_mapping(
            sequence,
            "a sequence rule needs at least two source characters",
        ));
    }
    Ok(())
}

fn validate_run(code: &str, run: &str, class: GlyphClass) -> Result<()> {
    if run.is_empty() {
        return Err(PreetiError::invalid_mapping(code, "unicode run is empty"));
    }
    if class == Digit && (run.chars().count() != 1 || ascii_digit(run).is_none()) {
        return Err(PreetiError::invalid_mapping(
            code,
            "a digit must map to exactly one Devanagari digit",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_the_keyboard() {
        let table = MappingTable::standard();
        for c in ('a'..='z').chain('A'..='Z').chain('0'..='9') {
            assert!(table.lookup(c).is_some(), "missing {c}");
        }
        assert_eq!(table.lookup('l').map(|e| e.class), Some(PreBaseVowelSign));
        assert_eq!(table.lookup(' '), None);
    }

    #[test]
    fn sequence_beats_single_glyph() {
        let table = MappingTable::standard();
        let glyph = table.match_at("cf]").unwrap();
        assert_eq!(glyph.run, "ओ");
        assert_eq!(glyph.len, 3);
        assert_eq!(table.match_at("cd").unwrap().run, "अ");
    }

    #[test]
    fn override_replaces_builtin_and_disables_its_sequences() {
        let table = MappingTable::load([GlyphEntry::new('f', "X", Literal)]).unwrap();
        assert_eq!(table.lookup('f').unwrap().unicode_run, "X");
        assert_eq!(table.match_at("cf").unwrap().run, "अ");
        assert_eq!(table.match_at("km").unwrap().run, "फ");
    }

    #[test]
    fn override_can_add_new_codes() {
        let table = MappingTable::load([GlyphEntry::new('Ø', "ङ्ग", Consonant)]).unwrap();
        assert_eq!(table.len(), MappingTable::standard().len() + 1);
        assert_eq!(table.match_at("Ø").unwrap().run, "ङ्ग");
    }

    #[test]
    fn rejects_empty_run() {
        let err = MappingTable::load([GlyphEntry::new('k', "", Consonant)]).unwrap_err();
        assert!(matches!(err, PreetiError::InvalidMapping { .. }));
    }

    #[test]
    fn rejects_non_devanagari_digit() {
        let err = MappingTable::load([GlyphEntry::new('!', "1", Digit)]).unwrap_err();
        assert!(matches!(err, PreetiError::InvalidMapping { .. }));
    }

    #[test]
    fn rejects_single_char_sequence() {
        let err = MappingTable::load_with_sequences(
            Vec::new(),
            [SequenceRule::new("k", "प", Consonant)],
        )
        .unwrap_err();
        assert!(matches!(err, PreetiError::InvalidMapping { .. }));
    }

    #[test]
    fn supplied_sequence_replaces_builtin_one() {
        let table = MappingTable::load_with_sequences(
            Vec::new(),
            [SequenceRule::new("km", "फ़", Consonant)],
        )
        .unwrap();
        assert_eq!(table.match_at("km").unwrap().run, "फ़");
        assert_eq!(
            table.sequences().iter().filter(|r| r.sequence == "km").count(),
            1
        );
    }

    #[test]
    fn deserialized_table_rebuilds_its_sequence_index() {
        let json = serde_json::to_string(&MappingTable::standard()).unwrap();
        assert!(!json.contains("trie"));
        let table: MappingTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table.match_at("cf]").unwrap().run, "ओ");
        assert_eq!(table.match_at("km").unwrap().run, "फ");
    }

    #[test]
    fn validate_rejects_short_sequence_records() {
        let mut table = MappingTable::standard();
        table.rules.push(SequenceRule::new("k", "प", Consonant));
        assert!(matches!(
            table.validate(),
            Err(PreetiError::InvalidMapping { .. })
        ));
    }

    #[test]
    fn ascii_digit_maps_devanagari_numerals() {
        assert_eq!(ascii_digit("०"), Some('0'));
        assert_eq!(ascii_digit("९"), Some('9'));
        assert_eq!(ascii_digit("क"), None);
    }
}
