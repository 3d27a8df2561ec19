// File: src/core/converter.rs
use crate::core::context::SyllableContext;
use crate::core::table::{ascii_digit, MappingTable};
use crate::core::types::{Condition, Conversion, ConvertOptions, Glyph, GlyphClass, HALANTA};

/// Upper bound on full consonants a pending `ि` may wait through. Half forms
/// are not counted. Preeti clusters are at most three glyphs deep, so this is
/// never hit on well-formed text.
const MAX_CLUSTER: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State<'t> {
    Scanning,
    /// A pre-base sign was read and is waiting for its consonant cluster.
    PendingVowel {
        sign: &'t str,
        position: usize,
        consonants: usize,
        full: usize,
    },
    /// The last thing written was a half form or bare halanta.
    PendingConjunct,
}

/// Converts Preeti text to Unicode in logical order.
/// Borrows the table; holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct ReorderingEngine<'t> {
    table: &'t MappingTable,
    options: ConvertOptions,
}

impl<'t> ReorderingEngine<'t> {
    pub fn new(table: &'t MappingTable, options: ConvertOptions) -> Self {
        Self { table, options }
    }

    pub fn convert(&self, input: &str) -> String {
        self.convert_with_report(input).text
    }

    /// Converts and also returns the recoverable conditions met on the way.
    pub fn convert_with_report(&self, input: &str) -> Conversion {
        Pass {
            table: self.table,
            options: self.options,
            input,
            cursor: 0,
            out: String::with_capacity(input.len() * 3),
            context: SyllableContext::new(),
            conditions: Vec::new(),
            state: State::Scanning,
        }
        .run()
    }
}

/// One left-to-right pass over a single input.
struct Pass<'t, 'i> {
    table: &'t MappingTable,
    options: ConvertOptions,
    input: &'i str,
    cursor: usize,
    out: String,
    context: SyllableContext,
    conditions: Vec<Condition>,
    state: State<'t>,
}

impl<'t> Pass<'t, '_> {
    fn run(mut self) -> Conversion {
        while let Some(c) = self.input[self.cursor..].chars().next() {
            let position = self.cursor;
            match self.table.match_at(&self.input[self.cursor..]) {
                Some(glyph) => {
                    self.cursor += glyph.len;
                    self.on_glyph(glyph, position);
                }
                None => {
                    self.cursor += c.len_utf8();
                    self.flush_pending();
                    self.context.close();
                    self.out.push(c);
                }
            }
        }
        self.flush_pending();
        Conversion {
            text: self.out,
            conditions: self.conditions,
        }
    }

    fn peek(&self) -> Option<Glyph<'t>> {
        self.table.match_at(&self.input[self.cursor..])
    }

    fn on_glyph(&mut self, glyph: Glyph<'t>, position: usize) {
        match glyph.class {
            GlyphClass::PreBaseVowelSign => {
                self.flush_pending();
                self.state = State::PendingVowel {
                    sign: glyph.run,
                    position,
                    consonants: 0,
                    full: 0,
                };
            }
            GlyphClass::Consonant => self.on_consonant(glyph),
            GlyphClass::ConjunctJoiner => self.on_joiner(glyph),
            GlyphClass::Reph => {
                self.flush_pending();
                match self.context.take_reph_anchor() {
                    Some(at) => self.out.insert_str(at, glyph.run),
                    None => self.out.push_str(glyph.run),
                }
            }
            GlyphClass::Digit => {
                self.flush_pending();
                self.context.close();
                match ascii_digit(glyph.run) {
                    Some(ascii) if !self.options.convert_numbers => self.out.push(ascii),
                    _ => self.out.push_str(glyph.run),
                }
            }
            GlyphClass::IndependentVowel => {
                self.flush_pending();
                self.context.begin(self.out.len());
                self.out.push_str(glyph.run);
            }
            GlyphClass::DependentVowelSign | GlyphClass::Modifier => {
                self.flush_pending();
                self.out.push_str(glyph.run);
            }
            GlyphClass::Literal => {
                self.flush_pending();
                self.context.close();
                self.out.push_str(glyph.run);
            }
        }
    }

    fn on_consonant(&mut self, glyph: Glyph<'t>) {
        match self.state {
            State::PendingVowel {
                sign,
                position,
                consonants,
                full,
            } => {
                if consonants == 0 {
                    self.context.begin(self.out.len());
                }
                self.out.push_str(glyph.run);
                let consonants = consonants + 1;
                let half = glyph.is_half();
                let full = if half { full } else { full + 1 };
                let open = half || self.absorb_joiners();
                if !open {
                    self.out.push_str(sign);
                    self.state = State::Scanning;
                } else if full < MAX_CLUSTER {
                    self.state = State::PendingVowel {
                        sign,
                        position,
                        consonants,
                        full,
                    };
                } else {
                    // no base within reach
                    self.flush_pending();
                    self.state = State::PendingConjunct;
                }
            }
            State::Scanning | State::PendingConjunct => {
                if self.state == State::Scanning {
                    self.context.begin(self.out.len());
                }
                self.out.push_str(glyph.run);
                self.state = if glyph.is_half() {
                    State::PendingConjunct
                } else {
                    State::Scanning
                };
            }
        }
    }

    /// Pulls joiners that follow a full consonant into the cluster.
    /// Returns true when the cluster was left open by a bare halanta.
    fn absorb_joiners(&mut self) -> bool {
        while let Some(next) = self.peek() {
            if next.class != GlyphClass::ConjunctJoiner {
                break;
            }
            self.cursor += next.len;
            self.out.push_str(next.run);
            if next.is_half() {
                return true;
            }
        }
        false
    }

    fn on_joiner(&mut self, glyph: Glyph<'t>) {
        if let State::PendingVowel { consonants: 0, .. } = self.state {
            self.flush_pending();
        }
        self.out.push_str(glyph.run);
        match self.state {
            State::PendingVowel { .. } => {}
            _ if glyph.is_half() => self.state = State::PendingConjunct,
            _ => self.state = State::Scanning,
        }
    }

    /// Writes out a waiting pre-base sign. With no consonant before it, or
    /// with the cluster still open on a halanta, this is an orphaned mark: it
    /// is kept, and reported.
    fn flush_pending(&mut self) {
        if let State::PendingVowel {
            sign,
            position,
            consonants,
            ..
        } = self.state
        {
            if consonants == 0 || self.out.ends_with(HALANTA) {
                self.conditions.push(Condition::OrphanedMark {
                    position,
                    mark: sign.to_string(),
                });
            }
            self.out.push_str(sign);
        }
        self.state = State::Scanning;
    }
}
