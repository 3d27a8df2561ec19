// File: src/hooks.rs
use serde::{Deserialize, Serialize};

/// A text transform run before or after the reordering pass.
/// Hooks never see the glyph stream, only whole strings.
pub type TextHook = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Post-conversion tidying rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupRules {
    /// Collapse runs of spaces and tabs inside a line to one space.
    pub normalize_whitespace: bool,
    pub trim_lines: bool,
    pub remove_empty_lines: bool,
}

impl CleanupRules {
    pub fn is_noop(&self) -> bool {
        !(self.normalize_whitespace || self.trim_lines || self.remove_empty_lines)
    }

    pub fn apply(&self, text: &str) -> String {
        let mut lines: Vec<String> = Vec::new();
        for line in text.split('\n') {
            let mut line = if self.normalize_whitespace {
                collapse_spaces(line)
            } else {
                line.to_string()
            };
            if self.trim_lines {
                line = line.trim().to_string();
            }
            if self.remove_empty_lines && line.trim().is_empty() {
                continue;
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    pub fn into_hook(self) -> TextHook {
        Box::new(move |text: &str| self.apply(text))
    }
}

fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last_was_space = false;
    for c in line.chars() {
        if c == ' ' || c == '\t' {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_change_nothing() {
        let rules = CleanupRules::default();
        assert!(rules.is_noop());
        assert_eq!(rules.apply("  a \n\n b"), "  a \n\n b");
    }

    #[test]
    fn all_rules_together() {
        let rules = CleanupRules {
            normalize_whitespace: true,
            trim_lines: true,
            remove_empty_lines: true,
        };
        assert_eq!(rules.apply("  नेपाल \t  देश \n\n   \n हो "), "नेपाल देश\nहो");
    }

    #[test]
    fn hook_wraps_rules() {
        let hook = CleanupRules {
            trim_lines: true,
            ..Default::default()
        }
        .into_hook();
        assert_eq!(hook(" a \n b "), "a\nb");
    }
}
