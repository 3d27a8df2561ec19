use crate::config::ConverterConfig;
use crate::core::converter::ReorderingEngine;
use crate::core::table::MappingTable;
use crate::core::types::{Condition, Conversion, ConvertOptions};
use crate::error::Result;
use crate::hooks::TextHook;
use crate::persistence::load_overrides;

// The converter everything outside the core talks to: a table, default
// options and the hooks that run around the reordering pass.
pub struct Converter {
    pub table: MappingTable,
    pub options: ConvertOptions,
    pre_hooks: Vec<TextHook>,
    post_hooks: Vec<TextHook>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::with_table(MappingTable::standard())
    }

    pub fn with_table(table: MappingTable) -> Self {
        Self {
            table,
            options: ConvertOptions::default(),
            pre_hooks: Vec::new(),
            post_hooks: Vec::new(),
        }
    }

    /// Builds the table (with overrides, if the config names a file) and
    /// installs the cleanup hook.
    pub fn from_config(config: &ConverterConfig) -> Result<Self> {
        let table = match &config.overrides {
            Some(path) => {
                let overrides = load_overrides(path)?;
                overrides.into_table()?
            }
            None => MappingTable::standard(),
        };
        let mut converter = Self::with_table(table);
        converter.options.convert_numbers = config.convert_numbers;
        if !config.cleanup.is_noop() {
            converter.add_post_hook(config.cleanup.clone().into_hook());
        }
        Ok(converter)
    }

    pub fn add_pre_hook(&mut self, hook: TextHook) {
        self.pre_hooks.push(hook);
    }

    pub fn add_post_hook(&mut self, hook: TextHook) {
        self.post_hooks.push(hook);
    }

    pub fn convert(&self, text: &str) -> String {
        self.convert_with(text, self.options).text
    }

    pub fn convert_with_report(&self, text: &str) -> Conversion {
        self.convert_with(text, self.options)
    }

    /// Runs pre-hooks, the reordering pass, then post-hooks.
    /// Orphaned marks are logged here; the engine only reports them. Their
    /// positions index the text after the pre-hooks ran.
    pub fn convert_with(&self, text: &str, options: ConvertOptions) -> Conversion {
        if text.is_empty() {
            return Conversion::default();
        }

        let prepared = apply_hooks(&self.pre_hooks, text);
        let mut conversion = ReorderingEngine::new(&self.table, options).convert_with_report(&prepared);

        let source = if self.pre_hooks.is_empty() { "input" } else { "pre-processed input" };
        for condition in &conversion.conditions {
            match condition {
                Condition::OrphanedMark { position, mark } => {
                    log::warn!(
                        "orphaned vowel sign {mark:?} at byte {position} of the {source} kept as-is"
                    );
                }
            }
        }

        if !self.post_hooks.is_empty() {
            conversion.text = apply_hooks(&self.post_hooks, &conversion.text);
        }
        conversion
    }
}

fn apply_hooks(hooks: &[TextHook], text: &str) -> String {
    hooks
        .iter()
        .fold(text.to_string(), |current, hook| hook(&current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::CleanupRules;

    #[test]
    fn converts_with_defaults() {
        let converter = Converter::new();
        assert_eq!(converter.convert("g]kfn @)!&"), "नेपाल २०१७");
    }

    #[test]
    fn per_call_options_override_defaults() {
        let converter = Converter::new();
        let out = converter.convert_with("@)!&", ConvertOptions { convert_numbers: false });
        assert_eq!(out.text, "2017");
    }

    #[test]
    fn hooks_run_in_order_around_the_pass() {
        let mut converter = Converter::new();
        converter.add_pre_hook(Box::new(|s: &str| s.replace("NEPAL", "g]kfn")));
        converter.add_post_hook(Box::new(|s: &str| format!("[{s}]")));
        converter.add_post_hook(
            CleanupRules {
                trim_lines: true,
                ..Default::default()
            }
            .into_hook(),
        );
        assert_eq!(converter.convert("NEPAL "), "[नेपाल ]");
    }

    #[test]
    fn orphan_position_indexes_the_pre_processed_text() {
        let mut converter = Converter::new();
        converter.add_pre_hook(Box::new(|s: &str| s.replace("<br>", "")));
        let report = converter.convert_with_report("<br>g]kfn l");
        assert_eq!(
            report.conditions,
            vec![Condition::OrphanedMark { position: 6, mark: "ि".to_string() }]
        );
    }

    #[test]
    fn config_without_overrides_uses_standard_table() {
        let config = ConverterConfig {
            convert_numbers: false,
            ..Default::default()
        };
        let converter = Converter::from_config(&config).unwrap();
        assert_eq!(converter.convert("!)"), "10");
    }

    #[test]
    fn converter_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Converter>();
    }
}
