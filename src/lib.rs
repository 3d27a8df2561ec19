// src/lib.rs

pub mod batch;
pub mod c_api;
pub mod config;
pub mod core;
pub mod error;
pub mod file;
pub mod hooks;
pub mod persistence;

pub use crate::config::ConverterConfig;
pub use crate::core::engine::Converter;
pub use crate::core::table::MappingTable;
pub use crate::core::types::{Condition, Conversion, ConvertOptions, GlyphClass, GlyphEntry};
pub use crate::error::{PreetiError, Result};

/// Converts Preeti text with the built-in table.
/// Build a [`Converter`] once instead when converting many strings.
pub fn convert(text: &str, options: ConvertOptions) -> String {
    let table = MappingTable::standard();
    crate::core::converter::ReorderingEngine::new(&table, options).convert(text)
}
