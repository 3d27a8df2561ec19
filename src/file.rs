// File: src/file.rs
//
// Plain-text and HTML adapters around the converter.

use crate::core::engine::Converter;
use crate::error::{PreetiError, Result};
use crate::persistence::write_atomically;
use encoding_rs::WINDOWS_1252;
use html_escape::encode_quoted_attribute;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Txt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Txt,
    Html,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match extension(path).as_deref() {
            Some("txt") | Some("text") => Ok(InputFormat::Txt),
            _ => Err(PreetiError::UnsupportedFormat(format!(
                "cannot detect input format of {}",
                path.display()
            ))),
        }
    }
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match extension(path) {
            Some(ext) => ext.parse(),
            None => Err(PreetiError::UnsupportedFormat(format!(
                "cannot detect output format of {}",
                path.display()
            ))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Html => "html",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PreetiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(OutputFormat::Txt),
            "html" | "htm" => Ok(OutputFormat::Html),
            other => Err(PreetiError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// A text document read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    pub text: String,
    /// Label of the encoding the bytes were decoded with.
    pub encoding: &'static str,
}

/// Reads UTF-8, falling back to Windows-1252 for legacy Preeti exports.
pub fn read_text(path: &Path) -> Result<TextDocument> {
    let bytes = fs::read(path)?;
    Ok(decode_text(bytes))
}

pub fn decode_text(bytes: Vec<u8>) -> TextDocument {
    match String::from_utf8(bytes) {
        Ok(text) => TextDocument {
            text,
            encoding: "utf-8",
        },
        Err(err) => {
            let (text, _, _) = WINDOWS_1252.decode(err.as_bytes());
            log::debug!("input is not UTF-8, decoded as {}", WINDOWS_1252.name());
            TextDocument {
                text: text.into_owned(),
                encoding: WINDOWS_1252.name(),
            }
        }
    }
}

pub fn render(text: &str, format: OutputFormat, title: &str) -> String {
    match format {
        OutputFormat::Txt => text.to_string(),
        OutputFormat::Html => render_html(text, title),
    }
}

fn render_html(text: &str, title: &str) -> String {
    let mut html = String::with_capacity(text.len() * 2 + 256);
    html.push_str("<!DOCTYPE html>\n<html lang=\"ne\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", encode_quoted_attribute(title)));
    html.push_str("</head>\n<body>\n");
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        html.push_str(&format!("<p>{}</p>\n", encode_quoted_attribute(line)));
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// Writes `contents` atomically, creating parent directories.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    write_atomically(path, |writer| {
        writer.write_all(contents.as_bytes())?;
        Ok(())
    })
}

/// Reads `input`, converts it and writes `output` in `format`.
pub fn convert_file(
    converter: &Converter,
    input: &Path,
    output: &Path,
    format: OutputFormat,
) -> Result<()> {
    InputFormat::from_path(input)?;
    let document = read_text(input)?;
    let converted = converter.convert(&document.text);
    let title = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("converted");
    write_output(output, &render(&converted, format, title))?;
    log::debug!(
        "converted {} ({}) -> {}",
        input.display(),
        document.encoding,
        output.display()
    );
    Ok(())
}

/// Font-name heuristic used by adapters that see font metadata.
pub fn is_preeti_font(font_name: &str) -> bool {
    let name = font_name.to_lowercase();
    ["preeti", "pcs", "nepali"]
        .iter()
        .any(|indicator| name.contains(indicator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn detects_formats_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.TXT")).unwrap(), InputFormat::Txt);
        assert!(InputFormat::from_path(Path::new("a.pdf")).is_err());
        assert_eq!(OutputFormat::from_path(Path::new("b.htm")).unwrap(), OutputFormat::Html);
        assert!("docx".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn falls_back_to_windows_1252() {
        // 0xE5 is å in Windows-1252, the द्व glyph in Preeti
        let doc = decode_text(vec![b's', 0xE5, b'f']);
        assert_eq!(doc.text, "såf");
        assert_eq!(doc.encoding, "windows-1252");
    }

    #[test]
    fn html_is_escaped_and_skips_blank_lines() {
        let html = render("a<b\n\n\"c\"", OutputFormat::Html, "x&y");
        assert!(html.contains("<title>x&amp;y</title>"));
        assert!(html.contains("<p>a&lt;b</p>"));
        assert!(html.contains("<p>&quot;c&quot;</p>"));
        assert_eq!(html.matches("<p>").count(), 2);
    }

    #[test]
    fn html_keeps_devanagari_and_escapes_apostrophes() {
        let html = render("नेपाल's > भारत", OutputFormat::Html, "t");
        assert!(html.contains("<p>नेपाल&#x27;s &gt; भारत</p>"));
    }

    #[test]
    fn converts_a_text_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out").join("in.txt");
        fs::write(&input, "g]kfn @)!&").unwrap();

        convert_file(&Converter::new(), &input, &output, OutputFormat::Txt).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "नेपाल २०१७");
    }

    #[test]
    fn recognises_preeti_font_names() {
        assert!(is_preeti_font("Preeti Normal"));
        assert!(is_preeti_font("PCS NEPALI"));
        assert!(!is_preeti_font("Mangal"));
    }
}
