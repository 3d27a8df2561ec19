// File: src/batch.rs
use crate::core::engine::Converter;
use crate::file::{convert_file, OutputFormat};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Outcome of one file in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `None` on success, the rendered error otherwise.
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::succeeded)
    }
}

/// `<output_dir>/<input stem>.<format extension>`
pub fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| "converted".into());
    let mut path = output_dir.join(stem);
    path.set_extension(format.extension());
    path
}

/// Converts every input in parallel. A failing file is recorded and the
/// rest carry on; outcomes keep the order of `inputs`.
pub fn convert_batch(
    converter: &Converter,
    inputs: &[PathBuf],
    output_dir: &Path,
    format: OutputFormat,
) -> BatchSummary {
    let outcomes = inputs
        .par_iter()
        .map(|input| {
            let output = output_path_for(input, output_dir, format);
            let error = match convert_file(converter, input, &output, format) {
                Ok(()) => None,
                Err(e) => {
                    log::warn!("failed to convert {}: {e}", input.display());
                    Some(e.to_string())
                }
            };
            FileOutcome {
                input: input.clone(),
                output,
                error,
            }
        })
        .collect();
    BatchSummary { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn converts_all_and_reports_failures() {
        let dir = tempdir().unwrap();
        let good_a = dir.path().join("a.txt");
        let good_b = dir.path().join("b.txt");
        let missing = dir.path().join("missing.txt");
        let wrong_kind = dir.path().join("c.pdf");
        fs::write(&good_a, "g]kfn").unwrap();
        fs::write(&good_b, "cfdf").unwrap();
        fs::write(&wrong_kind, "x").unwrap();

        let out_dir = dir.path().join("out");
        let inputs = vec![good_a, missing.clone(), good_b, wrong_kind];
        let summary = convert_batch(&Converter::new(), &inputs, &out_dir, OutputFormat::Txt);

        assert_eq!(summary.outcomes.len(), 4);
        assert_eq!(summary.successful(), 2);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.outcomes[1].input, missing);
        assert_eq!(fs::read_to_string(out_dir.join("a.txt")).unwrap(), "नेपाल");
        assert_eq!(fs::read_to_string(out_dir.join("b.txt")).unwrap(), "आमा");
    }

    #[test]
    fn output_path_swaps_extension() {
        let path = output_path_for(Path::new("in/doc.txt"), Path::new("out"), OutputFormat::Html);
        assert_eq!(path, PathBuf::from("out/doc.html"));
    }
}
