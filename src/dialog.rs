// this_file: src/dialog.rs

//! Non-interactive [`SaveDialog`]: answers come from command-line arguments.

use midashi_core::{BatchTarget, ExportKind, SaveDialog};
use std::path::{Path, PathBuf};

/// File name stem used when the command line gives none.
pub const DEFAULT_BASE_NAME: &str = "midashi";

/// Answers every prompt from values fixed up front.
#[derive(Debug, Clone, Default)]
pub struct ArgsDialog {
    fonts: Vec<PathBuf>,
    output: Option<PathBuf>,
    batch: Option<BatchTarget>,
}

impl ArgsDialog {
    pub fn new(fonts: Vec<PathBuf>) -> Self {
        Self {
            fonts,
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_batch(mut self, folder: impl Into<PathBuf>, name: impl Into<PathBuf>) -> Self {
        self.batch = Some(BatchTarget {
            folder: folder.into(),
            name: name.into(),
        });
        self
    }
}

impl SaveDialog for ArgsDialog {
    fn pick_fonts(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.fonts)
    }

    /// The `--output` path, or `midashi.<ext>` in the working directory.
    fn pick_save_path(&mut self, kind: ExportKind) -> Option<PathBuf> {
        let path = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_NAME));
        Some(with_default_extension(&path, kind))
    }

    fn pick_batch_target(&mut self, _kind: ExportKind) -> Option<BatchTarget> {
        self.batch.clone()
    }
}

/// Append the format's extension when `path` has none, like a save dialog does.
pub fn with_default_extension(path: &Path, kind: ExportKind) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(kind.extension())
    }
}
