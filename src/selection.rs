//! Path selection
//!
//! Choosing the photo and the save location happens outside the core. The
//! builder only ever sees the resolved paths a [`PathSelector`] hands back.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::thumbnail::is_accepted_photo;

pub const DEFAULT_EXTENSION: &str = "pdf";

/// Source of the photo and destination paths. `None` means the user
/// cancelled the selection.
pub trait PathSelector {
    fn choose_photo(&mut self) -> Option<PathBuf>;
    fn choose_destination(&mut self) -> Option<PathBuf>;
}

/// Paths known up front, e.g. from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct FixedSelection {
    pub photo: Option<PathBuf>,
    pub destination: Option<PathBuf>,
}

impl FixedSelection {
    pub fn new(photo: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            photo: Some(photo.into()),
            destination: Some(destination.into()),
        }
    }
}

impl PathSelector for FixedSelection {
    fn choose_photo(&mut self) -> Option<PathBuf> {
        self.photo.clone()
    }

    fn choose_destination(&mut self) -> Option<PathBuf> {
        self.destination.clone()
    }
}

/// Asks for each path on a line-based reader/writer pair.
/// A blank answer or end of input cancels.
pub struct PromptSelection<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSelection<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Option<PathBuf> {
        write!(self.output, "{}", prompt).ok()?;
        self.output.flush().ok()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = line.trim();
                (!answer.is_empty()).then(|| PathBuf::from(answer))
            }
        }
    }
}

impl<R: BufRead, W: Write> PathSelector for PromptSelection<R, W> {
    /// Re-asks until the answer has an accepted image extension.
    fn choose_photo(&mut self) -> Option<PathBuf> {
        loop {
            let path = self.ask("Photo (.jpg, .jpeg, .png): ")?;
            if is_accepted_photo(&path) {
                return Some(path);
            }
            writeln!(self.output, "Only .jpg, .jpeg and .png files can be used.").ok()?;
        }
    }

    fn choose_destination(&mut self) -> Option<PathBuf> {
        self.ask("Save PDF as: ")
    }
}

/// Append `.pdf` when the chosen name carries no extension at all.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}
