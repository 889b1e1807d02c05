//! Numbered output files such as `screenshots/screenshot_3.jpg`.

use crate::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// Sequence of `{dir}/{stem}_{n}.{extension}` paths with `n` starting at 1.
///
/// The directory is created, and scanned for earlier files, on first use.
/// Numbering then continues after the highest index found so that output
/// from a previous run is never overwritten.
#[derive(Debug, Clone)]
pub struct NumberedOutput {
    dir: PathBuf,
    stem: String,
    extension: String,
    // Wider than the public index so the slot after `u32::MAX` is representable
    next_index: Option<u64>,
}

impl NumberedOutput {
    /// Create a sequence; nothing touches the filesystem yet
    pub fn new(dir: impl Into<PathBuf>, stem: &str, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.to_string(),
            extension: extension.to_string(),
            next_index: None,
        }
    }

    /// Output directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a given index
    #[must_use]
    pub fn path_for(&self, index: u32) -> PathBuf {
        self.dir.join(format!("{}_{}.{}", self.stem, index, self.extension))
    }

    /// Index and path of the next file, without consuming it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or listed, or
    /// [`Error::InvalidInput`] once every index up to `u32::MAX` is taken.
    pub fn next_path(&mut self) -> Result<(u32, PathBuf)> {
        let next = match self.next_index {
            Some(next) => next,
            None => {
                std::fs::create_dir_all(&self.dir)?;
                let next = u64::from(self.highest_existing_index()?) + 1;
                debug!("{} numbering starts at {}", self.dir.display(), next);
                self.next_index = Some(next);
                next
            }
        };

        let index = u32::try_from(next).map_err(|_| {
            Error::InvalidInput(format!(
                "No free {}_{{n}}.{} index left in {}",
                self.stem,
                self.extension,
                self.dir.display()
            ))
        })?;

        Ok((index, self.path_for(index)))
    }

    /// Consume the index returned by the last [`NumberedOutput::next_path`]
    pub fn advance(&mut self) {
        if let Some(next) = self.next_index.as_mut() {
            if *next <= u64::from(u32::MAX) {
                *next += 1;
            }
        }
    }

    fn highest_existing_index(&self) -> Result<u32> {
        let prefix = format!("{}_", self.stem);
        let suffix = format!(".{}", self.extension);
        let mut highest = 0;

        for entry in std::fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            let index = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(&suffix))
                .and_then(|digits| digits.parse::<u32>().ok());
            if let Some(index) = index {
                highest = highest.max(index);
            }
        }

        Ok(highest)
    }
}
