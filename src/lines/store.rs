//! Line Store implementation
//!
//! Scan-and-rewrite access to a single line-oriented file.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncStrategy;
use crate::error::{FlatError, Result};
use crate::record::{self, LINE_BREAK};

/// Outcome of scanning the file for a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// First line whose key matched, with its 0-based line index
    Found { value: Vec<u8>, index: usize },

    /// No line matched; `line_count` is the number of lines scanned and
    /// doubles as the append position
    Missing { line_count: usize },
}

/// Backing file addressed by line index
///
/// ## Concurrency:
/// - All operations take `&mut self` and move the shared file cursor
/// - No locking happens here; callers serialize access (see `network::Server`)
pub struct LineStore {
    /// Handle held open for the lifetime of the store
    file: File,

    /// Path the file was opened from (for logging/debugging)
    path: PathBuf,

    /// Whether rewrites are fsynced
    sync_strategy: SyncStrategy,
}

impl LineStore {
    /// Open the backing file read-write, creating it if absent
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            sync_strategy,
        })
    }

    /// Scan from the start for the first line whose key equals `key`
    ///
    /// A line that fails to decode aborts the scan with
    /// [`FlatError::Decode`]; it is never skipped.
    pub fn find(&mut self, key: &[u8]) -> Result<Lookup> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut reader = BufReader::new(&mut self.file);

        let mut line = Vec::new();
        let mut index = 0;
        loop {
            line.clear();
            if reader.read_until(LINE_BREAK, &mut line)? == 0 {
                break;
            }
            if line.last() == Some(&LINE_BREAK) {
                line.pop();
            }

            let decoded = record::decode(&line)
                .map_err(|source| FlatError::Decode { line: index, source })?;

            if decoded.key == key {
                return Ok(Lookup::Found {
                    value: decoded.value.to_vec(),
                    index,
                });
            }

            index += 1;
        }

        Ok(Lookup::Missing { line_count: index })
    }

    /// Replace line `index` with the encoded record, or append it when
    /// `index` is past the last line
    pub fn write(&mut self, index: usize, key: &[u8], value: &[u8]) -> Result<()> {
        let encoded = record::encode(key, value);
        let content = self.read_all()?;
        let mut lines = split_lines(&content);

        if index < lines.len() {
            lines[index] = encoded.as_slice();
        } else {
            lines.push(encoded.as_slice());
        }

        self.rewrite(&lines)
    }

    /// Remove line `index`; an out-of-range index leaves the file untouched
    pub fn erase(&mut self, index: usize) -> Result<()> {
        let content = self.read_all()?;
        let mut lines = split_lines(&content);

        if index >= lines.len() {
            return Ok(());
        }
        lines.remove(index);

        self.rewrite(&lines)
    }

    /// Count the lines currently in the file
    pub fn line_count(&mut self) -> Result<usize> {
        let content = self.read_all()?;
        Ok(split_lines(&content).len())
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Force buffered data to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Read the whole file from offset 0
    fn read_all(&mut self) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut content = Vec::new();
        self.file.read_to_end(&mut content)?;
        Ok(content)
    }

    /// Truncate the file and write `lines` back joined by line breaks
    fn rewrite(&mut self, lines: &[&[u8]]) -> Result<()> {
        let content = lines.join(&LINE_BREAK);

        self.file.seek(SeekFrom::Start(0))?;
        self.file.set_len(0)?;
        self.file.write_all(&content)?;
        self.file.flush()?;

        if self.sync_strategy == SyncStrategy::EveryWrite {
            self.file.sync_data()?;
        }

        tracing::trace!(
            path = %self.path.display(),
            lines = lines.len(),
            bytes = content.len(),
            "Rewrote backing file"
        );

        Ok(())
    }
}

/// Split file content into lines
///
/// Empty content has no lines, and one trailing line break does not start
/// a new line. This matches how [`LineStore::find`] counts lines, so the
/// indexes it returns address the same entries here.
fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    if content.is_empty() {
        return Vec::new();
    }
    let body = content.strip_suffix(&[LINE_BREAK]).unwrap_or(content);
    body.split(|&b| b == LINE_BREAK).collect()
}
