//! Line source for duplicate reports.
//!
//! Reports are decoded one byte per character (ISO-8859-1), so no byte
//! sequence can fail to decode. Scanners on NAS boxes often emit UTF-16LE,
//! which shows up here as a null byte after every ASCII character plus lines
//! made only of nulls; nulls are stripped from every line and lines left empty
//! are skipped.
//!
//! Line terminators are `\n`, `\r` and `\r\n`.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::record::is_report_whitespace;
use super::ReportError;

/// Position of the reader within the report.
///
/// `raw_line` counts every physical line read so far, blank ones included.
/// `content_line` counts non-blank lines only: the header is content line 0
/// and the first data row is content line 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseCursor {
    /// 1-based number of the last physical line read.
    pub raw_line: usize,
    /// Content line number of the last non-blank line returned.
    pub content_line: usize,
}

/// One non-blank line of the report with null bytes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    /// Cursor snapshot at the time this line was produced.
    pub cursor: ParseCursor,
    /// Decoded line text.
    pub text: String,
}

impl ReportLine {
    /// The first non-blank line of a report is its header.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.cursor.content_line == 0
    }
}

/// Lazy, forward-only reader over the lines of a report.
///
/// The underlying handle is owned by the reader and released when the reader
/// is dropped.
pub struct ReportReader<R> {
    path: PathBuf,
    inner: R,
    cursor: ParseCursor,
    /// Number of non-blank lines produced so far.
    produced: usize,
    /// A `\r` ended the previous line, so a leading `\n` belongs to it.
    skip_lf: bool,
    finished: bool,
}

impl ReportReader<BufReader<File>> {
    /// Open the report at `path`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing exists at `path` or it is a directory
    /// - `Io` if the file exists but cannot be opened
    pub fn open(path: &Path) -> Result<Self, ReportError> {
        if path.is_dir() {
            return Err(ReportError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| ReportError::from_open(path.to_path_buf(), e))?;
        log::debug!("Opened report {}", path.display());
        Ok(Self::from_reader(BufReader::new(file), path))
    }
}

impl<R: BufRead> ReportReader<R> {
    /// Wrap an already opened source. `path` is only used in error messages.
    pub fn from_reader(inner: R, path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            inner,
            cursor: ParseCursor::default(),
            produced: 0,
            skip_lf: false,
            finished: false,
        }
    }

    /// Current position in the report.
    #[must_use]
    pub fn cursor(&self) -> ParseCursor {
        self.cursor
    }

    /// Read one physical line as raw bytes, without its terminator.
    fn read_raw_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        loop {
            let (consumed, complete) = {
                let buf = match self.inner.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                if buf.is_empty() {
                    return Ok(if line.is_empty() { None } else { Some(line) });
                }
                if self.skip_lf {
                    self.skip_lf = false;
                    if buf[0] == b'\n' {
                        (1, false)
                    } else {
                        (0, false)
                    }
                } else {
                    match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                        Some(idx) => {
                            line.extend_from_slice(&buf[..idx]);
                            self.skip_lf = buf[idx] == b'\r';
                            (idx + 1, true)
                        }
                        None => {
                            line.extend_from_slice(buf);
                            (buf.len(), false)
                        }
                    }
                }
            };
            self.inner.consume(consumed);
            if complete {
                return Ok(Some(line));
            }
        }
    }
}

/// Decode bytes one-to-one into characters, dropping null bytes.
#[must_use]
pub fn decode_line(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect()
}

impl<R: BufRead> Iterator for ReportReader<R> {
    type Item = Result<ReportLine, ReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let bytes = match self.read_raw_line() {
                Ok(Some(bytes)) => bytes,
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(source) => {
                    self.finished = true;
                    return Some(Err(ReportError::Io {
                        path: self.path.clone(),
                        source,
                    }));
                }
            };
            self.cursor.raw_line += 1;

            let text = decode_line(&bytes);
            if text.chars().all(is_report_whitespace) {
                log::trace!("Skipping blank raw line {}", self.cursor.raw_line);
                continue;
            }

            self.cursor.content_line = self.produced;
            self.produced += 1;
            return Some(Ok(ReportLine {
                cursor: self.cursor,
                text,
            }));
        }
    }
}
