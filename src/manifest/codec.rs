//! Checksum manifest line format
//!
//! One entry per line: lowercase hex digest, two spaces, path. No header
//! and no algorithm marker; the algorithm is supplied out of band.
//!
//! Paths are opaque. On unix they are written and read back as raw bytes,
//! so names that are not valid UTF-8 survive a hash/check round trip.

use crate::error::{Result, Sha3SumError};
use crate::hash::Digest;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Separator between the digest and the path columns
pub const SEPARATOR: &str = "  ";

/// A computed digest paired with the path it was computed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    /// Digest of the complete file
    pub digest: Digest,
    /// Originating path
    pub path: PathBuf,
}

impl ResultLine {
    /// Pair a digest with its path
    pub fn new(digest: Digest, path: impl Into<PathBuf>) -> Self {
        Self {
            digest,
            path: path.into(),
        }
    }
}

/// Lossy rendering for logs and messages; use [`write_line`] for output
impl std::fmt::Display for ResultLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}{}{}", self.digest, SEPARATOR, self.path.display())
    }
}

/// An expected digest read back from a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Digest the file is expected to have
    pub expected: Digest,
    /// Path of the file to check
    pub path: PathBuf,
}

/// Write `path` exactly as the filesystem knows it
#[cfg(unix)]
pub fn write_path<W: Write + ?Sized>(out: &mut W, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;
    out.write_all(path.as_os_str().as_bytes())
}

/// Write `path` exactly as the filesystem knows it
#[cfg(not(unix))]
pub fn write_path<W: Write + ?Sized>(out: &mut W, path: &Path) -> io::Result<()> {
    write!(out, "{}", path.display())
}

/// Write one result line, newline included
pub fn write_line<W: Write + ?Sized>(out: &mut W, line: &ResultLine) -> io::Result<()> {
    write!(out, "{:x}{}", line.digest, SEPARATOR)?;
    write_path(out, &line.path)?;
    out.write_all(b"\n")
}

/// Serialize a digest and path into a manifest line (without newline)
pub fn format_line(digest: &Digest, path: &Path) -> Vec<u8> {
    let mut line = format!("{:x}{}", digest, SEPARATOR).into_bytes();
    // writing into a Vec cannot fail
    let _ = write_path(&mut line, path);
    line
}

/// Parse a single manifest line
pub fn parse_line(line: &str) -> Result<ManifestEntry> {
    parse_line_at(line, 1)
}

/// Parse a manifest line, reporting errors against `line_no`
pub fn parse_line_at(line: &str, line_no: usize) -> Result<ManifestEntry> {
    parse_bytes_at(line.as_bytes(), line_no)
}

/// Parse a raw manifest line, reporting errors against `line_no`
pub fn parse_bytes_at(line: &[u8], line_no: usize) -> Result<ManifestEntry> {
    let sep = SEPARATOR.as_bytes();
    let split = find(line, sep)
        .ok_or_else(|| Sha3SumError::malformed(line_no, "missing two-space separator"))?;
    let (hex_part, path_part) = (&line[..split], &line[split + sep.len()..]);

    if find(path_part, sep).is_some() {
        return Err(Sha3SumError::malformed(line_no, "more than one two-space separator"));
    }
    if path_part.is_empty() {
        return Err(Sha3SumError::malformed(line_no, "empty path"));
    }

    let expected = Digest::from_hex(hex_part).map_err(|source| Sha3SumError::InvalidHexEncoding {
            line: line_no,
            source,
        })?;

    Ok(ManifestEntry {
        expected,
        path: path_from_bytes(path_part, line_no)?,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8], _line_no: usize) -> Result<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Ok(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8], line_no: usize) -> Result<PathBuf> {
    std::str::from_utf8(bytes)
        .map(PathBuf::from)
        .map_err(|_| Sha3SumError::malformed(line_no, "path is not valid UTF-8"))
}

/// Line-by-line manifest parser.
///
/// Stops after the first error: a bad line aborts the whole manifest.
pub struct ManifestReader<R> {
    reader: R,
    buf: Vec<u8>,
    source: PathBuf,
    line_no: usize,
    failed: bool,
}

impl<R: BufRead> ManifestReader<R> {
    /// Read entries from `reader`; `source` names it in I/O errors
    pub fn new(reader: R, source: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            source: source.into(),
            line_no: 0,
            failed: false,
        }
    }

    fn read_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(false);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for ManifestReader<R> {
    type Item = Result<ManifestEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = match self.read_line() {
            Ok(false) => return None,
            Ok(true) => {
                self.line_no += 1;
                parse_bytes_at(&self.buf, self.line_no)
            }
            Err(e) => Err(Sha3SumError::io(&self.source, e)),
        };

        self.failed = result.is_err();
        Some(result)
    }
}
