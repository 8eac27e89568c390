//! Sequential manifest verification
//!
//! Entries are checked strictly in manifest order. The first mismatch is
//! reported as `FAIL` and ends the run with [`Sha3SumError::DigestMismatch`];
//! later entries are not looked at.

use crate::config::HashConfig;
use crate::error::{Result, Sha3SumError};
use crate::fs::open_input;
use crate::hash::hash_file;
use crate::manifest::{write_path, ManifestEntry, ManifestReader};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Outcome of a fully passing manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifySummary {
    /// Manifest that was checked
    pub manifest: PathBuf,
    /// Entries that matched
    pub passed: u64,
}

/// Verify every entry of the manifest at `manifest` (`-` reads standard input)
pub fn verify_manifest<W: Write>(manifest: &Path, config: &HashConfig, out: W) -> Result<VerifySummary> {
    let reader = BufReader::new(open_input(manifest)?);
    verify_reader(reader, manifest, config, out)
}

/// Verify manifest entries read from `reader`
pub fn verify_reader<R: BufRead, W: Write>(
    reader: R,
    manifest: &Path,
    config: &HashConfig,
    mut out: W,
) -> Result<VerifySummary> {
    config.validate()?;
    let mut passed = 0u64;

    for entry in ManifestReader::new(reader, manifest) {
        let entry = entry?;

        if check_entry(&entry, config)? {
            report(&mut out, &entry.path, "OK").map_err(Sha3SumError::Output)?;
            passed += 1;
        } else {
            report(&mut out, &entry.path, "FAIL").map_err(Sha3SumError::Output)?;
            out.flush().map_err(Sha3SumError::Output)?;
            return Err(Sha3SumError::mismatch(entry.path));
        }
    }

    out.flush().map_err(Sha3SumError::Output)?;
    tracing::info!(manifest = %manifest.display(), passed, "manifest verified");

    Ok(VerifySummary {
        manifest: manifest.to_path_buf(),
        passed,
    })
}

fn report<W: Write>(out: &mut W, path: &Path, status: &str) -> std::io::Result<()> {
    write_path(out, path)?;
    writeln!(out, ": {}", status)
}

/// Recompute one entry's digest; length differences count as a mismatch
fn check_entry(entry: &ManifestEntry, config: &HashConfig) -> Result<bool> {
    let actual = hash_file(&entry.path, config)?;

    if actual != entry.expected {
        tracing::debug!(
            path = %entry.path.display(),
            expected = %entry.expected,
            actual = %actual,
            "digest mismatch"
        );
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashAlgorithm;
    use crate::core::hash_directory;
    use std::fs::File;
    use tempfile::TempDir;

    fn manifest_for(dir: &Path, config: &HashConfig) -> PathBuf {
        let mut sums = Vec::new();
        hash_directory(&dir.join("data"), config, &mut sums).unwrap();

        // sort so the mutated file position is predictable
        let mut lines: Vec<&str> = std::str::from_utf8(&sums).unwrap().lines().collect();
        lines.sort_by_key(|l| l.split_once("  ").map(|(_, p)| p.to_string()));

        let manifest = dir.join("SUMS");
        std::fs::write(&manifest, lines.join("\n") + "\n").unwrap();
        manifest
    }

    fn create_data(dir: &Path) {
        let data = dir.join("data");
        std::fs::create_dir_all(data.join("sub")).unwrap();
        std::fs::write(data.join("a.txt"), b"alpha").unwrap();
        std::fs::write(data.join("b.txt"), b"beta").unwrap();
        std::fs::write(data.join("sub/c.txt"), b"gamma").unwrap();
    }

    #[test]
    fn test_verify_generated_manifest() {
        let dir = TempDir::new().unwrap();
        create_data(dir.path());
        let config = HashConfig::default();
        let manifest = manifest_for(dir.path(), &config);

        let mut out = Vec::new();
        let summary = verify_manifest(&manifest, &config, &mut out).unwrap();

        assert_eq!(summary.passed, 3);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().all(|l| l.ends_with(": OK")));
    }

    #[test]
    fn test_verify_fails_fast() {
        let dir = TempDir::new().unwrap();
        create_data(dir.path());
        let config = HashConfig::new(HashAlgorithm::Sum256, 0).unwrap();
        let manifest = manifest_for(dir.path(), &config);

        std::fs::write(dir.path().join("data/b.txt"), b"tampered").unwrap();
        // would be an I/O error if it were ever checked
        std::fs::remove_file(dir.path().join("data/sub/c.txt")).unwrap();

        let mut out = Vec::new();
        let err = verify_manifest(&manifest, &config, &mut out).unwrap_err();

        assert!(matches!(err, Sha3SumError::DigestMismatch { ref path } if path.ends_with("b.txt")));
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("a.txt: OK"));
        assert!(lines[1].ends_with("b.txt: FAIL"));
    }

    #[test]
    fn test_length_mismatch_is_fail() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emptyfile");
        File::create(&path).unwrap();

        let short = HashConfig::new(HashAlgorithm::Shake256, 16).unwrap();
        let long = HashConfig::new(HashAlgorithm::Shake256, 32).unwrap();
        let line = format!("{}  {}\n", hash_file(&path, &short).unwrap(), path.display());

        let err = verify_reader(line.as_bytes(), Path::new("SUMS"), &long, std::io::sink()).unwrap_err();
        assert!(matches!(err, Sha3SumError::DigestMismatch { .. }));
    }

    #[test]
    fn test_empty_shake256_manifest_line() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("emptyfile")).unwrap();
        let line = format!(
            "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f  {}",
            dir.path().join("emptyfile").display()
        );

        let mut out = Vec::new();
        let summary = verify_reader(line.as_bytes(), Path::new("-"), &HashConfig::default(), &mut out).unwrap();

        assert_eq!(summary.passed, 1);
        assert!(String::from_utf8(out).unwrap().ends_with("emptyfile: OK\n"));
    }

    #[test]
    fn test_missing_file_is_hard_error() {
        let dir = TempDir::new().unwrap();
        let line = format!("00ff  {}\n", dir.path().join("gone").display());

        let mut out = Vec::new();
        let err = verify_reader(line.as_bytes(), Path::new("SUMS"), &HashConfig::default(), &mut out).unwrap_err();

        assert!(matches!(err, Sha3SumError::Io { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_malformed_manifest_aborts() {
        let text = "this is not a manifest\n";
        let err = verify_reader(text.as_bytes(), Path::new("SUMS"), &HashConfig::default(), std::io::sink())
            .unwrap_err();
        assert!(matches!(err, Sha3SumError::MalformedManifest { line: 1, .. }));
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let err = verify_manifest(&dir.path().join("SUMS"), &HashConfig::default(), std::io::sink()).unwrap_err();
        assert!(matches!(err, Sha3SumError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_status_line_keeps_raw_path() {
        use crate::manifest::{write_line, ResultLine};
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"caf\xe9"));
        std::fs::write(&path, b"latin-1 name").unwrap();
        let config = HashConfig::default();

        let mut manifest = Vec::new();
        write_line(&mut manifest, &ResultLine::new(hash_file(&path, &config).unwrap(), &path)).unwrap();

        let mut out = Vec::new();
        verify_reader(&manifest[..], Path::new("-"), &config, &mut out).unwrap();

        let mut expected = path.as_os_str().as_bytes().to_vec();
        expected.extend_from_slice(b": OK\n");
        assert_eq!(out, expected);
    }
}
