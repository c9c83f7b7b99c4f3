//! Persists generated wrappers and their dependency records.
//!
//! Every write goes through a sibling temporary file followed by a single
//! rename, so a reader never observes a truncated file. Files whose content
//! is already current are left untouched.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::KowoError;

/// Extension of generated source files.
pub const SOURCE_EXTENSION: &str = "kt";

/// A rendered source file awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Package of the generated class; empty for the root package.
    pub package: String,
    /// File stem, i.e. the wrapper class name.
    pub file_name: String,
    /// Full file content.
    pub content: String,
    /// Source files whose change invalidates this output.
    pub sources: Vec<Utf8PathBuf>,
    /// Whether the output depends on more than its listed sources.
    pub aggregating: bool,
}

impl GeneratedFile {
    /// Path of the source file relative to the sources root.
    #[must_use]
    pub fn relative_path(&self) -> Utf8PathBuf {
        let mut path = Utf8PathBuf::new();
        for segment in self.package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.{SOURCE_EXTENSION}", self.file_name));
        path
    }

    /// File name of the dependency record.
    #[must_use]
    pub fn record_name(&self) -> String {
        if self.package.is_empty() {
            format!("{}.json", self.file_name)
        } else {
            format!("{}.{}.json", self.package, self.file_name)
        }
    }
}

/// Dependency record consumed by incremental build tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Generated source file.
    pub output: Utf8PathBuf,
    /// Originating source files.
    pub sources: Vec<Utf8PathBuf>,
    /// Whether the output aggregates more than its listed sources.
    pub aggregating: bool,
    /// Hex SHA-256 of the generated content.
    pub sha256: String,
}

/// Outcome of persisting one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The file was created or replaced.
    Written,
    /// The file already had the requested content.
    Unchanged,
}

/// A persisted generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Location of the source file.
    pub path: Utf8PathBuf,
    /// Location of the dependency record.
    pub record_path: Utf8PathBuf,
    /// The record that was stored.
    pub record: DependencyRecord,
    /// Whether the source file changed on disk.
    pub status: WriteStatus,
}

/// Writes generated files below a sources root and records below a records
/// root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputWriter {
    sources_dir: Utf8PathBuf,
    records_dir: Utf8PathBuf,
}

impl OutputWriter {
    /// Creates a writer; directories are created on first write.
    pub fn new(sources_dir: impl Into<Utf8PathBuf>, records_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            sources_dir: sources_dir.into(),
            records_dir: records_dir.into(),
        }
    }

    /// Root of generated sources.
    #[must_use]
    pub fn sources_dir(&self) -> &Utf8Path {
        &self.sources_dir
    }

    /// Root of dependency records.
    #[must_use]
    pub fn records_dir(&self) -> &Utf8Path {
        &self.records_dir
    }

    /// Persists `file` and its dependency record.
    ///
    /// # Errors
    ///
    /// Returns [`KowoError::Io`] when a directory or file cannot be written
    /// and [`KowoError::Record`] when the record does not serialise.
    pub fn write(&self, file: &GeneratedFile) -> Result<WrittenFile, KowoError> {
        let path = self.sources_dir.join(file.relative_path());
        let status = write_atomic(&path, &file.content)?;

        let record = DependencyRecord {
            output: path.clone(),
            sources: file.sources.clone(),
            aggregating: file.aggregating,
            sha256: sha256_hex(&file.content),
        };
        let mut record_text =
            serde_json::to_string_pretty(&record).map_err(|source| KowoError::Record {
                path: path.clone(),
                source,
            })?;
        record_text.push('\n');
        let record_path = self.records_dir.join(file.record_name());
        write_atomic(&record_path, &record_text)?;

        match status {
            WriteStatus::Written => tracing::info!(path = %path, "wrote wrapper"),
            WriteStatus::Unchanged => tracing::debug!(path = %path, "wrapper unchanged"),
        }
        Ok(WrittenFile {
            path,
            record_path,
            record,
            status,
        })
    }
}

/// Hex-encoded SHA-256 digest of `content`.
#[must_use]
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Replaces `path` with `content` via a temporary sibling and a rename.
///
/// Missing parent directories are created. When the file already holds
/// `content` nothing is written.
///
/// # Errors
///
/// Returns [`KowoError::Io`] when the directory or file cannot be written.
pub fn write_atomic(path: &Utf8Path, content: &str) -> Result<WriteStatus, KowoError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let name = path.file_name().ok_or_else(|| {
        KowoError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "output path has no file name"),
        )
    })?;
    let dir = ensure_dir(parent)?;

    if let Ok(existing) = dir.read_to_string(name)
        && existing == content
    {
        return Ok(WriteStatus::Unchanged);
    }

    let temp = format!(".{name}.{}.tmp", std::process::id());
    if let Err(err) = write_temp(&dir, &temp, content) {
        discard_temp(&dir, &temp);
        return Err(KowoError::io(parent.join(&temp), err));
    }
    if let Err(err) = dir.rename(&temp, &dir, name) {
        discard_temp(&dir, &temp);
        return Err(KowoError::io(path, err));
    }
    Ok(WriteStatus::Written)
}

fn write_temp(dir: &Dir, temp: &str, content: &str) -> std::io::Result<()> {
    let mut file = dir.open_with(
        temp,
        OpenOptions::new().write(true).create(true).truncate(true),
    )?;
    file.write_all(content.as_bytes())?;
    file.sync_all()
}

fn discard_temp(dir: &Dir, temp: &str) {
    if let Err(err) = dir.remove_file(temp) {
        tracing::debug!(temp, error = %err, "could not remove temporary file");
    }
}

fn ensure_dir(path: &Utf8Path) -> Result<Dir, KowoError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority())
                .map_err(|io_err| KowoError::io(path, io_err))?;
            Dir::open_ambient_dir(path, ambient_authority())
                .map_err(|io_err| KowoError::io(path, io_err))
        }
        Err(open_err) => Err(KowoError::io(path, open_err)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        unfulfilled_lint_expectations,
        reason = "clippy::expect_used is denied globally; tests may not hit those branches"
    )]
    #![expect(clippy::expect_used, reason = "test panics are acceptable")]
    use super::*;
    use rstest::rstest;

    fn file(package: &str) -> GeneratedFile {
        GeneratedFile {
            package: package.to_owned(),
            file_name: "ModelConfig".to_owned(),
            content: "class ModelConfig\n".to_owned(),
            sources: vec![Utf8PathBuf::from("src/Model.kt")],
            aggregating: true,
        }
    }

    #[rstest]
    #[case("dev.example", "dev/example/ModelConfig.kt", "dev.example.ModelConfig.json")]
    #[case("", "ModelConfig.kt", "ModelConfig.json")]
    fn paths_follow_the_package(
        #[case] package: &str,
        #[case] relative: &str,
        #[case] record: &str,
    ) {
        let generated = file(package);
        assert_eq!(generated.relative_path(), Utf8PathBuf::from(relative));
        assert_eq!(generated.record_name(), record);
    }

    #[rstest]
    fn digest_is_lowercase_hex() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[rstest]
    fn write_atomic_skips_identical_content() {
        let tempdir = tempfile::tempdir().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(tempdir.path().to_path_buf())
            .expect("tempdir path is UTF-8");
        let path = root.join("nested/out.txt");

        assert_eq!(write_atomic(&path, "one").expect("first write"), WriteStatus::Written);
        assert_eq!(write_atomic(&path, "one").expect("second write"), WriteStatus::Unchanged);
        assert_eq!(write_atomic(&path, "two").expect("third write"), WriteStatus::Written);
        assert_eq!(std::fs::read_to_string(&path).expect("read back"), "two");

        let leftovers: Vec<_> = std::fs::read_dir(root.join("nested"))
            .expect("list dir")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
