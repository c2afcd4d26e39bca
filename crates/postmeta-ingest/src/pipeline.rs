//! Batch conversion of a metadata directory into one CSV file
//!
//! Files are processed one at a time: decode, extract, append. The CSV is
//! only written once every input has been handled, so an aborted run leaves
//! any previous output untouched.

use crate::config::{IngestConfig, MalformedInputPolicy};
use crate::decoder::decode_file;
use crate::error::{IngestError, Result};
use crate::post::Post;
use crate::table::PostTable;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// Summary of a conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Input files matching the suffix
    pub files_seen: usize,
    pub posts_written: usize,
    /// Documents of another node type
    pub skipped_non_post: usize,
    /// Files dropped under [`MalformedInputPolicy::Skip`]
    pub skipped_malformed: usize,
    pub output_path: PathBuf,
}

/// Files directly inside `dir` whose names end with `suffix`
///
/// Hidden files are ignored. Order is whatever the directory listing yields.
pub fn list_input_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::filesystem(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input directory does not exist"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| IngestError::filesystem(dir, e.into()))?;
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.starts_with('.') || !name.ends_with(suffix) {
            continue;
        }
        // Follows symlinks
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Decode and extract one input file
pub fn process_file(path: &Path) -> Result<Option<Post>> {
    let document = decode_file(path).map_err(|e| e.in_file(path))?;
    Post::from_document(&document).map_err(|e| e.in_file(path))
}

/// Combine every metadata file in `config.input_dir` into one CSV
#[instrument(skip_all, fields(input_dir = %config.input_dir.display()))]
pub fn json_files_to_csv(config: &IngestConfig) -> Result<ConversionReport> {
    let mut files = list_input_files(&config.input_dir, &config.input_suffix)?;
    if config.sort_inputs {
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }
    info!(count = files.len(), suffix = %config.input_suffix, "Found input files");

    let mut table = PostTable::new();
    let mut skipped_non_post = 0;
    let mut skipped_malformed = 0;

    for path in &files {
        match process_file(path) {
            Ok(Some(post)) => {
                debug!(id = post.id, path = %path.display(), "Extracted post");
                table.push(post);
            },
            Ok(None) => skipped_non_post += 1,
            Err(err) => match config.on_malformed {
                MalformedInputPolicy::Abort => return Err(err),
                MalformedInputPolicy::Skip => {
                    warn!(path = %path.display(), error = %err.root(), "Skipping malformed input file");
                    skipped_malformed += 1;
                },
            },
        }
    }

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| IngestError::filesystem(&config.output_dir, e))?;
    let output_path = config.output_path();
    table.write_csv(&output_path)?;

    let report = ConversionReport {
        files_seen: files.len(),
        posts_written: table.len(),
        skipped_non_post,
        skipped_malformed,
        output_path,
    };
    info!(
        posts = report.posts_written,
        skipped_non_post = report.skipped_non_post,
        skipped_malformed = report.skipped_malformed,
        output = %report.output_path.display(),
        "Wrote post table"
    );

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_list_input_files_filters_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.json.xz", "b.json.xz", "c.json", "d.jpg", ".hidden.json.xz", "a.json.xz.part"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.json.xz")).unwrap();
        fs::write(dir.path().join("nested.json.xz").join("e.json.xz"), b"").unwrap();

        let mut names: Vec<String> = list_input_files(dir.path(), ".json.xz")
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.json.xz", "b.json.xz"]);
    }

    #[test]
    fn test_list_input_files_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_input_files(&dir.path().join("raw"), ".json.xz").unwrap_err();
        assert!(matches!(err, IngestError::Filesystem { .. }));
    }

    #[test]
    fn test_process_file_wraps_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json.xz");
        fs::write(&path, b"definitely not xz").unwrap();

        let err = process_file(&path).unwrap_err();
        assert!(matches!(err, IngestError::InFile { path: ref p, .. } if p == &path));
        assert!(matches!(err.root(), IngestError::Parse(_)));
    }
}
