use crate::error::{PipelineError, io_err};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Original,
    Obfuscated,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Original, Group::Obfuscated];

    pub fn as_str(self) -> &'static str {
        match self {
            Group::Original => "original",
            Group::Obfuscated => "obfuscated",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionJob {
    pub ordinal: usize,
    pub source: PathBuf,
    pub group: Group,
}

impl ConversionJob {
    /// Join key shared by the rendered image and the report index.
    pub fn base_name(&self) -> String {
        stem_base_name(&self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Succeeded,
    Failed { diagnostic: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job: ConversionJob,
    pub output: PathBuf,
    #[serde(flatten)]
    pub status: JobStatus,
}

impl JobResult {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, JobStatus::Succeeded)
    }
}

/// Strips `.` from both ends of a file stem. Distinct raw names can collapse to the
/// same base name (`foo.` and `.foo` both become `foo`); callers treat that as a collision.
/// Names that are not valid UTF-8 never get here: `list_files_with_extension` skips them.
pub fn normalize_base_name(stem: &str) -> &str {
    stem.trim_matches('.')
}

pub fn stem_base_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    normalize_base_name(stem).to_string()
}

/// Lists `*.{extension}` under `original/` then `obfuscated/`, each sorted by file name.
/// A missing group directory contributes nothing; a missing `dot_dir` is an error.
pub fn discover_inputs(
    dot_dir: &Path,
    extension: &str,
) -> Result<Vec<ConversionJob>, PipelineError> {
    if !dot_dir.is_dir() {
        return Err(PipelineError::MissingInputDirectory(dot_dir.to_path_buf()));
    }

    let mut jobs = Vec::new();
    for group in Group::ALL {
        for source in list_files_with_extension(&dot_dir.join(group.as_str()), extension)? {
            let ordinal = jobs.len();
            jobs.push(ConversionJob {
                ordinal,
                source,
                group,
            });
        }
    }
    Ok(jobs)
}

/// Regular files in `dir` whose extension equals `extension`, sorted by file name.
/// Returns an empty list when `dir` does not exist. Names that are not valid UTF-8 are
/// skipped with a warning, since they cannot be joined by base name or linked from the page.
pub fn list_files_with_extension(
    dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, PipelineError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) != Some(extension) {
            continue;
        }
        if entry.file_name().to_str().is_none() {
            warn!("skipping non-UTF-8 file name {}", path.display());
            continue;
        }
        out.push(path);
    }
    out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(out)
}
