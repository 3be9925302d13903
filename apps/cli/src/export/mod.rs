//! Persistence/Export — writes the approved letter to disk and appends one
//! record per completed session to an append-only JSONL log.
//!
//! The log is a separate interface from the context checkpoint so either
//! backing store can be swapped independently.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::JobRecord;

/// Byte bound for a sanitized path component. Well under the 255-byte limit
/// of every mainstream filesystem.
pub const MAX_COMPONENT_BYTES: usize = 100;

const EXCERPT_CHARS: usize = 120;

/// One completed application, appended to the session log. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub company_name: String,
    pub job_title: String,
    pub letter_path: String,
    pub letter_excerpt: String,
    pub feedback_iterations: u32,
    pub timestamp: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(job: &JobRecord, letter: &str, letter_path: &std::path::Path, feedback_iterations: u32) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            company_name: job.company_name.clone(),
            job_title: job.job_title.clone(),
            letter_path: letter_path.display().to_string(),
            letter_excerpt: letter.chars().take(EXCERPT_CHARS).collect(),
            feedback_iterations,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only structured session log.
pub trait SessionLog {
    fn append(&self, record: &SessionRecord) -> Result<(), AppError>;
}

/// JSON Lines implementation: one serialized `SessionRecord` per line.
pub struct JsonlSessionLog {
    path: PathBuf,
}

impl JsonlSessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionLog for JsonlSessionLog {
    fn append(&self, record: &SessionRecord) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Persistence(format!(
                    "failed to create log directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let line = serde_json::to_string(record)
            .map_err(|e| AppError::Persistence(format!("failed to serialize record: {e}")))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                AppError::Persistence(format!("failed to open log {}: {e}", self.path.display()))
            })?;
        writeln!(file, "{line}").map_err(|e| {
            AppError::Persistence(format!("failed to append to {}: {e}", self.path.display()))
        })
    }
}

/// Writes approved letters under `<output_dir>/<company>/<title>_CoverLetter.txt`.
pub struct LetterExporter {
    output_dir: PathBuf,
}

impl LetterExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn write_letter(&self, job: &JobRecord, letter: &str) -> Result<PathBuf, AppError> {
        let company = non_empty_or(sanitize_component(&job.company_name), "unknown_company");
        let title = non_empty_or(sanitize_component(&job.job_title), "cover_letter");

        let dir = self.output_dir.join(company);
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::Persistence(format!("failed to create {}: {e}", dir.display()))
        })?;

        let path = dir.join(format!("{}_CoverLetter.txt", title.replace(' ', "_")));
        fs::write(&path, letter).map_err(|e| {
            AppError::Persistence(format!("failed to write {}: {e}", path.display()))
        })?;
        info!("letter written to {}", path.display());
        Ok(path)
    }
}

fn non_empty_or(s: String, fallback: &str) -> String {
    if s.is_empty() {
        fallback.to_string()
    } else {
        s
    }
}

/// Sanitizes one path component so it is filesystem-safe everywhere:
/// any char outside `[A-Za-z0-9 _-]` becomes `_`; each run of separator
/// chars collapses to a single one (`_` wins over space/hyphen); leading
/// and trailing separators are trimmed; the result is truncated to
/// `MAX_COMPONENT_BYTES`. Idempotent.
pub fn sanitize_component(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    // (run char, run contained an underscore)
    let mut run: Option<(char, bool)> = None;

    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-' {
            c
        } else {
            '_'
        };
        if c == ' ' || c == '_' || c == '-' {
            match run {
                Some((_, ref mut saw)) => *saw |= c == '_',
                None => run = Some((c, c == '_')),
            }
        } else {
            if let Some((first, saw)) = run.take() {
                out.push(if saw { '_' } else { first });
            }
            out.push(c);
        }
    }
    // A trailing separator run is dropped entirely.

    let mut out = out
        .trim_matches(|c| c == ' ' || c == '_' || c == '-')
        .to_string();

    // All chars are ASCII at this point, so byte truncation is char-safe.
    out.truncate(MAX_COMPONENT_BYTES);
    out.trim_matches(|c| c == ' ' || c == '_' || c == '-')
        .to_string()
}
