//! Profile Loader — the user's static inputs: resume text, skills, criteria.
//!
//! Loaded once per session and read-only downstream. Any failure here is
//! `AppError::ProfileLoad` and aborts the session before any API spend.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::AppError;

/// One (skill, descriptor) pair from the skills file. Order preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub name: String,
    pub descriptor: String,
}

/// The user's static inputs, read-only for the rest of the session.
#[derive(Debug, Clone)]
pub struct Profile {
    pub resume_text: String,
    pub skills: Vec<Skill>,
    pub criteria: String,
}

impl Profile {
    /// Comma-separated skill summary suitable for inlining into a prompt.
    pub fn skills_summary(&self) -> String {
        self.skills
            .iter()
            .map(|s| {
                if s.descriptor.is_empty() {
                    s.name.clone()
                } else {
                    format!("{} ({})", s.name, s.descriptor)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Loads the profile from a directory of conventional filenames:
/// `resume.pdf` (or `resume.txt`), `skills.tsv`, `criteria.txt`.
pub struct FileProfileLoader {
    dir: PathBuf,
}

impl FileProfileLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load(&self) -> Result<Profile, AppError> {
        let profile = Profile {
            resume_text: self.load_resume_text()?,
            skills: self.load_skills()?,
            criteria: self.load_criteria()?,
        };
        debug!(
            "profile loaded: {} resume chars, {} skills",
            profile.resume_text.len(),
            profile.skills.len()
        );
        Ok(profile)
    }

    /// Resume text from `resume.pdf` when present, otherwise `resume.txt`.
    pub fn load_resume_text(&self) -> Result<String, AppError> {
        let pdf_path = self.dir.join("resume.pdf");
        let text = if pdf_path.exists() {
            pdf_extract::extract_text(&pdf_path).map_err(|e| {
                AppError::ProfileLoad(format!(
                    "failed to extract text from {}: {e}",
                    pdf_path.display()
                ))
            })?
        } else {
            read_profile_file(&self.dir.join("resume.txt"))?
        };

        if text.trim().is_empty() {
            return Err(AppError::ProfileLoad(format!(
                "resume in {} is empty",
                self.dir.display()
            )));
        }
        Ok(text)
    }

    /// Skills from `skills.tsv`: one `name<TAB>descriptor` pair per line,
    /// descriptor optional. Blank lines and `#` comments are skipped.
    pub fn load_skills(&self) -> Result<Vec<Skill>, AppError> {
        let raw = read_profile_file(&self.dir.join("skills.tsv"))?;
        let skills: Vec<Skill> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                let (name, descriptor) = match line.split_once('\t') {
                    Some((name, descriptor)) => (name, descriptor),
                    None => (line, ""),
                };
                Skill {
                    name: name.trim().to_string(),
                    descriptor: descriptor.trim().to_string(),
                }
            })
            .collect();

        if skills.is_empty() {
            return Err(AppError::ProfileLoad(format!(
                "no skills found in {}",
                self.dir.join("skills.tsv").display()
            )));
        }
        Ok(skills)
    }

    pub fn load_criteria(&self) -> Result<String, AppError> {
        read_profile_file(&self.dir.join("criteria.txt"))
    }
}

fn read_profile_file(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path)
        .map_err(|e| AppError::ProfileLoad(format!("failed to read {}: {e}", path.display())))
}
