use thiserror::Error;

/// Application-level error taxonomy. Raw transport and parse errors from
/// external collaborators are wrapped into one of these at the point of call
/// and never reach the user-facing layer directly.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or corrupt profile inputs — fatal, raised before any API spend.
    #[error("Profile load error: {0}")]
    ProfileLoad(String),

    /// Job-metadata response was unparseable or incomplete.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Generation API call failed or returned empty content.
    #[error("Generation error: {0}")]
    Generation(String),

    /// A durable write (letter, record, checkpoint) could not complete.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Exit code for a session the user abandoned. Distinct from the error codes
/// below and from success.
pub const EXIT_ABANDONED: i32 = 2;

impl AppError {
    /// Process exit code for an unrecovered error of this class.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::ProfileLoad(_) => 10,
            AppError::Extraction(_) => 11,
            AppError::Generation(_) => 12,
            AppError::Persistence(_) => 13,
            AppError::Internal(_) => 1,
        }
    }

    /// Short kind tag used in failure log records.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ProfileLoad(_) => "PROFILE_LOAD",
            AppError::Extraction(_) => "EXTRACTION",
            AppError::Generation(_) => "GENERATION",
            AppError::Persistence(_) => "PERSISTENCE",
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            AppError::ProfileLoad("x".into()),
            AppError::Extraction("x".into()),
            AppError::Generation("x".into()),
            AppError::Persistence("x".into()),
            AppError::Internal(anyhow::anyhow!("x")),
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        codes.push(EXIT_ABANDONED);
        codes.push(0);
        let unique: std::collections::HashSet<i32> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len(), "exit codes must not collide");
    }
}
