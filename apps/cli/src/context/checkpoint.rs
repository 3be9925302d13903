//! Context checkpoint store — persists the conversation between runs so a
//! later session can resume mid-refinement.
//!
//! Kept behind a trait so the JSON file backing can be swapped without
//! touching the session runner.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::context::ConversationContext;
use crate::errors::AppError;

/// Durable store for the conversation context.
pub trait ContextCheckpoint {
    /// Writes the full context, replacing any previous checkpoint.
    fn save(&self, context: &ConversationContext) -> Result<(), AppError>;

    /// Loads the checkpointed context. A missing checkpoint yields an empty
    /// context; a corrupt one is an error the caller decides how to handle.
    fn load(&self) -> Result<ConversationContext, AppError>;

    /// Removes the checkpoint, if present.
    fn clear(&self) -> Result<(), AppError>;
}

/// File-backed checkpoint: one JSON array of `{role, content}` records.
pub struct JsonFileCheckpoint {
    path: PathBuf,
}

impl JsonFileCheckpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContextCheckpoint for JsonFileCheckpoint {
    fn save(&self, context: &ConversationContext) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Persistence(format!(
                    "failed to create checkpoint directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let json = serde_json::to_string_pretty(context)
            .map_err(|e| AppError::Persistence(format!("failed to serialize context: {e}")))?;
        fs::write(&self.path, json).map_err(|e| {
            AppError::Persistence(format!(
                "failed to write checkpoint {}: {e}",
                self.path.display()
            ))
        })?;
        debug!("checkpointed {} messages to {}", context.len(), self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<ConversationContext, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ConversationContext::new());
            }
            Err(e) => {
                return Err(AppError::Persistence(format!(
                    "failed to read checkpoint {}: {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Persistence(format!(
                "corrupt checkpoint {}: {e}",
                self.path.display()
            ))
        })
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Persistence(format!(
                "failed to remove checkpoint {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Message;

    fn checkpoint_in(dir: &tempfile::TempDir) -> JsonFileCheckpoint {
        JsonFileCheckpoint::new(dir.path().join("context.json"))
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = checkpoint_in(&dir);

        let mut ctx = ConversationContext::new();
        ctx.push(Message::system("style"));
        ctx.push(Message::user("draft one"));
        ctx.push(Message::assistant("Dear team,"));

        store.save(&ctx).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, ctx);
    }

    #[test]
    fn test_missing_checkpoint_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = checkpoint_in(&dir);
        let loaded = store.load().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_checkpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.json");
        fs::write(&path, "not json {{{").unwrap();
        let store = JsonFileCheckpoint::new(&path);
        assert!(matches!(store.load(), Err(AppError::Persistence(_))));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = checkpoint_in(&dir);
        store.save(&ConversationContext::new()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCheckpoint::new(dir.path().join("nested/deeper/context.json"));
        store.save(&ConversationContext::new()).unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
