//! Session orchestrator — wires extraction, generation, the refinement loop,
//! and export together around one conversation context.
//!
//! Flow: restore-or-reset context → extract job metadata → first draft →
//! feedback loop → export on approval. The context is checkpointed after
//! every successful generation and at shutdown.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::context::checkpoint::ContextCheckpoint;
use crate::context::ConversationContext;
use crate::errors::AppError;
use crate::export::{LetterExporter, SessionLog, SessionRecord};
use crate::extract::{extract_job, JobRecord};
use crate::generation::{first_draft, refine, regenerate};
use crate::llm_client::CompletionClient;
use crate::profile::Profile;
use crate::session::{classify_feedback, transition, FeedbackSignal, SessionEvent, SessionState};
use crate::ui::Ui;

/// Where user input comes from. The console implementation lives in `ui`;
/// tests script it.
pub trait FeedbackSource {
    /// One line of feedback. `None` means end-of-input (treated as abandon).
    fn read_feedback(&mut self) -> Result<Option<String>, AppError>;

    /// Yes/no question for recovery prompts (extraction retry, write retry).
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError>;
}

pub struct SessionRunner<'a> {
    pub client: &'a dyn CompletionClient,
    pub checkpoint: &'a dyn ContextCheckpoint,
    pub log: &'a dyn SessionLog,
    pub exporter: &'a LetterExporter,
    pub ui: &'a Ui,
    pub max_refinements: u32,
}

impl SessionRunner<'_> {
    /// Runs one full session. Returns the terminal state on a clean finish;
    /// any unrecovered error carries the state it occurred in via the logs.
    pub async fn run(
        &self,
        profile: &Profile,
        job_path: &Path,
        feedback: &mut dyn FeedbackSource,
        fresh: bool,
    ) -> Result<SessionState, AppError> {
        let mut context = self.restore_context(fresh);

        let job = self.extract_with_reprompt(job_path, feedback).await?;
        self.ui.extracted(&job);

        let mut state = SessionState::Drafting;
        self.ui.section("Generating cover letter");
        let mut letter = match first_draft(self.client, profile, &job, &mut context).await {
            Ok(letter) => letter,
            Err(e) => {
                error!(state = state.name(), kind = e.kind(), "first draft failed: {e}");
                self.ui.error(&format!("{e} (state: {})", state.name()));
                return Err(e);
            }
        };
        self.checkpoint_or_warn(&context);
        state = transition(state, SessionEvent::DraftProduced);
        self.ui.preview(&letter);

        let mut iterations: u32 = 0;
        while !state.is_terminal() {
            let input = match feedback.read_feedback()? {
                Some(input) => input,
                None => {
                    state = transition(state, SessionEvent::FeedbackAbandoned);
                    continue;
                }
            };

            match classify_feedback(&input) {
                FeedbackSignal::Approve => {
                    state = transition(state, SessionEvent::FeedbackApproved);
                }
                FeedbackSignal::Abandon => {
                    state = transition(state, SessionEvent::FeedbackAbandoned);
                }
                signal => {
                    state = transition(state, SessionEvent::FeedbackRevision);
                    iterations += 1;
                    if iterations > self.max_refinements {
                        self.ui.warn(&format!(
                            "{iterations} refinement rounds so far — every round is another API call"
                        ));
                    }

                    let result = match &signal {
                        FeedbackSignal::Reject => {
                            self.ui.info("Generating a completely new letter...");
                            regenerate(self.client, profile, &job, &mut context).await
                        }
                        FeedbackSignal::Revise(text) => {
                            self.ui.info("Refining the letter...");
                            refine(self.client, profile, text, &mut context).await
                        }
                        // Approve/Abandon handled above.
                        _ => continue,
                    };

                    match result {
                        Ok(revised) => {
                            letter = revised;
                            state = transition(state, SessionEvent::RevisionProduced);
                            self.checkpoint_or_warn(&context);
                            self.ui.preview(&letter);
                        }
                        Err(e) => {
                            warn!(state = state.name(), kind = e.kind(), "revision failed: {e}");
                            self.ui.warn(&format!(
                                "Revision failed ({e}); keeping the previous draft."
                            ));
                            state = transition(state, SessionEvent::RevisionFailed);
                        }
                    }
                }
            }
        }

        match state {
            SessionState::Abandoned => {
                // Keep the checkpoint so a later run can resume mid-refinement.
                self.checkpoint_or_warn(&context);
                info!("session abandoned after {iterations} refinement rounds");
                self.ui.info("Session abandoned; conversation kept for a later run.");
                Ok(SessionState::Abandoned)
            }
            SessionState::Approved => {
                self.export_approved(&job, &letter, iterations, feedback)?;
                if let Err(e) = self.checkpoint.clear() {
                    warn!("failed to clear context checkpoint: {e}");
                }
                info!(
                    "session approved after {iterations} refinement rounds for {}",
                    job.company_name
                );
                self.ui.success("Cover letter approved and saved.");
                Ok(SessionState::Approved)
            }
            other => Err(AppError::Internal(anyhow::anyhow!(
                "refinement loop exited in non-terminal state {}",
                other.name()
            ))),
        }
    }

    fn restore_context(&self, fresh: bool) -> ConversationContext {
        if fresh {
            if let Err(e) = self.checkpoint.clear() {
                warn!("failed to clear context checkpoint: {e}");
            }
            return ConversationContext::new();
        }
        match self.checkpoint.load() {
            Ok(ctx) => {
                if !ctx.is_empty() {
                    self.ui
                        .info(&format!("Resuming saved conversation ({} messages)", ctx.len()));
                }
                ctx
            }
            Err(e) => {
                warn!("ignoring unreadable context checkpoint: {e}");
                self.ui.warn(&format!("Starting fresh: {e}"));
                ConversationContext::new()
            }
        }
    }

    /// Extraction is recoverable: on failure the user may fix the job listing
    /// file and retry, or abort the session.
    async fn extract_with_reprompt(
        &self,
        job_path: &Path,
        feedback: &mut dyn FeedbackSource,
    ) -> Result<JobRecord, AppError> {
        loop {
            let attempt = match read_job_text(job_path) {
                Ok(job_text) => extract_job(self.client, &job_text).await,
                Err(e) => Err(e),
            };
            match attempt {
                Ok(job) => return Ok(job),
                Err(e) => {
                    self.ui.error(&format!("{e} (state: {})", SessionState::Drafting.name()));
                    if feedback.confirm("Edit the job listing file and retry extraction?")? {
                        continue;
                    }
                    error!(
                        state = SessionState::Drafting.name(),
                        kind = e.kind(),
                        "extraction aborted: {e}"
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Write retry loop: a failed write never rolls back the approval —
    /// the user is offered a retry of the write step only.
    fn export_approved(
        &self,
        job: &JobRecord,
        letter: &str,
        iterations: u32,
        feedback: &mut dyn FeedbackSource,
    ) -> Result<(), AppError> {
        loop {
            match self.try_export(job, letter, iterations) {
                Ok(path) => {
                    self.ui.info(&format!("Saved to {}", path.display()));
                    return Ok(());
                }
                Err(e) => {
                    error!(state = "APPROVED", kind = e.kind(), "export failed: {e}");
                    self.ui.error(&format!("{e} (state: APPROVED)"));
                    if feedback.confirm("Retry writing the letter and session record?")? {
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }

    fn try_export(&self, job: &JobRecord, letter: &str, iterations: u32) -> Result<PathBuf, AppError> {
        let path = self.exporter.write_letter(job, letter)?;
        let record = SessionRecord::new(job, letter, &path, iterations);
        self.log.append(&record)?;
        Ok(path)
    }

    fn checkpoint_or_warn(&self, context: &ConversationContext) {
        if let Err(e) = self.checkpoint.save(context) {
            warn!("context checkpoint failed: {e}");
            self.ui.warn(&format!("Could not checkpoint the conversation: {e}"));
        }
    }
}

fn read_job_text(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|e| {
        AppError::Extraction(format!("failed to read job listing {}: {e}", path.display()))
    })
}
