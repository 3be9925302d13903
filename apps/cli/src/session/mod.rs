//! Refinement Loop — the session state machine and the feedback classifier
//! that drives it. The runner (see `runner`) owns the side effects; the
//! transition function here is pure so the reachability rules are checkable.

pub mod runner;

/// Session states. `Approved` and `Abandoned` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Drafting,
    AwaitingFeedback,
    Revising,
    Approved,
    Abandoned,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Approved | SessionState::Abandoned)
    }

    /// Name used in error reports and failure log records.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Drafting => "DRAFTING",
            SessionState::AwaitingFeedback => "AWAITING_FEEDBACK",
            SessionState::Revising => "REVISING",
            SessionState::Approved => "APPROVED",
            SessionState::Abandoned => "ABANDONED",
        }
    }
}

/// Events the runner feeds into the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    DraftProduced,
    FeedbackApproved,
    FeedbackAbandoned,
    FeedbackRevision,
    RevisionProduced,
    /// Generation failed during revision; the prior draft is retained and
    /// the user is re-prompted.
    RevisionFailed,
}

/// Pure transition function. Terminal states and mismatched events keep the
/// current state.
pub fn transition(state: SessionState, event: SessionEvent) -> SessionState {
    use SessionEvent::*;
    use SessionState::*;
    match (state, event) {
        (Drafting, DraftProduced) => AwaitingFeedback,
        (AwaitingFeedback, FeedbackApproved) => Approved,
        (AwaitingFeedback, FeedbackAbandoned) => Abandoned,
        (AwaitingFeedback, FeedbackRevision) => Revising,
        (Revising, RevisionProduced) => AwaitingFeedback,
        (Revising, RevisionFailed) => AwaitingFeedback,
        (s, _) => s,
    }
}

/// What a piece of user feedback means for the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackSignal {
    /// Empty input or a recognized affirmative token.
    Approve,
    /// Explicit exit token.
    Abandon,
    /// Explicit full-rejection token — regenerate from scratch.
    Reject,
    /// Anything else: free-text revision feedback.
    Revise(String),
}

const APPROVAL_TOKENS: &[&str] = &["y", "yes", "ok", "okay", "approve", "approved", "looks good"];
const EXIT_TOKENS: &[&str] = &["stop", "quit", "exit", "abandon"];
const REJECT_TOKENS: &[&str] = &["no", "reject", "rejected"];

/// Classifies raw feedback input. Token matching is case-insensitive on the
/// whole trimmed input, so "make it say no regrets" is still revision text.
pub fn classify_feedback(input: &str) -> FeedbackSignal {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return FeedbackSignal::Approve;
    }
    let lowered = trimmed.to_lowercase();
    if APPROVAL_TOKENS.contains(&lowered.as_str()) {
        return FeedbackSignal::Approve;
    }
    if EXIT_TOKENS.contains(&lowered.as_str()) {
        return FeedbackSignal::Abandon;
    }
    if REJECT_TOKENS.contains(&lowered.as_str()) {
        return FeedbackSignal::Reject;
    }
    FeedbackSignal::Revise(trimmed.to_string())
}
