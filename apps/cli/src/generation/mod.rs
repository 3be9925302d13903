//! Cover Letter Generator — builds generation requests from the profile, the
//! job record, and the conversation history, and keeps the context in sync.

pub mod generator;
pub mod prompts;

pub use generator::{first_draft, refine, regenerate};
