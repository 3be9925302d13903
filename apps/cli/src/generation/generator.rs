//! Generation calls against the shared conversation context.
//!
//! Every entry point here upholds the same contract: the candidate turn is
//! sent to the API first, and the context is appended only after the call
//! succeeds. On failure the context length is exactly what it was before,
//! so the caller can retry without corrupting history.

use chrono::Local;
use tracing::info;

use crate::context::{ConversationContext, Message};
use crate::errors::AppError;
use crate::extract::JobRecord;
use crate::generation::prompts::{
    DRAFT_PROMPT_TEMPLATE, REFINE_PROMPT_TEMPLATE, REGENERATE_PROMPT_TEMPLATE,
    STYLE_SYSTEM_TEMPLATE,
};
use crate::llm_client::prompts::NATURAL_VOICE_INSTRUCTION;
use crate::llm_client::CompletionClient;
use crate::profile::Profile;

/// Generates the first draft. On an empty context this also establishes the
/// style system message (once per context lifetime).
pub async fn first_draft(
    client: &dyn CompletionClient,
    profile: &Profile,
    job: &JobRecord,
    context: &mut ConversationContext,
) -> Result<String, AppError> {
    info!("generating first draft for {} / {}", job.company_name, job.job_title);
    let request = fill_profile_template(DRAFT_PROMPT_TEMPLATE, profile, job);
    generate_with(client, context, request).await
}

/// Revises the current draft in place using free-text feedback. The full
/// prior history (including the previous draft) is replayed so the model
/// revises rather than regenerates.
pub async fn refine(
    client: &dyn CompletionClient,
    profile: &Profile,
    feedback: &str,
    context: &mut ConversationContext,
) -> Result<String, AppError> {
    info!("refining draft from feedback ({} chars)", feedback.len());
    let request = REFINE_PROMPT_TEMPLATE
        .replace("{feedback}", feedback)
        .replace("{criteria}", &profile.criteria);
    generate_with(client, context, request).await
}

/// From-scratch rewrite after a complete rejection. The rejected draft stays
/// in the history so the model knows what not to repeat.
pub async fn regenerate(
    client: &dyn CompletionClient,
    profile: &Profile,
    job: &JobRecord,
    context: &mut ConversationContext,
) -> Result<String, AppError> {
    info!("regenerating draft after complete rejection");
    let request = fill_profile_template(REGENERATE_PROMPT_TEMPLATE, profile, job);
    generate_with(client, context, request).await
}

/// Core call: sends system (if not yet established) + history + candidate
/// user turn, and commits the user/assistant pair only on success.
async fn generate_with(
    client: &dyn CompletionClient,
    context: &mut ConversationContext,
    request: String,
) -> Result<String, AppError> {
    let style_system = style_system();
    let add_system = !context.has_system();

    let mut messages: Vec<Message> = Vec::with_capacity(context.len() + 2);
    if add_system {
        messages.push(Message::system(style_system.clone()));
    }
    messages.extend_from_slice(context.messages());
    messages.push(Message::user(request.clone()));

    let letter = client
        .complete(&messages)
        .await
        .map_err(|e| AppError::Generation(format!("generation call failed: {e}")))?;
    let letter = letter.trim().to_string();

    // Success: commit the turns. Order matters — system first, then the
    // request, then the reply.
    if add_system {
        context.ensure_system(&style_system);
    }
    context.push(Message::user(request));
    context.push(Message::assistant(letter.clone()));

    Ok(letter)
}

fn style_system() -> String {
    STYLE_SYSTEM_TEMPLATE.replace("{voice_instruction}", NATURAL_VOICE_INSTRUCTION)
}

fn fill_profile_template(
    template: &str,
    profile: &Profile,
    job: &JobRecord,
) -> String {
    template
        .replace("{current_date}", &Local::now().format("%B %d, %Y").to_string())
        .replace("{job_description}", &job.raw_description)
        .replace("{resume}", &profile.resume_text)
        .replace("{skills}", &profile.skills_summary())
        .replace("{criteria}", &profile.criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Role;
    use crate::llm_client::testing::{ScriptedClient, ScriptedReply};
    use crate::profile::{Profile, Skill};

    fn test_profile() -> Profile {
        Profile {
            resume_text: "Jane Doe, backend engineer.".to_string(),
            skills: vec![Skill {
                name: "Rust".to_string(),
                descriptor: "async services".to_string(),
            }],
            criteria: "Be direct.".to_string(),
        }
    }

    fn test_job() -> JobRecord {
        JobRecord {
            company_name: "Acme".to_string(),
            job_title: "Backend Engineer".to_string(),
            raw_description: "Build backend things at Acme.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_draft_establishes_system_user_assistant() {
        let client = ScriptedClient::new(vec![ScriptedReply::Text("Dear Acme team,")]);
        let mut ctx = ConversationContext::new();

        let letter = first_draft(&client, &test_profile(), &test_job(), &mut ctx)
            .await
            .unwrap();

        assert_eq!(letter, "Dear Acme team,");
        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx.messages()[0].role, Role::System);
        assert_eq!(ctx.messages()[1].role, Role::User);
        assert_eq!(ctx.messages()[2].role, Role::Assistant);
        assert!(ctx.messages()[1].content.contains("Build backend things"));
        assert!(ctx.messages()[1].content.contains("Rust (async services)"));
    }

    #[tokio::test]
    async fn test_refine_appends_only_user_and_assistant() {
        let client = ScriptedClient::new(vec![
            ScriptedReply::Text("Draft one."),
            ScriptedReply::Text("Draft two, shorter."),
        ]);
        let mut ctx = ConversationContext::new();
        let profile = test_profile();

        first_draft(&client, &profile, &test_job(), &mut ctx)
            .await
            .unwrap();
        let revised = refine(&client, &profile, "make it shorter", &mut ctx)
            .await
            .unwrap();

        assert_eq!(revised, "Draft two, shorter.");
        assert_eq!(ctx.len(), 5);

        let system_count = ctx
            .messages()
            .iter()
            .filter(|m| m.role == Role::System)
            .count();
        assert_eq!(system_count, 1, "at most one system message per lifetime");
    }

    #[tokio::test]
    async fn test_refine_replays_full_history() {
        let client = ScriptedClient::new(vec![
            ScriptedReply::Text("Draft one."),
            ScriptedReply::Text("Draft two."),
        ]);
        let mut ctx = ConversationContext::new();
        let profile = test_profile();

        first_draft(&client, &profile, &test_job(), &mut ctx)
            .await
            .unwrap();
        refine(&client, &profile, "tighter opening", &mut ctx)
            .await
            .unwrap();

        let sent = client.last_messages();
        // system + first request + first draft + refine request
        assert_eq!(sent.len(), 4);
        assert!(sent
            .iter()
            .any(|m| m.role == Role::Assistant && m.content == "Draft one."));
    }

    #[tokio::test]
    async fn test_failed_call_leaves_context_unchanged() {
        let client = ScriptedClient::new(vec![ScriptedReply::ApiError]);
        let mut ctx = ConversationContext::new();

        let result = first_draft(&client, &test_profile(), &test_job(), &mut ctx).await;

        assert!(matches!(result, Err(AppError::Generation(_))));
        assert_eq!(ctx.len(), 0, "no partial append on failure");
    }

    #[tokio::test]
    async fn test_failed_refine_leaves_context_unchanged() {
        let client = ScriptedClient::new(vec![
            ScriptedReply::Text("Draft one."),
            ScriptedReply::Empty,
        ]);
        let mut ctx = ConversationContext::new();
        let profile = test_profile();

        first_draft(&client, &profile, &test_job(), &mut ctx)
            .await
            .unwrap();
        let before = ctx.len();

        let result = refine(&client, &profile, "shorter", &mut ctx).await;
        assert!(matches!(result, Err(AppError::Generation(_))));
        assert_eq!(ctx.len(), before, "no partial append on failure");
    }

    #[tokio::test]
    async fn test_regenerate_mentions_rejection_and_keeps_single_system() {
        let client = ScriptedClient::new(vec![
            ScriptedReply::Text("Draft one."),
            ScriptedReply::Text("A fresh take."),
        ]);
        let mut ctx = ConversationContext::new();
        let profile = test_profile();
        let job = test_job();

        first_draft(&client, &profile, &job, &mut ctx).await.unwrap();
        let letter = regenerate(&client, &profile, &job, &mut ctx).await.unwrap();

        assert_eq!(letter, "A fresh take.");
        let sent = client.last_messages();
        assert!(sent
            .last()
            .unwrap()
            .content
            .contains("COMPLETELY REJECTED"));
        let system_count = ctx
            .messages()
            .iter()
            .filter(|m| m.role == Role::System)
            .count();
        assert_eq!(system_count, 1);
    }
}
