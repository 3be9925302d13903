//! Job Extractor — pulls company name and job title out of a raw job listing.
//!
//! One stateless structured call; the exchange is deliberately NOT appended to
//! the shared conversation context. No internal retry — the session runner
//! decides whether to re-prompt for the job text or abort.

pub mod prompts;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::Message;
use crate::errors::AppError;
use crate::extract::prompts::{EXTRACT_PROMPT_TEMPLATE, EXTRACT_SYSTEM_BASE};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{strip_json_fences, CompletionClient};

/// Extracted metadata for one job application. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub company_name: String,
    pub job_title: String,
    pub raw_description: String,
}

#[derive(Debug, Deserialize)]
struct ExtractedInfo {
    company_name: String,
    job_title: String,
}

/// Extracts a `JobRecord` from the raw listing text via one structured call.
///
/// Fails with `AppError::Extraction` when the listing is empty, the call
/// fails, or the response has no usable company/title after trimming.
pub async fn extract_job(
    client: &dyn CompletionClient,
    job_text: &str,
) -> Result<JobRecord, AppError> {
    if job_text.trim().is_empty() {
        return Err(AppError::Extraction("job listing text is empty".to_string()));
    }

    let system = format!("{EXTRACT_SYSTEM_BASE}{JSON_ONLY_INSTRUCTION}");
    let messages = vec![
        Message::system(system),
        Message::user(EXTRACT_PROMPT_TEMPLATE.replace("{job_text}", job_text)),
    ];

    let response = client
        .complete(&messages)
        .await
        .map_err(|e| AppError::Extraction(format!("extraction call failed: {e}")))?;

    let info = parse_extracted(&response)?;
    debug!(
        "extracted company={:?} title={:?}",
        info.company_name, info.job_title
    );

    Ok(JobRecord {
        company_name: info.company_name,
        job_title: info.job_title,
        raw_description: job_text.to_string(),
    })
}

/// Strict schema check on the response, with a labelled-line fallback for
/// models that ignore the JSON instruction.
fn parse_extracted(response: &str) -> Result<ExtractedInfo, AppError> {
    let cleaned = strip_json_fences(response);

    let info = match serde_json::from_str::<ExtractedInfo>(cleaned) {
        Ok(info) => info,
        Err(e) => {
            warn!("extraction response was not valid JSON ({e}); trying labelled lines");
            parse_labelled_lines(response).ok_or_else(|| {
                AppError::Extraction(format!("response is not the expected two-key structure: {e}"))
            })?
        }
    };

    let company_name = info.company_name.trim().to_string();
    let job_title = info.job_title.trim().to_string();
    if company_name.is_empty() || job_title.is_empty() {
        return Err(AppError::Extraction(
            "extraction produced an empty company name or job title".to_string(),
        ));
    }
    Ok(ExtractedInfo {
        company_name,
        job_title,
    })
}

/// Fallback: scan for `Company Name:` / `Job Title:` labelled lines.
fn parse_labelled_lines(response: &str) -> Option<ExtractedInfo> {
    let mut company_name = String::new();
    let mut job_title = String::new();
    for line in response.lines() {
        if let Some(rest) = line.split_once("Company Name:") {
            company_name = rest.1.trim().to_string();
        } else if let Some(rest) = line.split_once("Job Title:") {
            job_title = rest.1.trim().to_string();
        }
    }
    if company_name.is_empty() && job_title.is_empty() {
        return None;
    }
    Some(ExtractedInfo {
        company_name,
        job_title,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{ScriptedClient, ScriptedReply};

    const ACME_LISTING: &str = "Company: Acme\nTitle: Backend Engineer\nWe build things.";

    #[tokio::test]
    async fn test_extracts_job_record_from_json_response() {
        let client = ScriptedClient::new(vec![ScriptedReply::Text(
            r#"{"company_name": "Acme", "job_title": "Backend Engineer"}"#,
        )]);
        let record = extract_job(&client, ACME_LISTING).await.unwrap();
        assert_eq!(record.company_name, "Acme");
        assert_eq!(record.job_title, "Backend Engineer");
        assert_eq!(record.raw_description, ACME_LISTING);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fenced_json_response_is_accepted() {
        let client = ScriptedClient::new(vec![ScriptedReply::Text(
            "```json\n{\"company_name\": \"Acme\", \"job_title\": \"Engineer\"}\n```",
        )]);
        let record = extract_job(&client, ACME_LISTING).await.unwrap();
        assert_eq!(record.company_name, "Acme");
    }

    #[tokio::test]
    async fn test_labelled_line_fallback() {
        let client = ScriptedClient::new(vec![ScriptedReply::Text(
            "Company Name: Acme\nJob Title: Backend Engineer",
        )]);
        let record = extract_job(&client, ACME_LISTING).await.unwrap();
        assert_eq!(record.company_name, "Acme");
        assert_eq!(record.job_title, "Backend Engineer");
    }

    #[tokio::test]
    async fn test_unparseable_response_is_extraction_error() {
        let client = ScriptedClient::new(vec![ScriptedReply::Text("sorry, I cannot do that")]);
        let result = extract_job(&client, ACME_LISTING).await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_empty_values_are_rejected_after_trimming() {
        let client = ScriptedClient::new(vec![ScriptedReply::Text(
            r#"{"company_name": "  ", "job_title": "Backend Engineer"}"#,
        )]);
        let result = extract_job(&client, ACME_LISTING).await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_empty_job_text_fails_without_api_call() {
        let client = ScriptedClient::new(vec![]);
        let result = extract_job(&client, "   ").await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
        assert_eq!(client.call_count(), 0, "no API spend on empty input");
    }

    #[tokio::test]
    async fn test_api_failure_is_wrapped_as_extraction_error() {
        let client = ScriptedClient::new(vec![ScriptedReply::ApiError]);
        let result = extract_job(&client, ACME_LISTING).await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_extraction_call_carries_one_system_and_one_user_turn() {
        let client = ScriptedClient::new(vec![ScriptedReply::Text(
            r#"{"company_name": "Acme", "job_title": "Engineer"}"#,
        )]);
        extract_job(&client, ACME_LISTING).await.unwrap();
        let sent = client.last_messages();
        assert_eq!(sent.len(), 2, "extraction is a one-off, not the shared context");
        assert!(sent[1].content.contains(ACME_LISTING));
    }
}
