// LLM prompt constants for job-metadata extraction.

/// System prompt for the one-off extraction call — enforces JSON-only output.
/// Built at startup by appending the shared JSON discipline fragment.
pub const EXTRACT_SYSTEM_BASE: &str =
    "You are a highly accurate data extraction assistant. Extract the company \
    name and job title from the provided job listing. ";

/// Extraction prompt template. Replace `{job_text}` before sending.
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"Here is the job listing:

---
{job_text}
---

Extract the company name and job title. Respond with a JSON object with this
EXACT schema (no extra fields):
{
  "company_name": "Acme",
  "job_title": "Backend Engineer"
}"#;
