// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System message establishing the writing voice. Inserted into the
/// conversation context at most once, before the first user turn.
/// Replace `{voice_instruction}` with the shared fragment.
pub const STYLE_SYSTEM_TEMPLATE: &str =
    "You are an experienced professional writing a cover letter. {voice_instruction} \
    Use the exact phrasing and style from the writing guidelines provided - \
    don't rewrite them in formal language. \
    When asked to revise, respond ONLY with the complete revised cover letter text.";

/// First-draft request template.
/// Replace: {current_date}, {job_description}, {resume}, {skills}, {criteria}
pub const DRAFT_PROMPT_TEMPLATE: &str = r#"Write a cover letter for this position. Write naturally - like a human would, using whatever length is most effective to showcase the candidate's qualifications.

**Today's Date:** {current_date}

**Job Description:**
{job_description}

**My Resume:**
{resume}

**My Skills:** {skills}

**Writing Guidelines & Experience Bank:**
{criteria}

**Critical Instructions:**
- Use the EXACT phrasing from the guidelines sections - don't rewrite them formally
- Include contractions (I've, I'm, that's, it's, haven't, don't)
- Write as if you're talking to someone, not writing a formal document
- Mix short and long sentences naturally
- If you don't have direct experience with something mentioned, acknowledge it honestly but show relevant experience
- Focus on the CORE JOB FUNCTION rather than industry context"#;

/// Refinement request template - the prior draft is already in the history,
/// so this carries only the feedback and the standing guidelines.
/// Replace: {feedback}, {criteria}
pub const REFINE_PROMPT_TEMPLATE: &str = r#"Please revise the cover letter above based on this feedback. Keep it natural and human-sounding.

**Feedback:**
{feedback}

**Guidelines:**
{criteria}

Remember:
- Keep contractions (I've, I'm, that's, haven't)
- Write naturally with varied sentence structures
- Avoid overly polished language
- Maintain the conversational tone
- Respond ONLY with the complete, revised cover letter text"#;

/// Full-rejection request template - the user wants a from-scratch rewrite,
/// not a touch-up. The rejected draft is already in the history.
/// Replace: {current_date}, {job_description}, {resume}, {skills}, {criteria}
pub const REGENERATE_PROMPT_TEMPLATE: &str = r#"I've COMPLETELY REJECTED the cover letter above - it was entirely unsuitable. I don't want refinements; write a COMPLETELY NEW and much better cover letter from scratch.

**Today's Date:** {current_date}

**Job Description:**
{job_description}

**My Resume:**
{resume}

**My Skills:** {skills}

**Writing Guidelines & Experience Bank:**
{criteria}

**Critical Instructions for the NEW cover letter:**
- Create something COMPLETELY DIFFERENT from the rejected version
- Make it significantly more compelling and targeted
- Use the EXACT phrasing from the guidelines sections
- Include contractions (I've, I'm, that's, it's, haven't, don't)
- Focus on the CORE JOB FUNCTION and what makes this candidate special
- Show genuine enthusiasm and connection to the role
- Respond ONLY with the complete new cover letter text"#;
