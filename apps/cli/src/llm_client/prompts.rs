// Cross-cutting prompt fragments shared by extraction and generation.

/// Appended to every structured-extraction system prompt: JSON-only discipline.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Writing-voice rules shared by the draft, refine, and regenerate prompts.
/// The letter should read like a person wrote it, not a template engine.
pub const NATURAL_VOICE_INSTRUCTION: &str = "Write naturally and authentically, \
    as if you're personally explaining your background to a hiring manager. \
    Use varied sentence lengths, include contractions when natural (I've, I'm, that's, it's), \
    and keep the small imperfections that make human writing feel real. \
    Avoid overly polished prose and robotic phrasing. \
    Be conversational yet professional, confident but not stiff. \
    Write in the first person throughout.";
