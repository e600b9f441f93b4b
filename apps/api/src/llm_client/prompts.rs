// Cross-cutting prompt fragments. Feature-specific prompts live beside their feature
// (see `resumes/prompts.rs`).

/// Keeps suggestions anchored to what the user actually wrote.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Only rephrase, tighten, or restructure the information provided. \
    Do NOT invent employers, dates, metrics, technologies, or achievements. \
    If a detail is missing, leave it out rather than guessing.";
