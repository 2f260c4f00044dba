// Shared prompt fragments. Task-specific prompts live in `ai::prompts`.

/// Appended to every user prompt so replies stay machine-readable.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Respond ONLY with a single valid JSON object. \
Do NOT wrap it in markdown code fences. \
Do NOT include explanations before or after the JSON.";

/// Joins a task prompt with the JSON-only instruction.
pub fn with_json_instruction(prompt: &str) -> String {
    format!("{}\n\n{}", prompt.trim_end(), JSON_ONLY_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_instruction_is_appended_last() {
        let prompt = with_json_instruction("Parse this resume.\n\n");
        assert!(prompt.starts_with("Parse this resume."));
        assert!(prompt.ends_with(JSON_ONLY_INSTRUCTION));
    }
}
