//! Prompt construction for question-answer extraction

/// Default requirements block of the extraction prompt
///
/// Callers can replace this block with their own requirements; the framing
/// (task statement, format, text section) stays fixed so the response parser
/// always sees the same output contract.
const DEFAULT_REQUIREMENTS: &str = "REQUIREMENTS:
1. Answers must be EXACT quotes from the provided text (no paraphrasing)
2. Questions should be clear, specific, and naturally lead to the answer
3. Focus on factual information, definitions, explanations, and key concepts
4. Avoid yes/no questions - prefer questions that require detailed answers
5. Ensure questions are varied in type (what, how, why, when, where, etc.)";

/// Build the question-answer extraction prompt for one span of text
pub fn build_qa_prompt(text: &str, max_pairs: usize, custom_requirements: Option<&str>) -> String {
    let requirements = match custom_requirements {
        Some(custom) if !custom.trim().is_empty() => custom.trim(),
        _ => DEFAULT_REQUIREMENTS,
    };
    format!(
        "Extract up to {max_pairs} high-quality question-answer pairs from the following text.\n\
         \n\
         {requirements}\n\
         \n\
         FORMAT: Return ONLY a JSON array like this:\n\
         [\n\
         \x20 {{\"question\": \"What is...\", \"answer\": \"exact text from passage\"}},\n\
         \x20 {{\"question\": \"How does...\", \"answer\": \"exact text from passage\"}}\n\
         ]\n\
         \n\
         TEXT TO ANALYZE:\n\
         {text}\n\
         \n\
         Return only the JSON array, no additional text."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_contents() {
        let prompt = build_qa_prompt("The sky is blue.", 25, None);
        assert!(prompt.starts_with("Extract up to 25 high-quality question-answer pairs"));
        assert!(prompt.contains("REQUIREMENTS:"));
        assert!(prompt.contains("EXACT quotes"));
        assert!(prompt.contains("TEXT TO ANALYZE:\nThe sky is blue."));
        assert!(prompt.ends_with("Return only the JSON array, no additional text."));
    }

    #[test]
    fn test_custom_requirements_replace_default_block() {
        let prompt = build_qa_prompt("text", 5, Some("Only ask about dates."));
        assert!(prompt.contains("Only ask about dates."));
        assert!(!prompt.contains("REQUIREMENTS:"));
        // Framing survives so the parser contract holds.
        assert!(prompt.contains("FORMAT: Return ONLY a JSON array"));
    }

    #[test]
    fn test_blank_custom_requirements_fall_back() {
        let prompt = build_qa_prompt("text", 5, Some("   "));
        assert!(prompt.contains("REQUIREMENTS:"));
    }
}
