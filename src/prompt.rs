/// Fixed system instruction for the tailoring completion. Changing this
/// changes the product, so it is a constant rather than configuration.
pub const SYSTEM_PROMPT: &str = "You are a resume optimization expert. \
Rewrite the resume to best match the job description. Highlight relevant \
skills, experiences, and achievements that align with the job requirements. \
Keep the same format and structure but emphasize the most relevant points. \
Do not fabricate information.";

/// The two-message prompt sent to the completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

/// Assembles the prompt from the normalized texts. Pure; the texts are
/// embedded verbatim with no truncation or escaping.
pub fn build(resume_text: &str, job_text: &str) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT,
        user: format!(
            "Resume:\n{}\n\nJob Description:\n{}",
            resume_text, job_text
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_embeds_both_texts_in_fixed_layout() {
        let prompt = build("Jane Doe\nRust Engineer", "Backend role at Acme");
        assert_eq!(
            prompt.user,
            "Resume:\nJane Doe\nRust Engineer\n\nJob Description:\nBackend role at Acme"
        );
    }

    #[test]
    fn system_message_is_the_fixed_instruction() {
        let prompt = build("r", "j");
        assert_eq!(prompt.system, SYSTEM_PROMPT);
        assert!(prompt.system.contains("Do not fabricate information"));
    }

    #[test]
    fn texts_are_passed_through_verbatim() {
        let resume = "a".repeat(10_000);
        let prompt = build(&resume, "short");
        assert!(prompt.user.contains(&resume));
    }
}
