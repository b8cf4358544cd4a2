// ABOUTME: Prompt templates for emotion classification and reply composition
// ABOUTME: Templates are markdown files compiled in with include_str! and filled by placeholder
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! # Prompts
//!
//! Templates live next to this file so wording changes do not touch code.
//! `{message}` and `{knowledge}` are the only placeholders.

/// System message sent ahead of every reply request
pub const SYSTEM_PROMPT: &str = "You are a helpful and empathetic AI assistant.";

/// Binary EMOTIONAL/NEUTRAL classification instruction
pub const EMOTION_CLASSIFIER_TEMPLATE: &str = include_str!("emotion_classifier.md");

/// Emotional branch: empathetic reply with knowledge base reference material
pub const SUPPORTIVE_RESPONSE_TEMPLATE: &str = include_str!("supportive_response.md");

/// Neutral branch: light assistant persona without knowledge injection
pub const CASUAL_RESPONSE_TEMPLATE: &str = include_str!("casual_response.md");

const MESSAGE_PLACEHOLDER: &str = "{message}";
const KNOWLEDGE_PLACEHOLDER: &str = "{knowledge}";

/// Substitute placeholders in one pass so substituted text is never rescanned
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((pos, placeholder, value)) = values
        .iter()
        .filter_map(|(placeholder, value)| {
            rest.find(placeholder).map(|pos| (pos, *placeholder, *value))
        })
        .min_by_key(|(pos, _, _)| *pos)
    {
        out.push_str(&rest[..pos]);
        out.push_str(value);
        rest = &rest[pos + placeholder.len()..];
    }

    out.push_str(rest);
    out
}

/// Classification prompt for a user message
#[must_use]
pub fn emotion_classifier_prompt(message: &str) -> String {
    fill(EMOTION_CLASSIFIER_TEMPLATE, &[(MESSAGE_PLACEHOLDER, message)])
}

/// Emotional-branch prompt carrying retrieved guidance as reference only
#[must_use]
pub fn supportive_response_prompt(message: &str, knowledge: &str) -> String {
    fill(
        SUPPORTIVE_RESPONSE_TEMPLATE,
        &[
            (MESSAGE_PLACEHOLDER, message),
            (KNOWLEDGE_PLACEHOLDER, knowledge),
        ],
    )
}

/// Neutral-branch prompt
#[must_use]
pub fn casual_response_prompt(message: &str) -> String {
    fill(CASUAL_RESPONSE_TEMPLATE, &[(MESSAGE_PLACEHOLDER, message)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supportive_prompt_marks_knowledge_as_reference() {
        let prompt = supportive_response_prompt("I feel low", "Topic: Stress\nGuidance: Breathe");
        assert!(prompt.contains("reference only"));
        assert!(prompt.contains("DO NOT copy KB directly"));
        assert!(prompt.contains("Topic: Stress"));
        assert!(prompt.contains("User's message: I feel low"));
        assert!(!prompt.contains("{knowledge}"));
    }

    #[test]
    fn test_placeholders_in_user_text_are_left_alone() {
        let prompt = supportive_response_prompt("what is {knowledge}?", "Topic: Sleep");
        assert!(prompt.contains("User's message: what is {knowledge}?"));
        assert_eq!(prompt.matches("Topic: Sleep").count(), 1);
    }

    #[test]
    fn test_casual_prompt_has_no_knowledge() {
        let prompt = casual_response_prompt("what's up");
        assert!(prompt.contains("MINDMATE AI"));
        assert!(!prompt.contains("KB"));
    }
}
