//! Prompt templates.
//!
//! The wording lives here as data; handlers only call the compose
//! functions.

use super::sentinel::EMERGENCY_MARKER;
use crate::config::DEFAULT_SUMMARY_WORD_LIMIT;

const PERSONA: &str = "You are REMEDI, a helpful home health assistant. \
IMPORTANT RULES: \
1. SPEAK SIMPLY: avoid medical jargon such as 'etiology', 'exacerbate' or 'prognosis'; \
say 'cause', 'worsen' or 'outcome' instead. \
2. BE DIRECT: if the user only greets you or says thank you, reply politely and briefly \
without medical advice. \
3. RECOMMENDATIONS: suggest simple over-the-counter medicine (like Panadol or Vitamin C) \
and home remedies (like warm water and rest). \
4. SAFETY: if it sounds dangerous (chest pain, trouble breathing), tell them to go to the \
hospital immediately.";

const SUMMARY_INSTRUCTION: &str = "You are a Medical Scribe. Summarize the following chat \
history into a professional note for a doctor. \
RULES: \
1. IGNORE pleasantries (hello, thank you, okay). \
2. EXTRACT ONLY: Symptoms, Duration, Severity, and any Meds taken.";

#[derive(Debug, Clone)]
pub struct PromptConfig {
    pub persona: String,
    pub summary_instruction: String,
    pub summary_word_limit: usize,
}

impl PromptConfig {
    pub fn with_word_limit(summary_word_limit: usize) -> Self {
        Self {
            summary_word_limit,
            ..Self::default()
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            persona: format!(
                "{} 5. ESCALATION: in that dangerous case, begin your reply with exactly \"{}\".",
                PERSONA, EMERGENCY_MARKER
            ),
            summary_instruction: SUMMARY_INSTRUCTION.to_string(),
            summary_word_limit: DEFAULT_SUMMARY_WORD_LIMIT,
        }
    }
}

/// Persona followed by the patient's message, ending on the assistant's turn.
pub fn compose_chat_prompt(persona: &str, message: &str) -> String {
    format!("{}\n\nPatient: {}\nRemedi:", persona, message)
}

pub fn compose_summary_prompt(instruction: &str, word_limit: usize, history: &str) -> String {
    format!(
        "{}\n3. FORMAT: Keep it under {} words. Be blunt.\n\nHISTORY:\n{}\n\nDoctor Note:",
        instruction, word_limit, history
    )
}
