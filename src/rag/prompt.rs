//! Grounded prompt composition.

use super::context::{format_context_for_prompt, ScoredChunk};
use crate::config::{Prompts, GROUNDING_INSTRUCTION};
use std::collections::HashMap;

/// Builds the single prompt sent to the answering model.
#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    prompts: Prompts,
}

impl PromptComposer {
    pub fn new(prompts: Prompts) -> Self {
        Self { prompts }
    }

    /// Compose the answer-only-from-context instruction, the retrieved context and
    /// the question. Context keeps retrieval order.
    ///
    /// The instruction is always emitted first; the answer template only shapes what
    /// follows it.
    pub fn compose(&self, retrieved: &[ScoredChunk], question: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), format_context_for_prompt(retrieved));
        vars.insert("question".to_string(), question.to_string());

        let body = self.prompts.render_with_custom(&self.prompts.answer.template, &vars);
        format!("{}\n\n{}", GROUNDING_INSTRUCTION, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::TextChunk;
    use crate::config::AnswerPrompts;

    fn scored(content: &str, ordinal: usize, score: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: TextChunk::new(content.to_string(), ordinal),
            score,
        }
    }

    #[test]
    fn test_compose_includes_instruction_context_and_question() {
        let composer = PromptComposer::default();
        let prompt = composer.compose(
            &[scored("Later part.", 7, 0.9), scored("Early part.", 1, 0.4)],
            "What happens?",
        );

        assert!(prompt.contains("Answer ONLY from the provided transcript context."));
        assert!(prompt.contains("If the context is insufficient, just say you don't know."));
        assert!(prompt.contains("Later part.\n\nEarly part."));
        assert!(prompt.ends_with("Question: What happens?"));
    }

    #[test]
    fn test_compose_with_no_context_still_carries_refusal_instruction() {
        let prompt = PromptComposer::default().compose(&[], "Anything?");
        assert!(prompt.contains("say you don't know"));
        assert!(prompt.contains("Question: Anything?"));
    }

    #[test]
    fn test_braces_in_transcript_are_not_expanded() {
        let prompt = PromptComposer::default().compose(&[scored("literal {{question}}", 0, 1.0)], "Q?");
        assert!(prompt.contains("literal {{question}}"));
    }

    #[test]
    fn test_custom_template_keeps_instruction_and_context() {
        let mut prompts = Prompts::default();
        prompts.answer = AnswerPrompts {
            template: "Notes:\n{{context}}\nAsked: {{question}}".to_string(),
        };
        let composer = PromptComposer::new(prompts);

        let prompt = composer.compose(&[scored("SECRET CONTEXT", 0, 1.0)], "Why?");
        assert!(prompt.starts_with(GROUNDING_INSTRUCTION));
        assert!(prompt.contains("Notes:\nSECRET CONTEXT\nAsked: Why?"));
    }
}
