//! Prompt templates for kikk.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use crate::error::{KikkError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub answer: AnswerPrompts,
    pub translate: TranslatePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Instruction that opens every answer prompt, whatever the answer template says.
pub const GROUNDING_INSTRUCTION: &str = "You are a helpful assistant.
Answer ONLY from the provided transcript context.
If the context is insufficient, just say you don't know.";

/// Prompt for grounded question answering.
///
/// The template is rendered after [`GROUNDING_INSTRUCTION`] and must place both
/// `{{context}}` and `{{question}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    pub template: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            template: "{{context}}\nQuestion: {{question}}".to_string(),
        }
    }
}

impl AnswerPrompts {
    /// Reject a template that would drop the retrieved context or the question.
    pub fn validate(&self) -> Result<()> {
        for name in ["context", "question"] {
            let present = placeholder_regex()
                .captures_iter(&self.template)
                .any(|caps| &caps[1] == name);
            if !present {
                return Err(KikkError::Config(format!(
                    "answer prompt template must contain {{{{{}}}}}",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Prompt for translating a transcript into English.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatePrompts {
    pub template: String,
}

impl Default for TranslatePrompts {
    fn default() -> Self {
        Self {
            template: r#"Translate the following video transcript (language code: {{language}}) into English.
Return only the translated text, without commentary.

{{text}}"#
                .to_string(),
        }
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("valid placeholder regex"))
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let answer_path = custom_path.join("answer.toml");
            if answer_path.exists() {
                let content = std::fs::read_to_string(&answer_path)?;
                prompts.answer = toml::from_str(&content)?;
                prompts.answer.validate()?;
            }

            let translate_path = custom_path.join("translate.toml");
            if translate_path.exists() {
                let content = std::fs::read_to_string(&translate_path)?;
                prompts.translate = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass over the template: text inserted for one
    /// placeholder is never scanned for further placeholders. Unknown placeholders
    /// are left as-is.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        placeholder_regex()
            .replace_all(template, |caps: &regex::Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(GROUNDING_INSTRUCTION.contains("Answer ONLY from the provided transcript context"));
        assert!(prompts.answer.template.contains("{{context}}"));
        assert!(prompts.answer.validate().is_ok());
        assert!(prompts.translate.template.contains("{{text}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_substituted_text() {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), "he said {{question}} twice".to_string());
        vars.insert("question".to_string(), "why?".to_string());

        let result = Prompts::render("{{context}} / {{question}} / {{missing}}", &vars);
        assert_eq!(result, "he said {{question}} twice / why? / {{missing}}");
    }

    #[test]
    fn test_custom_variables_are_overridden_by_call_variables() {
        let mut custom = HashMap::new();
        custom.insert("tone".to_string(), "formal".to_string());
        custom.insert("question".to_string(), "ignored".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "What?".to_string());

        let result = prompts.render_with_custom("{{tone}}: {{question}}", &vars);
        assert_eq!(result, "formal: What?");
    }

    #[test]
    fn test_load_custom_answer_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("answer.toml"),
            "template = \"Only context: {{context}} Q: {{question}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.answer.template, "Only context: {{context}} Q: {{question}}");
        assert!(prompts.translate.template.contains("{{text}}"));
    }

    #[test]
    fn test_answer_prompt_without_context_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("answer.toml"), "template = \"Answer: {{question}}\"\n").unwrap();

        let err = Prompts::load(dir.path().to_str(), None).unwrap_err();
        assert!(matches!(err, KikkError::Config(ref msg) if msg.contains("{{context}}")));
    }

    #[test]
    fn test_answer_prompt_without_question_is_rejected() {
        let prompts = AnswerPrompts {
            template: "Context: {{ context }}".to_string(),
        };
        assert!(matches!(prompts.validate(), Err(KikkError::Config(_))));
    }
}
