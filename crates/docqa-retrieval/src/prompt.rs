use docqa_core::error::{DocqaError, Result};

const CONTEXT_PLACEHOLDER: &str = "{context}";
const QUESTION_PLACEHOLDER: &str = "{question}";

/// Built-in answering instructions
pub const DEFAULT_TEMPLATE: &str = "Human: Use the following pieces of context to provide a \
concise answer to the question at the end, but summarize with at least 250 words and \
detailed explanations. If you don't know the answer, just say that you don't know, \
don't try to make up an answer.
<context>
{context}
</context>

Question: {question}

Assistant:";

/// Prompt template with `{context}` and `{question}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self { template: DEFAULT_TEMPLATE.to_string() }
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();

        for placeholder in [CONTEXT_PLACEHOLDER, QUESTION_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(DocqaError::invalid_config(
                    "prompt_template",
                    format!("template must contain {}", placeholder),
                ));
            }
        }

        Ok(Self { template })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Substitute both placeholders
    ///
    /// Substituted text is never rescanned, so a context that happens to
    /// contain `{question}` is left as is.
    pub fn render(&self, context: &str, question: &str) -> String {
        let mut rendered = String::with_capacity(self.template.len() + context.len() + question.len());

        for (i, segment) in self.template.split(CONTEXT_PLACEHOLDER).enumerate() {
            if i > 0 {
                rendered.push_str(context);
            }
            rendered.push_str(&segment.replace(QUESTION_PLACEHOLDER, question));
        }

        rendered
    }
}

/// Join retrieved chunk texts with blank lines
pub fn build_context<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    texts.into_iter().collect::<Vec<_>>().join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_has_policy() {
        let template = PromptTemplate::default();
        assert!(template.as_str().contains("at least 250 words"));
        assert!(template.as_str().contains("say that you don't know"));
        assert!(PromptTemplate::new(DEFAULT_TEMPLATE).is_ok());
    }

    #[test]
    fn test_render() {
        let template = PromptTemplate::new("C: {context}\nQ: {question}").unwrap();
        assert_eq!(template.render("facts", "why?"), "C: facts\nQ: why?");
    }

    #[test]
    fn test_render_does_not_rescan_substitutions() {
        let template = PromptTemplate::new("{context} | {question}").unwrap();
        assert_eq!(template.render("ctx with {question}", "q"), "ctx with {question} | q");
    }

    #[test]
    fn test_repeated_placeholders() {
        let template = PromptTemplate::new("{question} {context} {question}").unwrap();
        assert_eq!(template.render("c", "q"), "q c q");
    }

    #[test]
    fn test_missing_placeholder_is_invalid() {
        let err = PromptTemplate::new("Answer: {question}").unwrap_err();
        assert!(matches!(err, DocqaError::InvalidConfig { ref key, .. } if key == "prompt_template"));
        assert!(PromptTemplate::new("{context} only").is_err());
    }

    #[test]
    fn test_build_context() {
        assert_eq!(build_context(["one", "two", "three"]), "one\n\ntwo\n\nthree");
        assert_eq!(build_context(Vec::<&str>::new()), "");
    }
}
