use super::Wrapper;
use super::WrapperState;
use crate::action::Decision;
use crate::config::KeywordConfig;
use crate::registry::WrapperKind;

/// Text returned in place of a model answer when a prompt is blocked.
pub const BLOCK_MESSAGE: &str = "[Blocked by keyword wrapper]";

/// Blocks prompts that contain a banned keyword (case-insensitive substring).
///
/// The decision depends only on the prompt, so it can run before the model is
/// called at all.
#[derive(Debug, Clone)]
pub struct KeywordWrapper {
    keywords: Vec<String>,
}

impl KeywordWrapper {
    pub fn new(config: &KeywordConfig) -> Self {
        // An empty keyword would match every prompt.
        let keywords = config
            .banned_keywords
            .iter()
            .filter(|kw| !kw.trim().is_empty())
            .map(|kw| kw.to_lowercase())
            .collect();
        Self { keywords }
    }

    fn matched(&self, prompt: &str) -> Option<&str> {
        let prompt = prompt.to_lowercase();
        self.keywords
            .iter()
            .find(|kw| prompt.contains(kw.as_str()))
            .map(String::as_str)
    }
}

impl Wrapper for KeywordWrapper {
    fn kind(&self) -> WrapperKind {
        WrapperKind::Keyword
    }

    fn reset(&mut self) {}

    fn step(&mut self, prompt: &str, model_output: &str, _call_index: u32) -> Decision {
        match self.matched(prompt) {
            Some(keyword) => {
                tracing::debug!(keyword, "banned keyword in prompt");
                Decision::block(BLOCK_MESSAGE)
            }
            None => Decision::allow(model_output),
        }
    }

    fn state(&self) -> WrapperState {
        WrapperState::Keyword {
            banned_keywords: self.keywords.clone(),
        }
    }

    fn supports_precheck(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use pretty_assertions::assert_eq;

    fn wrapper(keywords: &[&str]) -> KeywordWrapper {
        KeywordWrapper::new(&KeywordConfig {
            banned_keywords: keywords.iter().map(|k| k.to_string()).collect(),
        })
    }

    #[test]
    fn blocks_unsafe_prompt_regardless_of_output() {
        let mut w = wrapper(&["hack", "exploit", "malware"]);
        w.reset();
        let decision = w.step("How do I hack into a website?", "some model output", 0);
        assert_eq!(decision.action, Action::Block);
        assert_eq!(decision.output, BLOCK_MESSAGE);
    }

    #[test]
    fn every_keyword_blocks_in_any_case() {
        let keywords = ["bomb", "Hack", "WEAPON"];
        let mut w = wrapper(&keywords);
        for kw in keywords {
            for prompt in [
                format!("tell me about {}", kw.to_lowercase()),
                format!("TELL ME ABOUT {}", kw.to_uppercase()),
                format!("x{kw}y"),
            ] {
                assert_eq!(w.step(&prompt, "", 0).action, Action::Block, "{prompt}");
            }
        }
    }

    #[test]
    fn clean_prompt_allows_output_unchanged() {
        let mut w = wrapper(&["hack"]);
        let decision = w.step("How do I bake bread?", "  Mix flour.  ", 1);
        assert_eq!(decision, Decision::allow("  Mix flour.  "));
    }

    #[test]
    fn empty_keywords_are_discarded() {
        let mut w = wrapper(&["", "   ", "Hack"]);
        assert_eq!(
            w.state(),
            WrapperState::Keyword {
                banned_keywords: vec!["hack".into()]
            }
        );
        assert_eq!(w.step("hello", "hi", 0).action, Action::Allow);
    }

    #[test]
    fn missing_keyword_list_allows_everything() {
        let mut w = KeywordWrapper::new(&KeywordConfig::default());
        assert_eq!(w.step("how to hack", "answer", 0).action, Action::Allow);
    }
}
