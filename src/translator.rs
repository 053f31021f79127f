use anyhow::Result;
use async_trait::async_trait;

use crate::llm::{ChatMessage, LlmClient};

pub const DEFAULT_TRANSLATION_PROMPT: &str = "You are a translation bot for a telegram group. \
     Automatically detect the language of the given text. \
     If the text is in Russian, translate it to English; if it's in any other language, \
     translate it to Russian. Preserve emojis and informal language as appropriate. \
     Just translate the message directly, do not add any narrator or helpful notes.";

/// Turns one piece of text into its translation.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Translator backed by a chat-completion model and a fixed instruction.
pub struct LlmTranslator {
    llm: LlmClient,
}

impl LlmTranslator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    fn build_messages(&self, text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.llm.config().system_prompt.as_str()),
            ChatMessage::user(text),
        ]
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let messages = self.build_messages(text);
        self.llm.chat(&messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    #[test]
    fn test_messages_are_instruction_then_text() {
        let translator = LlmTranslator::new(LlmClient::new(LlmConfig::default()));
        let messages = translator.build_messages("Привет 👋");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(DEFAULT_TRANSLATION_PROMPT));
        assert_eq!(messages[1], ChatMessage::user("Привет 👋"));
    }

    #[test]
    fn test_custom_system_prompt_is_used() {
        let config = LlmConfig {
            system_prompt: "Translate to French.".to_string(),
            ..LlmConfig::default()
        };
        let translator = LlmTranslator::new(LlmClient::new(config));
        let messages = translator.build_messages("Hello");
        assert_eq!(messages[0].content.as_deref(), Some("Translate to French."));
    }
}
