use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::filter::{self, TextClass};
use crate::translator::Translator;

pub const GREETING: &str = "Hi there! Send me a message and I'll translate from English/Russian.\n\n\
     Привет, там! Отправьте мне сообщение, и я переведу с английского/русского";

/// Terminal state of one inbound text message.
#[derive(Debug)]
pub enum Outcome {
    /// Translation to send back to the originating chat.
    Replied(String),
    /// Chat is not on the allow-list.
    Dropped,
    /// Nothing translatable (emoji only or blank).
    Skipped,
    /// The translator failed; nothing is sent.
    Failed(anyhow::Error),
}

/// Platform-independent core: allow-list guard, emoji filter and translation.
pub struct Relay {
    allowed_chat_ids: HashSet<i64>,
    translator: Arc<dyn Translator>,
}

impl Relay {
    pub fn new(
        allowed_chat_ids: impl IntoIterator<Item = i64>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            allowed_chat_ids: allowed_chat_ids.into_iter().collect(),
            translator,
        }
    }

    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chat_ids.contains(&chat_id)
    }

    /// Reply to `/start`, or `None` for chats outside the allow-list.
    pub fn start(&self, chat_id: i64) -> Option<&'static str> {
        if self.is_allowed(chat_id) {
            Some(GREETING)
        } else {
            debug!("Dropping /start from chat {}", chat_id);
            None
        }
    }

    /// Whether `handle_text` would call the translator for this message.
    pub fn accepts(&self, chat_id: i64, text: &str) -> bool {
        self.is_allowed(chat_id) && filter::classify(text) == TextClass::Translate
    }

    pub async fn handle_text(&self, chat_id: i64, text: &str) -> Outcome {
        if !self.is_allowed(chat_id) {
            debug!("Dropping message from chat {}", chat_id);
            return Outcome::Dropped;
        }

        if filter::classify(text) == TextClass::Skip {
            debug!("Skipping emoji-only message in chat {}", chat_id);
            return Outcome::Skipped;
        }

        info!("Translating {} chars from chat {}", text.chars().count(), chat_id);

        match self.translator.translate(text).await {
            Ok(translation) => Outcome::Replied(translation),
            Err(e) => Outcome::Failed(e),
        }
    }
}
