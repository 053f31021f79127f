use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ChatAction;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

use crate::relay::{Outcome, Relay};

/// Telegram rejects messages over 4096 chars; leave some headroom.
const MAX_MESSAGE_LEN: usize = 4000;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
enum Command {
    #[command(description = "show the greeting")]
    Start,
}

/// Split long messages for Telegram's 4096 char limit
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        // Walk back to a valid UTF-8 char boundary so slicing doesn't panic
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        let actual_end = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .or_else(|| text[start..end].rfind(' '))
                .map(|pos| start + pos + 1)
                .unwrap_or(end)
        } else {
            end
        };

        chunks.push(text[start..actual_end].to_string());
        start = actual_end;
    }

    chunks
}

fn is_plain_text(msg: &Message) -> bool {
    msg.text().is_some_and(|t| !t.starts_with('/'))
}

/// Run the Telegram long-polling loop until the process is stopped
pub async fn run(bot: Bot, relay: Arc<Relay>) -> Result<()> {
    info!("Starting Telegram bot...");

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::filter(|msg: Message| is_plain_text(&msg)).endpoint(handle_text));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![relay])
        // Handle every update concurrently, even within one chat, so a slow
        // translation never holds up the next message.
        .distribution_function(|_| None::<std::convert::Infallible>)
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Telegram bot stopped");
    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    relay: Arc<Relay>,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => {
            if let Some(greeting) = relay.start(msg.chat.id.0) {
                bot.send_message(msg.chat.id, greeting).await?;
            }
        }
    }
    Ok(())
}

async fn handle_text(bot: Bot, msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    let text = match msg.text() {
        Some(t) => t,
        None => return Ok(()),
    };
    let chat_id = msg.chat.id;

    if relay.accepts(chat_id.0, text) {
        bot.send_chat_action(chat_id, ChatAction::Typing).await.ok();
    }

    match relay.handle_text(chat_id.0, text).await {
        Outcome::Replied(translation) => {
            for chunk in split_message(&translation, MAX_MESSAGE_LEN) {
                bot.send_message(chat_id, chunk).await?;
            }
        }
        Outcome::Dropped | Outcome::Skipped => {}
        Outcome::Failed(e) => {
            error!("Translation failed for chat {}: {:#}", chat_id.0, e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_command_parses() {
        assert_eq!(Command::parse("/start", "relay_bot").unwrap(), Command::Start);
        assert_eq!(
            Command::parse("/start@relay_bot", "relay_bot").unwrap(),
            Command::Start
        );
        assert!(Command::parse("/stop", "relay_bot").is_err());
    }

    #[test]
    fn test_short_message_is_single_chunk() {
        assert_eq!(split_message("Привет", 4000), vec!["Привет".to_string()]);
    }

    #[test]
    fn test_split_prefers_whitespace() {
        let chunks = split_message("aaaa bbbb\ncccc", 10);
        assert_eq!(chunks, vec!["aaaa bbbb\n".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        let text = "я".repeat(10);
        let chunks = split_message(&text, 5);
        assert!(chunks.iter().all(|c| c.len() <= 5));
        assert_eq!(chunks.concat(), text);
    }
}
