use std::sync::Arc;
use std::time::Duration;

use teloxide::payloads::SendMessageSetters;
use teloxide::requests::{Request, Requester};
use teloxide::types::{ChatId, ParseMode};
use teloxide::Bot;
use tokio::time::{sleep, timeout};

use crate::content::BotContent;
use crate::keyboard::invite_keyboard;

/// Hard ceiling on the detached send so a dead connection cannot leak
/// the task forever.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Schedules the delayed invite as a detached task. It holds no state
/// lock (the chat has already been reset when it fires) and its failure
/// is logged, never propagated to the dispatch that spawned it.
pub(crate) fn schedule_invite(bot: Bot, chat: ChatId, content: Arc<BotContent>, delay: Duration) {
    log::info!("chat {}: invite scheduled in {:?}", chat.0, delay);
    tokio::spawn(async move {
        sleep(delay).await;

        let request = bot
            .send_message(chat, content.invite_text.clone())
            .parse_mode(ParseMode::Html)
            .reply_markup(invite_keyboard(&content.invite_slots));

        match timeout(SEND_TIMEOUT, request.send()).await {
            Ok(Ok(_)) => log::info!("chat {}: invite delivered", chat.0),
            Ok(Err(e)) => log::error!("chat {}: invite send failed: {e}", chat.0),
            Err(_) => log::error!("chat {}: invite send timed out", chat.0),
        }
    });
}
