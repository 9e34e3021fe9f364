use teloxide::payloads::{AnswerCallbackQuerySetters, SendPhotoSetters};
use teloxide::prelude::Requester;
use teloxide::types::{ChatId, InputFile, ParseMode};
use teloxide::Bot;
use tracing::instrument;

use crate::config::Config;
use crate::content::BotContent;
use crate::HandlerResult;

/// Button press on the invite message. Known slot tokens get the ticket
/// photo and a toast; anything else is silently ignored.
#[instrument(level = "info", skip_all, fields(chat = chat.0))]
pub(crate) async fn handle_callback(
    bot: &Bot,
    chat: ChatId,
    callback_id: &str,
    data: Option<&str>,
    content: &BotContent,
    config: &Config,
) -> HandlerResult {
    let Some(token) = data else {
        return Ok(());
    };
    if !content.is_invite_token(token) {
        log::debug!("chat {}: unknown callback token '{}'", chat.0, token);
        return Ok(());
    }

    bot.send_photo(chat, InputFile::file(config.assets_dir.join(&content.ticket_photo)))
        .caption(content.ticket_caption.clone())
        .parse_mode(ParseMode::Html)
        .await?;

    // Stops the client's loading spinner on the pressed button.
    bot.answer_callback_query(callback_id)
        .text(content.ticket_toast.clone())
        .await?;

    Ok(())
}
