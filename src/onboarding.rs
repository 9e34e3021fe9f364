use chrono::Utc;
use teloxide::payloads::{SendMessageSetters, SendPhotoSetters};
use teloxide::prelude::Requester;
use teloxide::types::{ChatId, InputFile, ParseMode};
use teloxide::Bot;
use tracing::instrument;

use crate::config::Config;
use crate::content::BotContent;
use crate::database::{Storage, UserRow, UserUpsert};
use crate::keyboard::options_keyboard;
use crate::state::UserState;
use crate::HandlerResult;

/// `/start`: wipe any in-flight progress, persist the user row, greet,
/// and drop straight into the first question.
#[instrument(level = "info", skip_all, fields(chat = chat.0))]
pub(crate) async fn handle_start(
    bot: &Bot,
    chat: ChatId,
    username: Option<&str>,
    state: &mut UserState,
    storage: &dyn Storage,
    content: &BotContent,
    config: &Config,
) -> HandlerResult {
    state.reset();

    // The row must be durable before anything else happens; the operator
    // ping below is fire-and-forget on top of it.
    let upsert = storage.upsert_user(chat, username, Utc::now()).await?;
    if let UserUpsert::Created(user) = &upsert {
        log::info!("first sighting of chat {}", chat.0);
        notify_admins(bot, config, user);
    }

    bot.send_photo(chat, InputFile::file(config.assets_dir.join(&content.welcome_photo)))
        .caption(content.welcome_caption.clone())
        .parse_mode(ParseMode::Html)
        .await?;

    bot.send_message(chat, &content.about_text)
        .parse_mode(ParseMode::Html)
        .await?;

    bot.send_voice(chat, InputFile::file(config.assets_dir.join(&content.welcome_voice)))
        .await?;

    let first = content.quiz.first();
    state.step = first;

    let prompt = content
        .quiz
        .prompt(first)
        .ok_or("quiz definition has no first step")?;
    bot.send_message(chat, &prompt.prompt)
        .parse_mode(ParseMode::Html)
        .reply_markup(options_keyboard(&prompt.options))
        .await?;

    Ok(())
}

/// Pings every configured operator chat about a brand-new user. Failures
/// are logged and never reach the triggering dispatch.
fn notify_admins(bot: &Bot, config: &Config, user: &UserRow) {
    let seen = user
        .first_seen
        .map(|t| t.format("%d-%m-%Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_owned());
    let handle = user.username.as_deref().unwrap_or("—");
    let text = format!(
        "<b>New user!</b>\nUsername: @{handle}\nId: <code>{}</code>\nJoined: {seen}",
        user.chat_id
    );

    for admin in &config.admin_chats {
        let bot = bot.clone();
        let admin = *admin;
        let text = text.clone();
        tokio::spawn(async move {
            if let Err(e) = bot
                .send_message(admin, text)
                .parse_mode(ParseMode::Html)
                .await
            {
                log::warn!("failed to notify admin chat {}: {e}", admin.0);
            }
        });
    }
}
