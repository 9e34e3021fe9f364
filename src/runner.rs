use std::sync::Arc;

use chrono::Utc;
use teloxide::payloads::{SendDocumentSetters, SendMessageSetters};
use teloxide::prelude::Requester;
use teloxide::types::{ChatId, InputFile, ParseMode};
use teloxide::Bot;
use tracing::instrument;

use crate::config::Config;
use crate::content::BotContent;
use crate::database::{Storage, StorageError};
use crate::keyboard::options_keyboard;
use crate::quiz::{QuizDefinition, QuizStep};
use crate::state::UserState;
use crate::{followup, HandlerResult};

/// Outcome of feeding one text answer to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Advance {
    /// Input matched no option for the current step; nothing changed.
    Rejected,
    /// Answer accepted and persisted; ask the next question.
    Ask(QuizStep),
    /// The last step was answered. The caller sends the result and then
    /// resets the state; `answers` is the full run in insertion order.
    Completed { answers: Vec<(QuizStep, String)> },
}

/// One transition of the quiz state machine. The answer row is appended
/// durably *before* any in-memory mutation, so a storage failure leaves
/// the step where it was and the user can simply resend.
pub(crate) async fn advance(
    storage: &dyn Storage,
    quiz: &QuizDefinition,
    chat: ChatId,
    state: &mut UserState,
    input: &str,
) -> Result<Advance, StorageError> {
    let step = state.step;
    if !quiz.contains(step) {
        return Ok(Advance::Rejected);
    }
    if quiz.match_option(step, input).is_none() {
        return Ok(Advance::Rejected);
    }

    let answer = input.trim().to_owned();
    storage.append_answer(chat, step, &answer, Utc::now()).await?;

    state.record(step, answer);
    state.step = quiz.next(step);

    if state.step == QuizStep::Finished {
        Ok(Advance::Completed {
            answers: state.answers().to_vec(),
        })
    } else {
        Ok(Advance::Ask(state.step))
    }
}

/// Text message mid-quiz: run the transition and send whatever it asks
/// for. Completion is single-shot: result + checklist go out, the
/// delayed invite is scheduled, then the chat state resets to idle.
#[instrument(level = "info", skip_all, fields(chat = chat.0, step = %state.step))]
pub(crate) async fn handle_answer(
    bot: &Bot,
    chat: ChatId,
    text: &str,
    state: &mut UserState,
    storage: &dyn Storage,
    content: Arc<BotContent>,
    config: &Config,
) -> HandlerResult {
    match advance(storage, &content.quiz, chat, state, text).await? {
        Advance::Rejected => {
            log::debug!("chat {}: '{}' matches no option at {}", chat.0, text, state.step);
            Ok(())
        }
        Advance::Ask(next) => {
            let prompt = content
                .quiz
                .prompt(next)
                .ok_or("quiz definition is missing a prompt for the next step")?;
            bot.send_message(chat, &prompt.prompt)
                .parse_mode(ParseMode::Html)
                .reply_markup(options_keyboard(&prompt.options))
                .await?;
            Ok(())
        }
        Advance::Completed { answers } => {
            log::info!("chat {} completed the funnel with {} answers", chat.0, answers.len());

            bot.send_message(chat, content.result_message(&answers))
                .parse_mode(ParseMode::Html)
                .await?;

            bot.send_document(
                chat,
                InputFile::file(config.assets_dir.join(&content.checklist_document)),
            )
            .caption(content.checklist_caption.clone())
            .await?;

            followup::schedule_invite(bot.clone(), chat, Arc::clone(&content), config.followup_delay);

            state.reset();
            Ok(())
        }
    }
}
