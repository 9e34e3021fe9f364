use std::sync::Arc;

use teloxide::dispatching::dialogue::GetChatId;
use teloxide::types::{ChatId, Update, UpdateKind};
use teloxide::Bot;
use tracing::instrument;

use crate::config::Config;
use crate::content::BotContent;
use crate::database::Storage;
use crate::quiz::{QuizDefinition, QuizStep};
use crate::state::StateStore;
use crate::{callback, commands, onboarding, runner, HandlerResult};

/// A transport update reduced to the two event shapes the chain routes
/// on. Everything else (edits, reactions, member updates) is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text {
        chat: ChatId,
        text: String,
        sender: Option<String>,
    },
    Callback {
        chat: ChatId,
        id: String,
        data: Option<String>,
    },
}

impl Inbound {
    pub fn from_update(update: &Update) -> Option<Self> {
        match &update.kind {
            UpdateKind::Message(msg) => {
                let text = msg.text()?.to_owned();
                Some(Inbound::Text {
                    chat: msg.chat.id,
                    text,
                    sender: msg.chat.username().map(str::to_owned),
                })
            }
            UpdateKind::CallbackQuery(q) => {
                let chat = q.chat_id()?;
                Some(Inbound::Callback {
                    chat,
                    id: q.id.clone(),
                    data: q.data.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn chat(&self) -> ChatId {
        match self {
            Inbound::Text { chat, .. } | Inbound::Callback { chat, .. } => *chat,
        }
    }
}

/// The three mutually exclusive handler roles, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Start,
    Callback,
    Quiz,
}

/// First-match routing over (event, current step). The order is the
/// contract: the start command pre-empts an in-progress quiz, callbacks
/// are state-independent, and quiz text only routes while the step is
/// strictly inside the question sequence.
pub fn route(inbound: &Inbound, step: QuizStep) -> Option<Route> {
    match inbound {
        Inbound::Text { text, .. } if commands::is_start(text) => Some(Route::Start),
        Inbound::Callback { .. } => Some(Route::Callback),
        Inbound::Text { .. } if step.is_question() => Some(Route::Quiz),
        _ => None,
    }
}

/// Global input guard: during an active quiz, free text that is neither
/// the start command nor one of the current step's options is dropped
/// before the chain runs.
pub fn discards(quiz: &QuizDefinition, step: QuizStep, text: &str) -> bool {
    step.is_question() && !commands::is_start(text) && quiz.match_option(step, text).is_none()
}

/// Entry point for one inbound update. Resolves the chat, serialises on
/// that chat's state, applies the guard and invokes the first matching
/// handler. Errors bubble to the dispatcher, which logs them and keeps
/// pulling updates for other chats.
#[instrument(level = "debug", skip_all, fields(update_id = update.id.0))]
pub async fn handle_update(
    bot: Bot,
    update: Update,
    store: Arc<StateStore>,
    storage: Arc<dyn Storage>,
    content: Arc<BotContent>,
    config: Arc<Config>,
) -> HandlerResult {
    let Some(inbound) = Inbound::from_update(&update) else {
        return Ok(());
    };
    let chat = inbound.chat();

    let cell = store.entry(chat);
    let mut state = cell.lock().await;

    if let Inbound::Text { text, .. } = &inbound {
        if discards(&content.quiz, state.step, text) {
            log::debug!("chat {}: dropping off-script text at step {}", chat.0, state.step);
            return Ok(());
        }
    }

    match route(&inbound, state.step) {
        Some(Route::Start) => {
            let Inbound::Text { sender, .. } = &inbound else {
                return Ok(());
            };
            onboarding::handle_start(
                &bot,
                chat,
                sender.as_deref(),
                &mut state,
                &*storage,
                &content,
                &config,
            )
            .await
        }
        Some(Route::Callback) => {
            let Inbound::Callback { id, data, .. } = &inbound else {
                return Ok(());
            };
            callback::handle_callback(&bot, chat, id, data.as_deref(), &content, &config).await
        }
        Some(Route::Quiz) => {
            let Inbound::Text { text, .. } = &inbound else {
                return Ok(());
            };
            runner::handle_answer(
                &bot,
                chat,
                text,
                &mut state,
                &*storage,
                Arc::clone(&content),
                &config,
            )
            .await
        }
        None => {
            log::debug!("chat {}: no handler for update at step {}", chat.0, state.step);
            Ok(())
        }
    }
}
