use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use teloxide::types::ChatId;
use tokio::sync::Mutex as AsyncMutex;

use crate::quiz::QuizStep;

/// Transient per-chat progress. Rebuilt from scratch on `/start` and
/// after completion; durable answers live in the database.
#[derive(Debug, Clone, Default)]
pub struct UserState {
    pub step: QuizStep,
    answers: Vec<(QuizStep, String)>,
}

impl UserState {
    /// Records an answer, overwriting a previous answer for the same
    /// step. Insertion order is preserved for the result message.
    pub fn record(&mut self, step: QuizStep, answer: String) {
        match self.answers.iter_mut().find(|(s, _)| *s == step) {
            Some(slot) => slot.1 = answer,
            None => self.answers.push((step, answer)),
        }
    }

    pub fn answers(&self) -> &[(QuizStep, String)] {
        &self.answers
    }

    pub fn reset(&mut self) {
        self.step = QuizStep::None;
        self.answers.clear();
    }
}

/// In-memory store of live chat states. Each chat gets its own async
/// mutex; a handler holds it for the whole dispatch, so two updates for
/// the same chat can never interleave their `step`/`answers` writes.
/// Different chats proceed independently.
#[derive(Debug, Default)]
pub struct StateStore {
    chats: Mutex<HashMap<ChatId, Arc<AsyncMutex<UserState>>>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create the state cell for a chat. Never fails.
    pub fn entry(&self, chat: ChatId) -> Arc<AsyncMutex<UserState>> {
        let mut chats = self.chats.lock().expect("state map poisoned");
        Arc::clone(chats.entry(chat).or_default())
    }

    /// Discards a chat's in-flight progress. Durable answers already
    /// written to storage are unaffected.
    pub async fn reset(&self, chat: ChatId) {
        let cell = self.entry(chat);
        let mut state = cell.lock().await;
        state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_overwrites_an_already_answered_step() {
        let mut state = UserState::default();
        state.record(QuizStep::Role, "Founder".into());
        state.record(QuizStep::Experience, "Beginner".into());
        state.record(QuizStep::Role, "Employee".into());
        assert_eq!(
            state.answers(),
            &[
                (QuizStep::Role, "Employee".to_owned()),
                (QuizStep::Experience, "Beginner".to_owned()),
            ]
        );
    }

    #[test]
    fn entry_returns_the_same_cell_per_chat() {
        let store = StateStore::new();
        let a = store.entry(ChatId(1));
        let b = store.entry(ChatId(1));
        let other = store.entry(ChatId(2));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[tokio::test]
    async fn reset_clears_step_and_answers() {
        let store = StateStore::new();
        {
            let cell = store.entry(ChatId(7));
            let mut state = cell.lock().await;
            state.step = QuizStep::Capital;
            state.record(QuizStep::Role, "Founder".into());
        }
        store.reset(ChatId(7)).await;
        let cell = store.entry(ChatId(7));
        let state = cell.lock().await;
        assert_eq!(state.step, QuizStep::None);
        assert!(state.answers().is_empty());
    }
}
