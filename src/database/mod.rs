use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teloxide::types::ChatId;

use crate::quiz::QuizStep;

pub mod connection;

pub use connection::Connection;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Durable user row, keyed by chat id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub chat_id: i64,
    pub username: Option<String>,
    pub first_seen: Option<DateTime<Utc>>,
}

/// Outcome of `upsert_user`, so the caller can tell a first sighting
/// from a returning chat.
#[derive(Debug, Clone)]
pub enum UserUpsert {
    Created(UserRow),
    Existing(UserRow),
}

impl UserUpsert {
    pub fn row(&self) -> &UserRow {
        match self {
            UserUpsert::Created(row) | UserUpsert::Existing(row) => row,
        }
    }
}

/// Persistence gateway for the funnel. Answers are append-only; user
/// rows are idempotent on chat id.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn find_user(&self, chat: ChatId) -> Result<Option<UserRow>, StorageError>;

    /// Create-if-absent. An existing row is left untouched except for a
    /// defensive backfill of a missing `first_seen`.
    async fn upsert_user(
        &self,
        chat: ChatId,
        username: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<UserUpsert, StorageError>;

    async fn append_answer(
        &self,
        chat: ChatId,
        step: QuizStep,
        response: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// In-memory stand-in for `Connection`, used by unit tests. Can be
    /// switched into a failing mode to exercise rollback paths.
    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        pub users: Mutex<HashMap<i64, UserRow>>,
        pub answers: Mutex<Vec<(i64, QuizStep, String)>>,
        pub fail_appends: AtomicBool,
    }

    impl MemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_appends(&self, fail: bool) {
            self.fail_appends.store(fail, Ordering::SeqCst);
        }

        pub fn answer_count(&self) -> usize {
            self.answers.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Storage for MemoryStorage {
        async fn find_user(&self, chat: ChatId) -> Result<Option<UserRow>, StorageError> {
            Ok(self.users.lock().unwrap().get(&chat.0).cloned())
        }

        async fn upsert_user(
            &self,
            chat: ChatId,
            username: Option<&str>,
            now: DateTime<Utc>,
        ) -> Result<UserUpsert, StorageError> {
            let mut users = self.users.lock().unwrap();
            match users.get_mut(&chat.0) {
                Some(row) => {
                    if row.first_seen.is_none() {
                        row.first_seen = Some(now);
                    }
                    Ok(UserUpsert::Existing(row.clone()))
                }
                None => {
                    let row = UserRow {
                        chat_id: chat.0,
                        username: username.map(str::to_owned),
                        first_seen: Some(now),
                    };
                    users.insert(chat.0, row.clone());
                    Ok(UserUpsert::Created(row))
                }
            }
        }

        async fn append_answer(
            &self,
            chat: ChatId,
            step: QuizStep,
            response: &str,
            _answered_at: DateTime<Utc>,
        ) -> Result<(), StorageError> {
            if self.fail_appends.load(Ordering::SeqCst) {
                return Err(StorageError::Database(sqlx::Error::PoolClosed));
            }
            self.answers
                .lock()
                .unwrap()
                .push((chat.0, step, response.to_owned()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn upsert_reports_first_sighting_once() {
        let storage = MemoryStorage::new();
        let now = Utc::now();
        let first = storage
            .upsert_user(ChatId(42), Some("alice"), now)
            .await
            .unwrap();
        assert!(matches!(first, UserUpsert::Created(_)));

        let second = storage.upsert_user(ChatId(42), Some("alice"), now).await.unwrap();
        assert!(matches!(second, UserUpsert::Existing(_)));
        assert_eq!(second.row().first_seen, Some(now));
    }
}
