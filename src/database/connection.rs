use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use teloxide::types::ChatId;
use uuid::Uuid;

use crate::quiz::QuizStep;

use super::{Storage, StorageError, UserRow, UserUpsert};

/// Postgres-backed persistence gateway.
pub struct Connection {
    pool: PgPool,
}

impl Connection {
    pub async fn connect(connection_string: &str) -> Result<Self, StorageError> {
        let pool = PgPool::connect(connection_string).await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for Connection {
    async fn find_user(&self, chat: ChatId) -> Result<Option<UserRow>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT chat_id, username, first_seen FROM users WHERE chat_id = $1",
        )
        .bind(chat.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn upsert_user(
        &self,
        chat: ChatId,
        username: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<UserUpsert, StorageError> {
        match self.find_user(chat).await? {
            Some(mut user) => {
                // Creation always sets first_seen; this backfill only
                // fires for rows written by older deployments.
                if user.first_seen.is_none() {
                    sqlx::query("UPDATE users SET first_seen = $1 WHERE chat_id = $2")
                        .bind(now)
                        .bind(chat.0)
                        .execute(&self.pool)
                        .await?;
                    user.first_seen = Some(now);
                }
                Ok(UserUpsert::Existing(user))
            }
            None => {
                log::debug!("creating user row for chat {}", chat.0);
                sqlx::query(
                    "INSERT INTO users (chat_id, username, first_seen) VALUES ($1, $2, $3) \
                     ON CONFLICT (chat_id) DO NOTHING",
                )
                .bind(chat.0)
                .bind(username)
                .bind(now)
                .execute(&self.pool)
                .await?;

                Ok(UserUpsert::Created(UserRow {
                    chat_id: chat.0,
                    username: username.map(str::to_owned),
                    first_seen: Some(now),
                }))
            }
        }
    }

    async fn append_answer(
        &self,
        chat: ChatId,
        step: QuizStep,
        response: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO answers (id, chat_id, step, response, answered_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(chat.0)
        .bind(step.as_str())
        .bind(response)
        .bind(answered_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
