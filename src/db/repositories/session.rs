use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::sessions;

/// A resolved, still-valid session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: i32,
    pub created_at: String,
    pub expires_at: String,
}

impl From<sessions::Model> for Session {
    fn from(model: sessions::Model) -> Self {
        Self {
            token: model.token,
            user_id: model.user_id,
            created_at: model.created_at,
            expires_at: model.expires_at,
        }
    }
}

pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create a session for the user and return its token.
    /// A user may hold any number of concurrent sessions.
    pub async fn create(&self, user_id: i32, ttl_hours: i64) -> Result<String> {
        let token = generate_session_token();
        let now = Utc::now();

        let active = sessions::ActiveModel {
            token: Set(token.clone()),
            user_id: Set(user_id),
            created_at: Set(now.to_rfc3339()),
            expires_at: Set((now + Duration::hours(ttl_hours)).to_rfc3339()),
            ..Default::default()
        };

        sessions::Entity::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert session")?;

        Ok(token)
    }

    /// Resolve a token to a live session. An expired session is deleted on
    /// sight and reported as absent.
    pub async fn find_valid(&self, token: &str) -> Result<Option<Session>> {
        let session = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query session by token")?;

        let Some(session) = session else {
            return Ok(None);
        };

        if is_expired(&session.expires_at, Utc::now()) {
            sessions::Entity::delete_by_id(session.id)
                .exec(&self.conn)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        Ok(Some(session.into()))
    }

    /// Delete the session for this token. Returns whether one existed.
    pub async fn delete(&self, token: &str) -> Result<bool> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token))
            .exec(&self.conn)
            .await
            .context("Failed to delete session")?;

        Ok(result.rows_affected > 0)
    }

    /// Sweep every expired session; returns how many were removed.
    pub async fn delete_expired(&self) -> Result<u64> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lt(Utc::now().to_rfc3339()))
            .exec(&self.conn)
            .await
            .context("Failed to sweep expired sessions")?;

        Ok(result.rows_affected)
    }
}

fn is_expired(expires_at: &str, now: DateTime<Utc>) -> bool {
    // Unparseable timestamps count as expired so a corrupt row can never
    // authenticate.
    DateTime::parse_from_rfc3339(expires_at).map_or(true, |t| t < now)
}

/// Generate an opaque session token (32 random bytes as a 64-char hex string)
#[must_use]
pub fn generate_session_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token_shape() {
        let token = generate_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_session_token_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        assert!(is_expired(&(now - Duration::hours(1)).to_rfc3339(), now));
        assert!(!is_expired(&(now + Duration::hours(1)).to_rfc3339(), now));
        assert!(is_expired("not-a-timestamp", now));
    }
}
