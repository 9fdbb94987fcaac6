// src/db/sessions.rs
use crate::auth::token::{generate_token_default, hash_token};
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

pub const APP_SCHEMA: &str = include_str!("../../sql/app_schema.sql");

/// A signed-in admin as remembered by this server.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub id: i64,
    pub email: String,
    /// Secret of the hosted backend session opened at login.
    pub backend_secret: String,
    pub expires_at: i64,
}

/// Store a new web session and return the raw token for the cookie.
pub fn create_session(
    conn: &Connection,
    email: &str,
    backend_secret: &str,
    now: i64,
    ttl_secs: i64,
) -> Result<String, ServerError> {
    let raw_token = generate_token_default();
    let hash = hash_token(&raw_token);

    conn.execute(
        r#"
        insert into admin_sessions (token_hash, email, backend_secret, created_at, expires_at)
        values (?, ?, ?, ?, ?)
        "#,
        params![hash.as_slice(), email, backend_secret, now, now + ttl_secs],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

pub fn load_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<AdminSession>, ServerError> {
    let hash = hash_token(raw_token);

    conn.query_row(
        r#"
        select id, email, backend_secret, expires_at
        from admin_sessions
        where token_hash = ?
          and expires_at > ?
          and revoked_at is null
        "#,
        params![hash.as_slice(), now],
        |row| {
            Ok(AdminSession {
                id: row.get(0)?,
                email: row.get(1)?,
                backend_secret: row.get(2)?,
                expires_at: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

pub fn revoke_session(conn: &Connection, raw_token: &str, now: i64) -> Result<bool, ServerError> {
    let hash = hash_token(raw_token);
    let changed = conn
        .execute(
            "update admin_sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
            params![now, hash.as_slice()],
        )
        .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(changed > 0)
}

/// Drop sessions that expired or were revoked before `now`.
pub fn purge_stale_sessions(conn: &Connection, now: i64) -> Result<usize, ServerError> {
    conn.execute(
        "delete from admin_sessions where expires_at <= ? or revoked_at is not null",
        params![now],
    )
    .map_err(|e| ServerError::DbError(format!("purge sessions failed: {e}")))
}
