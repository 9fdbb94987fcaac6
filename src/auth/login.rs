// src/auth/login.rs
use crate::app::App;
use crate::backend::BackendError;
use crate::db::sessions;
use crate::errors::ServerError;
use crate::time::now_unix;
use log::{info, warn};

#[derive(Debug, Clone)]
pub struct LoggedIn {
    /// Raw web session token for the cookie.
    pub token: String,
    pub email: String,
}

/// Trim + lowercase, minimal sanity check.
pub fn normalize_email(email: &str) -> Result<String, ServerError> {
    let e = email.trim().to_lowercase();
    if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
        return Err(ServerError::BadRequest("E-mail inválido".into()));
    }
    Ok(e)
}

/// Open a backend session with the admin's credentials and remember it
/// under a fresh web session token.
pub fn login(app: &App, email: &str, password: &str) -> Result<LoggedIn, ServerError> {
    let email = normalize_email(email)?;
    if password.is_empty() {
        return Err(ServerError::BadRequest("Informe a senha".into()));
    }

    let session = match app.backend.create_email_session(&email, password) {
        Ok(s) => s,
        Err(BackendError::Unauthorized) => {
            warn!("failed login for {email}");
            return Err(ServerError::Unauthorized("E-mail ou senha inválidos".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let ttl = app.config.session_ttl_secs();
    let token = app
        .db
        .with_conn(|conn| sessions::create_session(conn, &email, &session.secret, now_unix(), ttl))?;

    info!("admin {email} signed in");
    Ok(LoggedIn { token, email })
}

/// End both the backend session and the web session. Missing sessions are fine.
pub fn logout(app: &App, raw_token: &str) -> Result<(), ServerError> {
    let now = now_unix();
    let session = app
        .db
        .with_conn(|conn| sessions::load_session(conn, raw_token, now))?;

    if let Some(session) = session {
        match app.backend.delete_session(&session.backend_secret) {
            Ok(()) | Err(BackendError::Unauthorized) => {}
            Err(e) => warn!("backend logout for {} failed: {e}", session.email),
        }
        info!("admin {} signed out", session.email);
    }

    app.db.with_conn(|conn| {
        sessions::revoke_session(conn, raw_token, now)?;
        sessions::purge_stale_sessions(conn, now)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Test@Example.COM ").unwrap(), "test@example.com");
    }

    #[test]
    fn normalize_email_rejects_invalid() {
        assert!(normalize_email("").is_err());
        assert!(normalize_email("no-at-symbol").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("test@").is_err());
    }
}
