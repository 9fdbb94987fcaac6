// src/auth/guard.rs
use crate::app::App;
use crate::db::sessions::{self, AdminSession};
use crate::errors::ServerError;
use crate::requests::{get_cookie, SESSION_COOKIE};
use crate::time::now_unix;
use astra::Request;
use log::warn;

pub const LOGIN_PATH: &str = "/admin/login";

/// Outcome of checking a protected route.
#[derive(Debug)]
pub enum Guard {
    Allowed(AdminSession),
    Redirect,
}

/// A protected route proceeds only when the browser's session maps to a
/// backend session that the backend still recognizes.
pub fn require_admin(req: &Request, app: &App) -> Result<Guard, ServerError> {
    let Some(token) = get_cookie(req, SESSION_COOKIE) else {
        return Ok(Guard::Redirect);
    };

    let session = match app
        .db
        .with_conn(|conn| sessions::load_session(conn, &token, now_unix()))
    {
        Ok(Some(session)) => session,
        Ok(None) => return Ok(Guard::Redirect),
        Err(e) => {
            warn!("session lookup failed: {e}");
            return Ok(Guard::Redirect);
        }
    };

    match app.backend.get_account(&session.backend_secret) {
        Ok(_) => Ok(Guard::Allowed(session)),
        Err(crate::backend::BackendError::Unauthorized) => Ok(Guard::Redirect),
        Err(e) => {
            warn!("session check for {} failed: {e}", session.email);
            Ok(Guard::Redirect)
        }
    }
}
