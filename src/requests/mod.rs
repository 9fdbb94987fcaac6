pub mod cookies;
pub mod form;
pub mod multipart;

pub use cookies::{clear_cookie, get_cookie, session_cookie, SESSION_COOKIE};
pub use form::{parse_form_body, parse_query, FormFields};
pub use multipart::{parse_multipart, FilePart, MultipartForm};

use crate::errors::ServerError;
use astra::Request;
use std::io::Read;

/// Upper bound for request bodies (forms with a handful of photos).
pub const MAX_BODY_BYTES: u64 = 25 * 1024 * 1024;

/// Read the whole request body, refusing anything over [`MAX_BODY_BYTES`].
pub fn read_body(req: Request) -> Result<Vec<u8>, ServerError> {
    let mut body = req.into_body();
    let mut buf = Vec::new();
    body.reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read body: {e}")))?;

    if buf.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("request body too large".into()));
    }
    Ok(buf)
}

pub fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}
