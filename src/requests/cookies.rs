// src/requests/cookies.rs
use astra::Request;

pub const SESSION_COOKIE: &str = "session";

/// Value of cookie `name` from the `Cookie` header(s).
pub fn get_cookie(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra::Body;

    fn req_with_cookie(value: &str) -> Request {
        http::Request::builder()
            .uri("/")
            .header("Cookie", value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let req = req_with_cookie("theme=dark; session=abc123; lang=pt");
        assert_eq!(get_cookie(&req, "session"), Some("abc123".to_string()));
        assert_eq!(get_cookie(&req, "missing"), None);
    }

    #[test]
    fn empty_cookie_value_is_absent() {
        let req = req_with_cookie("session=");
        assert_eq!(get_cookie(&req, SESSION_COOKIE), None);
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        assert!(clear_cookie().contains("Max-Age=0"));
        assert!(session_cookie("t", 60).starts_with("session=t;"));
    }
}
