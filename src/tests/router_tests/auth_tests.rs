// src/tests/router_tests/auth_tests.rs
use crate::db::sessions;
use crate::tests::utils::{
    body_string, get, location, login_cookie, post_form, test_app, ADMIN_EMAIL,
};
use crate::time::now_unix;

const PROTECTED_GETS: [&str; 3] = ["/admin/dashboard", "/admin/cadastrar", "/admin/editar/abc"];
const PROTECTED_POSTS: [&str; 3] = ["/admin/cadastrar", "/admin/editar/abc", "/admin/excluir/abc"];

fn assert_redirects_to_login(app: &crate::app::App, cookie: Option<&str>) {
    for path in PROTECTED_GETS {
        let resp = get(app, path, cookie);
        assert_eq!(resp.status(), 302, "GET {path}");
        assert_eq!(location(&resp), "/admin/login", "GET {path}");
    }
    for path in PROTECTED_POSTS {
        let resp = post_form(app, path, cookie, &[("titulo", "x")]);
        assert_eq!(resp.status(), 302, "POST {path}");
        assert_eq!(location(&resp), "/admin/login", "POST {path}");
    }
}

#[test]
fn login_page_loads_successfully() {
    let app = test_app();
    let resp = get(&app, "/admin/login", None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Área do corretor"));
    assert!(body.contains("name=\"password\""));
}

#[test]
fn admin_root_redirects_to_dashboard() {
    let app = test_app();
    let resp = get(&app, "/admin", None);
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/admin/dashboard");
}

#[test]
fn protected_routes_redirect_without_cookie() {
    let app = test_app();
    assert_redirects_to_login(&app, None);
}

#[test]
fn protected_routes_redirect_with_unknown_cookie() {
    let app = test_app();
    assert_redirects_to_login(&app, Some("session=not-a-real-token"));
}

#[test]
fn protected_routes_redirect_when_backend_session_is_gone() {
    let app = test_app();
    let cookie = login_cookie(&app);
    let token = cookie.trim_start_matches("session=");

    let session = app
        .db
        .with_conn(|conn| sessions::load_session(conn, token, now_unix()))
        .unwrap()
        .expect("web session stored");
    app.backend.delete_session(&session.backend_secret).unwrap();

    assert_redirects_to_login(&app, Some(&cookie));
}

#[test]
fn valid_login_sets_cookie_and_opens_dashboard() {
    let app = test_app();
    let cookie = login_cookie(&app);
    assert!(cookie.starts_with("session="));

    let resp = get(&app, "/admin/dashboard", Some(&cookie));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Meus imóveis"));
    assert!(body.contains(ADMIN_EMAIL));

    let login_again = get(&app, "/admin/login", Some(&cookie));
    assert_eq!(login_again.status(), 302);
    assert_eq!(location(&login_again), "/admin/dashboard");
}

#[test]
fn wrong_password_rerenders_form_with_401() {
    let app = test_app();
    let resp = post_form(
        &app,
        "/admin/login",
        None,
        &[("email", ADMIN_EMAIL), ("password", "errada")],
    );
    assert_eq!(resp.status(), 401);
    assert!(resp.headers().get("Set-Cookie").is_none());

    let body = body_string(resp);
    assert!(body.contains("E-mail ou senha inválidos"));
    assert!(body.contains(ADMIN_EMAIL));
}

#[test]
fn malformed_email_is_a_400() {
    let app = test_app();
    let resp = post_form(&app, "/admin/login", None, &[("email", "sem-arroba"), ("password", "x")]);
    assert_eq!(resp.status(), 400);
}

#[test]
fn logout_ends_both_sessions() {
    let app = test_app();
    let cookie = login_cookie(&app);
    let token = cookie.trim_start_matches("session=").to_string();
    let secret = app
        .db
        .with_conn(|conn| sessions::load_session(conn, &token, now_unix()))
        .unwrap()
        .unwrap()
        .backend_secret;

    let resp = post_form(&app, "/admin/logout", Some(&cookie), &[]);
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/admin/login");
    let set_cookie = resp.headers().get("Set-Cookie").unwrap().to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    assert!(app.backend.get_account(&secret).is_err());
    let after = get(&app, "/admin/dashboard", Some(&cookie));
    assert_eq!(after.status(), 302);
}

#[test]
fn logout_without_session_still_redirects() {
    let app = test_app();
    let resp = post_form(&app, "/admin/logout", None, &[]);
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/admin/login");
}

#[test]
fn session_store_failure_redirects_to_login() {
    let app = test_app();
    let cookie = login_cookie(&app);

    app.db
        .with_conn(|conn| {
            conn.execute_batch("drop table admin_sessions")
                .map_err(|e| crate::errors::ServerError::DbError(e.to_string()))
        })
        .unwrap();

    let resp = get(&app, "/admin/dashboard", Some(&cookie));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/admin/login");
}
