// src/tests/utils.rs
use crate::app::App;
use crate::backend::{unique_id, Backend, LocalBackend};
use crate::config::Config;
use crate::db::sessions::APP_SCHEMA;
use crate::db::{init_db, Database};
use crate::domain::listing::{Listing, ListingDraft};
use crate::errors::ServerError;
use crate::requests::{FilePart, FormFields};
use crate::responses::error_response;
use crate::router::handle;
use crate::services::listings;
use astra::{Body, Request, Response};
use http::Method;
use std::collections::HashMap;
use std::io::Read;

pub const ADMIN_EMAIL: &str = "corretor@example.com";
pub const ADMIN_PASSWORD: &str = "segredo-123";

const BOUNDARY: &str = "----house-finder-test-boundary";

fn test_config() -> Config {
    let dir = std::env::temp_dir();
    let app_db = dir.join(format!("hf_app_{}.sqlite3", unique_id()));
    let backend_db = dir.join(format!("hf_backend_{}.sqlite3", unique_id()));

    let mut env: HashMap<&str, String> = HashMap::new();
    env.insert("BACKEND", "local".into());
    env.insert("APP_DB_PATH", app_db.to_string_lossy().into_owned());
    env.insert("LOCAL_BACKEND_PATH", backend_db.to_string_lossy().into_owned());
    env.insert("ADMIN_EMAIL", ADMIN_EMAIL.into());
    env.insert("ADMIN_PASSWORD", ADMIN_PASSWORD.into());

    Config::from_lookup(|k| env.get(k).cloned()).expect("test config")
}

/// App on the local backend with fresh sqlite files and a seeded admin.
pub fn test_app() -> App {
    App::from_config(test_config()).expect("test app")
}

/// Same as [`test_app`], with the local backend wrapped by `wrap`.
pub fn test_app_with<F>(wrap: F) -> App
where
    F: FnOnce(LocalBackend) -> Box<dyn Backend>,
{
    let config = test_config();
    let db = Database::new(config.app_db_path.clone());
    init_db(&db, APP_SCHEMA).expect("app schema");

    let local = LocalBackend::open(config.local_backend_path.clone()).expect("local backend");
    local
        .seed_account(ADMIN_EMAIL, ADMIN_PASSWORD)
        .expect("seed admin");
    App::new(config, db, wrap(local))
}

/// Files currently stored in the local backend, across all buckets.
pub fn stored_file_count(app: &App) -> i64 {
    Database::new(app.config.local_backend_path.clone())
        .with_conn(|conn| {
            conn.query_row("select count(*) from files", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .expect("count files")
}

/// Run a request the way the server loop does, errors rendered as pages.
pub fn send(app: &App, req: Request) -> Response {
    match handle(req, app) {
        Ok(resp) => resp,
        Err(err) => error_response(err),
    }
}

pub fn get(app: &App, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    send(app, builder.body(Body::empty()).unwrap())
}

pub fn post_form(app: &App, uri: &str, cookie: Option<&str>, pairs: &[(&str, &str)]) -> Response {
    let body: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    send(app, builder.body(Body::from(body)).unwrap())
}

/// A file input for [`multipart_body`]: (field, file name, content type, bytes).
pub type TestFile<'a> = (&'a str, &'a str, &'a str, &'a [u8]);

pub fn multipart_body(fields: &[(&str, &str)], files: &[TestFile]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (field, file_name, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn post_multipart(
    app: &App,
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    files: &[TestFile],
) -> Response {
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    send(app, builder.body(Body::from(multipart_body(fields, files))).unwrap())
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Sign in through the router and return the `Cookie` header value.
pub fn login_cookie(app: &App) -> String {
    let resp = post_form(
        app,
        "/admin/login",
        None,
        &[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)],
    );
    assert_eq!(resp.status(), 302, "login should redirect");
    let set_cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .expect("login sets a cookie");
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

/// Backend secret for writing fixtures directly through the service layer.
pub fn backend_secret(app: &App) -> String {
    app.backend
        .create_email_session(ADMIN_EMAIL, ADMIN_PASSWORD)
        .expect("backend session")
        .secret
}

pub fn listing_fields<'a>(title: &'a str, price: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("titulo", title),
        ("descricao", "Bem localizado, perto do metrô."),
        ("tipo_anuncio", "venda"),
        ("tipo_imovel", "apartamento"),
        ("status", "disponivel"),
        ("preco_venda", price),
        ("cidade", "Campinas"),
        ("bairro", "Cambuí"),
        ("quartos", "2"),
        ("banheiros", "1"),
        ("vagas", "1"),
        ("area_m2", "70"),
    ]
}

pub fn seed_listing(app: &App, secret: &str, title: &str, price: &str, photos: &[FilePart]) -> Listing {
    let fields = FormFields::from_pairs(
        listing_fields(title, price)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    );
    let draft = ListingDraft::from_fields(&fields).expect("valid draft");
    listings::create(app, secret, draft, photos).expect("listing created")
}

pub fn photo(name: &str) -> FilePart {
    FilePart {
        field: "fotos".into(),
        file_name: name.into(),
        content_type: "image/jpeg".into(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3],
    }
}
