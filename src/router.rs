use crate::app::App;
use crate::auth::guard::LOGIN_PATH;
use crate::auth::login::{login, logout};
use crate::auth::{require_admin, Guard};
use crate::db::sessions::{self, AdminSession};
use crate::domain::listing::{form_values, Listing, ListingDraft};
use crate::domain::search::SearchFilters;
use crate::errors::ServerError;
use crate::requests::{
    clear_cookie, get_cookie, header, parse_form_body, parse_multipart, parse_query, read_body,
    session_cookie, FilePart, MultipartForm, SESSION_COOKIE,
};
use crate::responses::{
    css_response, html_response, html_status, media_response, redirect, redirect_with_cookie,
    ResultResp,
};
use crate::services::listings::{self, CARD_PREVIEW, DETAIL_PREVIEW};
use crate::templates::components::{ListingCardVm, ListingFormVm};
use crate::templates::pages::{self, DashboardRow, DashboardVm, DetailVm, SearchVm};
use crate::templates::PageCtx;
use crate::time::now_unix;
use astra::Request;
use maud::Markup;
use std::collections::HashMap;

const MAIN_CSS: &str = include_str!("../static/main.css");
const DASHBOARD_PATH: &str = "/admin/dashboard";

pub fn handle(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => home(&req, app),
        ("GET", ["busca"]) => search(&req, app),
        ("GET", ["imovel", id]) => detail(&req, app, id),
        ("GET", ["sobre"]) => public_page(&req, app, pages::about_page),
        ("GET", ["contato"]) => public_page(&req, app, pages::contact_page),
        ("GET", ["static", "main.css"]) => css_response(MAIN_CSS),
        ("GET", ["media", bucket, id]) => media(app, bucket, id),

        ("GET", ["admin"]) => redirect(DASHBOARD_PATH),
        ("GET", ["admin", "login"]) => login_form(&req, app),
        ("POST", ["admin", "login"]) => login_submit(req, app),
        ("POST", ["admin", "logout"]) => logout_submit(&req, app),
        ("GET", ["admin", "dashboard"]) => dashboard(&req, app),
        ("GET", ["admin", "cadastrar"]) => create_form(&req, app),
        ("POST", ["admin", "cadastrar"]) => create_submit(req, app),
        ("GET", ["admin", "editar", id]) => edit_form(&req, app, id),
        ("POST", ["admin", "editar", id]) => edit_submit(req, app, id),
        ("POST", ["admin", "excluir", id]) => delete_submit(&req, app, id),

        _ => Err(ServerError::NotFound),
    }
}

/// The signed-in admin, if any, for protected routes.
fn admin_session(req: &Request, app: &App) -> Result<Option<AdminSession>, ServerError> {
    Ok(match require_admin(req, app)? {
        Guard::Allowed(session) => Some(session),
        Guard::Redirect => None,
    })
}

/// Email of the signed-in admin for the header on public pages. Only the
/// local session row is consulted, not the backend.
fn viewer_email(req: &Request, app: &App) -> Option<String> {
    let token = get_cookie(req, SESSION_COOKIE)?;
    app.db
        .with_conn(|conn| sessions::load_session(conn, &token, now_unix()))
        .ok()
        .flatten()
        .map(|s| s.email)
}

fn public_page(req: &Request, app: &App, render: impl FnOnce(&PageCtx) -> Markup) -> ResultResp {
    let email = viewer_email(req, app);
    let ctx = PageCtx {
        site: &app.config.site,
        admin_email: email.as_deref(),
    };
    html_response(render(&ctx))
}

fn card_vms<'a>(app: &App, found: &'a [Listing]) -> Vec<ListingCardVm<'a>> {
    found
        .iter()
        .map(|listing| ListingCardVm {
            listing,
            cover_url: listing
                .cover_photo()
                .map(|id| listings::photo_url(app, id, CARD_PREVIEW)),
        })
        .collect()
}

// ---------- public pages ----------

fn home(req: &Request, app: &App) -> ResultResp {
    let featured = listings::featured(app)?;
    let cards = card_vms(app, &featured);
    public_page(req, app, |ctx| pages::home_page(ctx, &cards))
}

fn search(req: &Request, app: &App) -> ResultResp {
    let filters = SearchFilters::from_params(&parse_query(req));
    let page = listings::search(app, &filters)?;

    let vm = SearchVm {
        filters: &filters,
        cards: card_vms(app, &page.listings),
        total: page.total,
        pages: page.pages,
    };
    public_page(req, app, |ctx| pages::search_page(ctx, &vm))
}

fn detail(req: &Request, app: &App, id: &str) -> ResultResp {
    let listing = listings::get(app, id)?;
    let vm = DetailVm {
        photo_urls: listings::photo_urls(app, &listing, DETAIL_PREVIEW),
        listing: &listing,
    };
    public_page(req, app, |ctx| pages::detail_page(ctx, &vm))
}

fn media(app: &App, bucket: &str, id: &str) -> ResultResp {
    if bucket != app.bucket() {
        return Err(ServerError::NotFound);
    }
    let file = app.backend.file_contents(bucket, id)?;
    media_response(file.bytes, &file.mime_type)
}

// ---------- sign in / out ----------

fn login_form(req: &Request, app: &App) -> ResultResp {
    if admin_session(req, app)?.is_some() {
        return redirect(DASHBOARD_PATH);
    }
    html_response(pages::login_page(&PageCtx::public(&app.config.site), "", None))
}

fn login_submit(req: Request, app: &App) -> ResultResp {
    let fields = parse_form_body(&read_body(req)?);
    let email = fields.get("email").unwrap_or("");
    let password = fields.get("password").unwrap_or("");

    match login(app, email, password) {
        Ok(signed_in) => redirect_with_cookie(
            DASHBOARD_PATH,
            &session_cookie(&signed_in.token, app.config.session_ttl_secs()),
        ),
        Err(ServerError::Unauthorized(msg)) => html_status(
            401,
            pages::login_page(&PageCtx::public(&app.config.site), email, Some(&msg)),
        ),
        Err(ServerError::BadRequest(msg)) => html_status(
            400,
            pages::login_page(&PageCtx::public(&app.config.site), email, Some(&msg)),
        ),
        Err(e) => Err(e),
    }
}

fn logout_submit(req: &Request, app: &App) -> ResultResp {
    if let Some(token) = get_cookie(req, SESSION_COOKIE) {
        logout(app, &token)?;
    }
    redirect_with_cookie(LOGIN_PATH, &clear_cookie())
}

// ---------- admin ----------

fn dashboard(req: &Request, app: &App) -> ResultResp {
    let Some(session) = admin_session(req, app)? else {
        return redirect(LOGIN_PATH);
    };

    let (all, total) = listings::admin_list(app)?;
    let vm = DashboardVm {
        rows: all
            .iter()
            .map(|listing| DashboardRow {
                listing,
                cover_url: listing
                    .cover_photo()
                    .map(|id| listings::photo_url(app, id, CARD_PREVIEW)),
            })
            .collect(),
        total,
    };
    let ctx = PageCtx::admin(&app.config.site, &session.email);
    html_response(pages::dashboard_page(&ctx, &vm))
}

fn existing_photos(app: &App, listing: &Listing) -> Vec<(String, String)> {
    listing
        .photo_ids
        .iter()
        .map(|id| (id.clone(), listings::photo_url(app, id, CARD_PREVIEW)))
        .collect()
}

fn create_vm(values: HashMap<String, String>, error: Option<String>) -> ListingFormVm {
    ListingFormVm {
        action: "/admin/cadastrar".into(),
        heading: "Cadastrar imóvel".into(),
        submit_label: "Cadastrar".into(),
        values,
        error,
        existing_photos: Vec::new(),
    }
}

fn edit_vm(
    app: &App,
    listing: &Listing,
    values: HashMap<String, String>,
    error: Option<String>,
) -> ListingFormVm {
    ListingFormVm {
        action: format!("/admin/editar/{}", listing.id),
        heading: format!("Editar: {}", listing.title),
        submit_label: "Salvar alterações".into(),
        values,
        error,
        existing_photos: existing_photos(app, listing),
    }
}

/// Listing forms are multipart when photos are attached; a plain
/// urlencoded post (no file input) is accepted too.
fn read_listing_form(req: Request) -> Result<MultipartForm, ServerError> {
    let content_type = header(&req, "Content-Type").unwrap_or("").to_owned();
    let body = read_body(req)?;

    if content_type.starts_with("multipart/form-data") {
        parse_multipart(&content_type, body)
    } else {
        Ok(MultipartForm {
            fields: parse_form_body(&body),
            files: Vec::new(),
        })
    }
}

fn photos(form: &MultipartForm) -> Vec<FilePart> {
    form.files_named("fotos").cloned().collect()
}

fn create_form(req: &Request, app: &App) -> ResultResp {
    let Some(session) = admin_session(req, app)? else {
        return redirect(LOGIN_PATH);
    };
    let ctx = PageCtx::admin(&app.config.site, &session.email);
    html_response(pages::editor_page(&ctx, &create_vm(HashMap::new(), None)))
}

fn create_submit(req: Request, app: &App) -> ResultResp {
    let Some(session) = admin_session(&req, app)? else {
        return redirect(LOGIN_PATH);
    };
    let form = read_listing_form(req)?;
    let ctx = PageCtx::admin(&app.config.site, &session.email);

    let result = ListingDraft::from_fields(&form.fields).and_then(|draft| {
        listings::create(app, &session.backend_secret, draft, &photos(&form))
    });

    match result {
        Ok(_) => redirect(DASHBOARD_PATH),
        Err(ServerError::BadRequest(msg)) => html_status(
            400,
            pages::editor_page(&ctx, &create_vm(form.fields.to_map(), Some(msg))),
        ),
        Err(e) => Err(e),
    }
}

fn edit_form(req: &Request, app: &App, id: &str) -> ResultResp {
    let Some(session) = admin_session(req, app)? else {
        return redirect(LOGIN_PATH);
    };
    let listing = listings::get(app, id)?;
    let ctx = PageCtx::admin(&app.config.site, &session.email);
    let vm = edit_vm(app, &listing, form_values(&listing), None);
    html_response(pages::editor_page(&ctx, &vm))
}

fn edit_submit(req: Request, app: &App, id: &str) -> ResultResp {
    let Some(session) = admin_session(&req, app)? else {
        return redirect(LOGIN_PATH);
    };
    let form = read_listing_form(req)?;
    let ctx = PageCtx::admin(&app.config.site, &session.email);

    let removed = form.fields.get_all("remover_fotos");
    let result = ListingDraft::from_fields(&form.fields).and_then(|draft| {
        listings::update(
            app,
            &session.backend_secret,
            id,
            draft,
            &photos(&form),
            &removed,
        )
    });

    match result {
        Ok(_) => redirect(DASHBOARD_PATH),
        Err(ServerError::BadRequest(msg)) => {
            let listing = listings::get(app, id)?;
            let vm = edit_vm(app, &listing, form.fields.to_map(), Some(msg));
            html_status(400, pages::editor_page(&ctx, &vm))
        }
        Err(e) => Err(e),
    }
}

fn delete_submit(req: &Request, app: &App, id: &str) -> ResultResp {
    let Some(session) = admin_session(req, app)? else {
        return redirect(LOGIN_PATH);
    };
    listings::delete(app, &session.backend_secret, id)?;
    redirect(DASHBOARD_PATH)
}
