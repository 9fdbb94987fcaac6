// src/tests/router_tests/admin_tests.rs
use crate::services::listings;
use crate::tests::utils::{
    backend_secret, body_string, get, listing_fields, location, login_cookie, photo,
    post_form, post_multipart, seed_listing, test_app,
};

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 16];
const PNG: &[u8] = &[0x89, b'P', b'N', b'G'];

fn file_exists(app: &crate::app::App, id: &str) -> bool {
    app.backend.file_contents(app.bucket(), id).is_ok()
}

#[test]
fn create_form_renders_multipart_form() {
    let app = test_app();
    let cookie = login_cookie(&app);

    let resp = get(&app, "/admin/cadastrar", Some(&cookie));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("enctype=\"multipart/form-data\""));
    assert!(body.contains("name=\"fotos\""));
}

#[test]
fn create_with_photos_stores_every_file() {
    let app = test_app();
    let cookie = login_cookie(&app);

    let resp = post_multipart(
        &app,
        "/admin/cadastrar",
        Some(&cookie),
        &listing_fields("Casa Nova", "350.000"),
        &[
            ("fotos", "a.jpg", "image/jpeg", JPEG),
            ("fotos", "b.png", "image/png", PNG),
            ("fotos", "c.jpg", "image/jpeg", JPEG),
        ],
    );
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/admin/dashboard");

    let (all, total) = listings::admin_list(&app).unwrap();
    assert_eq!(total, 1);
    let listing = &all[0];
    assert_eq!(listing.title, "Casa Nova");
    assert_eq!(listing.sale_price, 350000.0);
    assert_eq!(listing.photo_ids.len(), 3);
    for id in &listing.photo_ids {
        assert!(file_exists(&app, id));
    }

    let dashboard = body_string(get(&app, "/admin/dashboard", Some(&cookie)));
    assert!(dashboard.contains("Casa Nova"));
    assert!(dashboard.contains(&format!("/admin/excluir/{}", listing.id)));
}

#[test]
fn create_without_photos_accepts_plain_form() {
    let app = test_app();
    let cookie = login_cookie(&app);

    let resp = post_form(
        &app,
        "/admin/cadastrar",
        Some(&cookie),
        &listing_fields("Terreno Plano", "80000"),
    );
    assert_eq!(resp.status(), 302);

    let (all, _) = listings::admin_list(&app).unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].photo_ids.is_empty());
}

#[test]
fn invalid_create_rerenders_form_with_values() {
    let app = test_app();
    let cookie = login_cookie(&app);

    let mut fields = listing_fields("Casa sem preço", "");
    fields.retain(|(k, _)| *k != "preco_venda");
    let resp = post_multipart(&app, "/admin/cadastrar", Some(&cookie), &fields, &[]);
    assert_eq!(resp.status(), 400);

    let body = body_string(resp);
    assert!(body.contains("Informe o preço"));
    assert!(body.contains("Casa sem preço"));
    assert_eq!(listings::admin_list(&app).unwrap().1, 0);
}

#[test]
fn non_image_upload_is_rejected_and_nothing_is_stored() {
    let app = test_app();
    let cookie = login_cookie(&app);

    let resp = post_multipart(
        &app,
        "/admin/cadastrar",
        Some(&cookie),
        &listing_fields("Casa PDF", "100000"),
        &[
            ("fotos", "a.jpg", "image/jpeg", JPEG),
            ("fotos", "contrato.pdf", "application/pdf", &b"%PDF-1.4"[..]),
        ],
    );
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("contrato.pdf"));
    assert_eq!(listings::admin_list(&app).unwrap().1, 0);
}

#[test]
fn edit_form_is_prefilled_with_current_photos() {
    let app = test_app();
    let cookie = login_cookie(&app);
    let secret = backend_secret(&app);
    let listing = seed_listing(&app, &secret, "Sobrado Antigo", "600000", &[photo("a.jpg")]);

    let resp = get(&app, &format!("/admin/editar/{}", listing.id), Some(&cookie));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("value=\"Sobrado Antigo\""));
    assert!(body.contains("value=\"600000\""));
    assert!(body.contains(&format!("value=\"{}\"", listing.photo_ids[0])));
}

#[test]
fn edit_of_missing_listing_is_404() {
    let app = test_app();
    let cookie = login_cookie(&app);
    assert_eq!(get(&app, "/admin/editar/nope", Some(&cookie)).status(), 404);
}

#[test]
fn edit_replaces_fields_and_removes_selected_photos() {
    let app = test_app();
    let cookie = login_cookie(&app);
    let secret = backend_secret(&app);
    let listing = seed_listing(
        &app,
        &secret,
        "Sobrado Antigo",
        "600000",
        &[photo("a.jpg"), photo("b.jpg")],
    );
    let (removed, kept) = (&listing.photo_ids[0], &listing.photo_ids[1]);

    let mut fields = listing_fields("Sobrado Reformado", "650000");
    fields.push(("remover_fotos", removed.as_str()));
    let resp = post_multipart(
        &app,
        &format!("/admin/editar/{}", listing.id),
        Some(&cookie),
        &fields,
        &[("fotos", "c.png", "image/png", PNG)],
    );
    assert_eq!(resp.status(), 302);

    let updated = listings::get(&app, &listing.id).unwrap();
    assert_eq!(updated.title, "Sobrado Reformado");
    assert_eq!(updated.sale_price, 650000.0);
    assert_eq!(updated.photo_ids.len(), 2);
    assert_eq!(&updated.photo_ids[0], kept);
    assert!(!updated.photo_ids.contains(removed));
    assert!(!file_exists(&app, removed));
    assert!(file_exists(&app, &updated.photo_ids[1]));
}

#[test]
fn delete_removes_listing_and_its_photos() {
    let app = test_app();
    let cookie = login_cookie(&app);
    let secret = backend_secret(&app);
    let listing = seed_listing(&app, &secret, "Casa Demolida", "100000", &[photo("a.jpg")]);
    let photo_id = listing.photo_ids[0].clone();

    let resp = post_form(&app, &format!("/admin/excluir/{}", listing.id), Some(&cookie), &[]);
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/admin/dashboard");

    assert_eq!(get(&app, &format!("/imovel/{}", listing.id), None).status(), 404);
    assert!(!file_exists(&app, &photo_id));
}

#[test]
fn delete_of_missing_listing_is_404() {
    let app = test_app();
    let cookie = login_cookie(&app);
    let resp = post_form(&app, "/admin/excluir/nope", Some(&cookie), &[]);
    assert_eq!(resp.status(), 404);
}
