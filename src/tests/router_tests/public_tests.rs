// src/tests/router_tests/public_tests.rs
use crate::tests::utils::{backend_secret, body_string, get, photo, seed_listing, test_app};

#[test]
fn home_page_lists_featured_listings() {
    let app = test_app();
    let secret = backend_secret(&app);
    seed_listing(&app, &secret, "Apartamento no Cambuí", "450000", &[]);

    let resp = get(&app, "/", None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Imóveis em destaque"));
    assert!(body.contains("Apartamento no Cambuí"));
    assert!(body.contains("R$ 450.000"));
    assert!(body.contains("action=\"/busca\""));
}

#[test]
fn home_page_without_listings_shows_empty_state() {
    let app = test_app();
    let body = body_string(get(&app, "/", None));
    assert!(body.contains("Nenhum imóvel disponível"));
}

#[test]
fn static_pages_render() {
    let app = test_app();
    for path in ["/sobre", "/contato"] {
        let resp = get(&app, path, None);
        assert_eq!(resp.status(), 200, "{path}");
        let body = body_string(resp);
        assert!(body.contains("https://wa.me/5511999999999"), "{path}");
    }

    let css = get(&app, "/static/main.css", None);
    assert_eq!(css.status(), 200);
    assert_eq!(
        css.headers().get("Content-Type").unwrap(),
        "text/css; charset=utf-8"
    );
}

#[test]
fn search_by_min_price_returns_only_listings_at_or_above_it() {
    let app = test_app();
    let secret = backend_secret(&app);
    seed_listing(&app, &secret, "Casa Alfa", "100000", &[]);
    seed_listing(&app, &secret, "Casa Beta", "300000", &[]);
    seed_listing(&app, &secret, "Casa Gama", "500000", &[]);

    let resp = get(&app, "/busca?preco_min=250000", None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(!body.contains("Casa Alfa"));
    assert!(body.contains("Casa Beta"));
    assert!(body.contains("Casa Gama"));
    assert!(body.contains("2 imóveis encontrados"));
}

#[test]
fn search_ignores_invalid_numbers_with_a_warning() {
    let app = test_app();
    let secret = backend_secret(&app);
    seed_listing(&app, &secret, "Casa Alfa", "100000", &[]);

    let body = body_string(get(&app, "/busca?quartos_min=muitos", None));
    assert!(body.contains("valor inválido"));
    assert!(body.contains("Casa Alfa"));
}

#[test]
fn search_hides_listings_that_are_not_available() {
    let app = test_app();
    let secret = backend_secret(&app);
    let sold = seed_listing(&app, &secret, "Casa Vendida", "100000", &[]);
    app.backend
        .update_document(
            &secret,
            app.collection(),
            &sold.id,
            &serde_json::json!({ "status": "vendido" })
                .as_object()
                .cloned()
                .unwrap(),
        )
        .unwrap();

    let body = body_string(get(&app, "/busca", None));
    assert!(!body.contains("Casa Vendida"));
    assert!(body.contains("Nenhum imóvel encontrado"));
}

#[test]
fn detail_page_shows_gallery_and_whatsapp_contact() {
    let app = test_app();
    let secret = backend_secret(&app);
    let listing = seed_listing(
        &app,
        &secret,
        "Cobertura Duplex",
        "900000",
        &[photo("sala.jpg"), photo("quarto.jpg")],
    );

    let resp = get(&app, &format!("/imovel/{}", listing.id), None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Cobertura Duplex"));
    assert!(body.contains("Cambuí, Campinas"));
    assert!(body.contains("https://wa.me/5511999999999?text="));
    assert!(body.contains("Cobertura%20Duplex"));
    for id in &listing.photo_ids {
        assert!(body.contains(&format!("/media/fotos_imoveis/{id}")));
    }
}

#[test]
fn unknown_listing_is_404() {
    let app = test_app();
    let resp = get(&app, "/imovel/does-not-exist", None);
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("Página não encontrada"));
}

#[test]
fn unknown_route_is_404() {
    let app = test_app();
    assert_eq!(get(&app, "/nada/aqui", None).status(), 404);
}

#[test]
fn media_route_serves_stored_photo_bytes() {
    let app = test_app();
    let secret = backend_secret(&app);
    let listing = seed_listing(&app, &secret, "Casa com foto", "200000", &[photo("fachada.jpg")]);
    let id = &listing.photo_ids[0];

    let resp = get(&app, &format!("/media/fotos_imoveis/{id}?width=400&height=300"), None);
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("Content-Type").unwrap(), "image/jpeg");

    let other_bucket = get(&app, &format!("/media/outro/{id}"), None);
    assert_eq!(other_bucket.status(), 404);
}

#[test]
fn search_past_the_last_page_is_empty_not_an_error() {
    let app = test_app();
    let secret = backend_secret(&app);
    seed_listing(&app, &secret, "Casa Alfa", "100000", &[]);

    for page in ["18446744073709551615", "900000000000000000"] {
        let resp = get(&app, &format!("/busca?pagina={page}"), None);
        assert_eq!(resp.status(), 200, "pagina={page}");
        let body = body_string(resp);
        assert!(!body.contains("Casa Alfa"), "pagina={page}");
        assert!(body.contains("fora do limite"), "pagina={page}");
    }
}
