use crate::domain::listing::{format_brl, Listing, ListingStatus};
use crate::templates::{desktop_layout, PageCtx};
use maud::{html, Markup};

pub struct DetailVm<'a> {
    pub listing: &'a Listing,
    pub photo_urls: Vec<String>,
}

fn feature(label: &str, value: impl maud::Render) -> Markup {
    html! {
        div class="feature" {
            dt { (label) }
            dd { (value) }
        }
    }
}

pub fn detail_page(ctx: &PageCtx, vm: &DetailVm) -> Markup {
    let l = vm.listing;
    let message = format!("Olá! Tenho interesse no imóvel: {}", l.title);

    desktop_layout(
        ctx,
        &l.title,
        html! {
            main class="container" {
                p { a href="/busca" { "← Voltar para a busca" } }

                @if vm.photo_urls.is_empty() {
                    div class="photo-placeholder large" { "Sem fotos" }
                } @else {
                    div class="gallery" {
                        @for (i, url) in vm.photo_urls.iter().enumerate() {
                            a href=(url) target="_blank" rel="noopener" {
                                img src=(url) alt=(format!("{} - foto {}", l.title, i + 1)) loading="lazy";
                            }
                        }
                    }
                }

                div class="detail" {
                    div {
                        span class="badge" { (l.listing_type.label()) " · " (l.property_type.label()) }
                        @if l.status != ListingStatus::Disponivel {
                            span class="badge badge-muted" { (l.status.label()) }
                        }
                        h1 { (l.title) }
                        p class="muted" {
                            (l.location_label())
                            @if let Some(addr) = l.address.as_deref().filter(|a| !a.is_empty()) {
                                " · " (addr)
                            }
                        }
                        p class="price" { (l.price_label()) }

                        dl class="features" {
                            (feature("Quartos", l.bedrooms))
                            (feature("Banheiros", l.bathrooms))
                            @if let Some(v) = l.parking_spaces {
                                (feature("Vagas", v))
                            }
                            @if let Some(a) = l.area_m2 {
                                (feature("Área", format!("{a} m²")))
                                @if a > 0.0 {
                                    (feature("Preço por m²", format_brl(l.sale_price / a)))
                                }
                            }
                        }

                        @if let Some(desc) = l.description.as_deref().filter(|d| !d.is_empty()) {
                            h2 { "Descrição" }
                            @for para in desc.split("\n\n") {
                                p { (para) }
                            }
                        }
                    }

                    aside class="card contact-box" {
                        h3 { "Gostou deste imóvel?" }
                        p { "Fale com " (ctx.site.company_name) " e agende uma visita." }
                        a class="button primary" href=(ctx.site.whatsapp_link(Some(&message)))
                            target="_blank" rel="noopener" { "Conversar no WhatsApp" }
                        p class="muted" {
                            (ctx.site.phone_display) br;
                            a href=(format!("mailto:{}", ctx.site.email)) { (ctx.site.email) }
                        }
                        @if ctx.is_admin() {
                            a href=(format!("/admin/editar/{}", l.id)) { "Editar anúncio" }
                        }
                    }
                }
            }
        },
    )
}
