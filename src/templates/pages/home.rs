// templates/pages/home.rs

use crate::domain::search::SearchFilters;
use crate::templates::{
    components::{listing_card, search_form, ListingCardVm},
    desktop_layout, PageCtx,
};
use maud::{html, Markup};

pub fn home_page(ctx: &PageCtx, featured: &[ListingCardVm]) -> Markup {
    desktop_layout(
        ctx,
        "Início",
        html! {
            section class="hero" {
                h1 { (ctx.site.slogan) }
                (search_form(&SearchFilters::default()))
            }

            main class="container" {
                h2 { "Imóveis em destaque" }
                @if featured.is_empty() {
                    p class="muted" { "Nenhum imóvel disponível no momento." }
                } @else {
                    div class="card-grid" {
                        @for vm in featured {
                            (listing_card(vm))
                        }
                    }
                    p { a href="/busca" class="button" { "Ver todos os imóveis" } }
                }
            }
        },
    )
}
