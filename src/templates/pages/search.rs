use crate::domain::search::SearchFilters;
use crate::templates::{
    components::{listing_card, pagination, search_form, warnings, ListingCardVm},
    desktop_layout, PageCtx,
};
use maud::{html, Markup};

pub struct SearchVm<'a> {
    pub filters: &'a SearchFilters,
    pub cards: Vec<ListingCardVm<'a>>,
    pub total: u64,
    pub pages: u64,
}

pub fn search_page(ctx: &PageCtx, vm: &SearchVm) -> Markup {
    desktop_layout(
        ctx,
        "Buscar imóveis",
        html! {
            main class="container" {
                h1 { "Buscar imóveis" }
                (search_form(vm.filters))
                (warnings(&vm.filters.warnings))

                p class="muted" {
                    @match vm.total {
                        0 => "Nenhum imóvel encontrado com esses filtros.",
                        1 => "1 imóvel encontrado",
                        n => { (n) " imóveis encontrados" },
                    }
                }

                div class="card-grid" {
                    @for card in &vm.cards {
                        (listing_card(card))
                    }
                }

                (pagination(vm.filters, vm.pages))
            }
        },
    )
}
