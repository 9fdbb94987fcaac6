use crate::domain::search::SearchFilters;
use maud::{html, Markup};

pub fn pagination(filters: &SearchFilters, pages: u64) -> Markup {
    let current = filters.page;
    html! {
        @if pages > 1 {
            nav class="pagination" aria-label="Páginas" {
                @if current > 1 {
                    a href=(format!("/busca?{}", filters.to_query_string(current - 1))) { "‹ Anterior" }
                }
                span { "Página " (current) " de " (pages) }
                @if current < pages {
                    a href=(format!("/busca?{}", filters.to_query_string(current + 1))) { "Próxima ›" }
                }
            }
        }
    }
}
