use crate::domain::listing::{ListingType, PropertyType};
use crate::domain::search::{SearchFilters, SortOrder};
use maud::{html, Markup};

fn num(v: Option<f64>) -> String {
    v.map(|p| p.to_string()).unwrap_or_default()
}

/// GET form targeting `/busca`, prefilled from the current filters.
pub fn search_form(f: &SearchFilters) -> Markup {
    html! {
        form class="search-form" method="get" action="/busca" {
            input type="search" name="texto_busca" placeholder="Buscar por título"
                value=(f.text.as_deref().unwrap_or(""));

            select name="tipo_anuncio" {
                option value="" { "Comprar ou alugar" }
                @for t in ListingType::ALL {
                    option value=(t.as_str()) selected[f.listing_type == Some(t)] { (t.label()) }
                }
            }
            select name="tipo_imovel" {
                option value="" { "Qualquer tipo" }
                @for t in PropertyType::ALL {
                    option value=(t.as_str()) selected[f.property_type == Some(t)] { (t.label()) }
                }
            }

            input type="text" name="cidade" placeholder="Cidade" value=(f.city.as_deref().unwrap_or(""));
            input type="text" name="bairro" placeholder="Bairro" value=(f.neighborhood.as_deref().unwrap_or(""));
            input type="number" name="quartos_min" min="0" placeholder="Quartos (mín.)"
                value=(f.min_bedrooms.map(|n| n.to_string()).unwrap_or_default());
            input type="number" name="banheiros_min" min="0" placeholder="Banheiros (mín.)"
                value=(f.min_bathrooms.map(|n| n.to_string()).unwrap_or_default());
            input type="text" name="preco_min" inputmode="decimal" placeholder="Preço mínimo" value=(num(f.min_price));
            input type="text" name="preco_max" inputmode="decimal" placeholder="Preço máximo" value=(num(f.max_price));

            select name="ordem" {
                @for o in SortOrder::ALL {
                    option value=(o.as_str()) selected[f.order == o] { (o.label()) }
                }
            }

            button type="submit" class="primary" { "Buscar" }
        }
    }
}
