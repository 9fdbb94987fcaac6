use crate::domain::listing::Listing;
use maud::{html, Markup};

pub struct ListingCardVm<'a> {
    pub listing: &'a Listing,
    pub cover_url: Option<String>,
}

pub fn listing_card(vm: &ListingCardVm) -> Markup {
    let l = vm.listing;
    html! {
        article class="card listing-card" {
            a href=(format!("/imovel/{}", l.id)) {
                @if let Some(url) = &vm.cover_url {
                    img src=(url) alt=(l.title) loading="lazy";
                } @else {
                    div class="photo-placeholder" { "Sem foto" }
                }
            }
            div class="card-body" {
                span class="badge" { (l.listing_type.label()) " · " (l.property_type.label()) }
                h3 { a href=(format!("/imovel/{}", l.id)) { (l.title) } }
                p class="muted" { (l.location_label()) }
                p class="price" { (l.price_label()) }
                p class="features" {
                    (l.bedrooms) " quartos · " (l.bathrooms) " banheiros"
                    @if let Some(area) = l.area_m2 {
                        " · " (area) " m²"
                    }
                }
            }
        }
    }
}
