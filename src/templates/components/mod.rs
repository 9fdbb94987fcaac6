use maud::{html, Markup};

pub mod card;
pub mod error;
pub mod listing_form;
pub mod pagination;
pub mod search_form;

pub use card::{listing_card, ListingCardVm};
pub use error::error_page;
pub use listing_form::{listing_form, ListingFormVm};
pub use pagination::pagination;
pub use search_form::search_form;

/// Yellow notice listing inputs that were ignored or adjusted.
pub fn warnings(items: &[String]) -> Markup {
    html! {
        @if !items.is_empty() {
            div class="alert alert-warning" role="status" {
                ul {
                    @for w in items {
                        li { (w) }
                    }
                }
            }
        }
    }
}

pub fn error_banner(message: Option<&str>) -> Markup {
    html! {
        @if let Some(msg) = message {
            div class="alert alert-error" role="alert" { (msg) }
        }
    }
}
