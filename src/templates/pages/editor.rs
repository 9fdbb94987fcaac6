use crate::templates::{
    components::{listing_form, ListingFormVm},
    desktop_layout, PageCtx,
};
use maud::{html, Markup};

/// Create and edit share one page; only the form state differs.
pub fn editor_page(ctx: &PageCtx, vm: &ListingFormVm) -> Markup {
    desktop_layout(
        ctx,
        &vm.heading,
        html! {
            main class="container narrow" {
                h1 { (vm.heading) }
                (listing_form(vm))
            }
        },
    )
}
