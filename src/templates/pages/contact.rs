use crate::templates::{desktop_layout, PageCtx};
use maud::{html, Markup};

pub fn contact_page(ctx: &PageCtx) -> Markup {
    let site = ctx.site;
    desktop_layout(
        ctx,
        "Contato",
        html! {
            main class="container narrow" {
                h1 { "Contato" }
                p { "Fale diretamente com o corretor pelo canal de sua preferência." }
                section class="card" {
                    h3 { "WhatsApp" }
                    p {
                        a href=(site.whatsapp_link(None)) target="_blank" rel="noopener" class="button primary" {
                            "Enviar mensagem"
                        }
                    }
                    p class="muted" { (site.phone_display) }
                }
                section class="card" {
                    h3 { "E-mail" }
                    p { a href=(format!("mailto:{}", site.email)) { (site.email) } }
                }
            }
        },
    )
}
