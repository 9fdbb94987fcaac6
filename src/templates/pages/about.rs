use crate::templates::{desktop_layout, PageCtx};
use maud::{html, Markup};

pub fn about_page(ctx: &PageCtx) -> Markup {
    let site = ctx.site;
    desktop_layout(
        ctx,
        "Sobre",
        html! {
            main class="container narrow" {
                h1 { "Sobre " (site.company_name) }
                p class="lead" { (site.slogan) }
                p {
                    "Ajudamos famílias e investidores a comprar, vender e alugar imóveis "
                    "com atendimento próximo e transparente, do primeiro contato à entrega das chaves."
                }
                ul {
                    li { "Apartamentos, casas, terrenos e imóveis comerciais" }
                    li { "Acompanhamento em toda a negociação" }
                    li { "Fotos e informações detalhadas de cada imóvel" }
                }
                p { a href="/busca" class="button primary" { "Ver imóveis disponíveis" } }
            }
        },
    )
}
