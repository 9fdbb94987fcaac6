use crate::templates::PageCtx;
use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(ctx: &PageCtx, title: &str, content: Markup) -> Markup {
    let site = ctx.site;
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | " (site.company_name) }
                meta name="description" content=(site.seo_description);
                meta name="keywords" content=(site.seo_keywords);
                meta property="og:title" content=(site.seo_title);
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="site-header" {
                    a href="/" class="brand" {
                        svg
                            xmlns="http://www.w3.org/2000/svg"
                            width="24"
                            height="24"
                            viewBox="0 0 24 24"
                            fill="none"
                            stroke="currentColor"
                            stroke-width="2"
                            stroke-linecap="round"
                            stroke-linejoin="round"
                        {
                            path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                            path d="M5 12l-2 0l9 -9l9 9l-2 0" {}
                            path d="M5 12v7a2 2 0 0 0 2 2h10a2 2 0 0 0 2 -2v-7" {}
                            path d="M9 21v-6a2 2 0 0 1 2 -2h2a2 2 0 0 1 2 2v6" {}
                        }
                        span { (site.company_name) }
                    }
                    nav {
                        ul {
                            li { a href="/" { "Início" } }
                            li { a href="/busca" { "Buscar imóveis" } }
                            li { a href="/sobre" { "Sobre" } }
                            li { a href="/contato" { "Contato" } }
                            @if ctx.is_admin() {
                                li { a href="/admin/dashboard" { "Painel" } }
                            }
                        }
                    }
                    @if let Some(email) = ctx.admin_email {
                        form method="post" action="/admin/logout" class="inline" {
                            span class="muted" { (email) " " }
                            button type="submit" class="link" { "Sair" }
                        }
                    } @else {
                        a href="/admin/login" class="muted" { "Área do corretor" }
                    }
                }
                (content)
                footer class="site-footer" {
                    p { (site.company_name) " · " (site.slogan) }
                    p {
                        a href=(site.whatsapp_link(None)) target="_blank" rel="noopener" {
                            "WhatsApp " (site.phone_display)
                        }
                        " · "
                        a href=(format!("mailto:{}", site.email)) { (site.email) }
                    }
                }
            }
        }
    }
}
