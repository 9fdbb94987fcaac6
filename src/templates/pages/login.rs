use crate::templates::{components::error_banner, desktop_layout, PageCtx};
use maud::{html, Markup};

pub fn login_page(ctx: &PageCtx, email: &str, error: Option<&str>) -> Markup {
    desktop_layout(
        ctx,
        "Entrar",
        html! {
            main class="container narrow" {
                h1 { "Área do corretor" }
                p class="lead" { "Entre com seu e-mail e senha para gerenciar os anúncios." }

                (error_banner(error))

                form method="post" action="/admin/login" class="card" {
                    label for="email" { "E-mail" }
                    input type="email" id="email" name="email" value=(email) required autofocus;

                    label for="password" { "Senha" }
                    input type="password" id="password" name="password" required;

                    button type="submit" class="primary" { "Entrar" }
                }
            }
        },
    )
}
