use maud::{html, Markup, DOCTYPE};

/// Standalone error page (no layout, so it renders even when config is unavailable).
pub fn error_page(status: u16, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                title { "Erro " (status) }
                link rel="stylesheet" href="/static/main.css";
            }
            body class="error-page" {
                main class="container narrow" {
                    h1 { "Erro " (status) }
                    p { (message) }
                    p { a href="/" { "← Voltar para o início" } }
                }
            }
        }
    }
}
