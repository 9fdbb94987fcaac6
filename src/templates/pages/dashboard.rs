use crate::domain::listing::Listing;
use crate::templates::{desktop_layout, PageCtx};
use maud::{html, Markup};

pub struct DashboardRow<'a> {
    pub listing: &'a Listing,
    pub cover_url: Option<String>,
}

pub struct DashboardVm<'a> {
    pub rows: Vec<DashboardRow<'a>>,
    pub total: u64,
}

pub fn dashboard_page(ctx: &PageCtx, vm: &DashboardVm) -> Markup {
    desktop_layout(
        ctx,
        "Painel",
        html! {
            main class="container" {
                div class="page-head" {
                    h1 { "Meus imóveis" }
                    a href="/admin/cadastrar" class="button primary" { "Cadastrar imóvel" }
                }

                @if vm.rows.is_empty() {
                    p class="muted" { "Nenhum imóvel cadastrado ainda." }
                } @else {
                    @if vm.total > vm.rows.len() as u64 {
                        p class="muted" { "Mostrando " (vm.rows.len()) " de " (vm.total) " imóveis." }
                    }
                    table class="admin-table" {
                        thead {
                            tr {
                                th { "Foto" }
                                th { "Título" }
                                th { "Tipo" }
                                th { "Preço" }
                                th { "Status" }
                                th { "Ações" }
                            }
                        }
                        tbody {
                            @for row in &vm.rows {
                                @let l = row.listing;
                                tr {
                                    td {
                                        @if let Some(url) = &row.cover_url {
                                            img class="thumb" src=(url) alt="";
                                        }
                                    }
                                    td {
                                        a href=(format!("/imovel/{}", l.id)) { (l.title) }
                                        br;
                                        span class="muted" { (l.location_label()) }
                                    }
                                    td { (l.listing_type.label()) " · " (l.property_type.label()) }
                                    td { (l.price_label()) }
                                    td { (l.status.label()) }
                                    td class="actions" {
                                        a href=(format!("/admin/editar/{}", l.id)) { "Editar" }
                                        form method="post" action=(format!("/admin/excluir/{}", l.id)) class="inline"
                                            onsubmit="return confirm('Excluir este imóvel e suas fotos?');" {
                                            button type="submit" class="link danger" { "Excluir" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
