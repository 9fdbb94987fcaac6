use crate::domain::listing::{ListingStatus, ListingType, PropertyType};
use maud::{html, Markup};
use std::collections::HashMap;

/// Create/edit form state. `values` holds raw field values so a rejected
/// submission comes back exactly as typed.
pub struct ListingFormVm {
    pub action: String,
    pub heading: String,
    pub submit_label: String,
    pub values: HashMap<String, String>,
    pub error: Option<String>,
    /// (photo id, preview url) of photos already attached.
    pub existing_photos: Vec<(String, String)>,
}

impl ListingFormVm {
    fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }
}

fn text_input(vm: &ListingFormVm, name: &str, label: &str, required: bool) -> Markup {
    html! {
        label for=(name) { (label) }
        input type="text" id=(name) name=(name) value=(vm.value(name)) required[required];
    }
}

pub fn listing_form(vm: &ListingFormVm) -> Markup {
    html! {
        form class="listing-form" method="post" action=(vm.action) enctype="multipart/form-data" {
            (super::error_banner(vm.error.as_deref()))

            (text_input(vm, "titulo", "Título", true))

            label for="descricao" { "Descrição" }
            textarea id="descricao" name="descricao" rows="5" { (vm.value("descricao")) }

            div class="grid" {
                div {
                    label for="tipo_anuncio" { "Tipo de anúncio" }
                    select id="tipo_anuncio" name="tipo_anuncio" required {
                        @for t in ListingType::ALL {
                            option value=(t.as_str()) selected[vm.value("tipo_anuncio") == t.as_str()] { (t.label()) }
                        }
                    }
                }
                div {
                    label for="tipo_imovel" { "Tipo de imóvel" }
                    select id="tipo_imovel" name="tipo_imovel" required {
                        @for t in PropertyType::ALL {
                            option value=(t.as_str()) selected[vm.value("tipo_imovel") == t.as_str()] { (t.label()) }
                        }
                    }
                }
                div {
                    label for="status" { "Status" }
                    select id="status" name="status" {
                        @for s in ListingStatus::ALL {
                            option value=(s.as_str()) selected[vm.value("status") == s.as_str()] { (s.label()) }
                        }
                    }
                }
            }

            div class="grid" {
                div { (text_input(vm, "preco_venda", "Preço (R$)", true)) }
                div { (text_input(vm, "area_m2", "Área (m²)", false)) }
            }

            div class="grid" {
                div { (text_input(vm, "cidade", "Cidade", true)) }
                div { (text_input(vm, "bairro", "Bairro", false)) }
            }
            (text_input(vm, "endereco", "Endereço", false))

            div class="grid" {
                div {
                    label for="quartos" { "Quartos" }
                    input type="number" min="0" id="quartos" name="quartos" value=(vm.value("quartos"));
                }
                div {
                    label for="banheiros" { "Banheiros" }
                    input type="number" min="0" id="banheiros" name="banheiros" value=(vm.value("banheiros"));
                }
                div {
                    label for="vagas" { "Vagas" }
                    input type="number" min="0" id="vagas" name="vagas" value=(vm.value("vagas"));
                }
            }

            @if !vm.existing_photos.is_empty() {
                fieldset class="photo-grid" {
                    legend { "Fotos atuais (marque para remover)" }
                    @for (id, url) in &vm.existing_photos {
                        label class="photo-choice" {
                            img src=(url) alt="Foto do imóvel";
                            input type="checkbox" name="remover_fotos" value=(id);
                            " Remover"
                        }
                    }
                }
            }

            label for="fotos" { "Adicionar fotos" }
            input type="file" id="fotos" name="fotos" accept="image/*" multiple;

            div class="actions" {
                a href="/admin/dashboard" class="button" { "Cancelar" }
                button type="submit" class="primary" { (vm.submit_label) }
            }
        }
    }
}
