// src/domain/search.rs
//! Search form inputs → backend query clauses.
use crate::backend::{Query, ATTR_CREATED_AT};
use crate::domain::listing::{
    parse_count, parse_price, ListingStatus, ListingType, PropertyType,
};
use std::collections::HashMap;
use url::form_urlencoded;

pub const PAGE_SIZE: u64 = 12;
/// Highest page whose offset still fits a signed 64-bit SQL integer.
pub const MAX_PAGE: u64 = i64::MAX as u64 / PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Newest, SortOrder::PriceAsc, SortOrder::PriceDesc];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Newest => "recentes",
            SortOrder::PriceAsc => "menor_preco",
            SortOrder::PriceDesc => "maior_preco",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "Mais recentes",
            SortOrder::PriceAsc => "Menor preço",
            SortOrder::PriceDesc => "Maior preço",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.as_str() == s)
    }

    fn to_query(self) -> Query {
        match self {
            SortOrder::Newest => Query::order_desc(ATTR_CREATED_AT),
            SortOrder::PriceAsc => Query::order_asc("preco_venda"),
            SortOrder::PriceDesc => Query::order_desc("preco_venda"),
        }
    }
}

/// Parsed search form. Anything left `None` does not constrain the search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub listing_type: Option<ListingType>,
    pub property_type: Option<PropertyType>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub text: Option<String>,
    pub order: SortOrder,
    pub page: u64,
    /// Inputs that were ignored or adjusted, shown to the visitor.
    pub warnings: Vec<String>,
}

fn non_blank<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// A price written back the way `parse_price` reads it: decimals after a
/// comma, so `100,123` is not mistaken for a thousands group.
fn price_param(p: f64) -> String {
    p.to_string().replace('.', ",")
}

impl SearchFilters {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let mut f = SearchFilters {
            page: 1,
            ..Default::default()
        };

        if let Some(v) = non_blank(params, "tipo_anuncio") {
            f.listing_type = ListingType::parse(v);
            if f.listing_type.is_none() {
                f.warnings.push(format!("Tipo de anúncio desconhecido: {v}"));
            }
        }
        if let Some(v) = non_blank(params, "tipo_imovel") {
            f.property_type = PropertyType::parse(v);
            if f.property_type.is_none() {
                f.warnings.push(format!("Tipo de imóvel desconhecido: {v}"));
            }
        }

        f.city = non_blank(params, "cidade").map(str::to_string);
        f.neighborhood = non_blank(params, "bairro").map(str::to_string);
        f.text = non_blank(params, "texto_busca").map(str::to_string);

        f.min_bedrooms = f.count(params, "quartos_min", "Quartos");
        f.min_bathrooms = f.count(params, "banheiros_min", "Banheiros");
        f.min_price = f.price(params, "preco_min", "Preço mínimo");
        f.max_price = f.price(params, "preco_max", "Preço máximo");

        if let (Some(min), Some(max)) = (f.min_price, f.max_price) {
            if min > max {
                f.min_price = Some(max);
                f.max_price = Some(min);
                f.warnings
                    .push("Preço mínimo maior que o máximo; os valores foram invertidos".into());
            }
        }

        if let Some(v) = non_blank(params, "ordem") {
            match SortOrder::parse(v) {
                Some(order) => f.order = order,
                None => f.warnings.push(format!("Ordenação desconhecida: {v}")),
            }
        }
        if let Some(v) = non_blank(params, "pagina") {
            match v.parse::<u64>() {
                Ok(p) if (1..=MAX_PAGE).contains(&p) => f.page = p,
                Ok(p) if p > MAX_PAGE => {
                    f.page = MAX_PAGE;
                    f.warnings
                        .push(format!("Página {v} fora do limite; mostrando a página {MAX_PAGE}"));
                }
                _ => f.warnings.push(format!("Página inválida \"{v}\" ignorada")),
            }
        }

        f
    }

    fn count(&mut self, params: &HashMap<String, String>, key: &str, label: &str) -> Option<u32> {
        let raw = non_blank(params, key)?;
        let parsed = parse_count(raw);
        if parsed.is_none() {
            self.warnings.push(format!("{label}: valor inválido \"{raw}\" ignorado"));
        }
        parsed
    }

    fn price(&mut self, params: &HashMap<String, String>, key: &str, label: &str) -> Option<f64> {
        let raw = non_blank(params, key)?;
        let parsed = parse_price(raw);
        if parsed.is_none() {
            self.warnings.push(format!("{label}: valor inválido \"{raw}\" ignorado"));
        }
        parsed
    }

    /// Predicates, ordering and paging for the listings collection.
    /// Only available listings are ever returned to visitors.
    pub fn to_queries(&self) -> Vec<Query> {
        let mut q = vec![Query::equal("status", ListingStatus::Disponivel.as_str())];

        if let Some(t) = self.listing_type {
            q.push(Query::equal("tipo_anuncio", t.as_str()));
        }
        if let Some(t) = self.property_type {
            q.push(Query::equal("tipo_imovel", t.as_str()));
        }
        if let Some(city) = &self.city {
            q.push(Query::equal("cidade", city.as_str()));
        }
        if let Some(n) = &self.neighborhood {
            q.push(Query::equal("bairro", n.as_str()));
        }
        if let Some(n) = self.min_bedrooms {
            q.push(Query::greater_than_equal("quartos", n));
        }
        if let Some(n) = self.min_bathrooms {
            q.push(Query::greater_than_equal("banheiros", n));
        }
        if let Some(p) = self.min_price {
            q.push(Query::greater_than_equal("preco_venda", p));
        }
        if let Some(p) = self.max_price {
            q.push(Query::less_than_equal("preco_venda", p));
        }
        if let Some(text) = &self.text {
            q.push(Query::search("titulo", text));
        }

        q.push(self.order.to_query());
        q.push(Query::Limit(PAGE_SIZE));
        q.push(Query::Offset(
            (self.page.clamp(1, MAX_PAGE) - 1).saturating_mul(PAGE_SIZE),
        ));
        q
    }

    /// Query string reproducing these filters at another page.
    pub fn to_query_string(&self, page: u64) -> String {
        let mut s = form_urlencoded::Serializer::new(String::new());
        if let Some(t) = self.listing_type {
            s.append_pair("tipo_anuncio", t.as_str());
        }
        if let Some(t) = self.property_type {
            s.append_pair("tipo_imovel", t.as_str());
        }
        if let Some(v) = &self.city {
            s.append_pair("cidade", v);
        }
        if let Some(v) = &self.neighborhood {
            s.append_pair("bairro", v);
        }
        if let Some(n) = self.min_bedrooms {
            s.append_pair("quartos_min", &n.to_string());
        }
        if let Some(n) = self.min_bathrooms {
            s.append_pair("banheiros_min", &n.to_string());
        }
        if let Some(p) = self.min_price {
            s.append_pair("preco_min", &price_param(p));
        }
        if let Some(p) = self.max_price {
            s.append_pair("preco_max", &price_param(p));
        }
        if let Some(v) = &self.text {
            s.append_pair("texto_busca", v);
        }
        if self.order != SortOrder::Newest {
            s.append_pair("ordem", self.order.as_str());
        }
        if page > 1 {
            s.append_pair("pagina", &page.to_string());
        }
        s.finish()
    }

    pub fn total_pages(total: u64) -> u64 {
        total.div_ceil(PAGE_SIZE).max(1)
    }
}
