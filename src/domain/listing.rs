// src/domain/listing.rs
use crate::backend::{BackendError, Document};
use crate::errors::ServerError;
use crate::requests::FormFields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Venda,
    Aluguel,
}

impl ListingType {
    pub const ALL: [ListingType; 2] = [ListingType::Venda, ListingType::Aluguel];

    pub fn as_str(self) -> &'static str {
        match self {
            ListingType::Venda => "venda",
            ListingType::Aluguel => "aluguel",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListingType::Venda => "Venda",
            ListingType::Aluguel => "Aluguel",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartamento,
    Casa,
    Terreno,
    Comercial,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Apartamento,
        PropertyType::Casa,
        PropertyType::Terreno,
        PropertyType::Comercial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Apartamento => "apartamento",
            PropertyType::Casa => "casa",
            PropertyType::Terreno => "terreno",
            PropertyType::Comercial => "comercial",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PropertyType::Apartamento => "Apartamento",
            PropertyType::Casa => "Casa",
            PropertyType::Terreno => "Terreno",
            PropertyType::Comercial => "Comercial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Disponivel,
    Vendido,
    Alugado,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [
        ListingStatus::Disponivel,
        ListingStatus::Vendido,
        ListingStatus::Alugado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Disponivel => "disponivel",
            ListingStatus::Vendido => "vendido",
            ListingStatus::Alugado => "alugado",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListingStatus::Disponivel => "Disponível",
            ListingStatus::Vendido => "Vendido",
            ListingStatus::Alugado => "Alugado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// A property listing as stored in the `imoveis` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    #[serde(skip)]
    pub id: String,
    #[serde(skip)]
    pub created_at: String,

    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "tipo_anuncio")]
    pub listing_type: ListingType,
    #[serde(rename = "tipo_imovel")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(rename = "preco_venda")]
    pub sale_price: f64,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "bairro", default)]
    pub neighborhood: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    #[serde(rename = "quartos", default)]
    pub bedrooms: u32,
    #[serde(rename = "banheiros", default)]
    pub bathrooms: u32,
    #[serde(rename = "vagas", default)]
    pub parking_spaces: Option<u32>,
    #[serde(rename = "area_m2", default)]
    pub area_m2: Option<f64>,
    #[serde(rename = "fotos_storage_ids", default)]
    pub photo_ids: Vec<String>,
}

impl Listing {
    pub fn from_document(doc: Document) -> Result<Self, BackendError> {
        let mut listing: Listing = serde_json::from_value(Value::Object(doc.data))
            .map_err(|e| BackendError::Decode(format!("listing {}: {e}", doc.id)))?;
        listing.id = doc.id;
        listing.created_at = doc.created_at;
        Ok(listing)
    }

    pub fn price_label(&self) -> String {
        let price = format_brl(self.sale_price);
        match self.listing_type {
            ListingType::Aluguel => format!("{price}/mês"),
            ListingType::Venda => price,
        }
    }

    /// "Bairro, Cidade" or just the city.
    pub fn location_label(&self) -> String {
        match self.neighborhood.as_deref() {
            Some(n) if !n.is_empty() => format!("{n}, {}", self.city),
            _ => self.city.clone(),
        }
    }

    pub fn cover_photo(&self) -> Option<&str> {
        self.photo_ids.first().map(String::as_str)
    }
}

/// Admin form input for creating or editing a listing, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub description: Option<String>,
    pub listing_type: ListingType,
    pub property_type: PropertyType,
    pub status: ListingStatus,
    pub sale_price: f64,
    pub city: String,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking_spaces: Option<u32>,
    pub area_m2: Option<f64>,
}

fn bad(msg: &str) -> ServerError {
    ServerError::BadRequest(msg.to_string())
}

fn optional_count(fields: &FormFields, name: &str, label: &str) -> Result<Option<u32>, ServerError> {
    fields
        .get(name)
        .map(|v| parse_count(v).ok_or_else(|| bad(&format!("{label} deve ser um número inteiro"))))
        .transpose()
}

impl ListingDraft {
    pub fn from_fields(fields: &FormFields) -> Result<Self, ServerError> {
        let title = fields.get("titulo").ok_or_else(|| bad("Informe o título"))?;
        let city = fields.get("cidade").ok_or_else(|| bad("Informe a cidade"))?;

        let listing_type = fields
            .get("tipo_anuncio")
            .and_then(ListingType::parse)
            .ok_or_else(|| bad("Tipo de anúncio inválido"))?;
        let property_type = fields
            .get("tipo_imovel")
            .and_then(PropertyType::parse)
            .ok_or_else(|| bad("Tipo de imóvel inválido"))?;
        let status = match fields.get("status") {
            Some(s) => ListingStatus::parse(s).ok_or_else(|| bad("Status inválido"))?,
            None => ListingStatus::default(),
        };

        let sale_price = fields
            .get("preco_venda")
            .ok_or_else(|| bad("Informe o preço"))
            .and_then(|p| parse_price(p).ok_or_else(|| bad("Preço inválido")))?;

        let area_m2 = fields
            .get("area_m2")
            .map(|v| parse_price(v).ok_or_else(|| bad("Área inválida")))
            .transpose()?;

        Ok(Self {
            title: title.to_string(),
            description: fields.get("descricao").map(str::to_string),
            listing_type,
            property_type,
            status,
            sale_price,
            city: city.to_string(),
            neighborhood: fields.get("bairro").map(str::to_string),
            address: fields.get("endereco").map(str::to_string),
            bedrooms: optional_count(fields, "quartos", "Quartos")?.unwrap_or(0),
            bathrooms: optional_count(fields, "banheiros", "Banheiros")?.unwrap_or(0),
            parking_spaces: optional_count(fields, "vagas", "Vagas")?,
            area_m2,
        })
    }

    /// Document attributes for this draft with the given photo ids.
    pub fn into_data(self, photo_ids: Vec<String>) -> Map<String, Value> {
        let listing = Listing {
            id: String::new(),
            created_at: String::new(),
            title: self.title,
            description: self.description,
            listing_type: self.listing_type,
            property_type: self.property_type,
            status: self.status,
            sale_price: self.sale_price,
            city: self.city,
            neighborhood: self.neighborhood,
            address: self.address,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            parking_spaces: self.parking_spaces,
            area_m2: self.area_m2,
            photo_ids,
        };

        match serde_json::to_value(listing) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Form values to prefill the edit form with.
pub fn form_values(listing: &Listing) -> HashMap<String, String> {
    let mut v = HashMap::new();
    v.insert("titulo".into(), listing.title.clone());
    v.insert("descricao".into(), listing.description.clone().unwrap_or_default());
    v.insert("tipo_anuncio".into(), listing.listing_type.as_str().into());
    v.insert("tipo_imovel".into(), listing.property_type.as_str().into());
    v.insert("status".into(), listing.status.as_str().into());
    v.insert("preco_venda".into(), format_plain(listing.sale_price));
    v.insert("cidade".into(), listing.city.clone());
    v.insert("bairro".into(), listing.neighborhood.clone().unwrap_or_default());
    v.insert("endereco".into(), listing.address.clone().unwrap_or_default());
    v.insert("quartos".into(), listing.bedrooms.to_string());
    v.insert("banheiros".into(), listing.bathrooms.to_string());
    v.insert(
        "vagas".into(),
        listing.parking_spaces.map(|n| n.to_string()).unwrap_or_default(),
    );
    v.insert(
        "area_m2".into(),
        listing.area_m2.map(format_plain).unwrap_or_default(),
    );
    v
}

fn format_plain(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
    }
}

fn is_thousands_grouped(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    parts.len() > 1
        && (1..=3).contains(&parts[0].len())
        && parts[1..].iter().all(|p| p.len() == 3)
        && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
}

/// Parse a non-negative amount typed in Brazilian or plain notation:
/// `250000`, `250.000`, `250.000,50`, `R$ 1.200`, `99.5`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let s: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if s.is_empty() {
        return None;
    }

    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else if is_thousands_grouped(&s) {
        s.replace('.', "")
    } else {
        s
    };

    let v: f64 = normalized.parse().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}

pub fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

/// `R$ 1.250.000` / `R$ 1.250,50`.
pub fn format_brl(value: f64) -> String {
    let cents_total = (value * 100.0).round() as i64;
    let whole = (cents_total / 100).unsigned_abs();
    let cents = (cents_total % 100).unsigned_abs();

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if cents_total < 0 { "-" } else { "" };
    if cents == 0 {
        format!("{sign}R$ {grouped}")
    } else {
        format!("{sign}R$ {grouped},{cents:02}")
    }
}
