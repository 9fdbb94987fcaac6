// src/requests/form.rs
use astra::Request;
use std::collections::HashMap;
use url::form_urlencoded;

/// Decoded name/value pairs in arrival order. Repeated names are kept.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// First value for `name`, trimmed. Blank values count as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Last value wins, which is what a single-valued form input means.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.pairs.iter().cloned().collect()
    }
}

pub fn parse_urlencoded(bytes: &[u8]) -> FormFields {
    FormFields::from_pairs(
        form_urlencoded::parse(bytes)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
    )
}

pub fn parse_form_body(body: &[u8]) -> FormFields {
    parse_urlencoded(body)
}

pub fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| parse_urlencoded(q.as_bytes()).to_map())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plus_and_percent_sequences() {
        let f = parse_urlencoded(b"cidade=S%C3%A3o+Paulo&texto_busca=casa%20nova");
        assert_eq!(f.get("cidade"), Some("São Paulo"));
        assert_eq!(f.get("texto_busca"), Some("casa nova"));
    }

    #[test]
    fn blank_values_are_absent_and_repeats_are_kept() {
        let f = parse_urlencoded(b"a=&b=+&remove=1&remove=2");
        assert_eq!(f.get("a"), None);
        assert_eq!(f.get("b"), None);
        assert_eq!(f.get_all("remove"), vec!["1", "2"]);
    }
}
