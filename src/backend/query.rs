// src/backend/query.rs
use serde_json::{json, Value};

/// A single predicate, ordering or paging clause for `list_documents`.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal(String, Vec<Value>),
    NotEqual(String, Value),
    GreaterThan(String, Value),
    GreaterThanEqual(String, Value),
    LessThan(String, Value),
    LessThanEqual(String, Value),
    Search(String, String),
    OrderAsc(String),
    OrderDesc(String),
    Limit(u64),
    Offset(u64),
}

impl Query {
    pub fn equal(attr: &str, value: impl Into<Value>) -> Self {
        Query::Equal(attr.to_string(), vec![value.into()])
    }

    pub fn greater_than_equal(attr: &str, value: impl Into<Value>) -> Self {
        Query::GreaterThanEqual(attr.to_string(), value.into())
    }

    pub fn less_than_equal(attr: &str, value: impl Into<Value>) -> Self {
        Query::LessThanEqual(attr.to_string(), value.into())
    }

    pub fn search(attr: &str, text: &str) -> Self {
        Query::Search(attr.to_string(), text.to_string())
    }

    pub fn order_asc(attr: &str) -> Self {
        Query::OrderAsc(attr.to_string())
    }

    pub fn order_desc(attr: &str) -> Self {
        Query::OrderDesc(attr.to_string())
    }

    pub fn method(&self) -> &'static str {
        match self {
            Query::Equal(..) => "equal",
            Query::NotEqual(..) => "notEqual",
            Query::GreaterThan(..) => "greaterThan",
            Query::GreaterThanEqual(..) => "greaterThanEqual",
            Query::LessThan(..) => "lessThan",
            Query::LessThanEqual(..) => "lessThanEqual",
            Query::Search(..) => "search",
            Query::OrderAsc(_) => "orderAsc",
            Query::OrderDesc(_) => "orderDesc",
            Query::Limit(_) => "limit",
            Query::Offset(_) => "offset",
        }
    }

    /// JSON form accepted in the `queries[]` parameter of the hosted API.
    pub fn to_json(&self) -> Value {
        let method = self.method();
        match self {
            Query::Equal(attr, values) => {
                json!({ "method": method, "attribute": attr, "values": values })
            }
            Query::NotEqual(attr, v)
            | Query::GreaterThan(attr, v)
            | Query::GreaterThanEqual(attr, v)
            | Query::LessThan(attr, v)
            | Query::LessThanEqual(attr, v) => {
                json!({ "method": method, "attribute": attr, "values": [v] })
            }
            Query::Search(attr, text) => {
                json!({ "method": method, "attribute": attr, "values": [text] })
            }
            Query::OrderAsc(attr) | Query::OrderDesc(attr) => {
                json!({ "method": method, "attribute": attr })
            }
            Query::Limit(n) | Query::Offset(n) => json!({ "method": method, "values": [n] }),
        }
    }

    pub fn to_query_string(&self) -> String {
        self.to_json().to_string()
    }
}
