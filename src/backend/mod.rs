// src/backend/mod.rs
//! The hosted backend seam: accounts, documents and file storage.
//!
//! Everything the site persists goes through [`Backend`]. The production
//! implementation talks to the hosted REST API; the local one keeps the same
//! contract in a sqlite file so the site can run (and be tested) offline.

pub mod appwrite;
pub mod local;
pub mod query;

use rand::Rng;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;

pub use appwrite::{AppwriteBackend, AppwriteConfig};
pub use local::LocalBackend;
pub use query::Query;

/// Attribute names the backend manages itself.
pub const ATTR_ID: &str = "$id";
pub const ATTR_CREATED_AT: &str = "$createdAt";
pub const ATTR_UPDATED_AT: &str = "$updatedAt";

/// Default page size applied by the hosted API when no limit is given.
pub const DEFAULT_LIST_LIMIT: u64 = 25;

#[derive(Debug)]
pub enum BackendError {
    Unauthorized,
    NotFound,
    Conflict(String),
    Api { status: u16, message: String },
    Network(String),
    Decode(String),
    Storage(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unauthorized => write!(f, "unauthorized"),
            BackendError::NotFound => write!(f, "not found"),
            BackendError::Conflict(msg) => write!(f, "conflict: {msg}"),
            BackendError::Api { status, message } => write!(f, "api error {status}: {message}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Decode(msg) => write!(f, "decode error: {msg}"),
            BackendError::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl Error for BackendError {}

/// A backend login session. `secret` authenticates subsequent calls.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub secret: String,
    pub expires_at: String,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// A stored document. System attributes are lifted out of `data`.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub data: Map<String, Value>,
}

impl Document {
    /// Build from a raw JSON object as returned by the hosted API.
    pub fn from_raw(mut raw: Map<String, Value>) -> Result<Self, BackendError> {
        let id = take_string(&mut raw, ATTR_ID)
            .ok_or_else(|| BackendError::Decode("document without $id".into()))?;
        let created_at = take_string(&mut raw, ATTR_CREATED_AT).unwrap_or_default();
        let updated_at = take_string(&mut raw, ATTR_UPDATED_AT).unwrap_or_default();

        raw.retain(|k, _| !k.starts_with('$'));

        Ok(Self {
            id,
            created_at,
            updated_at,
            data: raw,
        })
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Document>,
}

/// File bytes going into (or coming out of) a storage bucket.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: String,
    pub bucket_id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

/// Operations the site needs from the hosted backend.
///
/// Reads are public. Writes carry the caller's session secret so the
/// backend applies its own permission checks.
pub trait Backend: Send + Sync {
    fn create_email_session(&self, email: &str, password: &str) -> Result<Session, BackendError>;
    fn get_account(&self, secret: &str) -> Result<Account, BackendError>;
    fn delete_session(&self, secret: &str) -> Result<(), BackendError>;

    fn list_documents(&self, collection: &str, queries: &[Query])
        -> Result<DocumentList, BackendError>;
    fn get_document(&self, collection: &str, id: &str) -> Result<Document, BackendError>;
    fn create_document(
        &self,
        secret: &str,
        collection: &str,
        data: &Map<String, Value>,
    ) -> Result<Document, BackendError>;
    fn update_document(
        &self,
        secret: &str,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
    ) -> Result<Document, BackendError>;
    fn delete_document(&self, secret: &str, collection: &str, id: &str)
        -> Result<(), BackendError>;

    fn create_file(&self, secret: &str, bucket: &str, upload: Upload)
        -> Result<StoredFile, BackendError>;
    fn delete_file(&self, secret: &str, bucket: &str, id: &str) -> Result<(), BackendError>;
    fn file_preview_url(&self, bucket: &str, id: &str, width: u32, height: u32) -> String;
    fn file_contents(&self, bucket: &str, id: &str) -> Result<Upload, BackendError>;
}

/// 20 lowercase hex chars, the same shape as ids minted by the hosted API.
pub fn unique_id() -> String {
    let mut rng = rand::thread_rng();
    (0..20)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect()
}
