// src/backend/appwrite.rs
use crate::backend::{
    Account, Backend, BackendError, Document, DocumentList, Query, Session, StoredFile, Upload,
};
use log::debug;
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::SET_COOKIE;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("house_finder/", env!("CARGO_PKG_VERSION"));

/// Id the hosted API replaces with a freshly generated one.
const UNIQUE: &str = "unique()";

#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    /// Example: "https://cloud.appwrite.io/v1"
    pub endpoint: String,
    pub project_id: String,
    /// Only sent when creating sessions, so the response carries the secret.
    pub api_key: Option<String>,
    pub database_id: String,
}

pub struct AppwriteBackend {
    cfg: AppwriteConfig,
    client: Client,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct SessionBody {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(default)]
    secret: String,
    #[serde(default)]
    expire: String,
}

#[derive(Deserialize)]
struct AccountBody {
    #[serde(rename = "$id")]
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct DocumentListBody {
    total: u64,
    documents: Vec<Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileBody {
    #[serde(rename = "$id")]
    id: String,
    bucket_id: String,
    name: String,
    mime_type: String,
    #[serde(default)]
    size_original: u64,
}

impl AppwriteBackend {
    pub fn new(cfg: AppwriteConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self { cfg, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.cfg.endpoint.trim_end_matches('/'), path)
    }

    fn documents_path(&self, collection: &str) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            segment(&self.cfg.database_id),
            segment(collection)
        )
    }

    fn files_path(&self, bucket: &str) -> String {
        format!("/storage/buckets/{}/files", segment(bucket))
    }

    fn request(&self, method: Method, path: &str, secret: Option<&str>) -> RequestBuilder {
        let mut rb = self
            .client
            .request(method, self.url(path))
            .header("X-Appwrite-Project", &self.cfg.project_id);
        if let Some(secret) = secret {
            rb = rb.header("X-Appwrite-Session", secret);
        }
        rb
    }

    fn send(&self, rb: RequestBuilder) -> Result<Response, BackendError> {
        let resp = rb
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().unwrap_or_default();
        Err(error_from_response(status.as_u16(), &body))
    }

    fn send_json<T: for<'de> Deserialize<'de>>(&self, rb: RequestBuilder) -> Result<T, BackendError> {
        self.send(rb)?
            .json::<T>()
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

/// Map a non-2xx response onto the error variants the site reacts to.
fn error_from_response(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        401 => BackendError::Unauthorized,
        404 => BackendError::NotFound,
        409 => BackendError::Conflict(message),
        _ => BackendError::Api { status, message },
    }
}

/// Recover the session secret from `Set-Cookie` when the body leaves it blank.
fn secret_from_cookies<'a, I>(project_id: &str, cookies: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted = format!("a_session_{}", project_id.to_lowercase());
    cookies.into_iter().find_map(|cookie| {
        let pair = cookie.split(';').next()?;
        let (name, value) = pair.split_once('=')?;
        if name.trim().to_lowercase() == wanted && !value.trim().is_empty() {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

fn segment(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

fn listing_permissions() -> Value {
    json!(["read(\"any\")", "update(\"users\")", "delete(\"users\")"])
}

impl Backend for AppwriteBackend {
    fn create_email_session(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let mut rb = self
            .request(Method::POST, "/account/sessions/email", None)
            .json(&json!({ "email": email, "password": password }));
        if let Some(key) = &self.cfg.api_key {
            rb = rb.header("X-Appwrite-Key", key);
        }

        let resp = self.send(rb)?;
        let cookies: Vec<String> = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();

        let body: SessionBody = resp
            .json()
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        let secret = if body.secret.is_empty() {
            secret_from_cookies(&self.cfg.project_id, cookies.iter().map(String::as_str))
                .ok_or_else(|| BackendError::Decode("session response without secret".into()))?
        } else {
            body.secret
        };

        Ok(Session {
            id: body.id,
            user_id: body.user_id,
            secret,
            expires_at: body.expire,
        })
    }

    fn get_account(&self, secret: &str) -> Result<Account, BackendError> {
        let body: AccountBody = self.send_json(self.request(Method::GET, "/account", Some(secret)))?;
        Ok(Account {
            id: body.id,
            email: body.email,
            name: body.name,
        })
    }

    fn delete_session(&self, secret: &str) -> Result<(), BackendError> {
        self.send(self.request(Method::DELETE, "/account/sessions/current", Some(secret)))?;
        Ok(())
    }

    fn list_documents(
        &self,
        collection: &str,
        queries: &[Query],
    ) -> Result<DocumentList, BackendError> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_query_string()))
            .collect();
        debug!("list {collection} with {} queries", params.len());

        let body: DocumentListBody = self.send_json(
            self.request(Method::GET, &self.documents_path(collection), None)
                .query(&params),
        )?;

        let documents = body
            .documents
            .into_iter()
            .map(Document::from_raw)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DocumentList {
            total: body.total,
            documents,
        })
    }

    fn get_document(&self, collection: &str, id: &str) -> Result<Document, BackendError> {
        let path = format!("{}/{}", self.documents_path(collection), segment(id));
        let raw: Map<String, Value> = self.send_json(self.request(Method::GET, &path, None))?;
        Document::from_raw(raw)
    }

    fn create_document(
        &self,
        secret: &str,
        collection: &str,
        data: &Map<String, Value>,
    ) -> Result<Document, BackendError> {
        let body = json!({
            "documentId": UNIQUE,
            "data": data,
            "permissions": listing_permissions(),
        });
        let raw: Map<String, Value> = self.send_json(
            self.request(Method::POST, &self.documents_path(collection), Some(secret))
                .json(&body),
        )?;
        Document::from_raw(raw)
    }

    fn update_document(
        &self,
        secret: &str,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
    ) -> Result<Document, BackendError> {
        let path = format!("{}/{}", self.documents_path(collection), segment(id));
        let raw: Map<String, Value> = self.send_json(
            self.request(Method::PATCH, &path, Some(secret))
                .json(&json!({ "data": data })),
        )?;
        Document::from_raw(raw)
    }

    fn delete_document(&self, secret: &str, collection: &str, id: &str) -> Result<(), BackendError> {
        let path = format!("{}/{}", self.documents_path(collection), segment(id));
        self.send(self.request(Method::DELETE, &path, Some(secret)))?;
        Ok(())
    }

    fn create_file(
        &self,
        secret: &str,
        bucket: &str,
        upload: Upload,
    ) -> Result<StoredFile, BackendError> {
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.name)
            .mime_str(&upload.mime_type)
            .map_err(|e| BackendError::Storage(e.to_string()))?;
        let form = multipart::Form::new()
            .text("fileId", UNIQUE)
            .text("permissions[]", "read(\"any\")")
            .part("file", part);

        let body: FileBody = self.send_json(
            self.request(Method::POST, &self.files_path(bucket), Some(secret))
                .multipart(form),
        )?;

        Ok(StoredFile {
            id: body.id,
            bucket_id: body.bucket_id,
            name: body.name,
            mime_type: body.mime_type,
            size: body.size_original,
        })
    }

    fn delete_file(&self, secret: &str, bucket: &str, id: &str) -> Result<(), BackendError> {
        let path = format!("{}/{}", self.files_path(bucket), segment(id));
        self.send(self.request(Method::DELETE, &path, Some(secret)))?;
        Ok(())
    }

    fn file_preview_url(&self, bucket: &str, id: &str, width: u32, height: u32) -> String {
        let raw = self.url(&format!("{}/{}/preview", self.files_path(bucket), segment(id)));
        match Url::parse(&raw) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("width", &width.to_string())
                    .append_pair("height", &height.to_string())
                    .append_pair("project", &self.cfg.project_id);
                url.into()
            }
            Err(_) => raw,
        }
    }

    fn file_contents(&self, bucket: &str, id: &str) -> Result<Upload, BackendError> {
        let path = format!("{}/{}/view", self.files_path(bucket), segment(id));
        let resp = self.send(self.request(Method::GET, &path, None))?;
        let mime_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = resp
            .bytes()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Upload {
            name: id.to_string(),
            mime_type,
            bytes: bytes.to_vec(),
        })
    }
}
