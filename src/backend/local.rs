// src/backend/local.rs
//! sqlite stand-in for the hosted backend.
//!
//! Same contract as the REST client: documents are JSON objects filtered with
//! `json_extract`, files are BLOBs, accounts use salted password hashes and
//! sessions are bearer secrets stored hashed.
use crate::auth::token::{
    generate_salt, generate_token_default, hash_password, hash_token, verify_password,
};
use crate::backend::{
    unique_id, Account, Backend, BackendError, Document, DocumentList, Query, Session, StoredFile,
    Upload, ATTR_CREATED_AT, ATTR_ID, ATTR_UPDATED_AT, DEFAULT_LIST_LIMIT,
};
use crate::db::connection::{init_db, Database};
use crate::errors::ServerError;
use chrono::{SecondsFormat, TimeZone, Utc};
use log::info;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::{Map, Value};

pub const LOCAL_BACKEND_SCHEMA: &str = include_str!("../../sql/local_backend.sql");

/// Sessions on the hosted service last a year unless deleted.
const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 365;

pub struct LocalBackend {
    db: Database,
}

fn sql_err(e: rusqlite::Error) -> BackendError {
    BackendError::Storage(e.to_string())
}

fn invalid_query(msg: impl Into<String>) -> BackendError {
    BackendError::Api {
        status: 400,
        message: format!("Invalid query: {}", msg.into()),
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, false)
}

fn iso_from_unix(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, false))
        .unwrap_or_default()
}

/// SQL expression for a document attribute.
fn column_for(attr: &str) -> Result<String, BackendError> {
    match attr {
        ATTR_ID => Ok("id".to_string()),
        ATTR_CREATED_AT => Ok("created_at".to_string()),
        ATTR_UPDATED_AT => Ok("updated_at".to_string()),
        _ if !attr.is_empty()
            && attr.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            Ok(format!("json_extract(data, '$.{attr}')"))
        }
        _ => Err(invalid_query(format!("Attribute not found in schema: {attr}"))),
    }
}

fn sql_value(v: &Value) -> SqlValue {
    match v {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// WHERE / ORDER BY / LIMIT derived from a list of queries.
#[derive(Debug)]
struct SqlPlan {
    filters: Vec<String>,
    params: Vec<SqlValue>,
    order: Vec<String>,
    limit: u64,
    offset: u64,
}

impl SqlPlan {
    fn build(collection: &str, queries: &[Query]) -> Result<Self, BackendError> {
        let mut plan = SqlPlan {
            filters: vec!["collection = ?".to_string()],
            params: vec![SqlValue::Text(collection.to_string())],
            order: Vec::new(),
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        };

        for q in queries {
            match q {
                Query::Equal(attr, values) => {
                    if values.is_empty() {
                        return Err(invalid_query("equal requires at least one value"));
                    }
                    let placeholders = vec!["?"; values.len()].join(", ");
                    plan.filters
                        .push(format!("{} in ({placeholders})", column_for(attr)?));
                    plan.params.extend(values.iter().map(sql_value));
                }
                Query::NotEqual(attr, v) => plan.compare(attr, "!=", v)?,
                Query::GreaterThan(attr, v) => plan.compare(attr, ">", v)?,
                Query::GreaterThanEqual(attr, v) => plan.compare(attr, ">=", v)?,
                Query::LessThan(attr, v) => plan.compare(attr, "<", v)?,
                Query::LessThanEqual(attr, v) => plan.compare(attr, "<=", v)?,
                Query::Search(attr, text) => {
                    plan.filters.push(format!(
                        "instr(lower(coalesce({}, '')), lower(?)) > 0",
                        column_for(attr)?
                    ));
                    plan.params.push(SqlValue::Text(text.trim().to_string()));
                }
                Query::OrderAsc(attr) => plan.order.push(format!("{} asc", column_for(attr)?)),
                Query::OrderDesc(attr) => plan.order.push(format!("{} desc", column_for(attr)?)),
                Query::Limit(n) => plan.limit = *n,
                Query::Offset(n) => plan.offset = *n,
            }
        }

        // Ties follow insertion order in the direction of the primary sort.
        let tiebreak = match plan.order.first() {
            Some(o) if o.ends_with(" desc") => "rowid desc",
            _ => "rowid asc",
        };
        plan.order.push(tiebreak.to_string());

        Ok(plan)
    }

    fn compare(&mut self, attr: &str, op: &str, v: &Value) -> Result<(), BackendError> {
        self.filters.push(format!("{} {op} ?", column_for(attr)?));
        self.params.push(sql_value(v));
        Ok(())
    }

    fn where_clause(&self) -> String {
        self.filters.join(" and ")
    }
}

fn row_to_document(
    id: String,
    data: String,
    created_at: String,
    updated_at: String,
) -> Result<Document, BackendError> {
    let data: Map<String, Value> =
        serde_json::from_str(&data).map_err(|e| BackendError::Decode(e.to_string()))?;
    Ok(Document {
        id,
        created_at,
        updated_at,
        data,
    })
}

fn load_document(
    conn: &Connection,
    collection: &str,
    id: &str,
) -> Result<Option<Document>, BackendError> {
    let row = conn
        .query_row(
            "select id, data, created_at, updated_at from documents where collection = ? and id = ?",
            params![collection, id],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            },
        )
        .optional()
        .map_err(sql_err)?;

    row.map(|(id, data, c, u)| row_to_document(id, data, c, u))
        .transpose()
}

/// Account id behind a session secret, if the session is live.
fn authorize(conn: &Connection, secret: &str, now: i64) -> Result<String, BackendError> {
    let hash = hash_token(secret);
    conn.query_row(
        r#"
        select account_id
        from account_sessions
        where secret_hash = ?
          and expires_at > ?
          and deleted_at is null
        "#,
        params![hash.as_slice(), now],
        |r| r.get::<_, String>(0),
    )
    .optional()
    .map_err(sql_err)?
    .ok_or(BackendError::Unauthorized)
}

impl LocalBackend {
    /// Open (and create if needed) the backend database at `path`.
    pub fn open(path: impl Into<String>) -> Result<Self, ServerError> {
        let db = Database::new(path);
        init_db(&db, LOCAL_BACKEND_SCHEMA)?;
        Ok(Self { db })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, BackendError>
    where
        F: FnOnce(&mut Connection) -> Result<T, BackendError>,
    {
        self.db
            .with_conn(|conn| Ok(f(conn)))
            .map_err(|e| BackendError::Storage(e.to_string()))?
    }

    /// Create the account, or reset its password when it already exists.
    pub fn seed_account(&self, email: &str, password: &str) -> Result<String, BackendError> {
        let email = email.trim().to_lowercase();
        let salt = generate_salt();
        let hash = hash_password(&salt, password);

        let id = self.with_conn(|conn| {
            conn.execute(
                r#"
                insert into accounts (id, email, name, password_salt, password_hash, created_at)
                values (?, ?, '', ?, ?, ?)
                on conflict(email) do update set
                    password_salt = excluded.password_salt,
                    password_hash = excluded.password_hash
                "#,
                params![unique_id(), email, salt.as_slice(), hash.as_slice(), now_iso()],
            )
            .map_err(sql_err)?;

            conn.query_row(
                "select id from accounts where email = ?",
                params![email],
                |r| r.get::<_, String>(0),
            )
            .map_err(sql_err)
        })?;

        info!("local backend account ready for {email}");
        Ok(id)
    }
}

impl Backend for LocalBackend {
    fn create_email_session(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let email = email.trim().to_lowercase();
        let now = Utc::now().timestamp();

        self.with_conn(|conn| {
            let account = conn
                .query_row(
                    "select id, password_salt, password_hash from accounts where email = ?",
                    params![email],
                    |r| {
                        Ok((
                            r.get::<_, String>(0)?,
                            r.get::<_, Vec<u8>>(1)?,
                            r.get::<_, Vec<u8>>(2)?,
                        ))
                    },
                )
                .optional()
                .map_err(sql_err)?;

            let Some((account_id, salt, hash)) = account else {
                return Err(BackendError::Unauthorized);
            };
            if !verify_password(&salt, password, &hash) {
                return Err(BackendError::Unauthorized);
            }

            let id = unique_id();
            let secret = generate_token_default();
            let expires_at = now + SESSION_TTL_SECS;

            conn.execute(
                r#"
                insert into account_sessions (id, account_id, secret_hash, created_at, expires_at)
                values (?, ?, ?, ?, ?)
                "#,
                params![id, account_id, hash_token(&secret).as_slice(), now, expires_at],
            )
            .map_err(sql_err)?;

            Ok(Session {
                id,
                user_id: account_id,
                secret,
                expires_at: iso_from_unix(expires_at),
            })
        })
    }

    fn get_account(&self, secret: &str) -> Result<Account, BackendError> {
        let now = Utc::now().timestamp();
        self.with_conn(|conn| {
            let account_id = authorize(conn, secret, now)?;
            conn.query_row(
                "select id, email, name from accounts where id = ?",
                params![account_id],
                |r| {
                    Ok(Account {
                        id: r.get(0)?,
                        email: r.get(1)?,
                        name: r.get(2)?,
                    })
                },
            )
            .map_err(sql_err)
        })
    }

    fn delete_session(&self, secret: &str) -> Result<(), BackendError> {
        let now = Utc::now().timestamp();
        self.with_conn(|conn| {
            let changed = conn
                .execute(
                    r#"
                    update account_sessions
                    set deleted_at = ?
                    where secret_hash = ? and deleted_at is null and expires_at > ?
                    "#,
                    params![now, hash_token(secret).as_slice(), now],
                )
                .map_err(sql_err)?;
            if changed == 0 {
                return Err(BackendError::Unauthorized);
            }
            Ok(())
        })
    }

    fn list_documents(
        &self,
        collection: &str,
        queries: &[Query],
    ) -> Result<DocumentList, BackendError> {
        let plan = SqlPlan::build(collection, queries)?;

        self.with_conn(|conn| {
            let count_sql = format!(
                "select count(*) from documents where {}",
                plan.where_clause()
            );
            let total: i64 = conn
                .query_row(&count_sql, params_from_iter(plan.params.iter()), |r| r.get(0))
                .map_err(sql_err)?;

            let page_sql = format!(
                "select id, data, created_at, updated_at from documents where {} order by {} limit {} offset {}",
                plan.where_clause(),
                plan.order.join(", "),
                plan.limit,
                plan.offset
            );
            let mut stmt = conn.prepare(&page_sql).map_err(sql_err)?;
            let rows = stmt
                .query_map(params_from_iter(plan.params.iter()), |r| {
                    Ok((
                        r.get::<_, String>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, String>(3)?,
                    ))
                })
                .map_err(sql_err)?;

            let mut documents = Vec::new();
            for row in rows {
                let (id, data, c, u) = row.map_err(sql_err)?;
                documents.push(row_to_document(id, data, c, u)?);
            }

            Ok(DocumentList {
                total: total.max(0) as u64,
                documents,
            })
        })
    }

    fn get_document(&self, collection: &str, id: &str) -> Result<Document, BackendError> {
        self.with_conn(|conn| load_document(conn, collection, id)?.ok_or(BackendError::NotFound))
    }

    fn create_document(
        &self,
        secret: &str,
        collection: &str,
        data: &Map<String, Value>,
    ) -> Result<Document, BackendError> {
        let now = Utc::now().timestamp();
        let json = Value::Object(data.clone()).to_string();

        self.with_conn(|conn| {
            authorize(conn, secret, now)?;

            let id = unique_id();
            let stamp = now_iso();
            conn.execute(
                "insert into documents (collection, id, data, created_at, updated_at) values (?, ?, ?, ?, ?)",
                params![collection, id, json, stamp, stamp],
            )
            .map_err(sql_err)?;

            Ok(Document {
                id,
                created_at: stamp.clone(),
                updated_at: stamp,
                data: data.clone(),
            })
        })
    }

    fn update_document(
        &self,
        secret: &str,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
    ) -> Result<Document, BackendError> {
        let now = Utc::now().timestamp();

        self.with_conn(|conn| {
            authorize(conn, secret, now)?;

            let mut doc = load_document(conn, collection, id)?.ok_or(BackendError::NotFound)?;
            for (k, v) in data {
                doc.data.insert(k.clone(), v.clone());
            }
            doc.updated_at = now_iso();

            conn.execute(
                "update documents set data = ?, updated_at = ? where collection = ? and id = ?",
                params![
                    Value::Object(doc.data.clone()).to_string(),
                    doc.updated_at,
                    collection,
                    id
                ],
            )
            .map_err(sql_err)?;

            Ok(doc)
        })
    }

    fn delete_document(&self, secret: &str, collection: &str, id: &str) -> Result<(), BackendError> {
        let now = Utc::now().timestamp();
        self.with_conn(|conn| {
            authorize(conn, secret, now)?;
            let changed = conn
                .execute(
                    "delete from documents where collection = ? and id = ?",
                    params![collection, id],
                )
                .map_err(sql_err)?;
            if changed == 0 {
                return Err(BackendError::NotFound);
            }
            Ok(())
        })
    }

    fn create_file(
        &self,
        secret: &str,
        bucket: &str,
        upload: Upload,
    ) -> Result<StoredFile, BackendError> {
        let now = Utc::now().timestamp();
        self.with_conn(|conn| {
            authorize(conn, secret, now)?;

            let id = unique_id();
            let size = upload.bytes.len() as u64;
            conn.execute(
                r#"
                insert into files (bucket, id, name, mime_type, size, contents, created_at)
                values (?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    bucket,
                    id,
                    upload.name,
                    upload.mime_type,
                    size as i64,
                    upload.bytes,
                    now_iso()
                ],
            )
            .map_err(sql_err)?;

            Ok(StoredFile {
                id,
                bucket_id: bucket.to_string(),
                name: upload.name,
                mime_type: upload.mime_type,
                size,
            })
        })
    }

    fn delete_file(&self, secret: &str, bucket: &str, id: &str) -> Result<(), BackendError> {
        let now = Utc::now().timestamp();
        self.with_conn(|conn| {
            authorize(conn, secret, now)?;
            let changed = conn
                .execute(
                    "delete from files where bucket = ? and id = ?",
                    params![bucket, id],
                )
                .map_err(sql_err)?;
            if changed == 0 {
                return Err(BackendError::NotFound);
            }
            Ok(())
        })
    }

    fn file_preview_url(&self, bucket: &str, id: &str, width: u32, height: u32) -> String {
        format!("/media/{bucket}/{id}?width={width}&height={height}")
    }

    fn file_contents(&self, bucket: &str, id: &str) -> Result<Upload, BackendError> {
        self.with_conn(|conn| {
            conn.query_row(
                "select name, mime_type, contents from files where bucket = ? and id = ?",
                params![bucket, id],
                |r| {
                    Ok(Upload {
                        name: r.get(0)?,
                        mime_type: r.get(1)?,
                        bytes: r.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(sql_err)?
            .ok_or(BackendError::NotFound)
        })
    }
}
