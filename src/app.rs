// src/app.rs
use crate::backend::{AppwriteBackend, Backend, LocalBackend};
use crate::config::{BackendKind, Config};
use crate::db::sessions::APP_SCHEMA;
use crate::db::{init_db, Database};
use crate::errors::ServerError;
use log::info;

/// Everything a request handler needs.
pub struct App {
    pub config: Config,
    pub db: Database,
    pub backend: Box<dyn Backend>,
}

impl App {
    pub fn new(config: Config, db: Database, backend: Box<dyn Backend>) -> Self {
        Self {
            config,
            db,
            backend,
        }
    }

    /// Open the app database and connect the configured backend.
    pub fn from_config(config: Config) -> Result<Self, ServerError> {
        let db = Database::new(config.app_db_path.clone());
        init_db(&db, APP_SCHEMA)?;

        let backend: Box<dyn Backend> = match config.backend {
            BackendKind::Appwrite => {
                info!(
                    "using hosted backend {} (project {})",
                    config.appwrite.endpoint, config.appwrite.project_id
                );
                Box::new(AppwriteBackend::new(config.appwrite.clone())?)
            }
            BackendKind::Local => {
                info!("using local backend at {}", config.local_backend_path);
                let local = LocalBackend::open(config.local_backend_path.clone())?;
                if let Some((email, password)) = &config.admin_seed {
                    local.seed_account(email, password)?;
                }
                Box::new(local)
            }
        };

        Ok(Self::new(config, db, backend))
    }

    pub fn collection(&self) -> &str {
        &self.config.collection_id
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket_id
    }
}
