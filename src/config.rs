// src/config.rs
use crate::backend::AppwriteConfig;
use log::LevelFilter;
use std::env;
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use url::form_urlencoded;

const PLACEHOLDER_PROJECT_ID: &str = "YOUR_PROJECT_ID";
const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} is not set"),
            ConfigError::Invalid { key, value, reason } => {
                write!(f, "{key}={value:?} is invalid: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Appwrite,
    Local,
}

/// Company and contact details shown across the site.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub company_name: String,
    pub slogan: String,
    /// Digits only, country code first (e.g. 5511999999999).
    pub phone: String,
    pub phone_display: String,
    pub email: String,
    pub whatsapp_message: String,
    pub seo_title: String,
    pub seo_description: String,
    pub seo_keywords: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            company_name: "Duarte Consultor Imobiliário".into(),
            slogan: "Encontre o imóvel dos seus sonhos com facilidade e segurança".into(),
            phone: "5511999999999".into(),
            phone_display: "(11) 99999-9999".into(),
            email: "contato@duarteimoveis.com.br".into(),
            whatsapp_message: "Olá! Gostaria de mais informações sobre imóveis disponíveis.".into(),
            seo_title: "Duarte Consultor Imobiliário - Encontre seu Imóvel Ideal".into(),
            seo_description: "Portal imobiliário para encontrar apartamentos, casas e terrenos. \
                              Busca avançada, fotos e contato direto com o corretor."
                .into(),
            seo_keywords: "imóveis, apartamentos, casas, terrenos, aluguel, venda, imobiliária".into(),
        }
    }
}

impl SiteInfo {
    /// wa.me link with a prefilled message (the default one when `None`).
    pub fn whatsapp_link(&self, message: Option<&str>) -> String {
        let text: String =
            form_urlencoded::byte_serialize(message.unwrap_or(&self.whatsapp_message).as_bytes())
                .collect();
        format!("https://wa.me/{}?text={}", self.phone, text.replace('+', "%20"))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub log_level: LevelFilter,
    pub app_db_path: String,
    pub session_ttl: Duration,
    pub backend: BackendKind,
    pub appwrite: AppwriteConfig,
    pub collection_id: String,
    pub bucket_id: String,
    pub local_backend_path: String,
    /// Account created in the local backend at startup.
    pub admin_seed: Option<(String, String)>,
    pub site: SiteInfo,
}

impl Config {
    /// Read `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str, default: &str| -> String {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let opt = |key: &'static str| -> Option<String> {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let invalid = |key: &'static str, value: String, reason: String| ConfigError::Invalid {
            key,
            value,
            reason,
        };

        let bind_raw = var("BIND_ADDR", "127.0.0.1:3000");
        let bind_addr = bind_raw
            .parse()
            .map_err(|e: std::net::AddrParseError| invalid("BIND_ADDR", bind_raw.clone(), e.to_string()))?;

        let workers_raw = var("MAX_WORKERS", "8");
        let max_workers = workers_raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| invalid("MAX_WORKERS", workers_raw.clone(), "expected a positive integer".into()))?;

        let level_raw = var("LOG_LEVEL", "info");
        let log_level = level_raw
            .parse::<LevelFilter>()
            .map_err(|e| invalid("LOG_LEVEL", level_raw.clone(), e.to_string()))?;

        let ttl_raw = var("SESSION_TTL", "7d");
        let session_ttl = humantime::parse_duration(&ttl_raw)
            .map_err(|e| invalid("SESSION_TTL", ttl_raw.clone(), e.to_string()))?;
        if session_ttl.is_zero() || session_ttl > MAX_SESSION_TTL {
            return Err(invalid(
                "SESSION_TTL",
                ttl_raw,
                "expected a duration between 1s and 365d".into(),
            ));
        }

        let backend_raw = var("BACKEND", "appwrite");
        let backend = match backend_raw.to_lowercase().as_str() {
            "appwrite" => BackendKind::Appwrite,
            "local" => BackendKind::Local,
            _ => {
                return Err(invalid(
                    "BACKEND",
                    backend_raw,
                    "expected \"appwrite\" or \"local\"".into(),
                ))
            }
        };

        let project_id = opt("APPWRITE_PROJECT_ID").unwrap_or_default();
        if backend == BackendKind::Appwrite
            && (project_id.is_empty() || project_id == PLACEHOLDER_PROJECT_ID)
        {
            return Err(ConfigError::Missing("APPWRITE_PROJECT_ID"));
        }

        let admin_seed = match (opt("ADMIN_EMAIL"), opt("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        };

        let defaults = SiteInfo::default();
        let site = SiteInfo {
            company_name: var("SITE_COMPANY_NAME", &defaults.company_name),
            slogan: var("SITE_SLOGAN", &defaults.slogan),
            phone: var("SITE_PHONE", &defaults.phone),
            phone_display: var("SITE_PHONE_DISPLAY", &defaults.phone_display),
            email: var("SITE_EMAIL", &defaults.email),
            whatsapp_message: var("SITE_WHATSAPP_MESSAGE", &defaults.whatsapp_message),
            ..defaults
        };

        Ok(Self {
            bind_addr,
            max_workers,
            log_level,
            app_db_path: var("APP_DB_PATH", "house_finder.sqlite3"),
            session_ttl,
            backend,
            appwrite: AppwriteConfig {
                endpoint: var("APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1"),
                project_id,
                api_key: opt("APPWRITE_API_KEY"),
                database_id: var("APPWRITE_DATABASE_ID", "imobiliariaDB"),
            },
            collection_id: var("APPWRITE_COLLECTION_ID", "imoveis"),
            bucket_id: var("APPWRITE_BUCKET_ID", "fotos_imoveis"),
            local_backend_path: var("LOCAL_BACKEND_PATH", "local_backend.sqlite3"),
            admin_seed,
            site,
        })
    }

    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl.as_secs() as i64
    }
}
