/**
 * Server Configuration
 *
 * This module loads the server settings from environment variables (a
 * `.env` file is read by the binary before this runs) and opens the
 * optional PostgreSQL connection.
 *
 * # Configuration Sources
 *
 * `Settings::from_env()` reads the process environment; tests use
 * `Settings::from_lookup()` with a closure instead so they never touch
 * global state.
 *
 * # Validation
 *
 * In `development` every secret has a usable default. In any other
 * environment the database password (or `DATABASE_URL`), the JWT secret and
 * the Google OAuth client credentials are required, and all missing keys
 * are reported in one `ConfigError::Missing`.
 *
 * # Error Handling
 *
 * Database connection and migration failures are logged but do not prevent
 * server startup: `load_database` returns `None` and the server falls back
 * to the in-memory store.
 */

use std::time::Duration;

use jsonwebtoken::Algorithm;
use sqlx::PgPool;
use thiserror::Error;

use crate::shared::document::DEFAULT_MAX_FILE_SIZE;

const DEV_JWT_SECRET: &str = "docnest-development-secret-change-me";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required keys are unset
    #[error("Missing required configuration: {}", .0.join(", "))]
    Missing(Vec<String>),

    /// A key is set but cannot be parsed
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Where document files are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
}

/// Typed server settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_name: String,
    pub api_v1_str: String,
    pub environment: String,
    pub debug: bool,
    pub server_host: String,
    pub server_port: u16,

    database_url: Option<String>,

    pub jwt_secret_key: String,
    pub jwt_algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
    pub bcrypt_cost: u32,

    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_redirect_uri: String,

    pub storage_backend: StorageBackend,
    pub upload_dir: String,
    pub public_base_url: String,
    pub max_file_size: usize,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_session_token: Option<String>,
    pub aws_region: String,
    pub aws_bucket_name: Option<String>,
    pub s3_endpoint: Option<String>,
    pub debug_s3_operations: bool,

    pub share_link_expires_secs: u64,
    pub track_api_requests: bool,
    pub allowed_origins: Vec<String>,
}

fn parse<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

fn parse_bool(key: &str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(ConfigError::Invalid {
            key: key.to_string(),
            message: format!("expected a boolean, got '{}'", v),
        }),
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` for unparsable values and
    /// `ConfigError::Missing` when required keys are unset outside
    /// `development`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let is_development = environment == "development";
        let debug = parse_bool("DEBUG", get("DEBUG"), false)?;

        let database_url = get("DATABASE_URL").or_else(|| {
            get("POSTGRES_PASSWORD").map(|password| {
                format!(
                    "postgres://{}:{}@{}/{}",
                    get("POSTGRES_USER").unwrap_or_else(|| "postgres".to_string()),
                    urlencoding::encode(&password),
                    get("POSTGRES_SERVER").unwrap_or_else(|| "localhost".to_string()),
                    get("POSTGRES_DB").unwrap_or_else(|| "docnest".to_string()),
                )
            })
        });

        let jwt_algorithm = match get("JWT_ALGORITHM").as_deref().unwrap_or("HS256") {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(ConfigError::Invalid {
                    key: "JWT_ALGORITHM".to_string(),
                    message: format!("unsupported algorithm '{}'", other),
                })
            }
        };

        let storage_backend = match get("STORAGE_BACKEND")
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
            .unwrap_or("local")
        {
            "local" => StorageBackend::Local,
            "s3" => StorageBackend::S3,
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND".to_string(),
                    message: format!("expected 'local' or 's3', got '{}'", other),
                })
            }
        };

        let mut missing = Vec::new();
        if !is_development {
            if database_url.is_none() {
                missing.push("POSTGRES_PASSWORD".to_string());
            }
            for key in ["JWT_SECRET_KEY", "GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET"] {
                if get(key).is_none() {
                    missing.push(key.to_string());
                }
            }
        }
        if storage_backend == StorageBackend::S3 {
            for key in ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_BUCKET_NAME"] {
                if get(key).is_none() {
                    missing.push(key.to_string());
                }
            }
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let server_port = parse("SERVER_PORT", get("SERVER_PORT"), 8000u16)?;

        Ok(Self {
            project_name: get("PROJECT_NAME").unwrap_or_else(|| "DocNest".to_string()),
            api_v1_str: get("API_V1_STR").unwrap_or_else(|| "/api/v1".to_string()),
            environment,
            debug,
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,
            database_url,
            jwt_secret_key: get("JWT_SECRET_KEY").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            jwt_algorithm,
            access_token_expire_minutes: parse(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                get("ACCESS_TOKEN_EXPIRE_MINUTES"),
                30,
            )?,
            refresh_token_expire_days: parse(
                "REFRESH_TOKEN_EXPIRE_DAYS",
                get("REFRESH_TOKEN_EXPIRE_DAYS"),
                7,
            )?,
            bcrypt_cost: parse("BCRYPT_COST", get("BCRYPT_COST"), bcrypt::DEFAULT_COST)?,
            google_client_id: get("GOOGLE_CLIENT_ID"),
            google_client_secret: get("GOOGLE_CLIENT_SECRET"),
            google_redirect_uri: get("GOOGLE_REDIRECT_URI").unwrap_or_else(|| {
                format!("http://localhost:{}/api/v1/auth/google/callback", server_port)
            }),
            storage_backend,
            upload_dir: get("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            public_base_url: get("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}", server_port)),
            max_file_size: parse("MAX_FILE_SIZE", get("MAX_FILE_SIZE"), DEFAULT_MAX_FILE_SIZE)?,
            aws_access_key_id: get("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            aws_session_token: get("AWS_SESSION_TOKEN"),
            aws_region: get("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            aws_bucket_name: get("AWS_BUCKET_NAME"),
            s3_endpoint: get("S3_ENDPOINT"),
            debug_s3_operations: parse_bool("DEBUG_S3_OPERATIONS", get("DEBUG_S3_OPERATIONS"), false)?,
            share_link_expires_secs: parse(
                "SHARE_LINK_EXPIRES_SECS",
                get("SHARE_LINK_EXPIRES_SECS"),
                3600,
            )?,
            track_api_requests: parse_bool("TRACK_API_REQUESTS", get("TRACK_API_REQUESTS"), true)?,
            allowed_origins: get("ALLOWED_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000,http://localhost:8000".to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        })
    }

    /// Settings for tests and local tooling: development defaults only
    pub fn development() -> Self {
        match Self::from_lookup(|_| None) {
            Ok(settings) => settings,
            Err(e) => unreachable!("development defaults are always valid: {}", e),
        }
    }

    /// Explicit `DATABASE_URL` or the URL composed from `POSTGRES_*`
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// `API_V1_STR` with exactly one leading and no trailing slash
    pub fn api_prefix(&self) -> String {
        let trimmed = self.api_v1_str.trim().trim_matches('/');
        if trimmed.is_empty() {
            "/api/v1".to_string()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// Route prefix that serves signed local downloads
    pub fn files_route(&self) -> String {
        format!("{}/files", self.api_prefix())
    }

    /// Absolute URL prefix for signed local download links
    pub fn files_url(&self) -> String {
        format!("{}{}", self.public_base_url.trim_end_matches('/'), self.files_route())
    }

    /// Filter directive used when `RUST_LOG` is unset
    pub fn default_log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    pub fn share_link_ttl(&self) -> Duration {
        Duration::from_secs(self.share_link_expires_secs)
    }
}

/// Open the PostgreSQL pool and run migrations
///
/// This function:
/// 1. Connects using `settings.database_url()`
/// 2. Runs the embedded migrations from `migrations/`
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if no URL is configured or the connection fails
///
/// # Errors
///
/// Errors are logged but do not prevent server startup.
pub async fn load_database(settings: &Settings) -> Option<PgPool> {
    let Some(database_url) = settings.database_url() else {
        tracing::warn!("DATABASE_URL not set. Falling back to the in-memory store.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to the in-memory store.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
