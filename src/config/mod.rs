use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
    pub tenancy: TenancyConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub max_request_size_bytes: usize,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub access_token_minutes: u64,
    pub refresh_token_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// Shared secret expected in `x-webhook-secret` on the payment webhook.
    /// `None` leaves the webhook open, which is only sensible in development.
    #[serde(skip_serializing)]
    pub webhook_secret: Option<String>,
    pub bootstrap_superadmin_email: Option<String>,
    #[serde(skip_serializing)]
    pub bootstrap_superadmin_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    pub trial_days: u32,
    pub reset_token_ttl_minutes: u32,
    pub min_admin_key_length: usize,
    /// Base URL used when building links in outbound mail.
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }
        if let Ok(v) = env::var("ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Storage overrides
        if let Ok(v) = env::var("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("UPLOADS_DIR") {
            self.storage.uploads_dir = PathBuf::from(v);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_MINUTES") {
            self.security.access_token_minutes = v.parse().unwrap_or(self.security.access_token_minutes);
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_HOURS") {
            self.security.refresh_token_hours = v.parse().unwrap_or(self.security.refresh_token_hours);
        }
        if let Ok(v) = env::var("ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("WEBHOOK_SECRET") {
            self.security.webhook_secret = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("SUPERADMIN_EMAIL") {
            self.security.bootstrap_superadmin_email = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("SUPERADMIN_PASSWORD") {
            self.security.bootstrap_superadmin_password = Some(v).filter(|s| !s.is_empty());
        }

        // Tenancy overrides
        if let Ok(v) = env::var("TRIAL_DAYS") {
            self.tenancy.trial_days = v.parse().unwrap_or(self.tenancy.trial_days);
        }
        if let Ok(v) = env::var("RESET_TOKEN_TTL_MINUTES") {
            self.tenancy.reset_token_ttl_minutes = v.parse().unwrap_or(self.tenancy.reset_token_ttl_minutes);
        }
        if let Ok(v) = env::var("PUBLIC_BASE_URL") {
            self.tenancy.public_base_url = v.trim_end_matches('/').to_string();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind_addr: "127.0.0.1".to_string(),
                port: 10000,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                enable_request_logging: true,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("./data"),
                uploads_dir: PathBuf::from("./uploads"),
            },
            security: SecurityConfig {
                jwt_secret: "development-only-secret".to_string(),
                access_token_minutes: 60,
                refresh_token_hours: 24 * 7,
                enable_cors: true,
                cors_origins: vec!["http://localhost:10000".to_string(), "http://localhost:5173".to_string()],
                webhook_secret: None,
                bootstrap_superadmin_email: None,
                bootstrap_superadmin_password: None,
            },
            tenancy: TenancyConfig {
                trial_days: 14,
                reset_token_ttl_minutes: 30,
                min_admin_key_length: 8,
                public_base_url: "http://localhost:10000".to_string(),
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 10000,
                max_request_size_bytes: 10 * 1024 * 1024,
                enable_request_logging: true,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("./data"),
                uploads_dir: PathBuf::from("./uploads"),
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                access_token_minutes: 30,
                refresh_token_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                webhook_secret: None,
                bootstrap_superadmin_email: None,
                bootstrap_superadmin_password: None,
            },
            tenancy: TenancyConfig {
                trial_days: 14,
                reset_token_ttl_minutes: 30,
                min_admin_key_length: 8,
                public_base_url: "https://staging.example.com".to_string(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 10000,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
                enable_request_logging: false,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("./data"),
                uploads_dir: PathBuf::from("./uploads"),
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                access_token_minutes: 15,
                refresh_token_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                webhook_secret: None,
                bootstrap_superadmin_email: None,
                bootstrap_superadmin_password: None,
            },
            tenancy: TenancyConfig {
                trial_days: 14,
                reset_token_ttl_minutes: 30,
                min_admin_key_length: 12,
                public_base_url: "https://app.example.com".to_string(),
            },
        }
    }

    /// Development defaults rooted at `dir`, used by tests and local tooling.
    pub fn rooted_at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut config = Self::development();
        config.storage.data_dir = dir.join("data");
        config.storage.uploads_dir = dir.join("uploads");
        config
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
