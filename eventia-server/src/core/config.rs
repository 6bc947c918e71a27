use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::auth::jwt::generate_printable_secret;
use crate::core::ServerError;
use crate::utils::logger::init_logger_with_file;

/// Minimum HMAC secret length accepted in production
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Server configuration
///
/// # Environment variables
///
/// | variable | default | notes |
/// |----------|---------|-------|
/// | WORK_DIR | ./data | data directory |
/// | HTTP_PORT | 5000 | HTTP listen port |
/// | DATABASE_URL | sqlite://<WORK_DIR>/eventia.db | SQLite url |
/// | ENVIRONMENT | development | development / staging / production |
/// | JWT_SECRET | generated in development | required in production, ≥ 32 chars |
/// | JWT_EXPIRATION_MINUTES | 120 | token lifetime |
/// | JWT_ISSUER | eventia-api | |
/// | JWT_AUDIENCE | eventia-admin | |
/// | LOGIN_DELAY_MS | 500 | fixed delay before answering a login |
/// | CORS_ALLOWED_ORIGIN | http://localhost:4200 | admin frontend origin |
/// | LOG_LEVEL | info | overridden by RUST_LOG |
/// | LOG_DIR | unset | daily rolling log files when set |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | unset | first-run admin account |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/eventia HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub database_url: String,
    /// development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub login_delay_ms: u64,
    pub cors_allowed_origin: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// No `JWT_SECRET` was configured; tokens die with the process
    pub jwt_secret_generated: bool,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ServerError> {
        let work_dir = env_or("WORK_DIR", "./data");
        let environment = env_or("ENVIRONMENT", "development");
        let database_url = env_opt("DATABASE_URL").unwrap_or_else(|| {
            format!(
                "sqlite://{}",
                PathBuf::from(&work_dir).join("eventia.db").display()
            )
        });

        let (secret, jwt_secret_generated) = Self::jwt_secret(&environment)?;
        let jwt = JwtConfig {
            secret,
            expiration_minutes: env_parse("JWT_EXPIRATION_MINUTES", 120),
            issuer: env_or("JWT_ISSUER", "eventia-api"),
            audience: env_or("JWT_AUDIENCE", "eventia-admin"),
        };
        if jwt.expiration_minutes <= 0 {
            return Err(ServerError::Config(
                "JWT_EXPIRATION_MINUTES must be positive".into(),
            ));
        }

        Ok(Self {
            work_dir,
            http_port: env_parse("HTTP_PORT", 5000),
            database_url,
            environment,
            jwt,
            login_delay_ms: env_parse("LOGIN_DELAY_MS", 500),
            cors_allowed_origin: env_or("CORS_ALLOWED_ORIGIN", "http://localhost:4200"),
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: env_opt("LOG_DIR"),
            jwt_secret_generated,
            admin_email: env_opt("ADMIN_EMAIL"),
            admin_password: env_opt("ADMIN_PASSWORD"),
        })
    }

    /// Configured or generated secret, and whether it was generated
    ///
    /// Runs before logging is set up; warnings go through
    /// [`Config::log_warnings`].
    fn jwt_secret(environment: &str) -> Result<(String, bool), ServerError> {
        match env_opt("JWT_SECRET") {
            Some(secret) if secret.len() >= MIN_JWT_SECRET_LEN => Ok((secret, false)),
            Some(_) if environment == "production" => Err(ServerError::Config(format!(
                "JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters"
            ))),
            Some(secret) => Ok((secret, false)),
            None if environment == "production" => {
                Err(ServerError::Config("JWT_SECRET is required in production".into()))
            }
            None => generate_printable_secret()
                .map(|secret| (secret, true))
                .map_err(|e| ServerError::Config(e.to_string())),
        }
    }

    /// Install the global subscriber from `log_level` / `log_dir`
    pub fn init_logging(&self) {
        init_logger_with_file(Some(&self.log_level), self.log_dir.as_deref());
    }

    /// Report weak settings once logging is up
    pub fn log_warnings(&self) {
        if self.jwt_secret_generated {
            tracing::warn!("JWT_SECRET not set, using a random secret for this process");
        } else if self.jwt.secret.len() < MIN_JWT_SECRET_LEN {
            tracing::warn!("JWT_SECRET is shorter than {MIN_JWT_SECRET_LEN} characters");
        }
    }

    /// In-memory configuration for tests: fixed secret, no login delay
    pub fn for_tests() -> Self {
        Self {
            work_dir: std::env::temp_dir().display().to_string(),
            http_port: 0,
            database_url: "sqlite::memory:".into(),
            environment: "test".into(),
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-long-enough-for-hs256".into(),
                expiration_minutes: 120,
                issuer: "eventia-api".into(),
                audience: "eventia-admin".into(),
            },
            login_delay_ms: 0,
            cors_allowed_origin: "http://localhost:4200".into(),
            log_level: "debug".into(),
            log_dir: None,
            jwt_secret_generated: false,
            admin_email: None,
            admin_password: None,
        }
    }

    /// Make sure the work directory exists
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
