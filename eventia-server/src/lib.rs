//! Eventia Server - event and ticketing administration backend
//!
//! # Modules
//!
//! ```text
//! eventia-server/src/
//! ├── core/      # config, state, server, errors
//! ├── auth/      # credentials, permission resolution, JWT, gates
//! ├── audit/     # audit recorder, snapshots, storage
//! ├── db/        # SQLite pool and repositories
//! ├── services/  # role/permission graph, bootstrap
//! ├── api/       # HTTP handlers, one module per resource
//! ├── routes/    # router assembly and middleware
//! └── utils/     # logging, validation
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod routes;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use routes::{build_app, build_router};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::init_logger_with_file;

/// Security event logging, target `security`
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` into the process environment
pub fn setup_environment() {
    // a missing .env file is fine
    let _ = dotenv::dotenv();
}

pub fn print_banner() {
    println!(
        r#"
  ______                 _   _
 |  ____|               | | (_)
 | |____   _____ _ __ | |_ _  __ _
 |  __\ \ / / _ \ '_ \| __| |/ _` |
 | |___\ V /  __/ | | | |_| | (_| |
 |______\_/ \___|_| |_|\__|_|\__,_|
    "#
    );
}
