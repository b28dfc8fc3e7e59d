//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (DEBUG, LOGENTRIES_TOKEN, LOGLVL)
//!     → ServerConfig (immutable)
//!     → LoggerConfig builds the shared Logger once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Environment wins over the file for logging settings

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::LoggerConfig;
pub use schema::ListenerConfig;
pub use schema::RedirectConfig;
pub use schema::ServerConfig;
pub use schema::StaticFilesConfig;
