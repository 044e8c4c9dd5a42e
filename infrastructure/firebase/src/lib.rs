pub mod auth;
pub mod client;
pub mod config;
pub mod database;

pub use client::{FirebaseApp, InitializationError};
pub use config::{ConfigurationError, FirebaseConfig, load_configuration};
