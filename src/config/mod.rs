/// Database configuration and connection management
pub mod database;

/// Assessment settings loaded from config.toml
pub mod settings;
