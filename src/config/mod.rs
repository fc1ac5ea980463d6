/// Database connection and table creation
pub mod database;

/// Operator label from environment variables
pub mod operator;

/// Seed categories, sample items and stock policy from config.toml
pub mod seed;
