// src/config.rs
use std::env;

use anyhow::{Context, Result};

/// Process configuration, built once in main and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
}

impl Config {
    /// Reads configuration from the environment (a .env file is loaded by
    /// main before this runs).
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
        })
    }
}
