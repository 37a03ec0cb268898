use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

/// Number of random identifiers tried before giving up on an allocation
pub const DEFAULT_ID_ALLOCATION_ATTEMPTS: u32 = 16;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: Option<String>,
    pub app_name: String,
    pub deployment: String,
    pub bind_addr: String,
    pub id_allocation_attempts: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok(); // Load from .env file if available
        let db_url = env::var("DB_URL").ok().or_else(|| {
            // A full set of DB_* parts selects a server database, otherwise
            // the local SQLite file is used
            let user = env::var("DB_USER").ok()?;
            Some(format!(
                "{}://{}:{}@{}:{}/{}",
                env::var("DB_PREFIX").unwrap_or_else(|_| "postgresql".to_string()),
                user,
                env::var("DB_PASSWORD").unwrap_or_default(),
                env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                env::var("DB_NAME").unwrap_or_else(|_| "farm".to_string()),
            ))
        });

        Config {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "farm-api".to_string()),
            deployment: env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            id_allocation_attempts: env::var("ID_ALLOCATION_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|attempts| *attempts > 0)
                .unwrap_or(DEFAULT_ID_ALLOCATION_ATTEMPTS),
            db_url: Some(db_url.unwrap_or_else(|| "sqlite://database.db?mode=rwc".to_string())),
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            app_name: "farm-api-test".to_string(),
            deployment: "test".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            id_allocation_attempts: DEFAULT_ID_ALLOCATION_ATTEMPTS,
            db_url: None,
        }
    }
}
