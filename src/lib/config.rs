use anyhow::Context;
use dotenv::dotenv;
use std::env;

/// Value of `DATABASE_URL` that selects the process-local store instead of SQLite.
pub const IN_MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_port: String,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        // A missing .env file is fine, the variables may come from the environment itself.
        dotenv().ok();

        let server_port = load_env("SERVER_PORT")?;
        let database_url = load_env("DATABASE_URL")?;

        Ok(Config {
            server_port,
            database_url,
        })
    }

    pub fn uses_in_memory_store(&self) -> bool {
        self.database_url == IN_MEMORY_DATABASE_URL
    }
}

fn load_env(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("failed to load environment variable {}", key))
}
