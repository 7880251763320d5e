use std::env;

use crate::blockchain::DEFAULT_DIFFICULTY;

/// Node settings read from the environment (and `.env`, loaded by `main`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

impl Config {
    /// Read `HOST`, `PORT` and `DIFFICULTY`. Unset or unparseable values fall
    /// back to defaults; range checks happen when the ledger is built.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            difficulty: lookup("DIFFICULTY")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.difficulty),
        }
    }
}
