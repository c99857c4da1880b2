// ABOUTME: Database configuration types for SQLite connections
// ABOUTME: Parses DATABASE_URL into a typed URL and sizes the connection pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::environment::{env_var_or, parse_env};
use crate::constants::{defaults, env_vars};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error for `PostgreSQL` URLs, which this service does not support
    pub fn parse_url(s: &str) -> AppResult<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.strip_prefix("//").unwrap_or(path_str);
            if path_str == ":memory:" {
                Ok(Self::Memory)
            } else if path_str.is_empty() {
                Err(AppError::config("DATABASE_URL has an empty SQLite path"))
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else if s.starts_with("postgresql://") || s.starts_with("postgres://") {
            Err(AppError::config(
                "DATABASE_URL points at PostgreSQL; only SQLite is supported",
            ))
        } else {
            // Fallback: treat as SQLite file path
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/progress.db"),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Pool size; always 1 for in-memory databases
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DatabaseUrl::default(),
            max_connections: defaults::DATABASE_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a private in-memory database
    #[must_use]
    pub const fn in_memory() -> Self {
        Self {
            url: DatabaseUrl::Memory,
            max_connections: 1,
        }
    }

    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or `DATABASE_MAX_CONNECTIONS` is invalid
    pub fn from_env() -> AppResult<Self> {
        let url = DatabaseUrl::parse_url(&env_var_or(
            env_vars::DATABASE_URL,
            defaults::DATABASE_URL,
        ))?;
        let requested: u32 = parse_env(
            env_vars::DATABASE_MAX_CONNECTIONS,
            defaults::DATABASE_MAX_CONNECTIONS,
        )?;
        if requested == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_vars::DATABASE_MAX_CONNECTIONS
            )));
        }

        // Every connection to sqlite::memory: opens its own empty database
        let max_connections = if url.is_memory() { 1 } else { requested };

        Ok(Self {
            url,
            max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_parse_memory_url() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
    }

    #[test]
    fn test_parse_file_urls() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/progress.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/progress.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:///var/lib/progress.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("/var/lib/progress.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("progress.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("progress.db")
            }
        );
    }

    #[test]
    fn test_postgres_is_rejected() {
        let error = DatabaseUrl::parse_url("postgres://localhost/progress").unwrap_err();
        assert_eq!(error.code, ErrorCode::ConfigError);
    }
}
