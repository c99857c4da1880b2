// ABOUTME: RAII guard over sqlx transactions, with a BEGIN IMMEDIATE constructor for SQLite
// ABOUTME: Rolls back on drop and hands the connection back to the pool intact
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Transaction guard
//!
//! `SQLite`'s default deferred transactions only take the write lock on the
//! first write, so two connections can both read the same "current best"
//! before either inserts. [`TransactionGuard::begin_immediate`] opens the
//! transaction with `BEGIN IMMEDIATE`, taking the reserved lock before the
//! read; a second writer waits on the busy timeout until the first commits.
//!
//! ```text
//! let mut guard = TransactionGuard::begin_immediate(&pool).await?;
//! let best = fetch_best(guard.executor()?, ...).await?;
//! insert_record(guard.executor()?, &record).await?;
//! guard.commit().await?;
//! ```
//!
//! Dropping the guard without `commit` or `rollback` drops the inner sqlx
//! `Transaction`, which queues a rollback and returns the connection to the
//! pool. The connection is never closed, so an in-memory database survives.

use crate::errors::{AppError, AppResult};
use sqlx::{Database, Sqlite, SqlitePool, Transaction};
use tracing::{debug, warn};

/// RAII wrapper that rolls back an uncommitted transaction on drop
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    committed: bool,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Wrap a transaction obtained from the pool
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>) -> Self {
        debug!("TransactionGuard created");
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Connection to run statements on inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already committed or rolled back
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction
            .as_deref_mut()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails
    pub async fn commit(mut self) -> AppResult<()> {
        let transaction = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot commit"))?;
        transaction
            .commit()
            .await
            .map_err(|e| AppError::database(format!("Transaction commit failed: {e}")))?;
        self.committed = true;
        debug!("TransactionGuard committed");
        Ok(())
    }

    /// Roll back the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails
    pub async fn rollback(mut self) -> AppResult<()> {
        let transaction = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot rollback"))?;
        transaction
            .rollback()
            .await
            .map_err(|e| AppError::database(format!("Transaction rollback failed: {e}")))?;
        debug!("TransactionGuard rolled back");
        Ok(())
    }

    /// Whether `commit` completed
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }
}

impl TransactionGuard<'static, Sqlite> {
    /// Start a `BEGIN IMMEDIATE` transaction on a pooled connection
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the write lock cannot
    /// be taken within the busy timeout
    pub async fn begin_immediate(pool: &SqlitePool) -> AppResult<Self> {
        let transaction = pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        Ok(Self::new(transaction))
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            warn!("TransactionGuard dropped without commit; rolling back");
        }
    }
}

/// Guard over a `SQLite` transaction
pub type SqliteTransactionGuard = TransactionGuard<'static, Sqlite>;
