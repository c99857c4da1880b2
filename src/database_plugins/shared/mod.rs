// ABOUTME: Shared database helpers used by storage implementations
// ABOUTME: Currently holds the rollback-on-drop transaction guard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Write-locking transaction guard for read-compare-insert sequences
pub mod transactions;
