// ABOUTME: Core types for the progress analytics workspace
// ABOUTME: Foundation crate with the data model, metric comparator, errors, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Progress Core
//!
//! Foundation crate shared by the storage layer and the analytics engines.
//! It has no async or storage dependencies and is designed to change rarely.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and the domain `ProgressError`
//! - **models**: personal records, workout logs, milestones, body measurements
//! - **comparator**: metric-kind aware "is this better?" ordering
//! - **constants**: environment variable names, defaults, thresholds

/// Unified error handling system with standard error codes
pub mod errors;

/// Core data models
pub mod models;

/// Metric-kind aware value comparison
pub mod comparator;

/// Application constants organized by domain
pub mod constants;
