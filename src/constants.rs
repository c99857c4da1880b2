// ABOUTME: Application constants for the progress analytics service
// ABOUTME: Re-exports environment variable names, defaults, and thresholds from progress-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use progress_core::constants::*;

/// Service identity used in structured logs
pub mod service_names {
    /// Default service name
    pub const PROGRESS_ANALYTICS: &str = "progress-analytics";
}
